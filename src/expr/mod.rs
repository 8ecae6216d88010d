//! The index-expression compiler: turns `"ij,jk->ik"`-style strings into
//! the plan types the kernel engine executes directly, so expressions are
//! parsed once and plans are replayed on every call.

mod parser;
mod plan;

pub use parser::{contracted_rank, contraction_parse, inner_product_parse, permutate_parse};
pub use plan::{ContractionPlan, InnerProductPlan, OperandSide, PermutationPlan, PASS};
