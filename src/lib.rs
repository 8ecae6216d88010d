//! A small, general-rank dense tensor library: fixed-rank shape algebra
//! with row-/column-major layouts, zero-copy permuted views, an
//! einsum-style expression compiler, and a plan-driven kernel engine with
//! SIMD-chunked reductions and elementwise arithmetic.
//!
//! The engine is host-CPU only — no GPU dispatch — and single-threaded
//! cooperative except for the caching allocator, which serializes its own
//! operations behind a mutex so it can be shared across an application's
//! worker threads without every tensor operation paying synchronization
//! cost.

pub mod error;
pub mod expr;
pub mod factory;
pub mod kernels;
pub mod shape;
pub mod simd;
pub mod tensor;

pub use error::{ExprError, ExprResult, TensorError, TensorResult};
pub use expr::{
    contracted_rank, contraction_parse, inner_product_parse, permutate_parse, ContractionPlan,
    InnerProductPlan, OperandSide, PermutationPlan, PASS,
};
pub use factory::allocator::{AllocHandle, CachingAllocator};
pub use factory::registry::AllocatorRegistry;
pub use factory::{FactoryConfig, TensorFactory, TrackingMode};
pub use kernels::{
    absmax, absmin, add, bias, contraction, contraction_plan, inner_product, inner_product_plan,
    max, min, mul, outer_product, product, quantize, scale, sub, sum, unquantize,
};
pub use shape::{ColMajor, MemoryOrder, RowMajor, Shape, Size};
pub use tensor::Tensor;
