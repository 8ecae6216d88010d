//! The kernel engine: plan-driven contraction/inner-product walkers plus
//! SIMD-chunked 1-D passes (reductions, elementwise arithmetic, scalar
//! broadcast, quantize/unquantize) with scalar tail loops.

pub mod abs;
pub mod contraction;
pub mod elementwise;
pub mod inner_product;
pub mod quantize;
pub mod reduce;
mod walk;

pub use abs::AbsValue;
pub use contraction::{contraction, contraction_plan};
pub use elementwise::{add, mul, sub};
pub use inner_product::{inner_product, inner_product_plan, outer_product};
pub use quantize::{quantize, unquantize, QuantizeFloat, QuantizedInt};
pub use reduce::{absmax, absmin, max, min, product, sum, Extremes};
pub use scalar::{bias, scale};

mod scalar;
