//! Linear quantize/unquantize between a float tensor and a fixed-width
//! signed-integer tensor.
//!
//! `quantize` finds `m = absmax(x)`; values are normalized by `max(m, 1)`
//! before being scaled into the integer range and rounded, so inputs
//! already inside `[-1, 1]` are quantized without being artificially
//! shrunk. `m` is the value to pass back into `unquantize` — note this is
//! the raw `absmax`, not the effective divisor (`unquantize` re-derives
//! `max(m, 1)` itself, the same way `quantize` does).

use crate::error::TensorResult;
use crate::kernels::abs::AbsValue;
use crate::kernels::reduce::{absmax, Extremes};
use crate::shape::MemoryOrder;
use crate::simd::SimdElement;
use crate::tensor::Tensor;

/// A float type quantize/unquantize can round through `f64` without losing
/// the precision that matters for an already-lossy integer cast.
pub trait QuantizeFloat: Copy {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl QuantizeFloat for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl QuantizeFloat for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

/// A fixed-width signed-integer target type for quantized storage.
pub trait QuantizedInt: Copy {
    const MAX_INT: f64;
    fn from_rounded_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
}

macro_rules! impl_quantized_int {
    ($t:ty) => {
        impl QuantizedInt for $t {
            const MAX_INT: f64 = <$t>::MAX as f64;

            #[inline]
            fn from_rounded_f64(v: f64) -> Self {
                v.round().clamp(<$t>::MIN as f64, <$t>::MAX as f64) as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_quantized_int!(i8);
impl_quantized_int!(i16);
impl_quantized_int!(i32);

/// Quantizes `x` into `y`, returning the raw `absmax(x)` the caller should
/// pass to [`unquantize`].
pub fn quantize<T, Q, const XR: usize, const YR: usize, O: MemoryOrder>(
    x: &Tensor<T, XR, O>,
    y: &mut Tensor<Q, YR, O>,
) -> TensorResult<T>
where
    T: SimdElement + Extremes + PartialOrd + AbsValue + QuantizeFloat,
    Q: QuantizedInt,
{
    let m = absmax(x)?;
    let divisor = m.to_f64().max(1.0);

    let xs = unsafe { x.as_slice() };
    let ys = unsafe { y.as_mut_slice() };
    for (xv, yv) in xs.iter().zip(ys.iter_mut()) {
        let normalized = xv.to_f64() / divisor;
        *yv = Q::from_rounded_f64(normalized * Q::MAX_INT);
    }
    Ok(m)
}

/// Inverse of [`quantize`]: reconstructs `y` from `x` and the `m` returned
/// by the matching `quantize` call.
pub fn unquantize<Q, T, const XR: usize, const YR: usize, O: MemoryOrder>(
    x: &Tensor<Q, XR, O>,
    y: &mut Tensor<T, YR, O>,
    m: T,
) -> TensorResult<()>
where
    Q: QuantizedInt,
    T: QuantizeFloat,
{
    let divisor = m.to_f64().max(1.0);
    let xs = unsafe { x.as_slice() };
    let ys = unsafe { y.as_mut_slice() };
    for (xv, yv) in xs.iter().zip(ys.iter_mut()) {
        let scaled = (xv.to_f64() / Q::MAX_INT) * divisor;
        *yv = T::from_f64(scaled);
    }
    Ok(())
}
