//! Whole-tensor reductions: `sum`, `product`, `min`, `max`, `absmax`, `absmin`.
//!
//! Each walks the tensor's physical buffer in SIMD-width chunks with a
//! scalar tail for the remainder — reduction order is therefore
//! lane-chunked, not a single scalar left-fold; for floats this means the
//! result need not be bit-identical to a naive loop, only numerically
//! equivalent up to associativity.

use crate::error::{TensorError, TensorResult};
use crate::shape::MemoryOrder;
use crate::simd::SimdElement;
use crate::tensor::Tensor;

use super::abs::AbsValue;

/// Bounds used to seed a running extremum: `min` starts from the largest
/// finite value so the first comparison can only lower it, and vice versa
/// for `max`.
pub trait Extremes: Copy {
    fn max_finite() -> Self;
    fn min_finite() -> Self;
}

macro_rules! impl_extremes_int {
    ($t:ty) => {
        impl Extremes for $t {
            fn max_finite() -> Self {
                <$t>::MAX
            }
            fn min_finite() -> Self {
                <$t>::MIN
            }
        }
    };
}

macro_rules! impl_extremes_float {
    ($t:ty) => {
        impl Extremes for $t {
            fn max_finite() -> Self {
                <$t>::MAX
            }
            fn min_finite() -> Self {
                -<$t>::MAX
            }
        }
    };
}

impl_extremes_int!(i32);
impl_extremes_int!(i64);
impl_extremes_float!(f32);
impl_extremes_float!(f64);

fn nonempty<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<()> {
    // A zero-capacity tensor can never satisfy `is_valid()` (it requires
    // `len > 0`), so this check must come first or `SizeZeroTensor` would be
    // unreachable, masked by the generic `InvalidTensorLayout` below.
    if x.value_capacity() == 0 {
        return Err(TensorError::SizeZeroTensor);
    }
    if !x.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: x.value_size(),
            capacity: x.value_capacity(),
        });
    }
    Ok(())
}

pub fn sum<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + core::ops::Add<Output = T> + Default,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let (full, tail) = crate::simd::chunks::<T>(data.len());

    let mut lane_acc = T::default().splat();
    for c in 0..full {
        let chunk = &data[c * T::LANES..];
        lane_acc = lane_acc + T::load(chunk);
    }
    let mut total = T::horizontal_sum(lane_acc);
    for &v in &data[full * T::LANES..full * T::LANES + tail] {
        total = total + v;
    }
    Ok(total)
}

pub fn product<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + core::ops::Mul<Output = T>,
    T: From<u8>,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let (full, tail) = crate::simd::chunks::<T>(data.len());

    let one: T = T::from(1u8);
    let mut lane_acc = one.splat();
    for c in 0..full {
        let chunk = &data[c * T::LANES..];
        lane_acc = lane_acc * T::load(chunk);
    }
    let mut total = T::horizontal_product(lane_acc);
    for &v in &data[full * T::LANES..full * T::LANES + tail] {
        total = total * v;
    }
    Ok(total)
}

pub fn min<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + Extremes + PartialOrd,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let (full, tail) = crate::simd::chunks::<T>(data.len());

    let mut lane_acc = T::max_finite().splat();
    for c in 0..full {
        let chunk = &data[c * T::LANES..];
        lane_acc = T::lane_min(lane_acc, T::load(chunk));
    }
    let mut running = T::horizontal_min(lane_acc);
    for &v in &data[full * T::LANES..full * T::LANES + tail] {
        if v < running {
            running = v;
        }
    }
    Ok(running)
}

pub fn max<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + Extremes + PartialOrd,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let (full, tail) = crate::simd::chunks::<T>(data.len());

    let mut lane_acc = T::min_finite().splat();
    for c in 0..full {
        let chunk = &data[c * T::LANES..];
        lane_acc = T::lane_max(lane_acc, T::load(chunk));
    }
    let mut running = T::horizontal_max(lane_acc);
    for &v in &data[full * T::LANES..full * T::LANES + tail] {
        if v > running {
            running = v;
        }
    }
    Ok(running)
}

/// `max(|x|)` over the tensor — the canonical reading of "absmax" (not
/// `|max(x)|`; a tensor of `[-5, 1]` has `absmax == 5`).
pub fn absmax<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + Extremes + PartialOrd + AbsValue,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let mut running = T::min_finite();
    let mut first = true;
    for &v in data {
        let a = v.abs_unchecked();
        if first || a > running {
            running = a;
            first = false;
        }
    }
    Ok(running)
}

/// `min(|x|)` over the tensor.
pub fn absmin<T, const R: usize, O: MemoryOrder>(x: &Tensor<T, R, O>) -> TensorResult<T>
where
    T: SimdElement + Extremes + PartialOrd + AbsValue,
{
    nonempty(x)?;
    let data = unsafe { x.as_slice() };
    let mut running = T::max_finite();
    let mut first = true;
    for &v in data {
        let a = v.abs_unchecked();
        if first || a < running {
            running = a;
            first = false;
        }
    }
    Ok(running)
}
