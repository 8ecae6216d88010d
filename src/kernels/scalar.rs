//! Scalar-broadcast kernels: `scale` (`y[i] = x[i] * s`) and `bias`
//! (`y[i] = x[i] + s`).

use crate::error::{TensorError, TensorResult};
use crate::shape::MemoryOrder;
use crate::simd::SimdElement;
use crate::tensor::Tensor;

fn check_pair<T, const XR: usize, const YR: usize, O: MemoryOrder>(
    x: &Tensor<T, XR, O>,
    y: &Tensor<T, YR, O>,
) -> TensorResult<()> {
    for invalid in [
        (!x.is_valid()).then(|| (x.value_size(), x.value_capacity())),
        (!y.is_valid()).then(|| (y.value_size(), y.value_capacity())),
    ]
    .into_iter()
    .flatten()
    {
        return Err(TensorError::InvalidTensorLayout {
            data_len: invalid.0,
            capacity: invalid.1,
        });
    }
    if x.value_size() != y.value_size() {
        return Err(TensorError::UnequalSize {
            lhs: x.value_size(),
            rhs: y.value_size(),
        });
    }
    Ok(())
}

pub fn scale<T, const XR: usize, const YR: usize, O: MemoryOrder>(
    x: &Tensor<T, XR, O>,
    y: &mut Tensor<T, YR, O>,
    s: T,
) -> TensorResult<()>
where
    T: SimdElement + core::ops::Mul<Output = T>,
{
    check_pair(x, y)?;
    let xs = unsafe { x.as_slice() };
    let ys = unsafe { y.as_mut_slice() };
    let (full, tail) = crate::simd::chunks::<T>(xs.len());
    let lane_s = s.splat();

    for c in 0..full {
        let base = c * T::LANES;
        let result = T::load(&xs[base..]) * lane_s;
        T::store(result, &mut ys[base..]);
    }
    let base = full * T::LANES;
    for i in base..base + tail {
        ys[i] = xs[i] * s;
    }
    Ok(())
}

pub fn bias<T, const XR: usize, const YR: usize, O: MemoryOrder>(
    x: &Tensor<T, XR, O>,
    y: &mut Tensor<T, YR, O>,
    s: T,
) -> TensorResult<()>
where
    T: SimdElement + core::ops::Add<Output = T>,
{
    check_pair(x, y)?;
    let xs = unsafe { x.as_slice() };
    let ys = unsafe { y.as_mut_slice() };
    let (full, tail) = crate::simd::chunks::<T>(xs.len());
    let lane_s = s.splat();

    for c in 0..full {
        let base = c * T::LANES;
        let result = T::load(&xs[base..]) + lane_s;
        T::store(result, &mut ys[base..]);
    }
    let base = full * T::LANES;
    for i in base..base + tail {
        ys[i] = xs[i] + s;
    }
    Ok(())
}
