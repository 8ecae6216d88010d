//! Elementwise binary kernels: `add`, `sub`, `mul` (Hadamard product).
//!
//! All three operands must be the same element count; the kernel does not
//! consult shape beyond that, since elementwise ops walk the physical
//! buffer directly rather than through permuted coordinates.

use crate::error::{TensorError, TensorResult};
use crate::shape::MemoryOrder;
use crate::simd::SimdElement;
use crate::tensor::Tensor;

fn check_triple<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    x: &Tensor<T, XR, O>,
    y: &Tensor<T, YR, O>,
    z: &Tensor<T, ZR, O>,
) -> TensorResult<()> {
    for invalid in [
        (!x.is_valid()).then(|| (x.value_size(), x.value_capacity())),
        (!y.is_valid()).then(|| (y.value_size(), y.value_capacity())),
        (!z.is_valid()).then(|| (z.value_size(), z.value_capacity())),
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
    if x.value_size() != z.value_size() {
        return Err(TensorError::UnequalSize {
            lhs: x.value_size(),
            rhs: z.value_size(),
        });
    }
    Ok(())
}

macro_rules! impl_elementwise_op {
    ($name:ident, $lane_op:tt, $scalar_op:tt) => {
        pub fn $name<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
            x: &Tensor<T, XR, O>,
            y: &Tensor<T, YR, O>,
            z: &mut Tensor<T, ZR, O>,
        ) -> TensorResult<()>
        where
            T: SimdElement
                + core::ops::Add<Output = T>
                + core::ops::Sub<Output = T>
                + core::ops::Mul<Output = T>,
        {
            check_triple(x, y, z)?;
            let (xs, ys) = unsafe { (x.as_slice(), y.as_slice()) };
            let zs = unsafe { z.as_mut_slice() };
            let (full, tail) = crate::simd::chunks::<T>(xs.len());

            for c in 0..full {
                let base = c * T::LANES;
                let lx = T::load(&xs[base..]);
                let ly = T::load(&ys[base..]);
                let result = lx $lane_op ly;
                T::store(result, &mut zs[base..]);
            }
            let base = full * T::LANES;
            for i in base..base + tail {
                zs[i] = xs[i] $scalar_op ys[i];
            }
            Ok(())
        }
    };
}

impl_elementwise_op!(add, +, +);
impl_elementwise_op!(sub, -, -);
impl_elementwise_op!(mul, *, *);
