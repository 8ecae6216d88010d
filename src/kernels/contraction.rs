//! Contraction kernel: drives a `ContractionPlan` over a single operand.

use core::ops::AddAssign;

use crate::error::{TensorError, TensorResult};
use crate::expr::{contraction_parse, ContractionPlan};
use crate::shape::MemoryOrder;
use crate::tensor::Tensor;

use super::walk::for_each_coord;

/// Runs a precompiled contraction plan: `z` accumulates `x` summed over the
/// plan's trailing (summed) axes, with the surviving axes placed at the
/// result positions the plan records. `z` is zeroed before accumulation.
pub fn contraction_plan<T, const XR: usize, const YR: usize, O: MemoryOrder>(
    plan: &ContractionPlan<XR, YR>,
    x: &Tensor<T, XR, O>,
    z: &mut Tensor<T, YR, O>,
) -> TensorResult<()>
where
    T: Copy + Default + AddAssign,
{
    if !x.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: x.value_size(),
            capacity: x.value_capacity(),
        });
    }
    if !z.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: z.value_size(),
            capacity: z.value_capacity(),
        });
    }
    for m in 0..YR {
        let x_axis = plan.lhs[m] as usize;
        let z_axis = plan.rhs[m] as usize;
        let (xs, zs) = (x.shape().get_size(x_axis), z.shape().get_size(z_axis));
        if xs != zs {
            return Err(TensorError::InvalidDimensions {
                expected: xs as usize,
                got: zs as usize,
            });
        }
    }

    unsafe {
        for v in z.as_mut_slice() {
            *v = T::default();
        }
    }

    for_each_coord(x.shape().sizes(), |coord| {
        let mut z_coord = [0u32; YR];
        for m in 0..YR {
            z_coord[plan.rhs[m] as usize] = coord[plan.lhs[m] as usize];
        }
        let value = unsafe { x.get_value(*coord) };
        let mut accumulated = unsafe { z.get_value(z_coord) };
        accumulated += value;
        unsafe { z.set_value(accumulated, z_coord) };
    });

    Ok(())
}

/// Parses `expr` and runs the resulting contraction plan in one call — the
/// ergonomic surface callers reach for; hot paths that call a contraction
/// repeatedly should parse once with [`crate::expr::contraction_parse`] and
/// call [`contraction_plan`] directly.
pub fn contraction<T, const XR: usize, const YR: usize, O: MemoryOrder>(
    expr: &str,
    x: &Tensor<T, XR, O>,
    z: &mut Tensor<T, YR, O>,
) -> TensorResult<()>
where
    T: Copy + Default + AddAssign,
{
    let plan = contraction_parse::<XR, YR>(expr)?;
    contraction_plan(&plan, x, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::RowMajor;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_sum_matches_manual_computation() {
        let mut x_data: Vec<i32> = (1..=36).collect();
        let x = Tensor::<i32, 3, RowMajor>::from_slice(&mut x_data, [3, 4, 3]);
        let mut z_data = vec![0i32; 12];
        let mut z = Tensor::<i32, 2, RowMajor>::from_slice(&mut z_data, [3, 4]);

        contraction("ijk->ij", &x, &mut z).unwrap();

        assert_eq!(
            z_data,
            vec![6, 15, 24, 33, 42, 51, 60, 69, 78, 87, 96, 105]
        );
    }

    #[test]
    fn transpose_then_row_sum_equals_direct_transpose_of_sums() {
        let mut x_data: Vec<i32> = (1..=36).collect();
        let x = Tensor::<i32, 3, RowMajor>::from_slice(&mut x_data, [3, 4, 3]);

        let mut z1_data = vec![0i32; 12];
        let mut z1 = Tensor::<i32, 2, RowMajor>::from_slice(&mut z1_data, [4, 3]);
        contraction("ijk->ji", &x, &mut z1).unwrap();

        let mut z2_data = vec![0i32; 12];
        let mut z2 = Tensor::<i32, 2, RowMajor>::from_slice(&mut z2_data, [3, 4]);
        contraction("ijk->ij", &x, &mut z2).unwrap();
        let z2_transposed = z2.permutate("ij->ji").unwrap();

        for i in 0..4u32 {
            for j in 0..3u32 {
                assert_eq!(
                    unsafe { z1.get_value([i, j]) },
                    unsafe { z2_transposed.get_value([i, j]) }
                );
            }
        }
    }

    #[test]
    fn rejects_mismatched_result_shape() {
        let mut x_data = vec![0i32; 12];
        let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut x_data, [3, 4]);
        let mut z_data = vec![0i32; 3];
        let mut z = Tensor::<i32, 1, RowMajor>::from_slice(&mut z_data, [3]);
        // "ij->j" would need a result of size 4, not 3.
        assert!(contraction("ij->j", &x, &mut z).is_err());
    }
}
