//! Inner-/outer-product kernel: drives an `InnerProductPlan` over two operands.

use core::ops::{AddAssign, Mul};

use smallvec::SmallVec;

use crate::error::{TensorError, TensorResult};
use crate::expr::{inner_product_parse, InnerProductPlan, OperandSide, PASS};
use crate::shape::{MemoryOrder, Size};
use crate::tensor::Tensor;

use super::walk::increment;

/// Runs a precompiled inner-/outer-product plan. Each loop level drives
/// whichever axis of `x`/`y`/`z` the plan names at that level (or none, for
/// [`PASS`]); levels absent from `z` are the contracted axes. `z` is zeroed
/// before accumulation.
pub fn inner_product_plan<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    plan: &InnerProductPlan,
    x: &Tensor<T, XR, O>,
    y: &Tensor<T, YR, O>,
    z: &mut Tensor<T, ZR, O>,
) -> TensorResult<()>
where
    T: Copy + Default + AddAssign + Mul<Output = T>,
{
    if !x.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: x.value_size(),
            capacity: x.value_capacity(),
        });
    }
    if !y.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: y.value_size(),
            capacity: y.value_capacity(),
        });
    }
    if !z.is_valid() {
        return Err(TensorError::InvalidTensorLayout {
            data_len: z.value_size(),
            capacity: z.value_capacity(),
        });
    }

    let mut level_sizes: SmallVec<[Size; 8]> = SmallVec::with_capacity(plan.total);
    for i in 0..plan.total {
        let size = match plan.s_ctrl[i] {
            OperandSide::X => x.shape().get_size(plan.x_perm[i] as usize),
            OperandSide::Y => y.shape().get_size(plan.y_perm[i] as usize),
        };
        // A level shared by both operands must agree on extent even though
        // `s_ctrl` only recorded one side's axis to drive the trip count.
        if plan.x_perm[i] != PASS && plan.y_perm[i] != PASS {
            let x_size = x.shape().get_size(plan.x_perm[i] as usize);
            let y_size = y.shape().get_size(plan.y_perm[i] as usize);
            if x_size != y_size {
                return Err(TensorError::UnequalSize {
                    lhs: x_size as usize,
                    rhs: y_size as usize,
                });
            }
        }
        level_sizes.push(size);
    }
    if level_sizes.iter().any(|&s| s == 0) {
        return Ok(());
    }

    unsafe {
        for v in z.as_mut_slice() {
            *v = T::default();
        }
    }

    let mut coord: SmallVec<[Size; 8]> = SmallVec::from_elem(0, plan.total);
    loop {
        let mut x_coord = [0 as Size; XR];
        let mut y_coord = [0 as Size; YR];
        let mut z_coord = [0 as Size; ZR];
        for i in 0..plan.total {
            if plan.x_perm[i] != PASS {
                x_coord[plan.x_perm[i] as usize] = coord[i];
            }
            if plan.y_perm[i] != PASS {
                y_coord[plan.y_perm[i] as usize] = coord[i];
            }
            if plan.z_perm[i] != PASS {
                z_coord[plan.z_perm[i] as usize] = coord[i];
            }
        }

        let xv = unsafe { x.get_value(x_coord) };
        let yv = unsafe { y.get_value(y_coord) };
        let mut zv = unsafe { z.get_value(z_coord) };
        zv += xv * yv;
        unsafe { z.set_value(zv, z_coord) };

        if !increment(&mut coord, &level_sizes) {
            break;
        }
    }

    Ok(())
}

/// Parses `expr` and runs the resulting inner-/outer-product plan in one
/// call. Whether the expression describes a contraction-bearing inner
/// product or a pure outer product (no axis contracted away) is decided by
/// the parsed plan, not by which function is called — both shapes of
/// expression are valid input here.
pub fn inner_product<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    expr: &str,
    x: &Tensor<T, XR, O>,
    y: &Tensor<T, YR, O>,
    z: &mut Tensor<T, ZR, O>,
) -> TensorResult<()>
where
    T: Copy + Default + AddAssign + Mul<Output = T>,
{
    let plan = inner_product_parse(XR, YR, ZR, expr)?;
    inner_product_plan(&plan, x, y, z)
}

/// Runs `expr` as an outer product: the underlying walker is identical to
/// [`inner_product`], but the parsed plan is checked first and rejected if
/// it contracts any axis away, so a caller asking specifically for an outer
/// product can't silently get a contraction instead.
pub fn outer_product<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    expr: &str,
    x: &Tensor<T, XR, O>,
    y: &Tensor<T, YR, O>,
    z: &mut Tensor<T, ZR, O>,
) -> TensorResult<()>
where
    T: Copy + Default + AddAssign + Mul<Output = T>,
{
    let plan = inner_product_parse(XR, YR, ZR, expr)?;
    if !plan.is_outer_product() {
        return Err(crate::error::ExprError::ContractedAxisInOuterProduct.into());
    }
    inner_product_plan(&plan, x, y, z)
}
