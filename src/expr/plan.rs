//! Plan types produced by the expression compiler.
//!
//! These are plain data — the kernel engine only ever reads a plan, it never
//! re-parses an expression. `ContractionPlan` and the permutation array are
//! sized by compile-time rank; `InnerProductPlan`'s loop count depends on
//! how many distinct characters the parsed expression turns out to use and
//! so is determined once at parse time and cached by the caller instead of
//! being a const-generic array length.

use smallvec::SmallVec;

/// Sentinel used in `InnerProductPlan` when an operand does not vary at a
/// given loop level.
pub const PASS: u32 = u32::MAX;

/// A compiled `"<lhs>-><rhs>"` contraction expression.
///
/// `lhs[i]` gives the source axis of the (single) input operand that binds
/// to result axis `i` for `i < YR`, or to a summed-over axis for
/// `i >= YR`. `rhs[i]` is the paired result axis for `i < YR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractionPlan<const XR: usize, const YR: usize> {
    pub lhs: [u32; XR],
    pub rhs: [u32; YR],
}

impl<const XR: usize, const YR: usize> ContractionPlan<XR, YR> {
    /// Axes of the input operand that survive into the result, in result order.
    #[inline]
    pub fn result_axes(&self) -> &[u32] {
        &self.lhs[..YR]
    }

    /// Axes of the input operand that are summed away.
    #[inline]
    pub fn summed_axes(&self) -> &[u32] {
        &self.lhs[YR..]
    }
}

/// A compiled `"<lhs>-><rhs>"` axis-permutation expression: `p[i]` is the
/// source axis placed at destination position `i`.
pub type PermutationPlan<const R: usize> = [u32; R];

/// Which operand supplies the trip count for an inner-product loop level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandSide {
    X,
    Y,
}

/// A compiled `"<x>,<y>-><z>"` inner-/outer-product expression.
///
/// Each distinct character across `x`, `y`, `z` becomes one loop level.
/// `x_perm[i]`/`y_perm[i]`/`z_perm[i]` give the axis that level drives in
/// each operand, or [`PASS`] if that operand does not vary at that level.
/// `s_ctrl[i]` says which operand's axis extent supplies the loop's trip
/// count (characters shared between `x` and `y` get the same extent either
/// way; the engine doesn't need to pick consistently between equal values,
/// only consistently with *a* present operand).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerProductPlan {
    pub x_perm: SmallVec<[u32; 8]>,
    pub y_perm: SmallVec<[u32; 8]>,
    pub z_perm: SmallVec<[u32; 8]>,
    pub s_ctrl: SmallVec<[OperandSide; 8]>,
    pub total: usize,
}

impl InnerProductPlan {
    /// True when every loop level also appears in `z` — an outer product,
    /// with no axis contracted away.
    pub fn is_outer_product(&self) -> bool {
        self.z_perm.iter().all(|&p| p != PASS)
    }
}
