//! Shape algebra: the `(sizes, strides, permutation)` triple underlying every view.

mod order;

pub use order::{ColMajor, MemoryOrder, RowMajor};

/// Element-count / stride scalar. `u32` per the layout algebra's size type.
pub type Size = u32;

/// A fixed-rank `(sizes, strides, permutation)` triple.
///
/// `R` is the tensor's rank, fixed at the type level (consistent with the
/// teacher's compile-time rank/element-type parameterization, generalized
/// from a device tensor handle to a host memory layout). `O` selects the
/// storage convention; row-major gives the rightmost axis unit stride,
/// column-major gives the leftmost axis unit stride (see [`MemoryOrder`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape<const R: usize, O: MemoryOrder> {
    sizes: [Size; R],
    strides: [Size; R],
    permutation: [Size; R],
    _order: core::marker::PhantomData<O>,
}

impl<const R: usize, O: MemoryOrder> Shape<R, O> {
    const RANK_IN_BOUNDS: () = assert!(R >= 1 && R <= 63, "rank must be in [1, 63]");

    /// Builds an inert, zero-initialized shape. All three arrays are zero
    /// until [`Self::with_sizes`] or repeated [`Self::set_size_and_stride`]
    /// calls fill them in — used when a view's data will be bound later by
    /// the factory.
    pub fn uninit() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::RANK_IN_BOUNDS;
        Self {
            sizes: [0; R],
            strides: [0; R],
            permutation: [0; R],
            _order: core::marker::PhantomData,
        }
    }

    /// Builds a shape from declared sizes, inferring strides per the
    /// row-/column-major invariant and setting `permutation` to identity.
    pub fn with_sizes(sizes: [Size; R]) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::RANK_IN_BOUNDS;
        let mut strides = [0 as Size; R];
        if O::IS_ROW_MAJOR {
            strides[R - 1] = 1;
            for k in (0..R - 1).rev() {
                strides[k] = sizes[k + 1] * strides[k + 1];
            }
        } else {
            strides[0] = 1;
            for k in 1..R {
                strides[k] = sizes[k - 1] * strides[k - 1];
            }
        }
        let mut permutation = [0 as Size; R];
        for (i, p) in permutation.iter_mut().enumerate() {
            *p = i as Size;
        }
        Self {
            sizes,
            strides,
            permutation,
            _order: core::marker::PhantomData,
        }
    }

    /// Rank of this shape.
    #[inline]
    pub const fn rank(&self) -> usize {
        R
    }

    /// Total element capacity, `product(sizes)`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sizes.iter().map(|&s| s as usize).product()
    }

    #[inline]
    pub fn sizes(&self) -> &[Size; R] {
        &self.sizes
    }

    #[inline]
    pub fn strides(&self) -> &[Size; R] {
        &self.strides
    }

    #[inline]
    pub fn permutation(&self) -> &[Size; R] {
        &self.permutation
    }

    #[inline]
    pub fn get_size(&self, axis: usize) -> Size {
        self.sizes[axis]
    }

    #[inline]
    pub fn get_stride(&self, axis: usize) -> Size {
        self.strides[axis]
    }

    #[inline]
    pub fn get_size_and_stride(&self, axis: usize) -> (Size, Size) {
        (self.sizes[axis], self.strides[axis])
    }

    /// Overwrites one axis's `(size, stride)` pair directly, bypassing the
    /// row-/column-major invariant. The caller is responsible for restoring
    /// it across the whole shape if correctness depends on it.
    #[inline]
    pub fn set_size_and_stride(&mut self, axis: usize, pair: (Size, Size)) {
        self.sizes[axis] = pair.0;
        self.strides[axis] = pair.1;
    }

    /// Reorders `sizes`, `strides`, and `permutation` together: the result's
    /// axis `i` takes the source's axis `p[i]`. Strides are carried along
    /// rather than recomputed, so no division or re-derivation is needed.
    ///
    /// Recognizes the identity permutation (`p[i] == i` for every `i`) as a
    /// no-op rather than reshuffling three arrays into themselves.
    pub fn apply_permutation(&mut self, p: [usize; R]) {
        if p.iter().enumerate().all(|(i, &pi)| pi == i) {
            return;
        }
        let mut sizes = [0 as Size; R];
        let mut strides = [0 as Size; R];
        let mut permutation = [0 as Size; R];
        for i in 0..R {
            sizes[i] = self.sizes[p[i]];
            strides[i] = self.strides[p[i]];
            permutation[i] = self.permutation[p[i]];
        }
        self.sizes = sizes;
        self.strides = strides;
        self.permutation = permutation;
    }

    /// Reduces a coordinate to a linear offset via an inner product against
    /// strides: `Σ coord[k] * strides[k]`.
    #[inline]
    pub fn index(&self, coord: [Size; R]) -> Size {
        coord
            .iter()
            .zip(self.strides.iter())
            .fold(0 as Size, |acc, (&c, &s)| acc + c * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_stride_invariant() {
        let shape = Shape::<3, RowMajor>::with_sizes([3, 4, 3]);
        assert_eq!(shape.get_stride(2), 1);
        assert_eq!(shape.get_stride(1), shape.get_size(2) * shape.get_stride(2));
        assert_eq!(shape.get_stride(0), shape.get_size(1) * shape.get_stride(1));
    }

    #[test]
    fn col_major_stride_invariant() {
        let shape = Shape::<3, ColMajor>::with_sizes([3, 4, 3]);
        assert_eq!(shape.get_stride(0), 1);
        assert_eq!(shape.get_stride(1), shape.get_size(0) * shape.get_stride(0));
        assert_eq!(shape.get_stride(2), shape.get_size(1) * shape.get_stride(1));
    }

    #[test]
    fn rank_one_has_unit_stride() {
        let shape = Shape::<1, RowMajor>::with_sizes([5]);
        assert_eq!(shape.strides(), &[1]);
    }

    #[test]
    fn capacity_is_product_of_sizes() {
        let shape = Shape::<3, RowMajor>::with_sizes([2, 3, 4]);
        assert_eq!(shape.capacity(), 24);
    }

    #[test]
    fn permutation_round_trip_restores_sizes_and_strides() {
        let mut shape = Shape::<2, RowMajor>::with_sizes([3, 5]);
        let original = shape;
        // ij->ji is a self-inverse permutation.
        shape.apply_permutation([1, 0]);
        assert_ne!(shape.sizes(), original.sizes());
        shape.apply_permutation([1, 0]);
        assert_eq!(shape, original);
    }

    #[test]
    fn index_matches_inner_product() {
        let shape = Shape::<2, RowMajor>::with_sizes([3, 3]);
        // values 1..=9 laid out row-major: [0,2] -> 3rd row-0 element.
        assert_eq!(shape.index([0, 2]), 2);
        assert_eq!(shape.index([1, 0]), 3);
    }

    #[test]
    fn uninit_shape_is_all_zero() {
        let shape = Shape::<2, RowMajor>::uninit();
        assert_eq!(shape.sizes(), &[0, 0]);
        assert_eq!(shape.strides(), &[0, 0]);
        assert_eq!(shape.permutation(), &[0, 0]);
    }
}
