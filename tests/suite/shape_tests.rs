//! Stride inference and capacity properties.

use pretty_assertions::assert_eq;
use tensorex::{ColMajor, RowMajor, Shape};

#[test]
fn row_major_strides_satisfy_the_invariant_for_arbitrary_sizes() {
    let shape = Shape::<4, RowMajor>::with_sizes([2, 5, 3, 7]);
    assert_eq!(shape.get_stride(3), 1);
    for k in (0..3).rev() {
        assert_eq!(
            shape.get_stride(k),
            shape.get_size(k + 1) * shape.get_stride(k + 1)
        );
    }
}

#[test]
fn col_major_strides_satisfy_the_symmetric_invariant() {
    let shape = Shape::<4, ColMajor>::with_sizes([2, 5, 3, 7]);
    assert_eq!(shape.get_stride(0), 1);
    for k in 1..4 {
        assert_eq!(
            shape.get_stride(k),
            shape.get_size(k - 1) * shape.get_stride(k - 1)
        );
    }
}

#[test]
fn capacity_is_the_product_of_every_axis_size() {
    let shape = Shape::<3, RowMajor>::with_sizes([6, 7, 8]);
    assert_eq!(shape.capacity(), 6 * 7 * 8);
}
