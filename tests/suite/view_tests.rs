//! View validity, permutation round-trip, and aliasing.

use pretty_assertions::assert_eq;
use tensorex::{RowMajor, Tensor, TensorError};

#[test]
fn validity_requires_matching_nonempty_length() {
    let mut data = [1i32, 2, 3, 4, 5, 6];
    let valid = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [2, 3]);
    assert!(valid.is_valid());
    assert_eq!(valid.value_capacity(), valid.value_size());

    let empty = Tensor::<i32, 2, RowMajor>::uninit([2, 3]);
    assert!(!empty.is_valid());
}

#[test]
fn scenario_one_literal_3x3_transpose() {
    // Build X = Tensor<i32,2,row>(data=[1..9], sizes=[3,3]).
    let mut data: Vec<i32> = (1..=9).collect();
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [3, 3]);
    assert_eq!(unsafe { x.get_value([0, 2]) }, 3);
    assert_eq!(unsafe { x.get_value([1, 0]) }, 4);

    let y = x.permutate("ij->ji").unwrap();
    assert_eq!(unsafe { y.get_value([0, 1]) }, 4);
    assert_eq!(unsafe { y.get_value([2, 0]) }, 3);
}

#[test]
fn permutation_round_trip_restores_the_original_shape() {
    let mut data = [1i32, 2, 3, 4, 5, 6];
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [2, 3]);
    let back = x.permutate("ij->ji").unwrap().permutate("ij->ji").unwrap();
    assert_eq!(back.shape().sizes(), x.shape().sizes());
    assert_eq!(back.shape().strides(), x.shape().strides());
}

#[test]
fn permuted_view_aliases_the_same_underlying_data() {
    let mut data = [1i32, 2, 3, 4, 5, 6, 7, 8, 9];
    let mut x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [3, 3]);
    let y = x.permutate("ij->ji").unwrap();

    unsafe { x.set_value(77, [0, 2]) };
    // sigma(e) for "ij->ji" swaps coordinates.
    assert_eq!(unsafe { y.get_value([2, 0]) }, 77);
}

#[test]
fn permutate_on_an_invalid_view_is_rejected() {
    let x = Tensor::<i32, 2, RowMajor>::uninit([2, 2]);
    assert_eq!(
        x.permutate("ij->ji"),
        Err(TensorError::InvalidTensorLayout {
            data_len: 0,
            capacity: 4,
        })
    );
}

#[test]
fn swap_exchanges_data_and_shape_between_two_views() {
    let mut a_data = [1i32, 2, 3, 4];
    let mut b_data = [9i32, 8];
    let mut a = Tensor::<i32, 2, RowMajor>::from_slice(&mut a_data, [2, 2]);
    let mut b = Tensor::<i32, 2, RowMajor>::from_slice(&mut b_data, [2, 1]);

    a.swap(&mut b).unwrap();

    assert_eq!(a.value_capacity(), 2);
    assert_eq!(b.value_capacity(), 4);
    assert_eq!(unsafe { a.get_value([0, 0]) }, 9);
    assert_eq!(unsafe { b.get_value([0, 0]) }, 1);
}
