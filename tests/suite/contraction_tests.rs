//! Contraction kernel and expression-equivalence properties.

use pretty_assertions::assert_eq;
use tensorex::{contraction, RowMajor, Tensor};

#[test]
fn scenario_two_literal_row_sums_over_a_rank_three_tensor() {
    let mut x_data: Vec<i32> = (1..=36).collect();
    let x = Tensor::<i32, 3, RowMajor>::from_slice(&mut x_data, [3, 4, 3]);
    let mut y_data = vec![0i32; 12];
    let mut y = Tensor::<i32, 2, RowMajor>::from_slice(&mut y_data, [3, 4]);

    contraction("ijk->ij", &x, &mut y).unwrap();

    assert_eq!(
        y_data,
        vec![6, 15, 24, 33, 42, 51, 60, 69, 78, 87, 96, 105]
    );
}

#[test]
fn transposed_contraction_equals_transpose_of_the_untransposed_contraction() {
    let mut x_data: Vec<i32> = (1..=36).collect();
    let x = Tensor::<i32, 3, RowMajor>::from_slice(&mut x_data, [3, 4, 3]);

    let mut ji_data = vec![0i32; 12];
    let mut ji = Tensor::<i32, 2, RowMajor>::from_slice(&mut ji_data, [4, 3]);
    contraction("ijk->ji", &x, &mut ji).unwrap();

    let mut ij_data = vec![0i32; 12];
    let mut ij = Tensor::<i32, 2, RowMajor>::from_slice(&mut ij_data, [3, 4]);
    contraction("ijk->ij", &x, &mut ij).unwrap();
    let ij_transposed = ij.permutate("ij->ji").unwrap();

    for i in 0..4u32 {
        for j in 0..3u32 {
            assert_eq!(
                unsafe { ji.get_value([i, j]) },
                unsafe { ij_transposed.get_value([i, j]) }
            );
        }
    }
}

#[test]
fn row_sum_equals_the_manual_per_row_total() {
    let mut x_data = [1i32, 2, 3, 4];
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut x_data, [2, 2]);
    let mut z_data = [0i32; 2];
    let mut z = Tensor::<i32, 1, RowMajor>::from_slice(&mut z_data, [2]);

    contraction("ij->i", &x, &mut z).unwrap();
    assert_eq!(z_data, [1 + 2, 3 + 4]);
}
