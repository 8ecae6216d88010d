//! Inner-/outer-product kernel properties.

use pretty_assertions::assert_eq;
use tensorex::{inner_product, outer_product, RowMajor, Tensor};

#[test]
fn scenario_three_literal_matmul_and_its_transposed_expression() {
    let mut x_data = [1i32, 1, 1, 1];
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut x_data, [2, 2]);
    let mut y_data = [1i32, 2, 3, 4];
    let y = Tensor::<i32, 2, RowMajor>::from_slice(&mut y_data, [2, 2]);

    let mut z_data = [0i32; 4];
    let mut z = Tensor::<i32, 2, RowMajor>::from_slice(&mut z_data, [2, 2]);
    inner_product("ij,jk->ik", &x, &y, &mut z).unwrap();
    assert_eq!(z_data, [4, 6, 4, 6]);

    let mut zt_data = [0i32; 4];
    let mut zt = Tensor::<i32, 2, RowMajor>::from_slice(&mut zt_data, [2, 2]);
    inner_product("ij,jk->ki", &x, &y, &mut zt).unwrap();
    assert_eq!(zt_data, [4, 4, 6, 6]);
}

#[test]
fn inner_product_with_the_identity_matrix_is_the_identity_function() {
    let mut x_data = [1i32, 2, 3, 4];
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut x_data, [2, 2]);
    let mut i_data = [1i32, 0, 0, 1];
    let i = Tensor::<i32, 2, RowMajor>::from_slice(&mut i_data, [2, 2]);
    let mut z_data = [0i32; 4];
    let mut z = Tensor::<i32, 2, RowMajor>::from_slice(&mut z_data, [2, 2]);

    inner_product("ij,jk->ik", &x, &i, &mut z).unwrap();
    assert_eq!(z_data, x_data);
}

#[test]
fn outer_product_contracts_no_axes() {
    let mut x_data = [2i32, 3];
    let x = Tensor::<i32, 1, RowMajor>::from_slice(&mut x_data, [2]);
    let mut y_data = [5i32, 7, 11];
    let y = Tensor::<i32, 1, RowMajor>::from_slice(&mut y_data, [3]);
    let mut z_data = [0i32; 6];
    let mut z = Tensor::<i32, 2, RowMajor>::from_slice(&mut z_data, [2, 3]);

    outer_product("i,j->ij", &x, &y, &mut z).unwrap();
    assert_eq!(z_data, [10, 14, 22, 15, 21, 33]);
}
