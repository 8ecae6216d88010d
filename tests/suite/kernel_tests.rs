//! Factory-composed kernel scenarios and reduction idempotence.

use pretty_assertions::assert_eq;
use tensorex::{max, min, product, sum, FactoryConfig, RowMajor, Tensor, TensorFactory};

#[test]
fn scenario_four_literal_factory_add_sub_bias_scale_then_sum() {
    let factory = TensorFactory::<i64>::new(FactoryConfig::default());
    let mut xd = vec![1i64; 100_000];
    let mut yd = vec![2i64; 100_000];
    let x = Tensor::<i64, 1, RowMajor>::from_slice(&mut xd, [100_000]);
    let y = Tensor::<i64, 1, RowMajor>::from_slice(&mut yd, [100_000]);

    let added = factory.add(&x, &y).unwrap();
    assert_eq!(sum(&added).unwrap(), 300_000);

    let subbed = factory.sub(&x, &y).unwrap();
    assert_eq!(sum(&subbed).unwrap(), -100_000);

    let biased = factory.bias(&x, 4).unwrap();
    assert_eq!(sum(&biased).unwrap(), 500_000);

    let scaled = factory.scale(&x, 4).unwrap();
    assert_eq!(sum(&scaled).unwrap(), 400_000);
}

#[test]
fn scenario_five_literal_reductions_over_a_100x100_tensor_with_outliers() {
    let mut data = vec![1i32; 100 * 100];
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [100, 100]);
    assert_eq!(sum(&x).unwrap(), 10_000);
    assert_eq!(product(&x).unwrap(), 1);
    drop(x);

    data[24 * 100 + 62] = 999;
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [100, 100]);
    assert_eq!(max(&x).unwrap(), 999);
    drop(x);

    data[92 * 100 + 10] = -999;
    let x = Tensor::<i32, 2, RowMajor>::from_slice(&mut data, [100, 100]);
    assert_eq!(min(&x).unwrap(), -999);
}

#[test]
fn idempotent_reductions_on_a_constant_array() {
    let mut data = vec![7i32; 50];
    let x = Tensor::<i32, 1, RowMajor>::from_slice(&mut data, [50]);
    assert_eq!(sum(&x).unwrap(), 50 * 7);
    assert_eq!(product(&x).unwrap(), 7i32.pow(50));
    assert_eq!(min(&x).unwrap(), 7);
    assert_eq!(max(&x).unwrap(), 7);
}

#[test]
fn factory_contraction_and_inner_product_allocate_the_correctly_shaped_result() {
    let factory = TensorFactory::<i32>::new(FactoryConfig::default());
    let mut xd: Vec<i32> = (1..=36).collect();
    let x = Tensor::<i32, 3, RowMajor>::from_slice(&mut xd, [3, 4, 3]);
    let z = factory.contraction::<3, 2, RowMajor>("ijk->ij", &x).unwrap();
    assert_eq!(z.shape().sizes(), &[3, 4]);

    let mut ad = [1i32, 1, 1, 1];
    let a = Tensor::<i32, 2, RowMajor>::from_slice(&mut ad, [2, 2]);
    let mut bd = [1i32, 2, 3, 4];
    let b = Tensor::<i32, 2, RowMajor>::from_slice(&mut bd, [2, 2]);
    let c = factory
        .inner_product::<2, 2, 2, RowMajor>("ij,jk->ik", &a, &b)
        .unwrap();
    assert_eq!(unsafe { c.as_slice() }, &[4, 6, 4, 6]);
}
