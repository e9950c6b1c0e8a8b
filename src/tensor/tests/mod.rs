use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assert_err;
use crate::errors::NetError;
use crate::tensor::{
    Matrix, Vector, ensure_shape, kaiming_matrix, l2_norm, load_parameters, normal_matrix,
    save_parameters,
};

#[test]
fn test_normal_matrix_statistics() {
    let mut rng = StdRng::seed_from_u64(42);
    let m = normal_matrix(1.0, 2.0, (100, 100), &mut rng).unwrap();
    assert_eq!(m.dim(), (100, 100));
    assert!(m.iter().all(|x| x.is_finite()));

    let n = m.len() as f32;
    let mean = m.sum() / n;
    let var = m.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    assert_abs_diff_eq!(mean, 1.0, epsilon = 0.1);
    assert_abs_diff_eq!(var.sqrt(), 2.0, epsilon = 0.1);
}

#[test]
fn test_normal_matrix_odd_len_and_empty() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(normal_matrix(0.0, 1.0, (3, 3), &mut rng).unwrap().len(), 9);
    assert_eq!(normal_matrix(0.0, 1.0, (0, 4), &mut rng).unwrap().dim(), (0, 4));
}

#[test]
fn test_normal_matrix_is_reproducible_with_seed() {
    let a = normal_matrix(0.0, 1.0, (4, 5), &mut StdRng::seed_from_u64(7)).unwrap();
    let b = normal_matrix(0.0, 1.0, (4, 5), &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_normal_matrix_zero_std_dev() {
    let m = normal_matrix(0.5, 0.0, (2, 3), &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(m.iter().all(|&x| x == 0.5));
}

#[test]
fn test_normal_matrix_rejects_invalid_arguments() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_err!(
        normal_matrix(0.0, f32::NAN, (1, 1), &mut rng),
        NetError::Configuration(msg) if msg.contains("标准差")
    );
    assert_err!(
        normal_matrix(0.0, f32::INFINITY, (1, 1), &mut rng),
        NetError::Configuration(_)
    );
    assert_err!(
        normal_matrix(0.0, -1.0, (1, 1), &mut rng),
        NetError::Configuration("标准差须≥0，实际为-1")
    );
    assert_err!(
        normal_matrix(f32::NEG_INFINITY, 1.0, (1, 1), &mut rng),
        NetError::Configuration(msg) if msg.contains("均值")
    );
}

#[test]
fn test_kaiming_matrix_scale() {
    // std = sqrt(2/fan_in) = sqrt(2/200) = 0.1
    let mut rng = StdRng::seed_from_u64(3);
    let m = kaiming_matrix(100, 200, &mut rng);
    assert_eq!(m.dim(), (100, 200));
    let n = m.len() as f32;
    let std = (m.iter().map(|x| x * x).sum::<f32>() / n).sqrt();
    assert_abs_diff_eq!(std, 0.1, epsilon = 0.01);
}

#[test]
fn test_l2_norm() {
    let m = array![[3.0f32, 0.0], [0.0, 4.0]];
    assert_abs_diff_eq!(l2_norm(&m), 5.0);
    assert_abs_diff_eq!(l2_norm(&Array1::<f32>::zeros(0)), 0.0);
}

#[test]
fn test_ensure_shape() {
    let m = Matrix::zeros((2, 3));
    assert!(ensure_shape(&m, (2, 3), "ok").is_ok());
    assert_err!(
        ensure_shape(&m, (3, 2), "转置了"),
        NetError::ShapeMismatch([3, 2], [2, 3], "转置了")
    );
}

#[test]
fn test_save_load_parameters() {
    let params: Vec<(Matrix, Vector)> = vec![
        (array![[1.0, 2.0], [3.0, 4.0]], array![0.5, -0.5]),
        (array![[7.0, 8.0]], array![9.0]),
    ];
    let mut buf = Vec::new();
    save_parameters(&mut buf, &params).unwrap();

    let loaded = load_parameters(&mut buf.as_slice()).unwrap();
    assert_eq!(loaded, params);
}

#[test]
fn test_load_parameters_from_garbage() {
    let garbage = [1u8, 2, 3];
    assert_err!(
        load_parameters(&mut garbage.as_slice()),
        NetError::Serialization(_)
    );
}
