/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : AdaDelta 优化器测试
 */

use approx::assert_abs_diff_eq;

use super::{apply, param};
use crate::assert_err;
use crate::errors::NetError;
use crate::nn::optimizer::{AdaDelta, Optimizer};

#[test]
fn test_ada_delta_creation() {
    let ada_delta = AdaDelta::new_default(AdaDelta::DEFAULT_LEARNING_RATE).unwrap();
    assert_eq!(ada_delta.learning_rate(), 1.0);
    assert_eq!(ada_delta.rho(), 0.95);
    assert_eq!(ada_delta.name(), "adadelta");
}

#[test]
fn test_ada_delta_invalid_arguments() {
    assert_err!(
        AdaDelta::new(1.0, 1.0, 1e-6),
        NetError::Configuration("rho须<1，实际为1")
    );
    assert_err!(AdaDelta::new(1.0, 0.9, -1e-6), NetError::Configuration(_));
    assert_err!(AdaDelta::new(-1.0, 0.9, 1e-6), NetError::Configuration(_));
}

#[test]
fn test_ada_delta_update() {
    // ρ = 0.9，ε = 1e-6，α = 1，g = 1
    // 第1步：E[g²] = 0.1，Δ = √ε/√(0.1 + ε)，E[Δ²] = 0.1·Δ²
    // 第2步：E[g²] = 0.19，Δ = √(E[Δ²] + ε)/√(0.19 + ε)
    let (rho, eps) = (0.9_f32, 1e-6_f32);
    let mut ada_delta = AdaDelta::new(1.0, rho, eps).unwrap();
    let mut w = param(&[1.0]);
    let g = param(&[1.0]);

    apply(&mut ada_delta, &mut w, &g);
    let delta1 = eps.sqrt() / (0.1 + eps).sqrt();
    assert_abs_diff_eq!(w[0], 1.0 - delta1, epsilon = 1e-6);

    apply(&mut ada_delta, &mut w, &g);
    let avg_sq_delta = (1.0 - rho) * delta1 * delta1;
    let delta2 = (avg_sq_delta + eps).sqrt() / (0.19 + eps).sqrt();
    assert_abs_diff_eq!(w[0], 1.0 - delta1 - delta2, epsilon = 1e-6);
    // 第2步的更新量大于第1步
    assert!(delta2 > delta1);
}

#[test]
fn test_ada_delta_learning_rate_scales_step() {
    let mut full = AdaDelta::new(1.0, 0.9, 1e-6).unwrap();
    let mut half = AdaDelta::new(0.5, 0.9, 1e-6).unwrap();
    let (mut a, mut b) = (param(&[0.0]), param(&[0.0]));
    apply(&mut full, &mut a, &param(&[3.0]));
    apply(&mut half, &mut b, &param(&[3.0]));
    assert_abs_diff_eq!(b[0], 0.5 * a[0], epsilon = 1e-7);
}

#[test]
fn test_ada_delta_zero_gradient_is_stable() {
    let mut ada_delta = AdaDelta::new_default(1.0).unwrap();
    let mut w = param(&[0.5]);
    apply(&mut ada_delta, &mut w, &param(&[0.0]));
    assert_eq!(w[0], 0.5);
}

#[test]
fn test_ada_delta_reset() {
    let mut ada_delta = AdaDelta::new(1.0, 0.9, 1e-6).unwrap();
    let mut w = param(&[1.0]);
    apply(&mut ada_delta, &mut w, &param(&[1.0]));
    let first = w[0];
    ada_delta.reset();

    let mut fresh = param(&[1.0]);
    apply(&mut ada_delta, &mut fresh, &param(&[1.0]));
    assert_eq!(fresh[0], first);
}
