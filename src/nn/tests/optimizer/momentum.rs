/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-08
 * @Description  : Momentum 优化器测试
 */

use approx::assert_abs_diff_eq;

use super::{apply, param};
use crate::assert_err;
use crate::errors::NetError;
use crate::nn::optimizer::{Momentum, Optimizer, ParamId};

#[test]
fn test_momentum_creation() {
    let momentum = Momentum::new(0.1, 0.5).unwrap();
    assert_eq!(momentum.learning_rate(), 0.1);
    assert_eq!(momentum.momentum(), 0.5);
    assert_eq!(Momentum::new_default(0.1).unwrap().momentum(), 0.9);
    assert_eq!(momentum.num_states(), 0);
}

#[test]
fn test_momentum_invalid_arguments() {
    assert_err!(
        Momentum::new(0.1, 1.0),
        NetError::Configuration("momentum须<1，实际为1")
    );
    assert_err!(Momentum::new(0.1, -0.1), NetError::Configuration(_));
    assert_err!(Momentum::new(0.0, 0.9), NetError::Configuration(_));
}

#[test]
fn test_momentum_update() {
    // γ = 0.9，α = 0.1，g = 1
    // 第1步：v = 0.1，θ = 1 - 0.01 = 0.99
    // 第2步：v = 0.09 + 0.1 = 0.19，θ = 0.99 - 0.019 = 0.971
    let mut momentum = Momentum::new(0.1, 0.9).unwrap();
    let mut w = param(&[1.0]);
    let g = param(&[1.0]);

    apply(&mut momentum, &mut w, &g);
    assert_abs_diff_eq!(w[0], 0.99, epsilon = 1e-6);
    assert_eq!(momentum.num_states(), 1);

    apply(&mut momentum, &mut w, &g);
    assert_abs_diff_eq!(w[0], 0.971, epsilon = 1e-6);
}

#[test]
fn test_momentum_zero_is_sgd() {
    let mut momentum = Momentum::new(0.1, 0.0).unwrap();
    let mut w = param(&[1.0, -1.0]);
    apply(&mut momentum, &mut w, &param(&[2.0, 4.0]));
    assert_abs_diff_eq!(w[0], 0.8, epsilon = 1e-6);
    assert_abs_diff_eq!(w[1], -1.4, epsilon = 1e-6);
}

#[test]
fn test_momentum_reset() {
    let mut momentum = Momentum::new(0.1, 0.9).unwrap();
    let mut w = param(&[1.0]);
    apply(&mut momentum, &mut w, &param(&[1.0]));
    momentum.reset();
    assert_eq!(momentum.num_states(), 0);

    // 重置后重新从零速度开始
    let mut fresh = param(&[1.0]);
    apply(&mut momentum, &mut fresh, &param(&[1.0]));
    assert_abs_diff_eq!(fresh[0], 0.99, epsilon = 1e-6);
}

#[test]
fn test_momentum_state_shape_mismatch() {
    let mut momentum = Momentum::new_default(0.1).unwrap();
    let mut w = param(&[1.0, 2.0]);
    apply(&mut momentum, &mut w, &param(&[1.0, 1.0]));

    // 同一参数的形状改变
    let mut other = param(&[1.0, 2.0, 3.0]);
    let grad = param(&[1.0, 1.0, 1.0]);
    assert_err!(
        momentum.update(
            ParamId::weights(0),
            other.view_mut().into_dyn(),
            grad.view().into_dyn()
        ),
        NetError::ShapeMismatch { expected, got, .. } if expected == &[2] && got == &[3]
    );
    // 梯度与参数形状不一致
    let short = param(&[1.0]);
    assert_err!(
        momentum.update(
            ParamId::bias(0),
            other.view_mut().into_dyn(),
            short.view().into_dyn()
        ),
        NetError::ShapeMismatch { .. }
    );
}
