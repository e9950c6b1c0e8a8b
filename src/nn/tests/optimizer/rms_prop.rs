/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-08
 * @Description  : RMSProp 优化器测试
 */

use approx::assert_abs_diff_eq;

use super::{apply, param};
use crate::assert_err;
use crate::errors::NetError;
use crate::nn::optimizer::{Optimizer, RMSProp};

#[test]
fn test_rms_prop_creation() {
    let rms_prop = RMSProp::new_default(0.01).unwrap();
    assert_eq!(rms_prop.learning_rate(), 0.01);
    assert_eq!(rms_prop.name(), "rmsprop");
}

#[test]
fn test_rms_prop_invalid_arguments() {
    assert_err!(RMSProp::new(0.01, 1.5, 1e-8), NetError::Configuration(_));
    assert_err!(
        RMSProp::new(0.01, 0.9, 0.0),
        NetError::Configuration("epsilon须>0，实际为0")
    );
}

#[test]
fn test_rms_prop_update() {
    // β = 0.9，α = 0.01，g = 2
    // s = 0.1·4 = 0.4，θ = 1 - 0.01·2/√0.4
    let mut rms_prop = RMSProp::new_default(0.01).unwrap();
    let mut w = param(&[1.0]);
    apply(&mut rms_prop, &mut w, &param(&[2.0]));
    let expected = 1.0 - 0.02 / 0.4_f32.sqrt();
    assert_abs_diff_eq!(w[0], expected, epsilon = 1e-6);

    // 第2步：s = 0.36 + 0.4 = 0.76
    apply(&mut rms_prop, &mut w, &param(&[2.0]));
    let expected = expected - 0.02 / 0.76_f32.sqrt();
    assert_abs_diff_eq!(w[0], expected, epsilon = 1e-6);
}

#[test]
fn test_rms_prop_zero_gradient_is_stable() {
    // s = 0 时依靠 ε 避免除零
    let mut rms_prop = RMSProp::new_default(0.01).unwrap();
    let mut w = param(&[0.5]);
    apply(&mut rms_prop, &mut w, &param(&[0.0]));
    assert_eq!(w[0], 0.5);
}

#[test]
fn test_rms_prop_reset() {
    let mut rms_prop = RMSProp::new_default(0.01).unwrap();
    let mut w = param(&[1.0]);
    apply(&mut rms_prop, &mut w, &param(&[2.0]));
    rms_prop.reset();

    let mut fresh = param(&[1.0]);
    apply(&mut rms_prop, &mut fresh, &param(&[2.0]));
    assert_abs_diff_eq!(fresh[0], 1.0 - 0.02 / 0.4_f32.sqrt(), epsilon = 1e-6);
}
