/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : Optimizer trait 通用行为测试：对各层的 step、按配置构建
 */

use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};

use crate::assert_err;
use crate::errors::NetError;
use crate::nn::optimizer::{
    AdaDelta, AdaGrad, Adam, DEFAULT_LEARNING_RATE, Momentum, Optimizer, OptimizerConfig,
    RMSProp, SGD,
};
use crate::nn::{Dense, Identity, Network};

/// 两层网络，前向 + 反向后各层梯度已就绪
fn network_with_grads() -> Network {
    let mut network = Network::new_with_seed(0);
    network
        .add(Dense::from_parameters(array![[1.0], [2.0]], Array1::zeros(2), Identity).unwrap())
        .unwrap();
    network
        .add(Dense::from_parameters(array![[3.0, 4.0]], Array1::zeros(1), Identity).unwrap())
        .unwrap();
    network.forward(&array![[1.0]]).unwrap();
    network.backward(&array![[0.0]]).unwrap();
    network
}

fn all_optimizers() -> Vec<Box<dyn Optimizer>> {
    vec![
        Box::new(SGD::new(0.01).unwrap()),
        Box::new(Momentum::new_default(0.01).unwrap()),
        Box::new(RMSProp::new_default(0.01).unwrap()),
        Box::new(Adam::new_default(0.01).unwrap()),
        Box::new(AdaGrad::new_default(0.01).unwrap()),
        Box::new(AdaDelta::new_default(1.0).unwrap()),
    ]
}

#[test]
fn test_step_updates_every_layer() {
    for mut optimizer in all_optimizers() {
        let mut network = network_with_grads();
        let before: Vec<_> = network
            .layers()
            .iter()
            .map(|l| (l.weights().clone(), l.bias().clone()))
            .collect();

        optimizer.step(network.layers_mut()).unwrap();

        // 梯度均为正，更新后所有参数都应变小
        for (layer, (w, b)) in network.layers().iter().zip(&before) {
            assert!(
                layer.weights().iter().zip(w.iter()).all(|(new, old)| new < old),
                "{}未更新全部权重",
                optimizer.name()
            );
            assert!(
                layer.bias().iter().zip(b.iter()).all(|(new, old)| new < old),
                "{}未更新全部偏置",
                optimizer.name()
            );
        }
    }
}

#[test]
fn test_sgd_step_values() {
    let mut network = network_with_grads();
    let mut sgd = SGD::new(0.01).unwrap();
    sgd.step(network.layers_mut()).unwrap();

    // W2 = [3, 4] - 0.01·[11, 22]，W1 = [1, 2] - 0.01·[33, 44]
    let layers = network.layers();
    assert_abs_diff_eq!(layers[1].weights()[[0, 0]], 2.89, epsilon = 1e-5);
    assert_abs_diff_eq!(layers[1].weights()[[0, 1]], 3.78, epsilon = 1e-5);
    assert_abs_diff_eq!(layers[0].weights()[[0, 0]], 0.67, epsilon = 1e-5);
    assert_abs_diff_eq!(layers[0].weights()[[1, 0]], 1.56, epsilon = 1e-5);
    assert_abs_diff_eq!(layers[0].bias()[1], -0.44, epsilon = 1e-5);
}

#[test]
fn test_adam_step_advances_time_once() {
    let mut network = network_with_grads();
    let mut adam = Adam::new_default(0.01).unwrap();
    adam.step(network.layers_mut()).unwrap();
    adam.step(network.layers_mut()).unwrap();
    assert_eq!(adam.time_step(), 2);
}

#[test]
fn test_momentum_keeps_state_per_parameter() {
    let mut network = network_with_grads();
    let mut momentum = Momentum::new_default(0.01).unwrap();
    momentum.step(network.layers_mut()).unwrap();
    // 2 层 × (W, b)
    assert_eq!(momentum.num_states(), 4);
}

#[test]
fn test_optimizer_config_build() {
    let names = [
        ("sgd", "sgd"),
        ("GD", "sgd"),
        ("momentum", "momentum"),
        ("rmsprop", "rmsprop"),
        ("rms_prop", "rmsprop"),
        ("Adam", "adam"),
        ("adagrad", "adagrad"),
        ("ada_grad", "adagrad"),
        ("AdaDelta", "adadelta"),
        ("ada_delta", "adadelta"),
    ];
    for (name, expected) in names {
        let optimizer = OptimizerConfig::new(name, 0.05).build().unwrap();
        assert_eq!(optimizer.name(), expected);
        assert_abs_diff_eq!(optimizer.learning_rate(), 0.05);
    }

    let default = OptimizerConfig::default().build().unwrap();
    assert_eq!(default.name(), "sgd");
    assert_abs_diff_eq!(default.learning_rate(), DEFAULT_LEARNING_RATE);
}

#[test]
fn test_optimizer_config_from_json() {
    let config: OptimizerConfig =
        serde_json::from_str(r#"{ "name": "adam", "beta1": 0.8 }"#).unwrap();
    assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
    assert_eq!(config.beta1, Some(0.8));
    assert_eq!(config.beta2, None);
    assert_eq!(config.build().unwrap().name(), "adam");

    let config: OptimizerConfig =
        serde_json::from_str(r#"{ "name": "adadelta", "learning_rate": 1.0, "rho": 0.9 }"#)
            .unwrap();
    assert_eq!(config.rho, Some(0.9));
    assert_eq!(config.build().unwrap().name(), "adadelta");

    // 未设置的超参数不写入 JSON
    let json = serde_json::to_string(&OptimizerConfig::new("sgd", 0.1)).unwrap();
    assert!(!json.contains("momentum"));
}

#[test]
fn test_optimizer_config_errors() {
    assert_err!(
        OptimizerConfig::new("lbfgs", 0.1).build(),
        NetError::Configuration("未知的优化器：`lbfgs`")
    );
    assert_err!(
        OptimizerConfig::new("sgd", -0.1).build(),
        NetError::Configuration(_)
    );
    let mut bad_momentum = OptimizerConfig::new("momentum", 0.1);
    bad_momentum.momentum = Some(1.2);
    assert_err!(bad_momentum.build(), NetError::Configuration(_));
    let mut bad_rho = OptimizerConfig::new("adadelta", 1.0);
    bad_rho.rho = Some(-0.5);
    assert_err!(bad_rho.build(), NetError::Configuration(_));
}
