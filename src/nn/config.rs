/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-07
 * @Description  : 网络配置：用一份 JSON 描述层结构、损失函数、优化器与训练参数
 *
 * ```json
 * {
 *   "seed": 42,
 *   "layers": [
 *     { "in_features": 2, "out_features": 8, "activation": "tanh" },
 *     { "in_features": 8, "out_features": 1, "activation": "sigmoid" }
 *   ],
 *   "loss": "cross_entropy",
 *   "optimizer": { "name": "adam", "learning_rate": 0.05 },
 *   "fit": { "epochs": 2000 }
 * }
 * ```
 */

use serde::{Deserialize, Serialize};

use super::activation::Activation;
use super::fit::FitConfig;
use super::loss::Loss;
use super::network::Network;
use super::optimizer::OptimizerConfig;
use crate::errors::NetError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub in_features: usize,
    pub out_features: usize,
    #[serde(default = "default_activation")]
    pub activation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_slope: Option<f32>,
}

fn default_activation() -> String {
    "identity".to_string()
}

fn default_loss() -> String {
    "mse".to_string()
}

impl LayerConfig {
    pub fn new(in_features: usize, out_features: usize, activation: &str) -> Self {
        Self {
            in_features,
            out_features,
            activation: activation.to_string(),
            negative_slope: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 为`None`时使用系统熵初始化
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub layers: Vec<LayerConfig>,
    #[serde(default = "default_loss")]
    pub loss: String,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub fit: FitConfig,
}

impl NetworkConfig {
    pub fn from_json(json: &str) -> Result<Self, NetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, NetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 按配置构建网络。名称、超参数非法或相邻层宽度不衔接时立即报错，不会返回半成品
    pub fn build(&self) -> Result<Network, NetError> {
        if self.layers.is_empty() {
            return Err(NetError::Configuration("配置中没有任何层".to_string()));
        }
        let loss = Loss::from_name(&self.loss)?;
        let optimizer = self.optimizer.build()?;
        let activations = self
            .layers
            .iter()
            .map(|l| Activation::from_name(&l.activation, l.negative_slope))
            .collect::<Result<Vec<_>, _>>()?;

        let mut network = self.seed.map_or_else(Network::new, Network::new_with_seed);
        for (layer, activation) in self.layers.iter().zip(activations) {
            network.add_layer(layer.in_features, layer.out_features, activation)?;
        }
        network.set_loss(loss);
        network.set_optimizer(optimizer);
        Ok(network)
    }
}
