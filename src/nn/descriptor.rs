/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-06
 * @Description  : 网络描述符（Network Descriptor）
 *                 网络结构的可读描述（JSON），用于保存/加载模型
 */

use serde::{Deserialize, Serialize};

use super::activation::{Activation, TraitActivation};
use super::layer::Dense;
use super::loss::{Loss, TraitLoss};
use super::network::Network;
use crate::errors::NetError;

/// 网络的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 损失函数名称
    pub loss: String,
    /// 按顺序排列的各层描述
    pub layers: Vec<LayerDescriptor>,
    /// 参数文件路径（相对于 JSON 文件），仅在保存完整模型时使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_file: Option<String>,
}

/// 层描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub in_features: usize,
    pub out_features: usize,
    /// 激活函数名称
    pub activation: String,
    /// 仅 leaky_relu 有意义
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_slope: Option<f32>,
    pub param_count: usize,
}

impl NetworkDescriptor {
    /// 创建新的网络描述符
    pub fn new(loss: &Loss) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            loss: loss.name().to_string(),
            layers: Vec::new(),
            params_file: None,
        }
    }

    /// 添加层描述
    pub fn add_layer(&mut self, layer: LayerDescriptor) {
        self.layers.push(layer);
    }

    /// 获取总参数量
    pub fn total_params(&self) -> usize {
        self.layers.iter().map(|l| l.param_count).sum()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl LayerDescriptor {
    pub fn from_layer(layer: &Dense) -> Self {
        Self {
            in_features: layer.in_features(),
            out_features: layer.out_features(),
            activation: layer.activation().name().to_string(),
            negative_slope: layer.activation().negative_slope(),
            param_count: layer.num_params(),
        }
    }
}

impl Network {
    /// 生成网络结构描述
    pub fn describe(&self) -> NetworkDescriptor {
        let mut descriptor = NetworkDescriptor::new(self.loss_fn());
        for layer in self.layers() {
            descriptor.add_layer(LayerDescriptor::from_layer(layer));
        }
        descriptor
    }

    /// 按描述重建网络结构（参数重新随机初始化），名称非法时返回`Configuration`错误
    pub fn from_descriptor(descriptor: &NetworkDescriptor, seed: Option<u64>) -> Result<Self, NetError> {
        let mut network = seed.map_or_else(Self::new, Self::new_with_seed);
        network.set_loss(Loss::from_name(&descriptor.loss)?);
        for layer in &descriptor.layers {
            let activation = Activation::from_name(&layer.activation, layer.negative_slope)?;
            network.add_layer(layer.in_features, layer.out_features, activation)?;
        }
        Ok(network)
    }
}
