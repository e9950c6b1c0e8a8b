/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 优化器模块：SGD、Momentum、RMSProp、Adam、AdaGrad、AdaDelta
 */

mod ada_delta;
mod ada_grad;
mod adam;
mod base;
mod momentum;
mod rms_prop;
mod sgd;

pub use ada_delta::AdaDelta;
pub use ada_grad::AdaGrad;
pub use adam::Adam;
pub use base::{DEFAULT_LEARNING_RATE, Optimizer, ParamId, ParamKind};
pub use momentum::Momentum;
pub use rms_prop::RMSProp;
pub use sgd::SGD;

use serde::{Deserialize, Serialize};

use crate::errors::NetError;

/// 优化器配置，可由 JSON 反序列化；未给出的超参数取各优化器的默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// "sgd" | "momentum" | "rmsprop" | "adam" | "adagrad" | "adadelta"
    pub name: String,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f32>,
    /// RMSProp 的衰减系数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f32>,
    /// AdaDelta 的衰减系数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta1: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta2: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f32>,
}

const fn default_learning_rate() -> f32 {
    DEFAULT_LEARNING_RATE
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new("sgd", default_learning_rate())
    }
}

impl OptimizerConfig {
    pub fn new(name: &str, learning_rate: f32) -> Self {
        Self {
            name: name.to_string(),
            learning_rate,
            momentum: None,
            beta: None,
            rho: None,
            beta1: None,
            beta2: None,
            epsilon: None,
        }
    }

    /// 按名称构建优化器（不区分大小写），未知名称或非法超参数返回`Configuration`错误
    pub fn build(&self) -> Result<Box<dyn Optimizer>, NetError> {
        let lr = self.learning_rate;
        let optimizer: Box<dyn Optimizer> = match self.name.to_lowercase().as_str() {
            "sgd" | "gd" => Box::new(SGD::new(lr)?),
            "momentum" => Box::new(Momentum::new(
                lr,
                self.momentum.unwrap_or(Momentum::DEFAULT_MOMENTUM),
            )?),
            "rmsprop" | "rms_prop" => Box::new(RMSProp::new(
                lr,
                self.beta.unwrap_or(RMSProp::DEFAULT_BETA),
                self.epsilon.unwrap_or(RMSProp::DEFAULT_EPSILON),
            )?),
            "adam" => Box::new(Adam::new(
                lr,
                self.beta1.unwrap_or(Adam::DEFAULT_BETA1),
                self.beta2.unwrap_or(Adam::DEFAULT_BETA2),
                self.epsilon.unwrap_or(Adam::DEFAULT_EPSILON),
            )?),
            "adagrad" | "ada_grad" => Box::new(AdaGrad::new(
                lr,
                self.epsilon.unwrap_or(AdaGrad::DEFAULT_EPSILON),
            )?),
            "adadelta" | "ada_delta" => Box::new(AdaDelta::new(
                lr,
                self.rho.unwrap_or(AdaDelta::DEFAULT_RHO),
                self.epsilon.unwrap_or(AdaDelta::DEFAULT_EPSILON),
            )?),
            other => {
                return Err(NetError::Configuration(format!(
                    "未知的优化器：`{other}`"
                )));
            }
        };
        Ok(optimizer)
    }
}
