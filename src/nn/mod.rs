/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 负责全连接神经网络（neural network）的构建与训练
 */

mod activation;
mod config;
mod descriptor;
mod fit;
pub mod layer;
mod loss;
mod metrics;
mod model_io;
mod network;
pub mod optimizer;

pub use activation::{
    Activation, Identity, LeakyReLU, ReLU, Sigmoid, Softmax, Tanh, TraitActivation,
};
pub use config::{LayerConfig, NetworkConfig};
pub use descriptor::{LayerDescriptor, NetworkDescriptor};
pub use fit::{FitConfig, FitReport};
pub use layer::{Dense, Upstream};
pub use loss::{CrossEntropy, Loss, MeanSquaredError, TraitLoss};
pub use metrics::{
    BINARY_THRESHOLD, ClassificationMetrics, ConfusionCounts, binary_metrics,
    categorical_accuracy, classification_metrics,
};
pub use network::Network;
pub use optimizer::{
    AdaDelta, AdaGrad, Adam, Momentum, Optimizer, OptimizerConfig, RMSProp, SGD,
};
