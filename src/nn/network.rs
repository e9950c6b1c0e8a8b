/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-05
 * @Description  : 全连接网络（按顺序堆叠的 Dense 层）
 *                 一步训练：前向（按层顺序）→ 损失 → 反向（按层逆序）→ 优化器更新参数
 */

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::activation::Activation;
use super::layer::{Dense, Upstream};
use super::loss::{Loss, TraitLoss};
use super::optimizer::{Optimizer, SGD};
use crate::errors::NetError;
use crate::tensor::{Matrix, l2_norm};

/// 顺序网络
///
/// # 使用示例
/// ```ignore
/// let mut net = Network::new_with_seed(42);
/// net.add_layer(2, 8, Tanh)?;
/// net.add_layer(8, 1, Sigmoid)?;
/// net.set_loss(CrossEntropy);
/// net.set_optimizer(Box::new(Adam::new_default(0.05)?));
/// let report = net.fit(&x, &y, 2000, 0.05)?;
/// let y_hat = net.predict(&x)?;
/// ```
#[derive(Debug)]
pub struct Network {
    layers: Vec<Dense>,
    loss: Loss,
    optimizer: Box<dyn Optimizer>,
    /// 参数初始化与打乱样本共用的随机数生成器
    pub(in crate::nn) rng: StdRng,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// 创建空网络（损失函数默认 MSE，优化器默认 SGD）
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// 创建空网络，使用固定种子确保初始化与打乱样本可重复
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            layers: Vec::new(),
            loss: Loss::default(),
            optimizer: Box::new(SGD::default()),
            rng,
        }
    }

    /// 追加一个 Kaiming 初始化的 Dense 层，`in_features`须等于前一层的输出宽度
    pub fn add_layer(
        &mut self,
        in_features: usize,
        out_features: usize,
        activation: impl Into<Activation>,
    ) -> Result<(), NetError> {
        self.check_next_input(in_features)?;
        let layer = Dense::new(in_features, out_features, activation, &mut self.rng);
        self.layers.push(layer);
        Ok(())
    }

    /// 追加一个已构建好的层
    pub fn add(&mut self, layer: Dense) -> Result<(), NetError> {
        self.check_next_input(layer.in_features())?;
        self.layers.push(layer);
        Ok(())
    }

    fn check_next_input(&self, in_features: usize) -> Result<(), NetError> {
        match self.layers.last() {
            Some(last) if last.out_features() != in_features => Err(NetError::shape_mismatch(
                &[last.out_features()],
                &[in_features],
                "新层的输入宽度须等于前一层的输出宽度",
            )),
            _ => Ok(()),
        }
    }

    pub fn set_loss(&mut self, loss: impl Into<Loss>) {
        self.loss = loss.into();
    }

    /// 更换优化器（之前累积的优化器状态随之丢弃）
    pub fn set_optimizer(&mut self, optimizer: Box<dyn Optimizer>) {
        self.optimizer = optimizer;
    }

    pub fn loss_fn(&self) -> &Loss {
        &self.loss
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    pub fn optimizer_mut(&mut self) -> &mut dyn Optimizer {
        self.optimizer.as_mut()
    }

    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Dense] {
        &mut self.layers
    }

    pub fn num_params(&self) -> usize {
        self.layers.iter().map(Dense::num_params).sum()
    }

    pub(in crate::nn) fn ensure_not_empty(&self) -> Result<(), NetError> {
        if self.layers.is_empty() {
            Err(NetError::Configuration("网络中没有任何层".to_string()))
        } else {
            Ok(())
        }
    }

    /// 前向传播（写入各层缓存，供随后的`backward`使用）
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix, NetError> {
        self.ensure_not_empty()?;
        let mut output = input.clone();
        for layer in &mut self.layers {
            output = layer.forward(&output)?;
        }
        Ok(output)
    }

    /// 推理（不写缓存）
    pub fn predict(&self, input: &Matrix) -> Result<Matrix, NetError> {
        self.ensure_not_empty()?;
        let mut output = input.clone();
        for layer in &self.layers {
            output = layer.infer(&output)?;
        }
        Ok(output)
    }

    /// 反向传播：输出层由损失函数给出误差项，其余层按逆序链式传递
    pub fn backward(&mut self, target: &Matrix) -> Result<(), NetError> {
        let loss = self.loss;
        let Some((output_layer, hidden_layers)) = self.layers.split_last_mut() else {
            return Err(NetError::Configuration("网络中没有任何层".to_string()));
        };

        let mut grad = output_layer.backward(Upstream::Target {
            target,
            loss: &loss,
        })?;
        for layer in hidden_layers.iter_mut().rev() {
            grad = layer.backward(Upstream::Gradient(&grad))?;
        }
        Ok(())
    }

    /// 一步训练：前向 → 损失 → 反向 → 更新参数，返回更新前的损失
    pub fn train_step(&mut self, input: &Matrix, target: &Matrix) -> Result<f32, NetError> {
        let output = self.forward(input)?;
        let loss = self.loss.loss(&output, target)?;
        self.backward(target)?;
        self.optimizer.step(&mut self.layers)?;
        Ok(loss)
    }

    /// 计算损失但不更新参数
    pub fn evaluate(&self, input: &Matrix, target: &Matrix) -> Result<f32, NetError> {
        let output = self.predict(input)?;
        self.loss.loss(&output, target)
    }

    /// Σ(‖dW‖ + ‖db‖)，用于判断是否收敛
    pub fn gradient_norm(&self) -> f32 {
        self.layers
            .iter()
            .map(|layer| l2_norm(layer.weight_grad()) + l2_norm(layer.bias_grad()))
            .sum()
    }

    pub fn zero_grad(&mut self) {
        self.layers.iter_mut().for_each(Dense::zero_grad);
    }
}
