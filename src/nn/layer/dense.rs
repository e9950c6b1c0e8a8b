/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : Dense (全连接) 层
 */

use ndarray::Axis;
use rand::Rng;

use super::Upstream;
use crate::errors::NetError;
use crate::nn::activation::{Activation, TraitActivation};
use crate::nn::loss::TraitLoss;
use crate::tensor::{Matrix, Vector, ensure_shape, kaiming_matrix};

/// Dense (全连接) 层：`Z = W·X + b`，`A = f(Z)`
///
/// # 输入/输出形状
/// - 输入：[in_features, batch_size]（每列一个样本）
/// - 输出：[out_features, batch_size]
///
/// # 使用示例
/// ```ignore
/// let mut fc = Dense::new(784, 128, ReLU, &mut rng);
/// let a = fc.forward(&x)?;
/// let d_input = fc.backward(Upstream::Gradient(&d_a))?;
/// ```
#[derive(Debug, Clone)]
pub struct Dense {
    /// 权重参数 [out_features, in_features]
    weights: Matrix,
    /// 偏置参数 [out_features]
    bias: Vector,
    activation: Activation,
    /// ∂L/∂W，形状始终与`weights`一致
    weight_grad: Matrix,
    /// ∂L/∂b，形状始终与`bias`一致
    bias_grad: Vector,
    // 前向传播的缓存，供反向传播使用
    input: Option<Matrix>,
    z: Option<Matrix>,
    a: Option<Matrix>,
}

impl Dense {
    /// 创建新的 Dense 层：权重使用 Kaiming 初始化（std = sqrt(2/in)），偏置为零
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        activation: impl Into<Activation>,
        rng: &mut R,
    ) -> Self {
        let weights = kaiming_matrix(out_features, in_features, rng);
        let bias = Vector::zeros(out_features);
        Self::with_parameters_unchecked(weights, bias, activation.into())
    }

    /// 用给定的参数创建 Dense 层，`bias`的长度须等于`weights`的行数
    pub fn from_parameters(
        weights: Matrix,
        bias: Vector,
        activation: impl Into<Activation>,
    ) -> Result<Self, NetError> {
        if bias.len() != weights.nrows() {
            return Err(NetError::shape_mismatch(
                &[weights.nrows()],
                bias.shape(),
                "偏置的长度须等于权重的行数",
            ));
        }
        Ok(Self::with_parameters_unchecked(
            weights,
            bias,
            activation.into(),
        ))
    }

    fn with_parameters_unchecked(weights: Matrix, bias: Vector, activation: Activation) -> Self {
        let weight_grad = Matrix::zeros(weights.raw_dim());
        let bias_grad = Vector::zeros(bias.raw_dim());
        Self {
            weights,
            bias,
            activation,
            weight_grad,
            bias_grad,
            input: None,
            z: None,
            a: None,
        }
    }

    /// 前向传播：缓存输入、Z、A 并返回 A。
    /// 输入的行数与层的输入宽度不符时立即返回`ShapeMismatch`，缓存保持不变
    pub fn forward(&mut self, input: &Matrix) -> Result<Matrix, NetError> {
        let z = self.affine(input)?;
        let a = self.activation.forward(&z);

        self.input = Some(input.clone());
        self.z = Some(z);
        self.a = Some(a.clone());
        Ok(a)
    }

    /// 只做推理，不写缓存
    pub fn infer(&self, input: &Matrix) -> Result<Matrix, NetError> {
        let z = self.affine(input)?;
        Ok(self.activation.forward(&z))
    }

    // Z = W·X + b（b 沿 batch 方向广播）
    fn affine(&self, input: &Matrix) -> Result<Matrix, NetError> {
        if input.nrows() != self.in_features() {
            return Err(NetError::shape_mismatch(
                &[self.in_features(), input.ncols()],
                input.shape(),
                "输入的行数须等于层的输入宽度",
            ));
        }
        Ok(self.weights.dot(input) + &self.bias.view().insert_axis(Axis(1)))
    }

    /// 反向传播：
    /// - 输出层（`Upstream::Target`）：dZ 由损失函数给出；
    /// - 隐藏层（`Upstream::Gradient`）：dZ = dA ⊙ f'(Z)（Softmax 为雅可比向量积）。
    ///
    /// 然后 `dW = dZ·Xᵀ / batch`，`db = rowsum(dZ) / batch`，结果写入本层的梯度缓冲；
    /// 返回传给前一层的 `dA_prev = Wᵀ·dZ`，形状[in, batch]。
    /// batch 为 0 时按 1 计，不会除零
    pub fn backward(&mut self, upstream: Upstream<'_>) -> Result<Matrix, NetError> {
        let (Some(input), Some(z), Some(a)) = (&self.input, &self.z, &self.a) else {
            return Err(NetError::InvalidOperation(
                "须先前向传播，才能反向传播".to_string(),
            ));
        };
        let expected = (self.weights.nrows(), input.ncols());

        let dz = match upstream {
            Upstream::Gradient(grad) => {
                ensure_shape(grad, expected, "上游梯度的形状须为[输出宽度, batch]")?;
                self.activation.backprop(z, a, grad)
            }
            Upstream::Target { target, loss } => {
                ensure_shape(target, expected, "目标值的形状须为[输出宽度, batch]")?;
                loss.output_delta(z, a, target, &self.activation)
            }
        };

        let scale = 1.0 / input.ncols().max(1) as f32;
        self.weight_grad = dz.dot(&input.t()) * scale;
        self.bias_grad = dz.sum_axis(Axis(1)) * scale;

        Ok(self.weights.t().dot(&dz))
    }

    /// 梯度清零（形状不变）
    pub fn zero_grad(&mut self) {
        self.weight_grad.fill(0.0);
        self.bias_grad.fill(0.0);
    }

    /// 替换参数，形状须与原参数一致；出错时原参数不变
    pub fn set_parameters(&mut self, weights: Matrix, bias: Vector) -> Result<(), NetError> {
        self.check_parameter_shapes(&weights, &bias)?;
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    /// 校验(W, b)能否替换本层参数
    pub fn check_parameter_shapes(
        &self,
        weights: &Matrix,
        bias: &Vector,
    ) -> Result<(), NetError> {
        ensure_shape(weights, self.weights.dim(), "新权重须与原权重同形状")?;
        if bias.len() != self.bias.len() {
            return Err(NetError::shape_mismatch(
                self.bias.shape(),
                bias.shape(),
                "新偏置须与原偏置同形状",
            ));
        }
        Ok(())
    }

    /// 供优化器使用：(W, dW, b, db)
    pub(crate) fn parameters_and_grads_mut(
        &mut self,
    ) -> (&mut Matrix, &Matrix, &mut Vector, &Vector) {
        (
            &mut self.weights,
            &self.weight_grad,
            &mut self.bias,
            &self.bias_grad,
        )
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn bias(&self) -> &Vector {
        &self.bias
    }

    pub fn weight_grad(&self) -> &Matrix {
        &self.weight_grad
    }

    pub fn bias_grad(&self) -> &Vector {
        &self.bias_grad
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// 最近一次前向传播的输出 A
    pub fn output(&self) -> Option<&Matrix> {
        self.a.as_ref()
    }

    pub fn in_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn out_features(&self) -> usize {
        self.weights.nrows()
    }

    /// 参数总量（权重 + 偏置）
    pub fn num_params(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}
