/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 损失函数
 *                 输出层的误差项 dZ 由损失函数注入（`output_delta`），而不是在层里写死 A - Y：
 *                 - MSE + Identity：dZ = A - Y
 *                 - 交叉熵 + Sigmoid/Softmax：dZ = A - Y
 *                 - 其余组合：dZ = activation.backprop(Z, A, ∂L/∂A)
 */

use enum_dispatch::enum_dispatch;

use super::activation::{Activation, TraitActivation};
use crate::errors::NetError;
use crate::tensor::Matrix;

/// 交叉熵中对概率的截断，避免 ln(0)
const PROB_EPSILON: f32 = 1e-7;

#[enum_dispatch]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loss {
    MeanSquaredError(MeanSquaredError),
    CrossEntropy(CrossEntropy),
}

#[enum_dispatch(Loss)]
pub trait TraitLoss {
    fn name(&self) -> &'static str;

    /// 整个batch的平均损失
    fn loss(&self, output: &Matrix, target: &Matrix) -> Result<f32, NetError>;

    /// 逐样本的 ∂L/∂A（不含 1/batch，求平均在层的反向传播中完成）
    fn gradient(&self, output: &Matrix, target: &Matrix) -> Matrix;

    /// 输出层的误差项 ∂L/∂Z
    fn output_delta(
        &self,
        z: &Matrix,
        a: &Matrix,
        target: &Matrix,
        activation: &Activation,
    ) -> Matrix {
        activation.backprop(z, a, &self.gradient(a, target))
    }
}

impl Loss {
    /// 按名称创建损失函数（不区分大小写）
    pub fn from_name(name: &str) -> Result<Self, NetError> {
        let loss: Loss = match name.to_lowercase().as_str() {
            "mse" | "mean_squared_error" => MeanSquaredError.into(),
            "cross_entropy" | "ce" | "crossentropy" => CrossEntropy.into(),
            _ => {
                return Err(NetError::Configuration(format!(
                    "未知的损失函数：`{name}`"
                )));
            }
        };
        Ok(loss)
    }
}

impl Default for Loss {
    fn default() -> Self {
        MeanSquaredError.into()
    }
}

fn check_target(output: &Matrix, target: &Matrix) -> Result<(), NetError> {
    if output.dim() == target.dim() {
        Ok(())
    } else {
        Err(NetError::shape_mismatch(
            output.shape(),
            target.shape(),
            "目标值的形状须与网络输出一致",
        ))
    }
}

fn batch_size(output: &Matrix) -> f32 {
    output.ncols().max(1) as f32
}

/// L = (1/batch) · Σ ½(a - y)²
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanSquaredError;

impl TraitLoss for MeanSquaredError {
    fn name(&self) -> &'static str {
        "mse"
    }

    fn loss(&self, output: &Matrix, target: &Matrix) -> Result<f32, NetError> {
        check_target(output, target)?;
        let sum: f32 = output
            .iter()
            .zip(target.iter())
            .map(|(a, y)| 0.5 * (a - y).powi(2))
            .sum();
        Ok(sum / batch_size(output))
    }

    fn gradient(&self, output: &Matrix, target: &Matrix) -> Matrix {
        output - target
    }
}

/// 单行输出：二元交叉熵 -[y·ln(a) + (1-y)·ln(1-a)]；
/// 多行输出：多分类交叉熵 -Σ y·ln(a)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrossEntropy;

impl CrossEntropy {
    fn is_binary(output: &Matrix) -> bool {
        output.nrows() == 1
    }
}

impl TraitLoss for CrossEntropy {
    fn name(&self) -> &'static str {
        "cross_entropy"
    }

    fn loss(&self, output: &Matrix, target: &Matrix) -> Result<f32, NetError> {
        check_target(output, target)?;
        let binary = Self::is_binary(output);
        let sum: f32 = output
            .iter()
            .zip(target.iter())
            .map(|(&a, &y)| {
                let a = a.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
                if binary {
                    -(y * a.ln() + (1.0 - y) * (1.0 - a).ln())
                } else {
                    -y * a.ln()
                }
            })
            .sum();
        Ok(sum / batch_size(output))
    }

    fn gradient(&self, output: &Matrix, target: &Matrix) -> Matrix {
        let binary = Self::is_binary(output);
        let mut grad = output.clone();
        grad.zip_mut_with(target, |a, &y| {
            let p = (*a).clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
            *a = if binary {
                (p - y) / (p * (1.0 - p))
            } else {
                -y / p
            };
        });
        grad
    }

    fn output_delta(
        &self,
        z: &Matrix,
        a: &Matrix,
        target: &Matrix,
        activation: &Activation,
    ) -> Matrix {
        match activation {
            Activation::Softmax(_) => a - target,
            Activation::Sigmoid(_) if Self::is_binary(a) => a - target,
            _ => activation.backprop(z, a, &self.gradient(a, target)),
        }
    }
}
