/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 激活函数
 *                 封闭集合（Identity、Sigmoid、ReLU、LeakyReLU、Tanh、Softmax），
 *                 通过 enum_dispatch 静态分发，不做运行时字符串比较；
 *                 名称只在配置入口（`Activation::from_name`）解析一次。
 */

use enum_dispatch::enum_dispatch;
use ndarray::Axis;

use crate::errors::{ComparisonOperator, NetError, check_hyper_parameter};
use crate::tensor::Matrix;

#[enum_dispatch]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Identity(Identity),
    Sigmoid(Sigmoid),
    ReLU(ReLU),
    LeakyReLU(LeakyReLU),
    Tanh(Tanh),
    Softmax(Softmax),
}

/// 激活函数的统一接口。所有方法均为纯函数，不持有状态
#[enum_dispatch(Activation)]
pub trait TraitActivation {
    fn name(&self) -> &'static str;

    /// A = f(Z)
    fn forward(&self, z: &Matrix) -> Matrix;

    /// 与Z同形状的导数矩阵，`a`为`forward(z)`的结果（部分激活函数用它可以少算一次）
    fn derivative(&self, z: &Matrix, a: &Matrix) -> Matrix;

    /// 链式法则：由 ∂L/∂A 求 ∂L/∂Z。
    /// 逐元素的激活函数直接乘以导数即可；非逐元素的（Softmax）需重写
    fn backprop(&self, z: &Matrix, a: &Matrix, upstream: &Matrix) -> Matrix {
        upstream * &self.derivative(z, a)
    }
}

impl Activation {
    /// 按名称创建激活函数（不区分大小写）。
    /// `negative_slope`仅对leaky_relu有效，缺省为0.01
    pub fn from_name(name: &str, negative_slope: Option<f32>) -> Result<Self, NetError> {
        let activation: Activation = match name.to_lowercase().as_str() {
            "identity" | "linear" | "none" => Identity.into(),
            "sigmoid" => Sigmoid.into(),
            "relu" => ReLU.into(),
            "leaky_relu" | "leakyrelu" => {
                LeakyReLU::new(negative_slope.unwrap_or(LeakyReLU::DEFAULT_SLOPE))?.into()
            }
            "tanh" => Tanh.into(),
            "softmax" => Softmax.into(),
            _ => {
                return Err(NetError::Configuration(format!(
                    "未知的激活函数：`{name}`"
                )));
            }
        };
        Ok(activation)
    }

    /// 仅LeakyReLU有斜率参数
    pub fn negative_slope(&self) -> Option<f32> {
        match self {
            Self::LeakyReLU(l) => Some(l.negative_slope),
            _ => None,
        }
    }
}

impl Default for Activation {
    fn default() -> Self {
        Identity.into()
    }
}

/// 恒等：f(z) = z
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Identity;

impl TraitActivation for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        z.clone()
    }

    fn derivative(&self, z: &Matrix, _a: &Matrix) -> Matrix {
        Matrix::ones(z.raw_dim())
    }

    fn backprop(&self, _z: &Matrix, _a: &Matrix, upstream: &Matrix) -> Matrix {
        upstream.clone()
    }
}

/// f(z) = 1 / (1 + e^-z)，f'(z) = a(1 - a)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sigmoid;

impl TraitActivation for Sigmoid {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        z.mapv(|x| 1.0 / (1.0 + (-x).exp()))
    }

    fn derivative(&self, _z: &Matrix, a: &Matrix) -> Matrix {
        a.mapv(|y| y * (1.0 - y))
    }
}

/// f(z) = max(0, z)；z = 0 处取导数0
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReLU;

impl TraitActivation for ReLU {
    fn name(&self) -> &'static str {
        "relu"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        z.mapv(|x| x.max(0.0))
    }

    fn derivative(&self, z: &Matrix, _a: &Matrix) -> Matrix {
        z.mapv(|x| if x > 0.0 { 1.0 } else { 0.0 })
    }
}

/// f(z) = z if z > 0, else negative_slope * z
///
/// 当 negative_slope = 0 时，等价于标准 ReLU
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeakyReLU {
    negative_slope: f32,
}

impl LeakyReLU {
    pub const DEFAULT_SLOPE: f32 = 0.01;

    pub fn new(negative_slope: f32) -> Result<Self, NetError> {
        check_hyper_parameter(
            "LeakyReLU的negative_slope",
            negative_slope,
            ComparisonOperator::GreaterOrEqual,
            0.0,
        )?;
        Ok(Self { negative_slope })
    }

    pub const fn negative_slope(&self) -> f32 {
        self.negative_slope
    }
}

impl Default for LeakyReLU {
    fn default() -> Self {
        Self {
            negative_slope: Self::DEFAULT_SLOPE,
        }
    }
}

impl TraitActivation for LeakyReLU {
    fn name(&self) -> &'static str {
        "leaky_relu"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        let slope = self.negative_slope;
        z.mapv(|x| if x > 0.0 { x } else { slope * x })
    }

    fn derivative(&self, z: &Matrix, _a: &Matrix) -> Matrix {
        let slope = self.negative_slope;
        z.mapv(|x| if x > 0.0 { 1.0 } else { slope })
    }
}

/// f'(z) = 1 - a²
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tanh;

impl TraitActivation for Tanh {
    fn name(&self) -> &'static str {
        "tanh"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        z.mapv(f32::tanh)
    }

    fn derivative(&self, _z: &Matrix, a: &Matrix) -> Matrix {
        a.mapv(|y| 1.0 - y * y)
    }
}

/// 按列（每个样本）计算 softmax：a_i = exp(z_i - max) / Σ exp(z_j - max)
///
/// 雅可比矩阵不是对角阵，`derivative`只给出其对角线 a_i(1 - a_i)；
/// 完整的链式法则在`backprop`中实现。与交叉熵搭配时由损失函数直接给出 A - Y。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Softmax;

impl TraitActivation for Softmax {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn forward(&self, z: &Matrix) -> Matrix {
        let mut a = z.clone();
        for mut column in a.axis_iter_mut(Axis(1)) {
            let max_val = column.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
            column.mapv_inplace(|x| (x - max_val).exp());
            let sum_exp = column.sum();
            column.mapv_inplace(|x| x / sum_exp);
        }
        a
    }

    fn derivative(&self, _z: &Matrix, a: &Matrix) -> Matrix {
        a.mapv(|y| y * (1.0 - y))
    }

    // ∂L/∂z_i = a_i * (g_i - Σ_k g_k a_k)
    fn backprop(&self, _z: &Matrix, a: &Matrix, upstream: &Matrix) -> Matrix {
        let weighted = (upstream * a).sum_axis(Axis(0)).insert_axis(Axis(0));
        a * &(upstream - &weighted)
    }
}
