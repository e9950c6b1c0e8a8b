/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : AdaGrad优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD, Zip};

use super::base::{
    MomentSlots, Optimizer, OptimizerState, ParamId, check_epsilon, check_grad_shape,
};
use crate::errors::NetError;

/// AdaGrad 优化器：累积全部历史梯度的平方，逐元素缩放步长
///
/// - G = G + g²
/// - θ = θ - α * g / √(G + ε)
#[derive(Debug, Clone)]
pub struct AdaGrad {
    state: OptimizerState,
    epsilon: f32,
    /// 梯度平方和
    g2_sum: MomentSlots,
}

impl AdaGrad {
    pub const DEFAULT_EPSILON: f32 = 1e-8;

    pub fn new(learning_rate: f32, epsilon: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        check_epsilon(epsilon)?;
        Ok(Self {
            state,
            epsilon,
            g2_sum: MomentSlots::default(),
        })
    }

    /// 使用默认参数（ε = 1e-8）创建
    pub fn new_default(learning_rate: f32) -> Result<Self, NetError> {
        Self::new(learning_rate, Self::DEFAULT_EPSILON)
    }
}

impl Optimizer for AdaGrad {
    fn name(&self) -> &'static str {
        "adagrad"
    }

    fn update(
        &mut self,
        id: ParamId,
        param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        let (epsilon, lr) = (self.epsilon, self.state.learning_rate());
        let g2_sum = self.g2_sum.get_or_zeros(id, &grad)?;

        Zip::from(param)
            .and(g2_sum)
            .and(&grad)
            .for_each(|p, acc, &g| {
                *acc += g * g;
                *p -= lr * g / (*acc + epsilon).sqrt();
            });
        Ok(())
    }

    fn reset(&mut self) {
        self.g2_sum.clear();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
