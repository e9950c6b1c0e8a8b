/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : RMSProp优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD, Zip};

use super::base::{
    MomentSlots, Optimizer, OptimizerState, ParamId, check_decay_rate, check_epsilon,
    check_grad_shape,
};
use crate::errors::NetError;

/// RMSProp 优化器
///
/// - s = β * s + (1 - β) * g²
/// - θ = θ - α * g / √(s + ε)
#[derive(Debug, Clone)]
pub struct RMSProp {
    state: OptimizerState,
    beta: f32,
    epsilon: f32,
    /// 二阶矩估计
    s: MomentSlots,
}

impl RMSProp {
    pub const DEFAULT_BETA: f32 = 0.9;
    pub const DEFAULT_EPSILON: f32 = 1e-8;

    pub fn new(learning_rate: f32, beta: f32, epsilon: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        check_decay_rate("beta", beta)?;
        check_epsilon(epsilon)?;
        Ok(Self {
            state,
            beta,
            epsilon,
            s: MomentSlots::default(),
        })
    }

    /// 使用默认参数（β = 0.9，ε = 1e-8）创建
    pub fn new_default(learning_rate: f32) -> Result<Self, NetError> {
        Self::new(learning_rate, Self::DEFAULT_BETA, Self::DEFAULT_EPSILON)
    }
}

impl Optimizer for RMSProp {
    fn name(&self) -> &'static str {
        "rmsprop"
    }

    fn update(
        &mut self,
        id: ParamId,
        param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        let (beta, epsilon, lr) = (self.beta, self.epsilon, self.state.learning_rate());
        let s = self.s.get_or_zeros(id, &grad)?;

        Zip::from(param)
            .and(s)
            .and(&grad)
            .for_each(|p, s, &g| {
                *s = beta * *s + (1.0 - beta) * g * g;
                *p -= lr * g / (*s + epsilon).sqrt();
            });
        Ok(())
    }

    fn reset(&mut self) {
        self.s.clear();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
