/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : Adam优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD, Zip};

use super::base::{
    MomentSlots, Optimizer, OptimizerState, ParamId, check_decay_rate, check_epsilon,
    check_grad_shape,
};
use crate::errors::NetError;

/// Adam优化器
///
/// - v = β1 * v + (1 - β1) * g
/// - s = β2 * s + (1 - β2) * g²
/// - v̂ = v / (1 - β1^t)，ŝ = s / (1 - β2^t)
/// - θ = θ - α * v̂ / √(ŝ + ε)
#[derive(Debug, Clone)]
pub struct Adam {
    state: OptimizerState,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    v: MomentSlots,
    /// 二阶矩估计
    s: MomentSlots,
    /// 时间步，每次`step`加1
    t: u32,
}

impl Adam {
    pub const DEFAULT_BETA1: f32 = 0.9;
    pub const DEFAULT_BETA2: f32 = 0.999;
    pub const DEFAULT_EPSILON: f32 = 1e-8;

    /// 创建新的Adam优化器
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        check_decay_rate("beta1", beta1)?;
        check_decay_rate("beta2", beta2)?;
        check_epsilon(epsilon)?;
        Ok(Self {
            state,
            beta1,
            beta2,
            epsilon,
            v: MomentSlots::default(),
            s: MomentSlots::default(),
            t: 0,
        })
    }

    /// 使用默认参数（β1 = 0.9，β2 = 0.999，ε = 1e-8）创建Adam优化器
    pub fn new_default(learning_rate: f32) -> Result<Self, NetError> {
        Self::new(
            learning_rate,
            Self::DEFAULT_BETA1,
            Self::DEFAULT_BETA2,
            Self::DEFAULT_EPSILON,
        )
    }

    /// 当前时间步
    pub const fn time_step(&self) -> u32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn name(&self) -> &'static str {
        "adam"
    }

    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update(
        &mut self,
        id: ParamId,
        param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        let (beta1, beta2, epsilon) = (self.beta1, self.beta2, self.epsilon);
        let lr = self.state.learning_rate();

        // 未调用 begin_step 时按第1步处理，避免偏差修正除零
        let t = self.t.max(1) as i32;
        let bias_correction1 = 1.0 - beta1.powi(t);
        let bias_correction2 = 1.0 - beta2.powi(t);

        let v = self.v.get_or_zeros(id, &grad)?;
        let s = self.s.get_or_zeros(id, &grad)?;

        Zip::from(param)
            .and(v)
            .and(s)
            .and(&grad)
            .for_each(|p, v, s, &g| {
                *v = beta1 * *v + (1.0 - beta1) * g;
                *s = beta2 * *s + (1.0 - beta2) * g * g;
                let v_hat = *v / bias_correction1;
                let s_hat = *s / bias_correction2;
                *p -= lr * v_hat / (s_hat + epsilon).sqrt();
            });
        Ok(())
    }

    fn reset(&mut self) {
        self.v.clear();
        self.s.clear();
        self.t = 0;
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
