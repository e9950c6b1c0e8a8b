/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : AdaDelta优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD, Zip};

use super::base::{
    MomentSlots, Optimizer, OptimizerState, ParamId, check_decay_rate, check_epsilon,
    check_grad_shape,
};
use crate::errors::NetError;

/// AdaDelta 优化器
///
/// - E[g²] = ρ * E[g²] + (1 - ρ) * g²
/// - Δ = √(E[Δ²] + ε) / √(E[g²] + ε) * g
/// - E[Δ²] = ρ * E[Δ²] + (1 - ρ) * Δ²
/// - θ = θ - α * Δ
///
/// 步长主要由两个滑动平均之比决定，学习率α只作整体缩放，通常取1
#[derive(Debug, Clone)]
pub struct AdaDelta {
    state: OptimizerState,
    rho: f32,
    epsilon: f32,
    /// 梯度平方的滑动平均 E[g²]
    avg_sq_grad: MomentSlots,
    /// 更新量平方的滑动平均 E[Δ²]
    avg_sq_delta: MomentSlots,
}

impl AdaDelta {
    pub const DEFAULT_LEARNING_RATE: f32 = 1.0;
    pub const DEFAULT_RHO: f32 = 0.95;
    pub const DEFAULT_EPSILON: f32 = 1e-6;

    /// 创建新的AdaDelta优化器，`rho`须在[0, 1)内
    pub fn new(learning_rate: f32, rho: f32, epsilon: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        check_decay_rate("rho", rho)?;
        check_epsilon(epsilon)?;
        Ok(Self {
            state,
            rho,
            epsilon,
            avg_sq_grad: MomentSlots::default(),
            avg_sq_delta: MomentSlots::default(),
        })
    }

    /// 使用默认参数（ρ = 0.95，ε = 1e-6）创建
    pub fn new_default(learning_rate: f32) -> Result<Self, NetError> {
        Self::new(learning_rate, Self::DEFAULT_RHO, Self::DEFAULT_EPSILON)
    }

    pub const fn rho(&self) -> f32 {
        self.rho
    }
}

impl Optimizer for AdaDelta {
    fn name(&self) -> &'static str {
        "adadelta"
    }

    fn update(
        &mut self,
        id: ParamId,
        param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        let (rho, epsilon, lr) = (self.rho, self.epsilon, self.state.learning_rate());
        let avg_sq_grad = self.avg_sq_grad.get_or_zeros(id, &grad)?;
        let avg_sq_delta = self.avg_sq_delta.get_or_zeros(id, &grad)?;

        Zip::from(param)
            .and(avg_sq_grad)
            .and(avg_sq_delta)
            .and(&grad)
            .for_each(|p, eg, ed, &g| {
                *eg = rho * *eg + (1.0 - rho) * g * g;
                let delta = (*ed + epsilon).sqrt() / (*eg + epsilon).sqrt() * g;
                *ed = rho * *ed + (1.0 - rho) * delta * delta;
                *p -= lr * delta;
            });
        Ok(())
    }

    fn reset(&mut self) {
        self.avg_sq_grad.clear();
        self.avg_sq_delta.clear();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
