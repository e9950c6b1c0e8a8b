/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 动量优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD};

use super::base::{
    MomentSlots, Optimizer, OptimizerState, ParamId, check_decay_rate, check_grad_shape,
};
use crate::errors::NetError;

/// Momentum 优化器（指数滑动平均形式）
///
/// - v = γ * v + (1 - γ) * g
/// - θ = θ - α * v
#[derive(Debug, Clone)]
pub struct Momentum {
    state: OptimizerState,
    momentum: f32,
    /// 速度（梯度的滑动平均）
    velocity: MomentSlots,
}

impl Momentum {
    pub const DEFAULT_MOMENTUM: f32 = 0.9;

    /// 创建新的Momentum优化器，`momentum`须在[0, 1)内
    pub fn new(learning_rate: f32, momentum: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        check_decay_rate("momentum", momentum)?;
        Ok(Self {
            state,
            momentum,
            velocity: MomentSlots::default(),
        })
    }

    /// 使用默认参数（γ = 0.9）创建
    pub fn new_default(learning_rate: f32) -> Result<Self, NetError> {
        Self::new(learning_rate, Self::DEFAULT_MOMENTUM)
    }

    pub const fn momentum(&self) -> f32 {
        self.momentum
    }

    /// 已创建累积状态的参数个数
    pub fn num_states(&self) -> usize {
        self.velocity.len()
    }
}

impl Optimizer for Momentum {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn update(
        &mut self,
        id: ParamId,
        mut param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        let gamma = self.momentum;
        let v = self.velocity.get_or_zeros(id, &grad)?;

        // 原地更新: v = γ * v + (1 - γ) * g
        v.mapv_inplace(|x| gamma * x);
        v.scaled_add(1.0 - gamma, &grad);

        param.scaled_add(-self.state.learning_rate(), &*v);
        Ok(())
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
