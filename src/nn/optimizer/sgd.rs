/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 梯度下降优化器实现
 */

use ndarray::{ArrayViewD, ArrayViewMutD};

use super::base::{Optimizer, OptimizerState, ParamId, check_grad_shape};
use crate::errors::NetError;

/// SGD (随机梯度下降) 优化器：θ = θ - α * ∇θ
#[derive(Debug, Clone, Default)]
pub struct SGD {
    state: OptimizerState,
}

impl SGD {
    /// 创建新的SGD优化器，学习率须大于0
    pub fn new(learning_rate: f32) -> Result<Self, NetError> {
        let state = OptimizerState::new(learning_rate)?;
        Ok(Self { state })
    }
}

impl Optimizer for SGD {
    fn name(&self) -> &'static str {
        "sgd"
    }

    fn update(
        &mut self,
        id: ParamId,
        mut param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError> {
        check_grad_shape(id, &param, &grad)?;
        param.scaled_add(-self.state.learning_rate(), &grad);
        Ok(())
    }

    // 无累积状态
    fn reset(&mut self) {}

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        self.state.set_learning_rate(lr)
    }
}
