/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 优化器基础trait和辅助结构
 */

use std::collections::HashMap;
use std::fmt::Debug;

use ndarray::{ArrayD, ArrayViewD, ArrayViewMutD};

use crate::errors::{ComparisonOperator, NetError, check_hyper_parameter};
use crate::nn::layer::Dense;

/// 参数种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Weights,
    Bias,
}

/// 参数标识：第几层的哪个参数。优化器按它保存各参数的累积状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId {
    pub layer: usize,
    pub kind: ParamKind,
}

impl ParamId {
    pub const fn weights(layer: usize) -> Self {
        Self {
            layer,
            kind: ParamKind::Weights,
        }
    }

    pub const fn bias(layer: usize) -> Self {
        Self {
            layer,
            kind: ParamKind::Bias,
        }
    }
}

/// 优化器核心 trait
pub trait Optimizer: Debug {
    fn name(&self) -> &'static str;

    /// 用各层已算好的梯度（dW, db）更新各层参数，不做 forward/backward
    ///
    /// 训练循环：
    /// ```ignore
    /// network.forward(&x)?;
    /// network.backward(&y)?;
    /// optimizer.step(network.layers_mut())?; // ← 只更新参数
    /// ```
    fn step(&mut self, layers: &mut [Dense]) -> Result<(), NetError> {
        self.begin_step();
        for (index, layer) in layers.iter_mut().enumerate() {
            let (weights, weight_grad, bias, bias_grad) = layer.parameters_and_grads_mut();
            self.update(
                ParamId::weights(index),
                weights.view_mut().into_dyn(),
                weight_grad.view().into_dyn(),
            )?;
            self.update(
                ParamId::bias(index),
                bias.view_mut().into_dyn(),
                bias_grad.view().into_dyn(),
            )?;
        }
        Ok(())
    }

    /// 每次`step`开始时调用一次（Adam 在此推进时间步）。
    /// 单独调用`update`时须自行先调用它
    fn begin_step(&mut self) {}

    /// 按更新规则原地更新单个参数
    fn update(
        &mut self,
        id: ParamId,
        param: ArrayViewMutD<'_, f32>,
        grad: ArrayViewD<'_, f32>,
    ) -> Result<(), NetError>;

    /// 重置累积状态（动量、二阶矩、时间步）
    fn reset(&mut self);

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率，须大于0，否则返回`Configuration`错误且学习率不变
    fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError>;
}

/// 缺省学习率
pub const DEFAULT_LEARNING_RATE: f32 = 0.01;

/// 优化器状态管理（内部实现，不对外暴露）
#[derive(Debug, Clone)]
pub(crate) struct OptimizerState {
    learning_rate: f32,
}

impl Default for OptimizerState {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

impl OptimizerState {
    pub(crate) fn new(learning_rate: f32) -> Result<Self, NetError> {
        check_learning_rate(learning_rate)?;
        Ok(Self { learning_rate })
    }

    pub(crate) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub(crate) fn set_learning_rate(&mut self, lr: f32) -> Result<(), NetError> {
        check_learning_rate(lr)?;
        self.learning_rate = lr;
        Ok(())
    }
}

/// 每个参数一份的累积量（如动量 v、二阶矩 s），首次使用时按梯度形状置零创建
#[derive(Debug, Clone, Default)]
pub(crate) struct MomentSlots {
    slots: HashMap<ParamId, ArrayD<f32>>,
}

impl MomentSlots {
    pub(crate) fn get_or_zeros(
        &mut self,
        id: ParamId,
        grad: &ArrayViewD<'_, f32>,
    ) -> Result<&mut ArrayD<f32>, NetError> {
        let slot = self
            .slots
            .entry(id)
            .or_insert_with(|| ArrayD::zeros(grad.raw_dim()));
        if slot.shape() != grad.shape() {
            return Err(NetError::shape_mismatch(
                slot.shape(),
                grad.shape(),
                format!("优化器中{id:?}的累积状态与梯度形状不一致"),
            ));
        }
        Ok(slot)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

/// 参数与梯度须同形状
pub(crate) fn check_grad_shape(
    id: ParamId,
    param: &ArrayViewMutD<'_, f32>,
    grad: &ArrayViewD<'_, f32>,
) -> Result<(), NetError> {
    if param.shape() == grad.shape() {
        Ok(())
    } else {
        Err(NetError::shape_mismatch(
            param.shape(),
            grad.shape(),
            format!("{id:?}的梯度须与参数同形状"),
        ))
    }
}

fn check_learning_rate(value: f32) -> Result<(), NetError> {
    check_hyper_parameter("学习率", value, ComparisonOperator::GreaterThan, 0.0)
}

/// 衰减系数须在[0, 1)内
pub(crate) fn check_decay_rate(name: &str, value: f32) -> Result<(), NetError> {
    check_hyper_parameter(name, value, ComparisonOperator::GreaterOrEqual, 0.0)?;
    check_hyper_parameter(name, value, ComparisonOperator::LessThan, 1.0)
}

pub(crate) fn check_epsilon(value: f32) -> Result<(), NetError> {
    check_hyper_parameter("epsilon", value, ComparisonOperator::GreaterThan, 0.0)
}
