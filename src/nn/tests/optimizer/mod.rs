/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 优化器模块单元测试
 *
 * 测试按功能分组：
 * - sgd: SGD 优化器测试
 * - momentum: Momentum 优化器测试
 * - rms_prop: RMSProp 优化器测试
 * - adam: Adam 优化器测试
 * - ada_grad: AdaGrad 优化器测试
 * - ada_delta: AdaDelta 优化器测试
 * - trait_tests: Optimizer trait 通用行为测试（含 OptimizerConfig）
 */

mod ada_delta;
mod momentum;
mod rms_prop;
mod trait_tests;

use ndarray::Array1;

use crate::nn::Optimizer;
use crate::nn::optimizer::ParamId;

/// 单个参数（视为第0层的权重）
pub(super) fn param(values: &[f32]) -> Array1<f32> {
    Array1::from(values.to_vec())
}

/// 模拟一次`step`：先推进时间步，再更新该参数
pub(super) fn apply(optimizer: &mut dyn Optimizer, value: &mut Array1<f32>, grad: &Array1<f32>) {
    optimizer.begin_step();
    optimizer
        .update(
            ParamId::weights(0),
            value.view_mut().into_dyn(),
            grad.view().into_dyn(),
        )
        .unwrap();
}
