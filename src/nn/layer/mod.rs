/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : Layer 模块
 *                 目前只有全连接层 Dense，批数据按列排布：输入[in, batch]，输出[out, batch]
 */

mod dense;

pub use dense::Dense;

use super::loss::Loss;
use crate::tensor::Matrix;

/// 反向传播时传给某一层的“上游信息”
#[derive(Debug, Clone, Copy)]
pub enum Upstream<'a> {
    /// 隐藏层：后一层传回的 ∂L/∂A，形状[out, batch]
    Gradient(&'a Matrix),
    /// 输出层：由损失函数根据目标值直接给出误差项 ∂L/∂Z
    Target { target: &'a Matrix, loss: &'a Loss },
}
