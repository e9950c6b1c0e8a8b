/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-02
 * @Description  : 全crate共用的错误类型
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug)]
pub enum NetError {
    // 层的输入/输出、参数与梯度等形状不一致
    #[error("形状不一致：预期{expected:?}，实际为{got:?}（{message}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    // 梯度爆炸等导致损失出现NaN/Inf
    #[error("第{epoch}个epoch出现数值不稳定：{message}")]
    NumericInstability { epoch: usize, message: String },

    // 激活函数、损失函数、优化器名称或超参数配置有误
    #[error("配置错误：{0}")]
    Configuration(String),

    // 调用顺序有误，如未前向传播就反向传播
    #[error("非法操作：{0}")]
    InvalidOperation(String),

    #[error("读写文件失败：{0}")]
    Io(#[from] std::io::Error),

    #[error("（反）序列化失败：{0}")]
    Serialization(String),
}

impl NetError {
    /// 构造形状不一致错误的便捷方法
    pub fn shape_mismatch(expected: &[usize], got: &[usize], message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
            message: message.into(),
        }
    }

    /// 超参数不满足`{value_name}{operator}{threshold}`时的配置错误
    pub fn value_must_satisfy(
        value_name: &str,
        operator: ComparisonOperator,
        threshold: f32,
        value: f32,
    ) -> Self {
        Self::Configuration(format!(
            "{value_name}须{operator}{threshold}，实际为{value}"
        ))
    }
}

impl From<serde_json::Error> for NetError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON：{e}"))
    }
}

impl From<bincode::Error> for NetError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(format!("bincode：{e}"))
    }
}

/// 校验超参数`value`满足`value {operator} threshold`
pub(crate) fn check_hyper_parameter(
    value_name: &str,
    value: f32,
    operator: ComparisonOperator,
    threshold: f32,
) -> Result<(), NetError> {
    if operator.holds(value, threshold) {
        Ok(())
    } else {
        Err(NetError::value_must_satisfy(
            value_name, operator, threshold, value,
        ))
    }
}
