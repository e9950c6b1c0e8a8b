/*
 * @Author       : 老董
 * @Date         : 2026-03-10
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 分类评估指标
 *                 单行输出按二分类处理（阈值0.5），多行输出按类别（每列取argmax）处理
 */

use ndarray::{ArrayView1, Axis};

use super::network::Network;
use crate::errors::NetError;
use crate::tensor::Matrix;

/// 二分类的判定阈值
pub const BINARY_THRESHOLD: f32 = 0.5;

/// 分类指标。`precision`、`recall`、`specificity`、`f1`仅二分类时给出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationMetrics {
    pub accuracy: f32,
    pub precision: Option<f32>,
    pub recall: Option<f32>,
    pub specificity: Option<f32>,
    pub f1: Option<f32>,
}

/// 二分类的混淆矩阵计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    /// 预测值与目标值都按`BINARY_THRESHOLD`划分正负类
    pub fn from_outputs(predicted: &Matrix, target: &Matrix) -> Result<Self, NetError> {
        check_outputs(predicted, target)?;
        let mut counts = Self::default();
        for (&p, &t) in predicted.iter().zip(target.iter()) {
            match (p >= BINARY_THRESHOLD, t >= BINARY_THRESHOLD) {
                (true, true) => counts.true_positive += 1,
                (false, false) => counts.true_negative += 1,
                (true, false) => counts.false_positive += 1,
                (false, true) => counts.false_negative += 1,
            }
        }
        Ok(counts)
    }

    pub const fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// 分母为0时各比值取0
    pub fn metrics(&self) -> ClassificationMetrics {
        let accuracy = ratio(self.true_positive + self.true_negative, self.total());
        let precision = ratio(self.true_positive, self.true_positive + self.false_positive);
        let recall = ratio(self.true_positive, self.true_positive + self.false_negative);
        let specificity = ratio(self.true_negative, self.true_negative + self.false_positive);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassificationMetrics {
            accuracy,
            precision: Some(precision),
            recall: Some(recall),
            specificity: Some(specificity),
            f1: Some(f1),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

fn check_outputs(predicted: &Matrix, target: &Matrix) -> Result<(), NetError> {
    if predicted.dim() != target.dim() {
        return Err(NetError::shape_mismatch(
            predicted.shape(),
            target.shape(),
            "目标值的形状须与网络输出一致",
        ));
    }
    if predicted.ncols() == 0 {
        return Err(NetError::InvalidOperation("评估数据为空".to_string()));
    }
    Ok(())
}

// 多个最大值时取第一个
fn argmax(column: ArrayView1<'_, f32>) -> usize {
    column
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_value), (i, &v)| {
            if v > best_value { (i, v) } else { (best, best_value) }
        })
        .0
}

/// 二分类指标：输出与目标均为[1, batch]
pub fn binary_metrics(
    predicted: &Matrix,
    target: &Matrix,
) -> Result<ClassificationMetrics, NetError> {
    if predicted.nrows() != 1 {
        return Err(NetError::shape_mismatch(
            &[1, predicted.ncols()],
            predicted.shape(),
            "二分类的输出须为单行",
        ));
    }
    Ok(ConfusionCounts::from_outputs(predicted, target)?.metrics())
}

/// 多分类准确率：输出与目标均为[类别数, batch]，目标为 one-hot，逐列比较 argmax
pub fn categorical_accuracy(predicted: &Matrix, target: &Matrix) -> Result<f32, NetError> {
    check_outputs(predicted, target)?;
    let correct = predicted
        .axis_iter(Axis(1))
        .zip(target.axis_iter(Axis(1)))
        .filter(|(p, t)| argmax(p.view()) == argmax(t.view()))
        .count();
    Ok(ratio(correct, predicted.ncols()))
}

/// 按输出行数自动选择二分类或多分类指标
pub fn classification_metrics(
    predicted: &Matrix,
    target: &Matrix,
) -> Result<ClassificationMetrics, NetError> {
    if predicted.nrows() == 1 {
        binary_metrics(predicted, target)
    } else {
        Ok(ClassificationMetrics {
            accuracy: categorical_accuracy(predicted, target)?,
            precision: None,
            recall: None,
            specificity: None,
            f1: None,
        })
    }
}

impl Network {
    /// 在给定数据上推理并计算分类指标，不更新参数
    pub fn evaluate_metrics(
        &self,
        input: &Matrix,
        target: &Matrix,
    ) -> Result<ClassificationMetrics, NetError> {
        let output = self.predict(input)?;
        classification_metrics(&output, target)
    }
}
