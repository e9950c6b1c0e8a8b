/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 训练循环（fit）
 *                 终止条件：跑满`epochs`个epoch，或某个epoch结束后 Σ(‖dW‖ + ‖db‖) < tolerance，先到者为准
 */

use log::{debug, info, warn};
use ndarray::Axis;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::network::Network;
use crate::errors::NetError;
use crate::tensor::Matrix;

/// 训练配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub epochs: usize,
    /// 为`Some`时覆盖优化器当前的学习率
    pub learning_rate: Option<f32>,
    /// 梯度范数低于该值即视为收敛；为0时只按epoch数终止
    pub tolerance: f32,
    /// 为`None`时每个epoch用全部样本做一次更新
    pub batch_size: Option<usize>,
    /// 每个epoch开始前是否打乱样本顺序
    pub shuffle: bool,
    /// 损失出现NaN/Inf时是否中止训练并返回`NumericInstability`
    pub check_finite: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            learning_rate: None,
            tolerance: 0.0,
            batch_size: None,
            shuffle: false,
            check_finite: true,
        }
    }
}

/// 训练结果
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    /// 实际跑了多少个epoch
    pub epochs_run: usize,
    /// 是否因梯度范数低于阈值而提前终止
    pub converged: bool,
    /// 每个epoch的平均损失（按样本数加权，取自更新前的前向传播）
    pub losses: Vec<f32>,
}

impl FitReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.losses.last().copied()
    }
}

impl Network {
    /// 以`learning_rate`训练`epochs`个epoch（全批量、不打乱）
    pub fn fit(
        &mut self,
        x: &Matrix,
        y: &Matrix,
        epochs: usize,
        learning_rate: f32,
    ) -> Result<FitReport, NetError> {
        let config = FitConfig {
            epochs,
            learning_rate: Some(learning_rate),
            ..FitConfig::default()
        };
        self.fit_with(x, y, &config)
    }

    /// 按配置训练。`x`为[输入宽度, 样本数]，`y`为[输出宽度, 样本数]
    pub fn fit_with(
        &mut self,
        x: &Matrix,
        y: &Matrix,
        config: &FitConfig,
    ) -> Result<FitReport, NetError> {
        self.ensure_not_empty()?;
        let num_samples = x.ncols();
        if y.ncols() != num_samples {
            return Err(NetError::shape_mismatch(
                &[y.nrows(), num_samples],
                y.shape(),
                "目标值的样本数须与输入一致",
            ));
        }
        if num_samples == 0 {
            return Err(NetError::InvalidOperation("训练数据为空".to_string()));
        }
        if let Some(lr) = config.learning_rate {
            self.optimizer_mut().set_learning_rate(lr)?;
        }
        let batch_size = match config.batch_size {
            Some(0) => {
                return Err(NetError::Configuration("batch_size须大于0".to_string()));
            }
            Some(size) => size.min(num_samples),
            None => num_samples,
        };

        let mut order: Vec<usize> = (0..num_samples).collect();
        let mut losses = Vec::with_capacity(config.epochs);

        for epoch in 1..=config.epochs {
            let epoch_loss = if batch_size == num_samples && !config.shuffle {
                self.train_step(x, y)?
            } else {
                if config.shuffle {
                    order.shuffle(&mut self.rng);
                }
                let mut loss_total = 0.0;
                for chunk in order.chunks(batch_size) {
                    let x_batch = x.select(Axis(1), chunk);
                    let y_batch = y.select(Axis(1), chunk);
                    loss_total += self.train_step(&x_batch, &y_batch)? * chunk.len() as f32;
                }
                loss_total / num_samples as f32
            };
            losses.push(epoch_loss);
            debug!("epoch {epoch}: loss = {epoch_loss:.6}");

            if config.check_finite && !epoch_loss.is_finite() {
                warn!("epoch {epoch}: 损失为{epoch_loss}，训练中止");
                return Err(NetError::NumericInstability {
                    epoch,
                    message: format!("损失为{epoch_loss}，可尝试调小学习率"),
                });
            }

            let grad_norm = self.gradient_norm();
            if grad_norm < config.tolerance {
                info!(
                    "epoch {epoch}: 梯度范数{grad_norm:.3e} < {}，已收敛",
                    config.tolerance
                );
                return Ok(FitReport {
                    epochs_run: epoch,
                    converged: true,
                    losses,
                });
            }
        }

        info!(
            "训练完成：{}个epoch，最终损失{:?}",
            config.epochs,
            losses.last()
        );
        Ok(FitReport {
            epochs_run: config.epochs,
            converged: false,
            losses,
        })
    }
}
