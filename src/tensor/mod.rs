/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 数值容器与初始化
 *                 网络中所有批数据都按“列为样本”排布：输入形状为[特征数, batch]。
 */

use ndarray::{Array1, Array2, ArrayBase, Data, Dimension};
use rand::Rng;

use crate::errors::{ComparisonOperator, NetError, check_hyper_parameter};

mod save_load;
pub use save_load::{load_parameters, save_parameters};

#[cfg(test)]
mod tests;

/// 二阶张量（矩阵），形状为[行, 列]；作为批数据时每列一个样本
pub type Matrix = Array2<f32>;
/// 一阶张量（向量），如偏置
pub type Vector = Array1<f32>;

/// 创建一个服从正态分布的随机矩阵。
/// `mean`须为有限值，`std_dev`须为非负有限值，否则返回`Configuration`错误
pub fn normal_matrix<R: Rng + ?Sized>(
    mean: f32,
    std_dev: f32,
    shape: (usize, usize),
    rng: &mut R,
) -> Result<Matrix, NetError> {
    if !mean.is_finite() {
        return Err(NetError::Configuration(format!(
            "正态分布的均值须为有限值，实际为{mean}"
        )));
    }
    if !std_dev.is_finite() {
        return Err(NetError::Configuration(format!(
            "正态分布的标准差须为有限值，实际为{std_dev}"
        )));
    }
    check_hyper_parameter(
        "标准差",
        std_dev,
        ComparisonOperator::GreaterOrEqual,
        0.0,
    )?;
    Ok(sample_normal(mean, std_dev, shape, rng))
}

/// Box-Muller变换采样，非有限值（`u1`恰好为0时）会被丢弃重采。
/// 调用方须保证`mean`、`std_dev`为有限值
fn sample_normal<R: Rng + ?Sized>(
    mean: f32,
    std_dev: f32,
    shape: (usize, usize),
    rng: &mut R,
) -> Matrix {
    let data_len = shape.0 * shape.1;
    let mut data = Vec::with_capacity(data_len);

    while data.len() < data_len {
        let u1: f32 = rng.r#gen();
        let u2: f32 = rng.r#gen();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f32::consts::PI * u2;
        let z0 = mean + std_dev * r * theta.cos();
        let z1 = mean + std_dev * r * theta.sin();

        if z0.is_finite() {
            data.push(z0);
        }
        if data.len() < data_len && z1.is_finite() {
            data.push(z1);
        }
    }

    // 元素个数与形状一致，必然成功
    Array2::from_shape_vec(shape, data).unwrap_or_else(|_| Array2::zeros(shape))
}

/// Kaiming/He 初始化：std = sqrt(2/fan_in)
pub fn kaiming_matrix<R: Rng + ?Sized>(fan_out: usize, fan_in: usize, rng: &mut R) -> Matrix {
    let std = (2.0 / fan_in.max(1) as f32).sqrt();
    sample_normal(0.0, std, (fan_out, fan_in), rng)
}

/// 二范数（Frobenius范数）
pub fn l2_norm<S, D>(array: &ArrayBase<S, D>) -> f32
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    array.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// 校验矩阵形状，不一致时返回`ShapeMismatch`
pub fn ensure_shape(
    matrix: &Matrix,
    expected: (usize, usize),
    message: &str,
) -> Result<(), NetError> {
    if matrix.dim() == expected {
        Ok(())
    } else {
        Err(NetError::shape_mismatch(
            &[expected.0, expected.1],
            matrix.shape(),
            message,
        ))
    }
}
