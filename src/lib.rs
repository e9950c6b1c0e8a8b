//! # Only MLP
//!
//! `only_mlp`是用纯rust实现的一个小型全连接（多层感知机）神经网络库：
//! 按顺序堆叠Dense层，配合常见激活函数、损失函数与优化器（SGD、Momentum、RMSProp、Adam、AdaGrad、AdaDelta），
//! 以“列为样本”的批数据做前向、反向传播与训练。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
