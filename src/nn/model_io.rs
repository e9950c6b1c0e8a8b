/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-10
 * @Description  : 模型 I/O（save_model/load_model）
 *
 * 完整模型 = 结构 JSON（`NetworkDescriptor`） + 参数 bin（魔数 + 版本 + bincode 编码的各层 (W, b)）
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use super::descriptor::NetworkDescriptor;
use super::network::Network;
use crate::errors::NetError;
use crate::tensor::{load_parameters, save_parameters};

impl Network {
    /// 参数文件魔数
    const PARAMS_MAGIC: &'static [u8; 4] = b"OMLP";
    /// 参数文件版本
    const PARAMS_VERSION: u32 = 1;

    /// 保存所有层的参数到二进制文件
    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), NetError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        writer.write_all(Self::PARAMS_MAGIC)?;
        writer.write_all(&Self::PARAMS_VERSION.to_le_bytes())?;

        let parameters: Vec<_> = self
            .layers()
            .iter()
            .map(|layer| (layer.weights().clone(), layer.bias().clone()))
            .collect();
        save_parameters(&mut writer, &parameters)?;
        writer.flush()?;

        debug!("已保存参数：{}", path.as_ref().display());
        Ok(())
    }

    /// 从二进制文件加载参数到当前网络，层数与各参数形状须与当前网络一致。
    /// 加载失败时网络参数保持不变
    pub fn load_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), NetError> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != Self::PARAMS_MAGIC {
            return Err(NetError::Serialization(
                "参数文件魔数不符，不是本crate保存的参数文件".to_string(),
            ));
        }
        let mut version = [0u8; 4];
        reader.read_exact(&mut version)?;
        let version = u32::from_le_bytes(version);
        if version != Self::PARAMS_VERSION {
            return Err(NetError::Serialization(format!(
                "不支持的参数文件版本：{version}"
            )));
        }

        let parameters = load_parameters(&mut reader)?;
        if parameters.len() != self.layers().len() {
            return Err(NetError::shape_mismatch(
                &[self.layers().len()],
                &[parameters.len()],
                "参数文件中的层数与网络不一致",
            ));
        }
        // 先整体校验，任何一层不符都不改动网络
        for (layer, (weights, bias)) in self.layers().iter().zip(&parameters) {
            layer.check_parameter_shapes(weights, bias)?;
        }
        for (layer, (weights, bias)) in self.layers_mut().iter_mut().zip(parameters) {
            layer.set_parameters(weights, bias)?;
        }

        debug!("已加载参数：{}", path.as_ref().display());
        Ok(())
    }

    /// 保存完整模型（结构 JSON + 参数 bin）
    ///
    /// 自动生成两个文件：
    /// - `{path}.json`: 网络结构描述（可读）
    /// - `{path}.bin`: 参数数据（紧凑）
    ///
    /// # 示例
    /// ```ignore
    /// network.save_model("models/xor")?;
    /// // 生成：models/xor.json + models/xor.bin
    /// ```
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), NetError> {
        let path = path.as_ref();
        let json_path = path.with_extension("json");
        let bin_path = path.with_extension("bin");

        // 1. 保存参数到 bin 文件
        self.save_params(&bin_path)?;

        // 2. 生成描述符并设置 params_file
        let mut descriptor = self.describe();
        descriptor.params_file = Some(bin_path.file_name().map_or_else(
            || "params.bin".to_string(),
            |s| s.to_string_lossy().to_string(),
        ));

        // 3. 保存 JSON
        std::fs::write(&json_path, descriptor.to_json()?)?;
        debug!("已保存模型结构：{}", json_path.display());
        Ok(())
    }

    /// 加载完整模型：按 JSON 重建网络结构，再加载参数。
    /// 优化器为默认的SGD，如需其它优化器请在加载后设置
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, NetError> {
        let path = path.as_ref();
        let json_path = path.with_extension("json");

        // 1. 读取并解析 JSON
        let json = std::fs::read_to_string(&json_path)?;
        let descriptor = NetworkDescriptor::from_json(&json)?;

        // 2. 重建网络结构
        let mut network = Self::from_descriptor(&descriptor, None)?;

        // 3. 确定参数文件路径并加载参数
        let bin_path = if let Some(ref params_file) = descriptor.params_file {
            path.parent().map_or_else(
                || Path::new(params_file).to_path_buf(),
                |p| p.join(params_file),
            )
        } else {
            path.with_extension("bin")
        };
        network.load_params(&bin_path)?;

        Ok(network)
    }
}
