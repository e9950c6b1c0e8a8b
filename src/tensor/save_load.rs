use std::io::{Read, Write};

use super::{Matrix, Vector};
use crate::errors::NetError;

// 保存和加载各层参数（权重, 偏置）
/// 将各层参数以bincode格式写入`writer`
pub fn save_parameters<W: Write>(
    writer: &mut W,
    parameters: &[(Matrix, Vector)],
) -> Result<(), NetError> {
    let serialized_data = bincode::serialize(parameters)?;
    writer.write_all(&serialized_data)?;
    Ok(())
}

/// 从`reader`读取由[`save_parameters`]写入的各层参数
pub fn load_parameters<R: Read>(reader: &mut R) -> Result<Vec<(Matrix, Vector)>, NetError> {
    let mut serialized_data = Vec::new();
    reader.read_to_end(&mut serialized_data)?;
    let parameters = bincode::deserialize(&serialized_data)?;
    Ok(parameters)
}
