pub mod grid;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("格子尺寸非法: {0}，要求为不小于 {min} 的有限值", min = grid::MIN_GRID_SIZE)]
    InvalidGridSize(f64),

    #[error("尺寸范围非法: [{min}, {max}]，要求 {floor} <= min <= max", floor = grid::MIN_GRID_SIZE)]
    InvalidSizeRange { min: f64, max: f64 },

    #[error("物理参数非法: {field} = {value}")]
    InvalidPhysics { field: &'static str, value: f64 },
}
