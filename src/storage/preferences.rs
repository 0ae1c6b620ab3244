//! # 界面偏好
//!
//! 持久化到 runtime.json 的 `"grid"` 字段：格子尺寸与模板选择。
//! 平移位置不落盘，每次启动都从配置的初始位置开始。

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StorageError, runtime};
use crate::config::grid::{SizeRange, is_valid_grid_size};

const FIELD: &str = "grid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateChoice {
    #[default]
    Index,
    Palette,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPreferences {
    /// 上次使用的格子尺寸，`None` 表示使用配置默认值
    pub grid_size: Option<f64>,
    pub template: TemplateChoice,
}

impl GridPreferences {
    /// 从 runtime.json 加载，不存在或损坏时返回默认值
    pub fn load() -> Self {
        runtime::load_field(FIELD)
            .map(Self::from_value)
            .unwrap_or_default()
    }

    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|error| {
            warn!(%error, "discarding unreadable grid preferences");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        runtime::merge_field(FIELD, serde_json::to_value(self)?)
    }

    /// 有效的格子尺寸：偏好值落在范围内时采用，否则取默认值
    pub fn resolved_grid_size(&self, default: f64, range: &SizeRange) -> f64 {
        match self.grid_size {
            Some(size) if is_valid_grid_size(size) => range.clamp(size),
            _ => default,
        }
    }
}
