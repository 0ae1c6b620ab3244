//! # runtime.json 通用读写
//!
//! 所有需要落盘的偏好都通过此接口按字段合并写入，
//! 避免多处各自读写同一个文件。

use std::path::Path;

use serde_json::Value;

use super::{StorageError, paths};

/// 读取 runtime.json；文件不存在或解析失败时返回空对象
pub fn load() -> Value {
    load_from(&paths::runtime_json_path())
}

pub fn load_field(key: &str) -> Option<Value> {
    load().get(key).cloned()
}

pub fn merge_field(key: &str, value: Value) -> Result<(), StorageError> {
    merge_field_at(&paths::runtime_json_path(), key, value)
}

pub fn load_from(path: &Path) -> Value {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .filter(Value::is_object)
        .unwrap_or_else(|| Value::Object(Default::default()))
}

pub fn save_to(path: &Path, value: &Value) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// 读取 → 插入/替换 key → 写回
pub fn merge_field_at(path: &Path, key: &str, value: Value) -> Result<(), StorageError> {
    let mut root = load_from(path);
    if let Some(obj) = root.as_object_mut() {
        obj.insert(key.to_string(), value);
    }
    save_to(path, &root)
}
