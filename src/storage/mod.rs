pub mod paths;
pub mod preferences;
pub mod runtime;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}
