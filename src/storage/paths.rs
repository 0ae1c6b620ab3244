//! # 应用路径管理
//!
//! 应用数据目录为平台数据目录下的 `thiings/`（Linux 上即
//! `~/.local/share/thiings/`），首次使用时自动创建。

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::warn;

/// 全局单例：应用数据根目录
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(|| {
        let dir = resolve_data_dir();
        if let Err(error) = std::fs::create_dir_all(&dir) {
            warn!(path = %dir.display(), %error, "failed to create data dir");
        }
        dir
    })
}

/// runtime.json 的完整路径
pub fn runtime_json_path() -> PathBuf {
    data_dir().join("runtime.json")
}

/// 平台数据目录，取不到时回退到可执行文件旁边
fn resolve_data_dir() -> PathBuf {
    if let Some(base) = dirs::data_dir() {
        return base.join("thiings");
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
