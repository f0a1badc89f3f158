// ==========================================
// CTF 管理系统 - 应用配置
// ==========================================
// 职责: 数据库 / 批处理文件 / 导出文件路径
// 优先级: 环境变量 > 配置文件(JSON) > 默认值(用户数据目录)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 环境变量名
pub mod env_keys {
    pub const CONFIG_FILE: &str = "CTF_MANAGER_CONFIG";
    pub const DB_PATH: &str = "CTF_MANAGER_DB_PATH";
    pub const BATCH_FILE: &str = "CTF_MANAGER_BATCH_FILE";
    pub const EXPORT_FILE: &str = "CTF_MANAGER_EXPORT_FILE";
}

/// 用户数据目录下的应用子目录名
pub const APP_DIR_NAME: &str = "ctf-manager";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,          // SQLite 数据库文件
    pub batch_file_path: PathBuf,  // 默认批处理命令文件
    pub export_file_path: PathBuf, // 默认排名导出文件
}

impl Default for AppConfig {
    fn default() -> Self {
        let base = default_data_dir();
        Self {
            db_path: base.join("ctf_manager.db"),
            batch_file_path: base.join("batch_file.txt"),
            export_file_path: base.join("clasificacion_ctfs.txt"),
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// # 参数
    /// - config_file: 显式指定的配置文件；为 None 时读取 CTF_MANAGER_CONFIG
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env_file = std::env::var(env_keys::CONFIG_FILE)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let base = match config_file.map(Path::to_path_buf).or(env_file) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// 从 JSON 文件读取（缺省字段取默认值）
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), "已加载配置文件");
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 应用覆写（空值忽略）
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        if let Some(path) = value(env_keys::DB_PATH) {
            self.db_path = path;
        }
        if let Some(path) = value(env_keys::BATCH_FILE) {
            self.batch_file_path = path;
        }
        if let Some(path) = value(env_keys::EXPORT_FILE) {
            self.export_file_path = path;
        }
        self
    }

    pub fn db_path_str(&self) -> String {
        self.db_path.to_string_lossy().into_owned()
    }
}

/// 默认数据目录：用户数据目录/ctf-manager，取不到时使用当前目录
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
