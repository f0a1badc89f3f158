// ==========================================
// CTF 管理系统 - 配置层
// ==========================================
// 职责: 路径类配置（数据库 / 批处理文件 / 导出文件）
// 来源: 默认值 → JSON 配置文件 → 环境变量
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{default_data_dir, env_keys, AppConfig, ConfigError};
