// ==========================================
// CTF 管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (rusqlite)
// 核心: 事务化数据访问层 + 最佳参赛记录一致性
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体
pub mod domain;

// 数据仓储层 - 事务作用域与数据访问
pub mod repository;

// 服务层 - 业务规则
pub mod service;

// 配置层 - 路径配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 服务组装
pub mod app;

// 命令行适配层
pub mod cli;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{Group, Participation};
pub use repository::{RepositoryError, RepositoryResult, TransactionScope};
pub use service::{GroupService, ParticipationService, ServiceError};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "CTF 管理系统";
