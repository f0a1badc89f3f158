// ==========================================
// CTF 管理系统 - 应用层
// ==========================================
// 职责: 组装服务，连接命令行适配层与核心
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
