// ==========================================
// CTF 管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体
// 红线: 不含数据访问逻辑
// ==========================================

pub mod group;
pub mod participation;

// 重导出核心类型
pub use group::Group;
pub use participation::{EventKey, Participation};
