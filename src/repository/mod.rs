// ==========================================
// CTF 管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 约束: 所有读写经由 TransactionScope，失败即回滚
// ==========================================

pub mod error;
pub mod group_repo;
pub mod participation_repo;
pub mod transaction;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use group_repo::{GroupRepository, GroupRepositoryImpl};
pub use participation_repo::{ParticipationRepository, ParticipationRepositoryImpl};
pub use transaction::{run_in_scope, SharedScope, TransactionScope};
