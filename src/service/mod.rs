// ==========================================
// CTF 管理系统 - 服务层
// ==========================================
// 职责: 业务规则编排（存在性校验、最佳参赛记录重算、排名导出）
// 策略: 服务层吸收仓储错误，报告后返回空结果
// ==========================================

pub mod error;
pub mod export;
pub mod group_service;
pub mod participation_service;
pub mod reporter;

// 重导出核心类型
pub use error::{ServiceError, ServiceResult};
pub use export::{render_classification, GroupLookup};
pub use group_service::GroupService;
pub use participation_service::ParticipationService;
pub use reporter::{ConsoleReporter, RecordingReporter, Report, Reporter, TracingReporter};
