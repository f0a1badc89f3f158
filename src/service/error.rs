// ==========================================
// CTF 管理系统 - 服务层错误类型
// ==========================================
// 职责: 区分前置条件失败与仓储失败，统一生成可读消息
// 策略: 服务层只报告、不向调用方传播
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 服务层错误类型
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 前置条件不满足，操作放弃且不访问存储
    #[error("数据验证失败: {0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("导出文件写入失败: {0}")]
    Export(#[from] std::io::Error),
}

impl ServiceError {
    pub fn group_not_found(group_id: i64) -> Self {
        ServiceError::Validation(format!("小组(id={})不存在", group_id))
    }

    pub fn participation_not_found(participation_id: i64) -> Self {
        ServiceError::Validation(format!("参赛记录(id={})不存在", participation_id))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
