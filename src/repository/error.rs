// ==========================================
// CTF 管理系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - 连接类: 存储不可达 / 连接未打开（不重试）
// - 存储类: 已获得连接后读写失败（触发回滚）
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 连接错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("非法状态: {0}")]
    IllegalState(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    // ===== 存储错误 =====
    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),
}

impl RepositoryError {
    /// 是否为连接类错误（存储不可达、连接未打开）
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            RepositoryError::DatabaseConnectionError(_)
                | RepositoryError::IllegalState(_)
                | RepositoryError::LockError(_)
        )
    }

    /// 是否为存储类错误（约束违反、语句错误、提交失败）
    pub fn is_storage(&self) -> bool {
        !self.is_connection()
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let msg = msg.unwrap_or_else(|| code.to_string());
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
