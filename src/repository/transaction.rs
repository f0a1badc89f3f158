// ==========================================
// CTF 管理系统 - 事务作用域
// ==========================================
// 职责: 在一次逻辑操作期间独占一个数据库连接
// 纪律: open → (写入) → commit | rollback，close 总是最后执行
// 约束: 单个作用域同一时刻只持有一个连接，不可并发复用
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 多个仓储共享的事务作用域
pub type SharedScope = Arc<Mutex<TransactionScope>>;

// ==========================================
// TransactionScope - 事务作用域
// ==========================================
/// 事务作用域
///
/// 打开连接后立即 `BEGIN`，写入在显式 commit 前保持暂存；
/// commit / rollback 之后重新 `BEGIN`，使后续写入继续暂存。
pub struct TransactionScope {
    db_path: String,
    conn: Option<Connection>,
}

impl TransactionScope {
    /// 创建事务作用域（不立即打开连接）
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            conn: None,
        }
    }

    /// 创建可在多个仓储间共享的事务作用域
    pub fn shared(db_path: impl Into<String>) -> SharedScope {
        Arc::new(Mutex::new(Self::new(db_path)))
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// 打开连接并关闭自动提交
    ///
    /// # 返回
    /// - Err(DatabaseConnectionError): 存储不可达（不重试）
    /// - Err(IllegalState): 作用域已持有连接
    pub fn open(&mut self) -> RepositoryResult<()> {
        if self.conn.is_some() {
            return Err(RepositoryError::IllegalState(
                "事务作用域已持有打开的连接".to_string(),
            ));
        }

        let conn = open_sqlite_connection(&self.db_path).map_err(|e| {
            tracing::error!(db_path = %self.db_path, error = %e, "连接数据库失败");
            RepositoryError::DatabaseConnectionError(e.to_string())
        })?;
        conn.execute_batch("BEGIN")
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        tracing::trace!(db_path = %self.db_path, "事务作用域已打开");
        self.conn = Some(conn);
        Ok(())
    }

    /// 提交当前连接上的暂存写入
    ///
    /// 提交被拒绝时连接保持打开，由调用方回滚。
    pub fn commit(&mut self) -> RepositoryResult<()> {
        let conn = self.conn.as_ref().ok_or_else(|| {
            RepositoryError::DatabaseConnectionError("没有打开的连接，无法提交".to_string())
        })?;

        conn.execute_batch("COMMIT").map_err(|e| {
            tracing::error!(error = %e, "提交事务失败");
            RepositoryError::DatabaseTransactionError(e.to_string())
        })?;
        conn.execute_batch("BEGIN")
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::trace!("事务已提交");
        Ok(())
    }

    /// 丢弃自上次 open / commit 以来的暂存写入
    ///
    /// 未打开连接时仅记录告警（幂等）。
    pub fn rollback(&mut self) -> RepositoryResult<()> {
        let Some(conn) = self.conn.as_ref() else {
            tracing::warn!("没有打开的连接，忽略回滚");
            return Ok(());
        };

        // 语句失败时 SQLite 可能已自行结束事务
        if !conn.is_autocommit() {
            conn.execute_batch("ROLLBACK").map_err(|e| {
                tracing::error!(error = %e, "回滚事务失败");
                RepositoryError::DatabaseTransactionError(e.to_string())
            })?;
        }
        conn.execute_batch("BEGIN")
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tracing::debug!("事务已回滚");
        Ok(())
    }

    /// 获取当前连接
    pub fn current_connection(&self) -> RepositoryResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| RepositoryError::IllegalState("连接未打开".to_string()))
    }

    /// 释放连接（幂等），未提交的写入被丢弃
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        if !conn.is_autocommit() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "关闭前回滚失败");
            }
        }
        if let Err((_, e)) = conn.close() {
            tracing::warn!(error = %e, "关闭连接失败");
        }
        tracing::trace!(db_path = %self.db_path, "事务作用域已关闭");
    }

    /// 在一个完整的事务作用域内执行操作
    ///
    /// - 成功: open → f → commit
    /// - 失败（含提交失败）: open → f → rollback，错误原样返回
    /// - 任何路径都会 close
    pub fn run<T, F>(&mut self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&Connection) -> RepositoryResult<T>,
    {
        self.open()?;
        let mut guard = CloseOnDrop(self);
        let scope = &mut *guard.0;

        let result = scope.current_connection().and_then(f);
        match result {
            Ok(value) => match scope.commit() {
                Ok(()) => Ok(value),
                Err(err) => {
                    scope.rollback_after(&err);
                    Err(err)
                }
            },
            Err(err) => {
                scope.rollback_after(&err);
                Err(err)
            }
        }
    }

    fn rollback_after(&mut self, cause: &RepositoryError) {
        tracing::warn!(error = %cause, "操作失败，回滚事务");
        if let Err(e) = self.rollback() {
            tracing::error!(error = %e, "回滚失败");
        }
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        self.close();
    }
}

// panic 时同样释放连接
struct CloseOnDrop<'a>(&'a mut TransactionScope);

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// 锁定共享作用域并执行一次完整事务
pub fn run_in_scope<T, F>(scope: &SharedScope, f: F) -> RepositoryResult<T>
where
    F: FnOnce(&Connection) -> RepositoryResult<T>,
{
    let mut guard = scope
        .lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))?;
    guard.run(f)
}
