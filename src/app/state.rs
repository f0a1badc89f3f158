// ==========================================
// CTF 管理系统 - 应用状态
// ==========================================
// 职责: 组装 事务作用域 → 仓储 → 服务，供命令适配层使用
// ==========================================

use std::fs;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::init_database;
use crate::repository::{
    GroupRepository, GroupRepositoryImpl, ParticipationRepository, ParticipationRepositoryImpl,
    RepositoryError, RepositoryResult, TransactionScope,
};
use crate::service::{GroupService, ParticipationService, Reporter};

/// 应用状态
///
/// 两个仓储共享同一个事务作用域，按调用顺序串行使用
pub struct AppState {
    /// 应用配置
    pub config: AppConfig,

    /// 小组服务
    pub group_service: Arc<GroupService>,

    /// 参赛记录服务
    pub participation_service: Arc<ParticipationService>,
}

impl AppState {
    /// 创建应用状态（确保数据库目录与表结构存在）
    pub fn new(config: AppConfig, reporter: Arc<dyn Reporter>) -> RepositoryResult<Self> {
        let db_path = config.db_path_str();
        tracing::info!(db_path = %db_path, "初始化AppState");

        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
            }
        }
        init_database(&db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let scope = TransactionScope::shared(db_path);
        let group_repo: Arc<dyn GroupRepository> =
            Arc::new(GroupRepositoryImpl::new(scope.clone()));
        let participation_repo: Arc<dyn ParticipationRepository> =
            Arc::new(ParticipationRepositoryImpl::new(scope));

        // ==========================================
        // 初始化Service层
        // ==========================================
        let group_service = Arc::new(GroupService::new(group_repo.clone(), reporter.clone()));
        let participation_service = Arc::new(ParticipationService::new(
            participation_repo,
            group_repo,
            reporter,
        ));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            config,
            group_service,
            participation_service,
        })
    }
}
