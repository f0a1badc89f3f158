// ==========================================
// CTF 管理系统 - 小组服务
// ==========================================
// 职责: 小组创建 / 删除 / 查询，最佳参赛记录重算
// 策略: 仓储错误在服务边界记录并吸收（报告，不崩溃）
// 红线: best_participation_id 只能经由 update_best_participation 写入
// ==========================================

use std::sync::Arc;

use crate::domain::Group;
use crate::repository::error::RepositoryError;
use crate::repository::GroupRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::export::GroupLookup;
use crate::service::reporter::{absorb, Reporter};

// ==========================================
// GroupService - 小组服务
// ==========================================
pub struct GroupService {
    group_repo: Arc<dyn GroupRepository>,
    reporter: Arc<dyn Reporter>,
}

impl GroupService {
    pub fn new(group_repo: Arc<dyn GroupRepository>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            group_repo,
            reporter,
        }
    }

    /// 新建小组
    ///
    /// # 返回
    /// - Some(group_id): 创建成功
    /// - None: 创建失败（已报告）
    pub fn create_group(&self, description: &str) -> Option<i64> {
        let result = validate_description(description)
            .and_then(|desc| Ok(self.group_repo.create(desc)?));

        let group_id = self.absorb("新建小组", result)?;
        tracing::info!(group_id, "小组已创建");
        self.reporter
            .info(&format!("新小组创建成功 (id={})", group_id));
        Some(group_id)
    }

    /// 修改小组描述（保留当前最佳参赛指针）
    pub fn update_group_description(&self, group_id: i64, description: &str) -> bool {
        let result = validate_description(description).and_then(|desc| {
            let group = self
                .group_repo
                .find_by_id(group_id)?
                .ok_or_else(|| ServiceError::group_not_found(group_id))?;
            let updated = Group {
                description: desc.to_string(),
                ..group
            };
            Ok(self.group_repo.update(&updated)?)
        });

        match self.absorb("更新小组", result) {
            Some(_) => {
                self.reporter
                    .info(&format!("小组(id={})更新成功", group_id));
                true
            }
            None => false,
        }
    }

    /// 删除小组（不级联，仍有参赛记录时外键拒绝并回滚）
    pub fn delete_group(&self, group_id: i64) -> bool {
        let result = self.group_repo.delete(group_id).map_err(|err| match err {
            RepositoryError::ForeignKeyViolation(_) => ServiceError::Validation(format!(
                "小组(id={})仍有参赛记录，无法删除",
                group_id
            )),
            other => other.into(),
        });

        match self.absorb("删除小组", result) {
            Some(affected) => {
                tracing::info!(group_id, affected, "删除小组完成");
                self.reporter
                    .info(&format!("小组(id={})已删除", group_id));
                true
            }
            None => false,
        }
    }

    /// 删除小组及其全部参赛记录（单事务）
    pub fn delete_group_with_participations(&self, group_id: i64) -> bool {
        let result = self
            .group_repo
            .delete_with_participations(group_id)
            .map_err(ServiceError::from);

        match self.absorb("删除小组及参赛记录", result) {
            Some(affected) => {
                tracing::info!(group_id, affected, "删除小组及参赛记录完成");
                self.reporter
                    .info(&format!("小组(id={})及其参赛记录已删除", group_id));
                true
            }
            None => false,
        }
    }

    /// 按 ID 查询小组（失败时返回 None）
    pub fn get_group_by_id(&self, group_id: i64) -> Option<Group> {
        let result = self.group_repo.find_by_id(group_id).map_err(ServiceError::from);
        self.absorb("查询小组", result).flatten()
    }

    /// 查询全部小组（失败时返回空列表）
    pub fn get_all_groups(&self) -> Vec<Group> {
        let result = self.group_repo.find_all().map_err(ServiceError::from);
        self.absorb("查询小组列表", result).unwrap_or_default()
    }

    /// 重算小组的最佳参赛记录
    ///
    /// 每次参赛记录新增 / 修改 / 删除后须由调用方显式调用。
    pub fn update_best_participation(&self, group_id: i64) -> bool {
        let result = self.recompute_best_participation(group_id);

        match self.absorb("更新最佳参赛记录", result) {
            Some(best) => {
                tracing::info!(group_id, best_participation_id = ?best, "最佳参赛记录已更新");
                self.reporter
                    .info(&format!("小组(id={})最佳参赛记录更新完成", group_id));
                true
            }
            None => false,
        }
    }

    fn recompute_best_participation(&self, group_id: i64) -> ServiceResult<Option<i64>> {
        let group = self
            .group_repo
            .find_by_id(group_id)?
            .ok_or_else(|| ServiceError::group_not_found(group_id))?;

        let best = self
            .group_repo
            .find_best_participation(group_id)?
            .map(|p| p.participation_id);

        self.group_repo
            .update(&group.with_best_participation(best))?;
        Ok(best)
    }

    fn absorb<T>(&self, action: &str, result: ServiceResult<T>) -> Option<T> {
        absorb(self.reporter.as_ref(), action, result)
    }
}

impl GroupLookup for GroupService {
    fn group_description(&self, group_id: i64) -> Option<String> {
        self.get_group_by_id(group_id).map(|g| g.description)
    }
}

fn validate_description(description: &str) -> ServiceResult<&str> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("小组描述不能为空".to_string()));
    }
    Ok(trimmed)
}
