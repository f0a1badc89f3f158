// ==========================================
// CTF 管理系统 - 参赛记录服务
// ==========================================
// 职责: 参赛记录增删改查（写入前校验小组存在），排名导出
// 约定: 写入后由调用方调用 GroupService::update_best_participation
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::domain::Participation;
use crate::repository::{GroupRepository, ParticipationRepository};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::export::{render_classification, write_export, GroupLookup};
use crate::service::reporter::{absorb, Reporter};

// ==========================================
// ParticipationService - 参赛记录服务
// ==========================================
pub struct ParticipationService {
    participation_repo: Arc<dyn ParticipationRepository>,
    group_repo: Arc<dyn GroupRepository>,
    reporter: Arc<dyn Reporter>,
}

impl ParticipationService {
    pub fn new(
        participation_repo: Arc<dyn ParticipationRepository>,
        group_repo: Arc<dyn GroupRepository>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            participation_repo,
            group_repo,
            reporter,
        }
    }

    /// 新建参赛记录
    ///
    /// 小组不存在时报告验证失败，不写入存储。
    pub fn create_participation(&self, group_id: i64, score: i64) -> Option<i64> {
        let result = self
            .ensure_group_exists(group_id)
            .and_then(|_| Ok(self.participation_repo.create(group_id, score)?));
        self.finish_create(group_id, result)
    }

    /// 新建归属指定 CTF 赛事的参赛记录
    pub fn create_event_participation(
        &self,
        event_id: i64,
        group_id: i64,
        score: i64,
    ) -> Option<i64> {
        let result = self.ensure_group_exists(group_id).and_then(|_| {
            Ok(self
                .participation_repo
                .create_in_event(event_id, group_id, score)?)
        });
        self.finish_create(group_id, result)
    }

    /// 更新参赛记录的所属小组与得分
    ///
    /// # 返回
    /// - Some(previous_group_id): 更新成功，值为更新前的所属小组；
    ///   与 group_id 不同时调用方须同时重算两个小组的最佳参赛记录
    /// - None: 小组或参赛记录不存在，或存储失败（已报告）
    pub fn update_participation(
        &self,
        participation_id: i64,
        group_id: i64,
        new_score: i64,
    ) -> Option<i64> {
        let result = self.ensure_group_exists(group_id).and_then(|_| {
            let existing = self
                .participation_repo
                .find_by_id(participation_id)?
                .ok_or_else(|| ServiceError::participation_not_found(participation_id))?;
            match self
                .participation_repo
                .update(participation_id, group_id, new_score)?
            {
                0 => Err(ServiceError::participation_not_found(participation_id)),
                _ => Ok(existing.group_id),
            }
        });

        let previous_group_id = self.absorb("更新参赛记录", result)?;
        tracing::info!(
            participation_id,
            previous_group_id,
            group_id,
            new_score,
            "参赛记录已更新"
        );
        self.reporter
            .info(&format!("参赛记录(id={})更新成功", participation_id));
        Some(previous_group_id)
    }

    /// 删除参赛记录（不存在时为空操作）
    pub fn delete_participation(&self, participation_id: i64) -> bool {
        let result = self
            .participation_repo
            .delete(participation_id)
            .map_err(ServiceError::from);

        match self.absorb("删除参赛记录", result) {
            Some(affected) => {
                tracing::info!(participation_id, affected, "删除参赛记录完成");
                self.reporter
                    .info(&format!("参赛记录(id={})已删除", participation_id));
                true
            }
            None => false,
        }
    }

    pub fn get_participation_by_id(&self, participation_id: i64) -> Option<Participation> {
        let result = self
            .participation_repo
            .find_by_id(participation_id)
            .map_err(ServiceError::from);
        self.absorb("查询参赛记录", result).flatten()
    }

    pub fn get_all_participations(&self) -> Vec<Participation> {
        let result = self.participation_repo.find_all().map_err(ServiceError::from);
        self.absorb("查询参赛记录列表", result).unwrap_or_default()
    }

    pub fn get_participations_by_group(&self, group_id: i64) -> Vec<Participation> {
        let result = self
            .participation_repo
            .find_by_group(group_id)
            .map_err(ServiceError::from);
        self.absorb("查询小组参赛记录", result).unwrap_or_default()
    }

    /// 导出各 CTF 赛事的排名到文件（先清空原内容）
    ///
    /// 写入失败只报告，不影响调用方。
    pub fn export_classification(&self, groups: &dyn GroupLookup, destination: &Path) -> bool {
        let result = self
            .participation_repo
            .find_all()
            .map_err(ServiceError::from)
            .and_then(|participations| {
                let content = render_classification(&participations, groups);
                write_export(destination, &content)?;
                Ok(participations.len())
            });

        match self.absorb("导出排名", result) {
            Some(rows) => {
                tracing::info!(destination = %destination.display(), rows, "排名已导出");
                self.reporter
                    .info(&format!("排名已导出到 {}", destination.display()));
                true
            }
            None => false,
        }
    }

    fn ensure_group_exists(&self, group_id: i64) -> ServiceResult<()> {
        match self.group_repo.find_by_id(group_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::group_not_found(group_id)),
        }
    }

    fn finish_create(&self, group_id: i64, result: ServiceResult<i64>) -> Option<i64> {
        let participation_id = self.absorb("新建参赛记录", result)?;
        tracing::info!(participation_id, group_id, "参赛记录已创建");
        self.reporter
            .info(&format!("新参赛记录创建成功 (id={})", participation_id));
        Some(participation_id)
    }

    fn absorb<T>(&self, action: &str, result: ServiceResult<T>) -> Option<T> {
        absorb(self.reporter.as_ref(), action, result)
    }
}
