// ==========================================
// CTF 管理系统 - 命令执行
// ==========================================
// 职责: 将已校验的命令分派到服务层并输出结果
// 约定: 参赛记录写入后立即重算所属小组的最佳成绩
// ==========================================

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::app::AppState;
use crate::cli::command::{parse_batch_line, parse_command, Command, CommandError};
use crate::domain::{Group, Participation};
use crate::service::{GroupLookup, Reporter};

/// 批处理执行统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub executed: usize, // 已分派执行的命令数
    pub failed: usize,   // 已执行但失败的命令数（包含在 executed 中）
    pub rejected: usize, // 解析失败或被拒绝的行数
}

impl BatchSummary {
    /// 所有行均被接受且执行成功
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.rejected == 0
    }
}

// ==========================================
// CommandProcessor - 命令处理器
// ==========================================
pub struct CommandProcessor<'a> {
    state: &'a AppState,
    reporter: Arc<dyn Reporter>,
}

impl<'a> CommandProcessor<'a> {
    pub fn new(state: &'a AppState, reporter: Arc<dyn Reporter>) -> Self {
        Self { state, reporter }
    }

    /// 解析并执行一组命令行参数
    ///
    /// # 返回
    /// - true: 命令已执行
    /// - false: 参数错误（已报告，核心未被调用）
    pub fn process_args<I, T>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match parse_command(tokens) {
            Ok(command) => self.execute(command),
            Err(err) => {
                self.report_parse_error(&err);
                err.is_help()
            }
        }
    }

    /// 执行已校验的命令
    pub fn execute(&self, command: Command) -> bool {
        tracing::debug!(?command, "执行命令");
        match command {
            Command::CreateGroup { description } => {
                self.state.group_service.create_group(&description).is_some()
            }
            Command::CreateParticipation {
                group_id,
                score,
                event_id,
            } => self.create_participation(group_id, score, event_id),
            Command::DeleteGroup { group_id } => self
                .state
                .group_service
                .delete_group_with_participations(group_id),
            Command::DeleteParticipation {
                participation_id,
                group_id,
            } => self.delete_participation(participation_id, group_id),
            Command::ListGroups { group_id } => self.list_groups(group_id),
            Command::ListParticipations => {
                self.list_participations();
                true
            }
            Command::Export { path } => {
                let destination = path.unwrap_or_else(|| self.state.config.export_file_path.clone());
                self.state
                    .participation_service
                    .export_classification(self.state.group_service.as_ref(), &destination)
            }
            Command::RunBatch { path } => {
                let path = path.unwrap_or_else(|| self.state.config.batch_file_path.clone());
                self.process_batch_file(&path)
                    .map_or(false, |summary| summary.is_clean())
            }
        }
    }

    /// 执行批处理文件
    ///
    /// 空行与 '#' 开头的行被跳过；不允许嵌套 -f。
    pub fn process_batch_file(&self, path: &Path) -> Option<BatchSummary> {
        tracing::info!(path = %path.display(), "处理批处理文件");
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "读取批处理文件失败");
                self.reporter
                    .error(&format!("无法读取批处理文件 {}: {}", path.display(), e));
                return None;
            }
        };
        Some(self.process_batch(&content))
    }

    /// 执行批处理文本
    pub fn process_batch(&self, content: &str) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line_no = index + 1;
            match parse_batch_line(line) {
                Ok(Command::RunBatch { .. }) => {
                    self.reporter
                        .error(&format!("第{}行: 批处理文件中不允许嵌套 -f", line_no));
                    summary.rejected += 1;
                }
                Ok(command) => {
                    summary.executed += 1;
                    if !self.execute(command) {
                        summary.failed += 1;
                    }
                }
                Err(err) => {
                    self.reporter.error(&format!("第{}行: {}", line_no, err));
                    summary.rejected += 1;
                }
            }
        }

        tracing::info!(
            executed = summary.executed,
            failed = summary.failed,
            rejected = summary.rejected,
            "批处理完成"
        );
        summary
    }

    fn create_participation(&self, group_id: i64, score: i64, event_id: Option<i64>) -> bool {
        let service = &self.state.participation_service;
        let created = match event_id {
            Some(event_id) => service.create_event_participation(event_id, group_id, score),
            None => service.create_participation(group_id, score),
        };

        created.is_some() && self.state.group_service.update_best_participation(group_id)
    }

    fn delete_participation(&self, participation_id: i64, group_id: i64) -> bool {
        if let Some(existing) = self
            .state
            .participation_service
            .get_participation_by_id(participation_id)
        {
            if existing.group_id != group_id {
                self.reporter.error(&format!(
                    "参赛记录(id={})不属于小组(id={})",
                    participation_id, group_id
                ));
                return false;
            }
        }

        self.state
            .participation_service
            .delete_participation(participation_id)
            && self.state.group_service.update_best_participation(group_id)
    }

    fn list_groups(&self, group_id: Option<i64>) -> bool {
        let groups = match group_id {
            Some(id) => match self.state.group_service.get_group_by_id(id) {
                Some(group) => vec![group],
                None => {
                    self.reporter.error(&format!("小组(id={})不存在", id));
                    return false;
                }
            },
            None => self.state.group_service.get_all_groups(),
        };

        if groups.is_empty() {
            self.reporter.info("暂无小组");
        }
        for group in &groups {
            self.reporter.info(&format_group(group));
            for p in self
                .state
                .participation_service
                .get_participations_by_group(group.group_id)
            {
                self.reporter.info(&format!("  {}", format_participation(&p)));
            }
        }
        true
    }

    fn list_participations(&self) {
        let mut participations = self.state.participation_service.get_all_participations();
        if participations.is_empty() {
            self.reporter.info("暂无参赛记录");
            return;
        }

        participations.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.participation_id.cmp(&b.participation_id))
        });
        for p in &participations {
            let name = self
                .state
                .group_service
                .group_description(p.group_id)
                .unwrap_or_else(|| "未知".to_string());
            self.reporter.info(&format!(
                "参赛记录: {}, CTF: {}, 小组: {}, 得分: {}",
                p.participation_id,
                p.event_key(),
                name,
                p.score
            ));
        }
    }

    fn report_parse_error(&self, err: &CommandError) {
        match err {
            CommandError::Help(text) => self.reporter.info(text),
            other => {
                tracing::warn!(error = %other, "命令解析失败");
                self.reporter.error(&other.to_string());
            }
        }
    }
}

fn format_group(group: &Group) -> String {
    format!(
        "小组: {}, 描述: {}, 最佳参赛记录: {}",
        group.group_id,
        group.description,
        group
            .best_participation_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    )
}

fn format_participation(p: &Participation) -> String {
    format!(
        "参赛记录: {}, CTF: {}, 得分: {}",
        p.participation_id,
        p.event_key(),
        p.score
    )
}

