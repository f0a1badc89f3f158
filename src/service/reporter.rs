// ==========================================
// CTF 管理系统 - 操作结果报告
// ==========================================
// 职责: 服务层面向用户的消息出口（成功 / 失败）
// 说明: 诊断日志统一走 tracing，Reporter 只承载给用户看的文本
// ==========================================

use std::sync::Mutex;

use crate::service::error::ServiceResult;

/// 用户消息出口
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// 在服务边界吸收错误：记录日志并报告，返回 None
pub(crate) fn absorb<T>(reporter: &dyn Reporter, action: &str, result: ServiceResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            if err.is_validation() {
                tracing::warn!(action, error = %err, "操作被拒绝");
            } else {
                tracing::error!(action, error = %err, "操作失败");
            }
            reporter.error(&format!("{}失败: {}", action, err));
            None
        }
    }
}

// ==========================================
// TracingReporter - 仅写日志
// ==========================================
/// 将用户消息转发为 tracing 事件（库内默认实现）
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!(target: "ctf_manager::report", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "ctf_manager::report", "{}", message);
    }
}

// ==========================================
// ConsoleReporter - 命令行输出
// ==========================================
/// 信息写 stdout，错误写 stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("ERROR: {}", message);
    }
}

// ==========================================
// RecordingReporter - 记录消息（测试 / 嵌入方使用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Info(String),
    Error(String),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .filter_map(|r| match r {
                Report::Error(msg) => Some(msg),
                Report::Info(_) => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.reports()
            .into_iter()
            .filter_map(|r| match r {
                Report::Info(msg) => Some(msg),
                Report::Error(_) => None,
            })
            .collect()
    }

    fn push(&self, report: Report) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report);
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(Report::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Report::Error(message.to_string()));
    }
}
