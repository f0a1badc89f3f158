// ==========================================
// CTF 管理系统 - 命令行适配层
// ==========================================
// 职责: 解析命令行 / 批处理命令，调用服务层
// 红线: 不直接访问存储
// ==========================================

pub mod command;
pub mod processor;

// 重导出
pub use command::{help_text, parse_batch_line, parse_command, Command, CommandError};
pub use processor::{BatchSummary, CommandProcessor};
