// ==========================================
// CTF 管理系统 - 命令解析
// ==========================================
// 来源: 命令行参数，或批处理文件中以 ';' 分隔的一行
// 职责: 参数个数与整数解析校验，失败时不调用核心
// ==========================================

use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// 命令行参数（每次调用恰好一个动作）
#[derive(Parser, Debug)]
#[command(
    name = "ctf-manager",
    version,
    about = "CTF 小组与参赛记录管理",
    after_help = "批处理文件: 每行一条命令，字段以 ';' 分隔，空行与 '#' 开头的行被忽略"
)]
pub struct CommandArgs {
    /// 新建小组
    #[arg(short = 'g', value_name = "DESCRIPTION")]
    pub create_group: Option<String>,

    /// 新建参赛记录并重算小组最佳成绩: <groupId> <score> [<ctfId>]
    #[arg(
        short = 'p',
        num_args = 2..=3,
        value_names = ["GROUP_ID", "SCORE", "CTF_ID"],
        allow_negative_numbers = true
    )]
    pub create_participation: Option<Vec<i64>>,

    /// 删除小组及其全部参赛记录
    #[arg(short = 't', value_name = "GROUP_ID")]
    pub delete_group: Option<i64>,

    /// 删除参赛记录并重算小组最佳成绩: <participationId> <groupId>
    #[arg(short = 'e', num_args = 2, value_names = ["PARTICIPATION_ID", "GROUP_ID"])]
    pub delete_participation: Option<Vec<i64>>,

    /// 显示指定小组（缺省时显示全部小组）及其参赛记录
    #[arg(short = 'l', num_args = 0..=1, value_name = "GROUP_ID")]
    pub list_groups: Option<Option<i64>>,

    /// 按得分从高到低显示全部参赛记录
    #[arg(short = 'c')]
    pub list_participations: bool,

    /// 导出各 CTF 排名（缺省使用配置的导出文件）
    #[arg(short = 'x', num_args = 0..=1, value_name = "PATH")]
    pub export: Option<Option<PathBuf>>,

    /// 执行批处理文件（缺省使用配置的批处理文件）
    #[arg(short = 'f', num_args = 0..=1, value_name = "PATH")]
    pub batch_file: Option<Option<PathBuf>>,
}

/// 已校验的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateGroup {
        description: String,
    },
    CreateParticipation {
        group_id: i64,
        score: i64,
        event_id: Option<i64>,
    },
    DeleteGroup {
        group_id: i64,
    },
    DeleteParticipation {
        participation_id: i64,
        group_id: i64,
    },
    ListGroups {
        group_id: Option<i64>,
    },
    ListParticipations,
    Export {
        path: Option<PathBuf>,
    },
    RunBatch {
        path: Option<PathBuf>,
    },
}

#[derive(Error, Debug)]
pub enum CommandError {
    /// -h / --version 等请求，内容为渲染好的文本
    #[error("{0}")]
    Help(String),

    #[error("参数错误: {0}")]
    Usage(String),

    #[error("未指定任何命令")]
    MissingAction,

    #[error("一次只能执行一个命令，收到: {0}")]
    MultipleActions(String),
}

impl CommandError {
    pub fn is_help(&self) -> bool {
        matches!(self, CommandError::Help(_))
    }
}

/// 渲染帮助文本
pub fn help_text() -> String {
    CommandArgs::command().render_help().to_string()
}

/// 解析一组参数（不含程序名）
pub fn parse_command<I, T>(tokens: I) -> Result<Command, CommandError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv = std::iter::once(OsString::from("ctf-manager"))
        .chain(tokens.into_iter().map(Into::into));

    let args = CommandArgs::try_parse_from(argv).map_err(|err| match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
            CommandError::Help(err.render().to_string())
        }
        _ => CommandError::Usage(err.render().to_string().trim().to_string()),
    })?;

    args.into_command()
}

/// 解析批处理文件中的一行（调用方已过滤空行与注释）
pub fn parse_batch_line(line: &str) -> Result<Command, CommandError> {
    parse_command(line.split(';').map(str::trim).filter(|t| !t.is_empty()))
}

impl CommandArgs {
    fn into_command(self) -> Result<Command, CommandError> {
        let mut commands = Vec::new();

        if let Some(description) = self.create_group {
            commands.push(("-g", Command::CreateGroup { description }));
        }
        if let Some(values) = self.create_participation {
            commands.push((
                "-p",
                Command::CreateParticipation {
                    group_id: values[0],
                    score: values[1],
                    event_id: values.get(2).copied(),
                },
            ));
        }
        if let Some(group_id) = self.delete_group {
            commands.push(("-t", Command::DeleteGroup { group_id }));
        }
        if let Some(values) = self.delete_participation {
            commands.push((
                "-e",
                Command::DeleteParticipation {
                    participation_id: values[0],
                    group_id: values[1],
                },
            ));
        }
        if let Some(group_id) = self.list_groups {
            commands.push(("-l", Command::ListGroups { group_id }));
        }
        if self.list_participations {
            commands.push(("-c", Command::ListParticipations));
        }
        if let Some(path) = self.export {
            commands.push(("-x", Command::Export { path }));
        }
        if let Some(path) = self.batch_file {
            commands.push(("-f", Command::RunBatch { path }));
        }

        match commands.len() {
            0 => Err(CommandError::MissingAction),
            1 => Ok(commands.remove(0).1),
            _ => Err(CommandError::MultipleActions(
                commands
                    .iter()
                    .map(|(flag, _)| *flag)
                    .collect::<Vec<_>>()
                    .join(" "),
            )),
        }
    }
}
