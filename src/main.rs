// ==========================================
// CTF 管理系统 - 命令行入口
// ==========================================
// 用法: ctf-manager -g <描述> | -p <groupId> <score> [<ctfId>] | ...
// ==========================================

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use ctf_manager::app::AppState;
use ctf_manager::cli::{help_text, CommandProcessor};
use ctf_manager::config::AppConfig;
use ctf_manager::logging;
use ctf_manager::service::{ConsoleReporter, Reporter};

fn main() -> anyhow::Result<ExitCode> {
    // 初始化日志系统
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("{}", help_text());
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!("{} v{}", ctf_manager::APP_NAME, ctf_manager::VERSION);

    let config = AppConfig::load(None).context("加载配置失败")?;
    tracing::debug!(?config, "配置已加载");

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter);
    let state = AppState::new(config, reporter.clone()).context("初始化数据库失败")?;

    let processor = CommandProcessor::new(&state, reporter);
    if processor.process_args(args) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
