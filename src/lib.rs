pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod render;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use cli::Cli;

/// 命令行入口。
///
/// 日志输出到 stderr，级别由环境变量 `ARTICLE_EDITOR_LOG` 控制。
pub async fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("ARTICLE_EDITOR_LOG"))
        .init();

    let cli = Cli::parse();

    match cli::execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
