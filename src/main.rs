//! # Market AI 主程序

use clap::Parser;
use market_ai::cli::{self, Cli};
use market_ai::logging::{self, LogComponent, LogStage};
use market_ai::{lerror, linfo};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_optimized_logging(cli.log_level.as_ref());

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "command_start",
        "market-ai 启动",
        command = ?cli.command
    );

    if let Err(e) = cli::run(cli).await {
        lerror!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "command_failed",
            "命令执行失败",
            error = %e
        );
        std::process::exit(1);
    }
}
