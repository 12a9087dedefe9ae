use clap::Parser;
use venv_launchpad::utils::{logger, validation::Validate};
use venv_launchpad::{CliConfig, LaunchEngine, LaunchSession, StdConsole};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting venv-launchpad CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    // 建立主控台與啟動會話
    let console = StdConsole::new(!config.no_pause);
    let title = config.title.clone();
    let session = LaunchSession::new(config);

    let engine = LaunchEngine::new_with_monitoring(session, console, title, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Launcher finished; server {}", report.summary());
            tracing::info!("⏱️ Server uptime: {}s", report.uptime().num_seconds());
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Launch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 活化失敗沿用 activation 的退出碼，其餘依嚴重程度決定
            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
