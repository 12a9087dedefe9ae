use clap::Parser;
use venv_launchpad::config::toml_config::TomlConfig;
use venv_launchpad::core::{ConfigProvider, Launch};
use venv_launchpad::utils::{logger, validation::Validate};
use venv_launchpad::{LaunchEngine, LaunchSession, StdConsole};

#[derive(Parser)]
#[command(name = "toml-launch")]
#[command(about = "Launcher driven by a TOML profile")]
struct Args {
    /// Path to the TOML launch profile
    #[arg(short, long, default_value = "launchpad.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from the profile
    #[arg(long)]
    monitor: Option<bool>,

    /// Skip the press-any-key pauses regardless of the profile
    #[arg(long)]
    no_pause: bool,

    /// Dry run - show what would be launched without launching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting profile-based launcher");
    tracing::info!("📁 Loading profile from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load profile '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Profile validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Profile loaded and validated successfully");

    // 顯示配置摘要
    display_profile_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - The server will not be started");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    // 決定監控與暫停行為
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    let pause_on_exit = !args.no_pause && config.pause_on_exit();
    let console = StdConsole::new(pause_on_exit);
    let title = config.display_title().to_string();
    let session = LaunchSession::new(config);

    let engine = LaunchEngine::new_with_monitoring(session, console, title, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Launcher finished; server {}", report.summary());
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

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_profile_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Launch Profile Summary:");
    println!("  Profile: {}", config.launcher.name);
    if let Some(description) = &config.launcher.description {
        println!("  Description: {}", description);
    }
    println!("  Title: {}", config.display_title());
    println!("  Virtual env: {}", config.environment.venv_dir);
    println!("  Entry point: {}", config.server.entry_point);
    println!("  Interpreter: {}", config.interpreter_or_default());

    if let Some(server_args) = &config.server.args {
        println!("  Server args: {}", server_args.join(" "));
    }

    if let Some(vars) = &config.environment.vars {
        println!("  Extra env vars: {}", vars.len());
    }

    println!("  Pause on exit: {}", config.pause_on_exit());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let session = LaunchSession::new(config.clone());

    // 目錄解析分析
    println!("📂 Base Directory:");
    match session.resolve().await {
        Ok(base) => {
            println!("  Resolved: {}", base.display());

            let venv_dir = base.join(config.venv_dir());
            println!();
            println!("🐍 Virtual Environment:");
            if venv_dir.is_dir() {
                println!("  ✅ Found at: {}", venv_dir.display());
            } else {
                println!("  ❌ Missing at: {}", venv_dir.display());
            }

            let entry = base.join(config.entry_point());
            println!();
            println!("🚪 Entry Point:");
            if entry.is_file() {
                println!("  ✅ Found at: {}", entry.display());
            } else {
                println!("  ❌ Missing at: {}", entry.display());
            }

            println!();
            println!("⚙️ Would run:");
            let mut command_line = vec![
                config.interpreter_or_default().to_string(),
                config.entry_point().to_string(),
            ];
            command_line.extend(config.server_args().iter().cloned());
            println!("  {}", command_line.join(" "));
        }
        Err(e) => {
            println!("  ❌ Could not resolve: {}", e);
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Re-run without --dry-run to start the server.");

    Ok(())
}
