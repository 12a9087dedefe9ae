use anyhow::Context;
use clap::Parser;
use venv_launchpad::core::Launch;
use venv_launchpad::utils::logger;
use venv_launchpad::{CliConfig, LaunchSession};

/// 不啟動伺服器，逐項檢查啟動環境是否就緒
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    println!("🔍 Checking launcher environment");
    println!();

    let venv_dir_name = config.venv_dir.clone();
    let entry_point = config.entry_point.clone();
    let session = LaunchSession::new(config);

    let mut failures = 0;

    let base = match session.resolve().await {
        Ok(base) => {
            println!("✅ Base directory: {}", base.display());
            base
        }
        Err(e) => {
            println!("❌ Base directory could not be resolved: {}", e);
            std::process::exit(1);
        }
    };

    let venv_dir = base.join(&venv_dir_name);
    if venv_dir.is_dir() {
        println!("✅ Virtual environment directory: {}", venv_dir.display());
    } else {
        println!(
            "❌ Virtual environment directory missing: {}",
            venv_dir.display()
        );
        failures += 1;
    }

    let cfg_path = venv_dir.join("pyvenv.cfg");
    if cfg_path.is_file() {
        let contents = std::fs::read_to_string(&cfg_path)
            .with_context(|| format!("could not read {}", cfg_path.display()))?;
        let entries = contents.lines().filter(|line| line.contains('=')).count();
        println!("✅ pyvenv.cfg present ({} entries)", entries);
    } else {
        println!("⚠️ pyvenv.cfg missing (environment may be incomplete)");
    }

    // 完整的 activation，包含直譯器探測
    match session.activate(&base).await {
        Ok(context) => {
            println!("✅ Interpreter: {}", context.interpreter.display());
            println!(
                "✅ Activation context: {} vars set, {} removed",
                context.vars.len(),
                context.removed_vars.len()
            );
        }
        Err(e) => {
            println!("❌ Activation failed: {}", e);
            failures += 1;
        }
    }

    let entry = base.join(&entry_point);
    if entry.is_file() {
        println!("✅ Entry point: {}", entry.display());
    } else {
        println!("❌ Entry point missing: {}", entry.display());
        failures += 1;
    }

    println!();
    if failures == 0 {
        println!("✅ Environment looks ready. Run venv-launchpad to start the server.");
        Ok(())
    } else {
        println!("❌ {} check(s) failed.", failures);
        std::process::exit(1);
    }
}
