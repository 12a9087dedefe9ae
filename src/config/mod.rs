pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "venv-launchpad")]
#[command(about = "A small launcher for virtual-environment-backed server processes")]
pub struct CliConfig {
    /// Base directory override; defaults to the directory containing the launcher executable
    #[arg(long)]
    pub base_dir: Option<String>,

    #[arg(long, default_value = "venv")]
    pub venv_dir: String,

    #[arg(long, default_value = "app.py")]
    pub entry_point: String,

    #[arg(long, default_value = "python")]
    pub interpreter: String,

    #[arg(long, value_delimiter = ',')]
    pub server_args: Vec<String>,

    /// Extra KEY=VALUE environment entries for the server process
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    #[arg(long, default_value = "Whisper Transcription Server")]
    pub title: String,

    #[arg(long, help = "Skip the press-any-key pauses")]
    pub no_pause: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable resource monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn base_dir(&self) -> Option<&str> {
        self.base_dir.as_deref()
    }

    fn venv_dir(&self) -> &str {
        &self.venv_dir
    }

    fn entry_point(&self) -> &str {
        &self.entry_point
    }

    fn interpreter(&self) -> &str {
        &self.interpreter
    }

    fn server_args(&self) -> &[String] {
        &self.server_args
    }

    fn extra_env(&self) -> Vec<(String, String)> {
        // validate() 已擋下格式錯誤的項目
        self.env
            .iter()
            .filter_map(|pair| validation::validate_env_pair("env", pair).ok())
            .collect()
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("venv_dir", &self.venv_dir)?;
        validation::validate_path("entry_point", &self.entry_point)?;
        validation::validate_non_empty_string("interpreter", &self.interpreter)?;
        validation::validate_non_empty_string("title", &self.title)?;

        if let Some(base_dir) = &self.base_dir {
            validation::validate_path("base_dir", base_dir)?;
        }

        for pair in &self.env {
            validation::validate_env_pair("env", pair)?;
        }

        Ok(())
    }
}
