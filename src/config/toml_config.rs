use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Whisper Transcription Server";
pub const DEFAULT_INTERPRETER: &str = "python";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub launcher: LauncherConfig,
    pub environment: EnvironmentConfig,
    pub server: ServerConfig,
    pub console: Option<ConsoleConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub venv_dir: String,
    pub base_dir: Option<String>,
    pub vars: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub entry_point: String,
    pub interpreter: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub pause_on_exit: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入啟動設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn display_title(&self) -> &str {
        self.launcher.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn interpreter_or_default(&self) -> &str {
        self.server.interpreter.as_deref().unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn pause_on_exit(&self) -> bool {
        self.console
            .as_ref()
            .and_then(|c| c.pause_on_exit)
            .unwrap_or(true)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_dir(&self) -> Option<&str> {
        self.environment.base_dir.as_deref()
    }

    fn venv_dir(&self) -> &str {
        &self.environment.venv_dir
    }

    fn entry_point(&self) -> &str {
        &self.server.entry_point
    }

    fn interpreter(&self) -> &str {
        self.interpreter_or_default()
    }

    fn server_args(&self) -> &[String] {
        self.server.args.as_deref().unwrap_or(&[])
    }

    fn extra_env(&self) -> Vec<(String, String)> {
        self.environment
            .vars
            .as_ref()
            .map(|vars| {
                vars.iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn title(&self) -> &str {
        self.display_title()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("launcher.name", &self.launcher.name)?;
        validation::validate_path("environment.venv_dir", &self.environment.venv_dir)?;
        validation::validate_path("server.entry_point", &self.server.entry_point)?;

        if let Some(title) = &self.launcher.title {
            validation::validate_non_empty_string("launcher.title", title)?;
        }

        if let Some(interpreter) = &self.server.interpreter {
            validation::validate_non_empty_string("server.interpreter", interpreter)?;
        }

        if let Some(base_dir) = &self.environment.base_dir {
            validation::validate_path("environment.base_dir", base_dir)?;
        }

        if let Some(vars) = &self.environment.vars {
            for name in vars.keys() {
                validation::validate_non_empty_string("environment.vars", name)?;
            }
        }

        Ok(())
    }
}
