use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::process::Command;

/// Environment adjustments for one virtual environment, held as an explicit
/// value instead of being written into the launcher's own process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationContext {
    pub venv_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub interpreter: PathBuf,
    pub vars: HashMap<String, String>,
    pub removed_vars: Vec<String>,
}

impl ActivationContext {
    /// 將環境調整套用到子行程，不觸碰 Launcher 自身的行程狀態
    pub fn apply_to(&self, command: &mut Command) {
        for name in &self.removed_vars {
            command.env_remove(name);
        }
        for (name, value) in &self.vars {
            command.env(name, value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitReport {
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl ExitReport {
    pub fn is_clean(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn uptime(&self) -> chrono::Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }

    pub fn summary(&self) -> String {
        match (self.exit_code, self.signal) {
            (Some(0), _) => "exited normally (code 0)".to_string(),
            (Some(code), _) => format!("exited with code {}", code),
            (None, Some(signal)) => format!("terminated by signal {}", signal),
            (None, None) => "terminated abnormally".to_string(),
        }
    }
}
