use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Virtual environment activation failed: {reason}")]
    ActivationError { reason: String, code: i32 },

    #[error("Failed to start server process: {reason}")]
    SpawnError { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Environment,
    Process,
    System,
}

impl LaunchError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LaunchError::IoError(_) => ErrorSeverity::Critical,
            LaunchError::ConfigParseError(_)
            | LaunchError::ConfigError { .. }
            | LaunchError::ValidationError { .. }
            | LaunchError::MissingConfigError { .. }
            | LaunchError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            LaunchError::ActivationError { .. } => ErrorSeverity::Critical,
            LaunchError::SpawnError { .. } => ErrorSeverity::High,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LaunchError::ConfigParseError(_)
            | LaunchError::ConfigError { .. }
            | LaunchError::ValidationError { .. }
            | LaunchError::MissingConfigError { .. }
            | LaunchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            LaunchError::ActivationError { .. } => ErrorCategory::Environment,
            LaunchError::SpawnError { .. } => ErrorCategory::Process,
            LaunchError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LaunchError::IoError(_) => {
                "Check filesystem permissions and free disk space".to_string()
            }
            LaunchError::ConfigParseError(_) => {
                "Check the profile file for TOML syntax errors".to_string()
            }
            LaunchError::ConfigError { .. }
            | LaunchError::ValidationError { .. }
            | LaunchError::MissingConfigError { .. }
            | LaunchError::InvalidConfigValueError { .. } => {
                "Review the launcher options and correct the reported field".to_string()
            }
            LaunchError::ActivationError { .. } => {
                "Recreate the virtual environment (python -m venv venv) and reinstall dependencies"
                    .to_string()
            }
            LaunchError::SpawnError { .. } => {
                "Verify the entry point path and that the interpreter is executable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LaunchError::IoError(e) => format!("File system operation failed: {}", e),
            LaunchError::ConfigParseError(e) => format!("The profile file could not be read: {}", e),
            LaunchError::ConfigError { message } => format!("Configuration problem: {}", message),
            LaunchError::ValidationError { message } => {
                format!("Configuration problem: {}", message)
            }
            LaunchError::MissingConfigError { field } => {
                format!("The required setting '{}' was not provided", field)
            }
            LaunchError::InvalidConfigValueError { field, reason, .. } => {
                format!("The setting '{}' is invalid: {}", field, reason)
            }
            LaunchError::ActivationError { reason, .. } => {
                format!("The virtual environment could not be activated: {}", reason)
            }
            LaunchError::SpawnError { reason } => {
                format!("The server process could not be started: {}", reason)
            }
        }
    }

    /// 活化失敗時沿用 activation 自身的退出碼，其餘依嚴重程度對應
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::ActivationError { code, .. } => *code,
            _ => match self.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
