pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::StdConsole, CliConfig};

pub use self::core::{launcher::LaunchEngine, session::LaunchSession};
pub use utils::error::{LaunchError, Result};
