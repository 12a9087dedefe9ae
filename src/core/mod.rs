pub mod launcher;
pub mod session;

pub use crate::domain::model::{ActivationContext, ExitReport};
pub use crate::domain::ports::{ConfigProvider, Console, Launch};
pub use crate::utils::error::Result;
