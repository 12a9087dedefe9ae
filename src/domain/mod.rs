pub mod model;
pub mod ports;

pub use model::{ActivationContext, ExitReport};
pub use ports::{ConfigProvider, Console, Launch};
