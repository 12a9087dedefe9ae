use crate::domain::model::{ActivationContext, ExitReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait ConfigProvider: Send + Sync {
    fn base_dir(&self) -> Option<&str>;
    fn venv_dir(&self) -> &str;
    fn entry_point(&self) -> &str;
    fn interpreter(&self) -> &str;
    fn server_args(&self) -> &[String];
    fn extra_env(&self) -> Vec<(String, String)>;
    fn title(&self) -> &str;
}

/// Operator-facing console. `pause` blocks until the operator acknowledges,
/// which keeps status and error text visible before the window closes.
pub trait Console: Send + Sync {
    fn line(&self, text: &str);
    fn blank(&self);
    fn pause(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait Launch: Send + Sync {
    async fn resolve(&self) -> Result<PathBuf>;
    async fn activate(&self, base: &Path) -> Result<ActivationContext>;
    async fn serve(&self, base: &Path, context: &ActivationContext) -> Result<ExitReport>;
}
