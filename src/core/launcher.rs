use crate::core::{Console, ExitReport, Launch};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

pub struct LaunchEngine<L: Launch, C: Console> {
    session: L,
    console: C,
    title: String,
    monitor: ResourceMonitor,
}

impl<L: Launch, C: Console> LaunchEngine<L, C> {
    pub fn new(session: L, console: C, title: impl Into<String>) -> Self {
        Self {
            session,
            console,
            title: title.into(),
            monitor: ResourceMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(
        session: L,
        console: C,
        title: impl Into<String>,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            session,
            console,
            title: title.into(),
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<ExitReport> {
        self.console.line(&self.title);

        // Resolve
        let base = self.session.resolve().await?;
        tracing::debug!("Base directory resolved to: {}", base.display());

        // Activate
        self.console.line("Activating virtual environment...");
        let context = match self.session.activate(&base).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!("Activation failed: {}", e);
                self.console.blank();
                self.console
                    .line("ERROR: Failed to activate the virtual environment.");
                self.console.line(
                    "Please make sure the virtual environment exists and is configured correctly.",
                );
                self.acknowledge().await;
                return Err(e);
            }
        };
        tracing::debug!(
            "Virtual environment ready at: {}",
            context.venv_dir.display()
        );
        self.monitor.log_phase("Activation");

        // Serve
        self.console.line("Starting server...");
        let outcome = self.session.serve(&base, &context).await;
        match &outcome {
            Ok(report) => tracing::info!("Server {}", report.summary()),
            Err(e) => tracing::error!("Server failed to start: {}", e),
        }
        self.monitor.log_phase("Server stopped");

        // Termination report: printed exactly once, whatever happened above
        self.console.blank();
        self.console
            .line("The server has stopped or encountered an error.");
        self.acknowledge().await;

        self.monitor.log_summary();
        outcome
    }

    // 確認失敗時不可蓋掉原本要回傳的結果
    async fn acknowledge(&self) {
        if let Err(e) = self.console.pause().await {
            tracing::warn!("Could not wait for operator acknowledgment: {}", e);
        }
    }
}
