use crate::core::Console;
use crate::utils::error::Result;
use tokio::io::AsyncReadExt;

/// Terminal adapter for the console port: lines go to stdout, pauses block on
/// a single byte from stdin. Non-interactive mode skips the pauses entirely.
#[derive(Debug, Clone)]
pub struct StdConsole {
    interactive: bool,
}

impl StdConsole {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl Console for StdConsole {
    fn line(&self, text: &str) {
        println!("{}", text);
    }

    fn blank(&self) {
        println!();
    }

    fn pause(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        let interactive = self.interactive;
        async move {
            if !interactive {
                return Ok(());
            }

            println!("Press any key to exit...");

            // 任何輸入（或 stdin 關閉）都視為操作者已確認
            let mut buffer = [0u8; 1];
            let _ = tokio::io::stdin().read(&mut buffer).await?;
            Ok(())
        }
    }
}
