use crate::core::{ActivationContext, ConfigProvider, ExitReport, Launch};
use crate::utils::error::{LaunchError, Result};
use async_trait::async_trait;
use chrono::Local;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

fn venv_bin_dir(venv_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_dir.join("Scripts")
    } else {
        venv_dir.join("bin")
    }
}

fn interpreter_file(name: &str) -> String {
    if cfg!(windows) && !name.ends_with(".exe") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

pub struct LaunchSession<C: ConfigProvider> {
    config: C,
}

impl<C: ConfigProvider> LaunchSession<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    fn activation_failure(reason: impl Into<String>, code: i32) -> LaunchError {
        LaunchError::ActivationError {
            reason: reason.into(),
            code,
        }
    }
}

#[async_trait]
impl<C: ConfigProvider> Launch for LaunchSession<C> {
    async fn resolve(&self) -> Result<PathBuf> {
        if let Some(base) = self.config.base_dir() {
            let canonical =
                PathBuf::from(base)
                    .canonicalize()
                    .map_err(|e| LaunchError::ConfigError {
                        message: format!("Base directory '{}' is not accessible: {}", base, e),
                    })?;
            return Ok(canonical);
        }

        // 未指定時以 Launcher 執行檔所在目錄為準，與呼叫端的工作目錄無關
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| LaunchError::ConfigError {
            message: "Launcher executable has no parent directory".to_string(),
        })?;
        Ok(dir.to_path_buf())
    }

    async fn activate(&self, base: &Path) -> Result<ActivationContext> {
        let venv_dir = base.join(self.config.venv_dir());
        if !venv_dir.is_dir() {
            return Err(Self::activation_failure(
                format!("virtual environment not found at {}", venv_dir.display()),
                1,
            ));
        }

        if !venv_dir.join("pyvenv.cfg").is_file() {
            tracing::warn!(
                "No pyvenv.cfg found in {}; the environment may be incomplete",
                venv_dir.display()
            );
        }

        let bin_dir = venv_bin_dir(&venv_dir);
        let interpreter = bin_dir.join(interpreter_file(self.config.interpreter()));
        if !interpreter.is_file() {
            return Err(Self::activation_failure(
                format!("interpreter not found at {}", interpreter.display()),
                1,
            ));
        }

        // 啟動一次直譯器確認環境可用；非零退出碼照原樣往外帶
        let probe = Command::new(&interpreter)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match probe {
            Ok(status) if status.success() => {}
            Ok(status) => {
                return Err(Self::activation_failure(
                    format!("interpreter probe exited with {}", status),
                    status.code().unwrap_or(1),
                ));
            }
            Err(e) => {
                return Err(Self::activation_failure(
                    format!("interpreter could not be started: {}", e),
                    1,
                ));
            }
        }

        let mut vars = HashMap::new();
        vars.insert(
            "VIRTUAL_ENV".to_string(),
            venv_dir.to_string_lossy().into_owned(),
        );

        let inherited_path = std::env::var_os("PATH").unwrap_or_default();
        let new_path = std::env::join_paths(
            std::iter::once(bin_dir.clone()).chain(std::env::split_paths(&inherited_path)),
        )
        .map_err(|e| LaunchError::ConfigError {
            message: format!("Could not rebuild PATH for the virtual environment: {}", e),
        })?;
        vars.insert("PATH".to_string(), new_path.to_string_lossy().into_owned());

        for (name, value) in self.config.extra_env() {
            vars.insert(name, value);
        }

        Ok(ActivationContext {
            venv_dir,
            bin_dir,
            interpreter,
            vars,
            removed_vars: vec!["PYTHONHOME".to_string()],
        })
    }

    async fn serve(&self, base: &Path, context: &ActivationContext) -> Result<ExitReport> {
        let entry = base.join(self.config.entry_point());

        let mut command = Command::new(&context.interpreter);
        command
            .arg(&entry)
            .args(self.config.server_args())
            .current_dir(base)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        context.apply_to(&mut command);

        let started_at = Local::now();
        let mut child = command.spawn().map_err(|e| LaunchError::SpawnError {
            reason: format!("could not start '{}': {}", entry.display(), e),
        })?;
        tracing::debug!("Server process started (pid {:?})", child.id());

        let status = child.wait().await?;
        let finished_at = Local::now();

        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal: Option<i32> = None;

        Ok(ExitReport {
            exit_code: status.code(),
            signal,
            started_at,
            finished_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct MockConfig {
        base_dir: Option<String>,
        venv_dir: String,
        entry_point: String,
        interpreter: String,
        server_args: Vec<String>,
        extra_env: Vec<(String, String)>,
    }

    impl MockConfig {
        fn new(base_dir: &Path) -> Self {
            Self {
                base_dir: Some(base_dir.to_string_lossy().into_owned()),
                venv_dir: "venv".to_string(),
                entry_point: "app.py".to_string(),
                interpreter: "python".to_string(),
                server_args: vec![],
                extra_env: vec![],
            }
        }
    }

    impl ConfigProvider for MockConfig {
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
            self.extra_env.clone()
        }

        fn title(&self) -> &str {
            "Test Server"
        }
    }

    #[cfg(unix)]
    fn write_executable(path: &Path, contents: &str) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, contents).unwrap();
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }

    // 假的 venv：bin/python 是 shell script，probe 依參數決定退出碼，
    // 其餘情況把入口腳本交給 /bin/sh 執行
    #[cfg(unix)]
    fn write_stub_venv(base: &Path, probe_exit: i32) {
        let venv = base.join("venv");
        let bin = venv.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\nversion = 3.11.0\n").unwrap();
        write_executable(
            &bin.join("python"),
            &format!(
                "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  exit {}\nfi\nexec /bin/sh \"$@\"\n",
                probe_exit
            ),
        );
    }

    #[cfg(unix)]
    fn write_entry(base: &Path, body: &str) {
        std::fs::write(base.join("app.py"), format!("#!/bin/sh\n{}\n", body)).unwrap();
    }

    #[tokio::test]
    async fn test_resolve_prefers_configured_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let resolved = session.resolve().await.unwrap();

        assert_eq!(resolved, temp_dir.path().canonicalize().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_fails_for_missing_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");
        let session = LaunchSession::new(MockConfig::new(&missing));

        let err = session.resolve().await.unwrap_err();

        assert!(matches!(err, LaunchError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn test_activate_fails_without_venv() {
        let temp_dir = TempDir::new().unwrap();
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let err = session.activate(temp_dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            LaunchError::ActivationError { code: 1, .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_activate_fails_without_interpreter() {
        let temp_dir = TempDir::new().unwrap();
        let venv = temp_dir.path().join("venv");
        std::fs::create_dir_all(venv.join("bin")).unwrap();
        std::fs::write(venv.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let err = session.activate(temp_dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            LaunchError::ActivationError { code: 1, .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_activate_propagates_probe_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 7);
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let err = session.activate(temp_dir.path()).await.unwrap_err();

        assert!(matches!(
            err,
            LaunchError::ActivationError { code: 7, .. }
        ));
        assert_eq!(err.exit_code(), 7);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_activate_builds_context() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        let mut config = MockConfig::new(temp_dir.path());
        config.extra_env = vec![("EXTRA_TOKEN".to_string(), "abc".to_string())];
        let session = LaunchSession::new(config);

        let context = session.activate(temp_dir.path()).await.unwrap();

        let venv_dir = temp_dir.path().join("venv");
        assert_eq!(
            context.vars.get("VIRTUAL_ENV").unwrap(),
            &venv_dir.to_string_lossy().into_owned()
        );
        let path_var = context.vars.get("PATH").unwrap();
        assert!(path_var.starts_with(&venv_dir.join("bin").to_string_lossy().into_owned()));
        assert_eq!(context.vars.get("EXTRA_TOKEN").unwrap(), "abc");
        assert!(context.removed_vars.contains(&"PYTHONHOME".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_runs_entry_point_once() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        let marker = temp_dir.path().join("marker.txt");
        write_entry(
            temp_dir.path(),
            &format!("echo started >> '{}'", marker.display()),
        );
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let context = session.activate(temp_dir.path()).await.unwrap();
        let report = session.serve(temp_dir.path(), &context).await.unwrap();

        assert!(report.is_clean());
        let contents = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_reports_nonzero_exit() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        write_entry(temp_dir.path(), "exit 3");
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let context = session.activate(temp_dir.path()).await.unwrap();
        let report = session.serve(temp_dir.path(), &context).await.unwrap();

        assert_eq!(report.exit_code, Some(3));
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "exited with code 3");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_reports_signal_termination() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        write_entry(temp_dir.path(), "kill -9 $$");
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let context = session.activate(temp_dir.path()).await.unwrap();
        let report = session.serve(temp_dir.path(), &context).await.unwrap();

        assert_eq!(report.exit_code, None);
        assert_eq!(report.signal, Some(9));
        assert_eq!(report.summary(), "terminated by signal 9");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_passes_activation_context_to_child() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        let out = temp_dir.path().join("env.txt");
        write_entry(
            temp_dir.path(),
            &format!("echo \"$VIRTUAL_ENV\" > '{out}'\necho \"$EXTRA_TOKEN\" >> '{out}'", out = out.display()),
        );
        let mut config = MockConfig::new(temp_dir.path());
        config.extra_env = vec![("EXTRA_TOKEN".to_string(), "abc".to_string())];
        let session = LaunchSession::new(config);

        let context = session.activate(temp_dir.path()).await.unwrap();
        let report = session.serve(temp_dir.path(), &context).await.unwrap();

        assert!(report.is_clean());
        let contents = std::fs::read_to_string(&out).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            temp_dir.path().join("venv").to_string_lossy()
        );
        assert_eq!(lines.next().unwrap(), "abc");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_passes_server_args() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        let out = temp_dir.path().join("args.txt");
        write_entry(temp_dir.path(), &format!("echo \"$@\" > '{}'", out.display()));
        let mut config = MockConfig::new(temp_dir.path());
        config.server_args = vec!["--port".to_string(), "5000".to_string()];
        let session = LaunchSession::new(config);

        let context = session.activate(temp_dir.path()).await.unwrap();
        session.serve(temp_dir.path(), &context).await.unwrap();

        let contents = std::fs::read_to_string(&out).unwrap();
        assert_eq!(contents.trim(), "--port 5000");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_serve_fails_when_interpreter_disappears() {
        let temp_dir = TempDir::new().unwrap();
        write_stub_venv(temp_dir.path(), 0);
        write_entry(temp_dir.path(), "exit 0");
        let session = LaunchSession::new(MockConfig::new(temp_dir.path()));

        let mut context = session.activate(temp_dir.path()).await.unwrap();
        context.interpreter = temp_dir.path().join("venv/bin/gone");
        let err = session
            .serve(temp_dir.path(), &context)
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::SpawnError { .. }));
    }
}
