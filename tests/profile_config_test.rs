use tempfile::TempDir;
use venv_launchpad::config::toml_config::TomlConfig;
use venv_launchpad::core::ConfigProvider;
use venv_launchpad::utils::validation::Validate;
use venv_launchpad::LaunchError;

const FULL_PROFILE: &str = r#"
[launcher]
name = "whisper-server"
title = "Whisper Transcription Server"
description = "Local transcription backend"

[environment]
venv_dir = "venv"

[environment.vars]
HUGGING_FACE_HUB_TOKEN = "hf_test"

[server]
entry_point = "app.py"
interpreter = "python3"
args = ["--port", "5000"]

[console]
pause_on_exit = false

[monitoring]
enabled = true
"#;

const MINIMAL_PROFILE: &str = r#"
[launcher]
name = "whisper-server"

[environment]
venv_dir = "venv"

[server]
entry_point = "app.py"
"#;

#[test]
fn test_full_profile_loads_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("launchpad.toml");
    std::fs::write(&path, FULL_PROFILE).unwrap();

    let config = TomlConfig::from_file(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.launcher.name, "whisper-server");
    assert_eq!(config.display_title(), "Whisper Transcription Server");
    assert_eq!(config.interpreter_or_default(), "python3");
    assert!(config.monitoring_enabled());
    assert!(!config.pause_on_exit());

    // ConfigProvider 視角
    assert_eq!(config.venv_dir(), "venv");
    assert_eq!(config.entry_point(), "app.py");
    assert_eq!(config.server_args(), ["--port", "5000"]);
    assert_eq!(
        config.extra_env(),
        vec![(
            "HUGGING_FACE_HUB_TOKEN".to_string(),
            "hf_test".to_string()
        )]
    );
}

#[test]
fn test_minimal_profile_uses_defaults() {
    let config: TomlConfig = toml::from_str(MINIMAL_PROFILE).unwrap();
    config.validate().unwrap();

    assert_eq!(config.display_title(), "Whisper Transcription Server");
    assert_eq!(config.interpreter_or_default(), "python");
    assert!(!config.monitoring_enabled());
    assert!(config.pause_on_exit());
    assert!(config.server_args().is_empty());
    assert!(config.extra_env().is_empty());
    assert_eq!(config.base_dir(), None);
}

#[test]
fn test_missing_profile_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = TomlConfig::from_file(temp_dir.path().join("nope.toml")).unwrap_err();

    assert!(matches!(err, LaunchError::IoError(_)));
}

#[test]
fn test_invalid_toml_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[launcher\nname = ").unwrap();

    let err = TomlConfig::from_file(&path).unwrap_err();

    assert!(matches!(err, LaunchError::ConfigParseError(_)));
}

#[test]
fn test_empty_venv_dir_fails_validation() {
    let profile = MINIMAL_PROFILE.replace("venv_dir = \"venv\"", "venv_dir = \"\"");
    let config: TomlConfig = toml::from_str(&profile).unwrap();

    let err = config.validate().unwrap_err();

    match err {
        LaunchError::InvalidConfigValueError { field, .. } => {
            assert_eq!(field, "environment.venv_dir");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_blank_interpreter_fails_validation() {
    let profile = MINIMAL_PROFILE.replace(
        "entry_point = \"app.py\"",
        "entry_point = \"app.py\"\ninterpreter = \"  \"",
    );
    let config: TomlConfig = toml::from_str(&profile).unwrap();

    let err = config.validate().unwrap_err();

    assert!(matches!(err, LaunchError::InvalidConfigValueError { .. }));
}
