use std::time::Duration;

use stepper_core::config::{Config, ConfigManager};
use stepper_core::errors::ConfigError;
use tempfile::TempDir;

#[test]
fn missing_file_loads_defaults() {
    let temp = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
    let config = manager.load().expect("load");
    assert!(config.ui_color_enabled);
    assert_eq!(config.submit_delay(), Duration::from_millis(1800));
    assert_eq!(config.submit_timeout(), Duration::from_secs(10));
}

#[test]
fn saved_settings_survive_a_reload() {
    let temp = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
    let mut config = Config::default();
    config.set("submit_delay_ms", "0").expect("set delay");
    config.set("ui_color_enabled", "false").expect("set color");
    manager.save(&config).expect("save");

    let reloaded = manager.load().expect("reload");
    assert_eq!(reloaded.submit_delay(), Duration::ZERO);
    assert!(!reloaded.ui_color_enabled);
    assert!(manager.config_path().exists());
}

#[test]
fn bad_values_are_rejected_without_changes() {
    let mut config = Config::default();
    let err = config.set("submit_timeout_ms", "soon").expect_err("invalid");
    assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    assert!(config.set("theme", "dark").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn files_with_retired_keys_still_load() {
    let temp = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
    std::fs::write(
        manager.config_path(),
        r#"{"locale":"es-CL","currency":"CLP","submit_delay_ms":5}"#,
    )
    .expect("write config");
    let config = manager.load().expect("load");
    assert_eq!(config.submit_delay(), Duration::from_millis(5));
}
