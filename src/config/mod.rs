use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

pub const CONFIG_DIR_ENV: &str = "STEPPER_CORE_CONFIG_DIR";
const APP_DIR: &str = "stepper_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// User preferences for the shell and the simulated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default = "Config::default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_delay_ms: Self::default_submit_delay_ms(),
            submit_timeout_ms: Self::default_submit_timeout_ms(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_submit_delay_ms() -> u64 {
        1800
    }

    pub fn default_submit_timeout_ms() -> u64 {
        10_000
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "submit_delay_ms" => self.submit_delay_ms = value.parse().map_err(|_| invalid())?,
            "submit_timeout_ms" => {
                let timeout: u64 = value.parse().map_err(|_| invalid())?;
                if timeout == 0 {
                    return Err(invalid());
                }
                self.submit_timeout_ms = timeout;
            }
            "ui_color_enabled" => self.ui_color_enabled = parse_flag(value).ok_or_else(invalid)?,
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("submit_delay_ms", self.submit_delay_ms.to_string()),
            ("submit_timeout_ms", self.submit_timeout_ms.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
        ]
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Loads and stores [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Resolves `<config dir>/stepper_core/config.json`, honouring
    /// `STEPPER_CORE_CONFIG_DIR`.
    pub fn new() -> Result<Self, ConfigError> {
        let base = match env::var_os(CONFIG_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(APP_DIR),
        };
        Self::with_base_dir(base)
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            config_path: base.join(CONFIG_FILE),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            debug!(path = %self.config_path.display(), "no config file; using defaults");
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_simulated_backend() {
        let config = Config::default();
        assert_eq!(config.submit_delay(), Duration::from_millis(1800));
        assert_eq!(config.submit_timeout(), Duration::from_secs(10));
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn set_parses_typed_values() {
        let mut config = Config::default();
        config.set("submit_delay_ms", "250").expect("numeric delay");
        config.set("ui_color_enabled", "off").expect("flag");
        assert_eq!(config.submit_delay_ms, 250);
        assert!(!config.ui_color_enabled);

        assert!(matches!(
            config.set("submit_timeout_ms", "0"),
            Err(ConfigError::InvalidSetting { .. })
        ));
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("currency", "USD").is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn entries_list_every_setting() {
        let keys: Vec<_> = Config::default()
            .entries()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec!["submit_delay_ms", "submit_timeout_ms", "ui_color_enabled"]);
    }

    #[test]
    fn tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path(Path::new("/x/config.json")),
            PathBuf::from("/x/config.json.tmp")
        );
    }
}
