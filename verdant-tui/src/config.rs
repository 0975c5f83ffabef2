//! Configuration loading for the Verdant TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use verdant_storage::{InMemorySource, SourceResult};

/// The only supported theme.
pub const THEME_NAME: &str = "verdant";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuiConfig {
    /// Redraw and notification-expiry interval.
    pub tick_rate_ms: u64,
    pub notification_ttl_ms: u64,
    pub log_path: PathBuf,
    /// JSON fixture to serve instead of the built-in data.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or VERDANT_TUI_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl TuiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: TuiConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notification_ttl_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(path) = &self.fixture_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "fixture_path",
                    reason: "must not be empty when present".to_string(),
                });
            }
        }
        if self.theme.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: "must not be empty".to_string(),
            });
        }
        if !self.theme.name.trim().eq_ignore_ascii_case(THEME_NAME) {
            return Err(ConfigError::InvalidValue {
                field: "theme.name",
                reason: format!("only '{}' is supported", THEME_NAME),
            });
        }
        Ok(())
    }

    /// Open the configured fixture file, or the built-in data when none is set.
    pub fn load_source(&self) -> SourceResult<InMemorySource> {
        match &self.fixture_path {
            Some(path) => InMemorySource::from_json_file(path),
            None => InMemorySource::builtin(),
        }
    }

    pub fn notification_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.notification_ttl_ms).unwrap_or(i64::MAX))
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("VERDANT_TUI_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    arg_value("--config").map(PathBuf::from)
}

/// Route path passed with `--open`, if any.
pub fn open_path_from_args() -> Option<String> {
    arg_value("--open")
}

fn arg_value(flag: &str) -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
tick_rate_ms = 250
notification_ttl_ms = 4000
log_path = "verdant-tui.log"

[theme]
name = "verdant"
"#;

    #[test]
    fn parses_minimal_config() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.tick_rate_ms, 250);
        assert!(config.fixture_path.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.notification_ttl(), chrono::Duration::milliseconds(4000));
    }

    #[test]
    fn rejects_unknown_fields() {
        let toml = format!("{SAMPLE}\nrefresh_interval_ms = 10\n");
        assert!(matches!(
            TuiConfig::from_toml(&toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_missing_required_field() {
        let toml = SAMPLE.replace("tick_rate_ms = 250\n", "");
        assert!(TuiConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn reads_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = TuiConfig::from_path(file.path()).unwrap();
        assert_eq!(config.theme.name, "verdant");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TuiConfig::from_path(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn empty_fixture_path_is_invalid() {
        let mut config = TuiConfig::from_toml(SAMPLE).unwrap();
        config.fixture_path = Some(PathBuf::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "fixture_path",
                ..
            })
        ));
    }

    #[test]
    fn builtin_source_is_used_without_fixture_path() {
        let config = TuiConfig::from_toml(SAMPLE).unwrap();
        let source = config.load_source().unwrap();
        assert_eq!(source.data().deliveries.len(), 9);
    }
}
