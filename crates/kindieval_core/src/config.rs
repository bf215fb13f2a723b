//! Runtime configuration for the tracker core.
//!
//! # Responsibility
//! - Describe logging, storage and summary-provider settings.
//! - Load them from a JSON file, defaulting every missing field.
//!
//! # Invariants
//! - A missing config file yields [`CoreConfig::default`].
//! - A loaded config has passed [`CoreConfig::validate`].

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_SUMMARY_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_SUMMARY_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file. `None` keeps everything in memory.
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout handed to the HTTP client.
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: DEFAULT_SUMMARY_MODEL.to_string(),
            base_url: DEFAULT_SUMMARY_BASE_URL.to_string(),
            timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub summary: SummaryConfig,
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.summary.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "summary.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.summary.model.trim().is_empty() {
            return Err(ConfigError::Invalid("summary.model must not be blank".to_string()));
        }
        if self.summary.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "summary.base_url must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads config from `path`, or defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<CoreConfig, ConfigError> {
    let path = path.as_ref();
    let config = match std::fs::read(path) {
        Ok(bytes) if bytes.is_empty() => CoreConfig::default(),
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => CoreConfig::default(),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, CoreConfig};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(!config.summary.enabled);
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kindieval.json");
        std::fs::write(
            &path,
            r#"{"summary": {"enabled": true, "api_key": "k"}, "logging": {"level": "warn"}}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(config.summary.enabled);
        assert_eq!(config.summary.api_key.as_deref(), Some("k"));
        assert_eq!(config.summary.model, "gemini-3-flash-preview");
        assert_eq!(config.summary.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn zero_timeout_and_bad_json_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");

        std::fs::write(&path, r#"{"summary": {"timeout_secs": 0}}"#).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
    }
}
