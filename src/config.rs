//! Report configuration
//!
//! Built once at process entry and handed into the report. Environment
//! variables are the primary interface; a TOML file fills in whatever the
//! environment leaves unset.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ForexError, Result};

/// Environment variable holding the Fixer.io API access key.
pub const ACCESS_KEY_VAR: &str = "FIXER_ACCESS_KEY";

/// Environment variable holding the trailing window length in weeks.
/// The spelling is the deployment contract; fixing it would break every
/// environment already exporting it.
pub const PERIOD_VAR: &str = "HISTORYCAL_LAST_PERIOD_IN_WEEK";

/// Resolved report configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixer.io API access key
    pub access_key: String,
    /// Trailing window length in weeks
    pub period_weeks: u32,
}

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileConfig {
    #[serde(default)]
    access_key: Option<String>,
    #[serde(default)]
    period_weeks: Option<u32>,
}

impl Config {
    /// Resolve from the environment alone.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Resolve from the environment, then from the TOML file at `path`
    /// (or the default location) for anything the environment left unset.
    ///
    /// A file named explicitly must exist; the default one may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = Self::read_file(path)?;
        Self::resolve(env_var(ACCESS_KEY_VAR), env_var(PERIOD_VAR), file)
    }

    /// Default config file location, `~/.forex-report/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".forex-report").join("config.toml"))
    }

    fn read_file(path: Option<&Path>) -> Result<FileConfig> {
        let path = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ForexError::Config(format!(
                        "Config file not found: {}",
                        explicit.display()
                    )));
                }
                explicit.to_path_buf()
            }
            None => match Self::default_path() {
                Some(default) if default.exists() => default,
                _ => return Ok(FileConfig::default()),
            },
        };

        let contents = fs::read_to_string(&path)?;
        toml::from_str(&contents).map_err(|e| {
            ForexError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Environment wins over the file; a value set to garbage fails
    /// instead of silently falling through.
    fn resolve(
        env_access_key: Option<String>,
        env_period: Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let access_key = env_access_key.or(file.access_key).ok_or_else(|| {
            ForexError::Config(format!(
                "{} is not set and no config file supplies access_key",
                ACCESS_KEY_VAR
            ))
        })?;

        let period_weeks = match env_period {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ForexError::Config(format!(
                    "{} must be a non-negative integer, got {:?}",
                    PERIOD_VAR, raw
                ))
            })?,
            None => file.period_weeks.ok_or_else(|| {
                ForexError::Config(format!(
                    "{} is not set and no config file supplies period_weeks",
                    PERIOD_VAR
                ))
            })?,
        };

        Ok(Self {
            access_key,
            period_weeks,
        })
    }
}

/// A set-but-empty variable counts as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(access_key: Option<&str>, period_weeks: Option<u32>) -> FileConfig {
        FileConfig {
            access_key: access_key.map(str::to_string),
            period_weeks,
        }
    }

    #[test]
    fn environment_values_win_over_the_file() {
        let config = Config::resolve(
            Some("env-key".to_string()),
            Some("4".to_string()),
            file(Some("file-key"), Some(9)),
        )
        .unwrap();

        assert_eq!(config.access_key, "env-key");
        assert_eq!(config.period_weeks, 4);
    }

    #[test]
    fn file_fills_what_the_environment_leaves_unset() {
        let config = Config::resolve(None, None, file(Some("file-key"), Some(3))).unwrap();

        assert_eq!(config.access_key, "file-key");
        assert_eq!(config.period_weeks, 3);
    }

    #[test]
    fn missing_access_key_is_a_config_error() {
        let result = Config::resolve(None, Some("2".to_string()), file(None, None));

        match result {
            Err(ForexError::Config(message)) => assert!(message.contains(ACCESS_KEY_VAR)),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn missing_period_is_a_config_error() {
        let result = Config::resolve(Some("k".to_string()), None, file(None, None));

        match result {
            Err(ForexError::Config(message)) => assert!(message.contains(PERIOD_VAR)),
            other => panic!("expected a config error, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_period_fails_instead_of_falling_through() {
        let result = Config::resolve(
            Some("k".to_string()),
            Some("soon".to_string()),
            file(None, Some(2)),
        );

        assert!(matches!(result, Err(ForexError::Config(_))));
    }

    #[test]
    fn negative_period_is_rejected() {
        let result = Config::resolve(Some("k".to_string()), Some("-1".to_string()), file(None, None));

        assert!(matches!(result, Err(ForexError::Config(_))));
    }

    #[test]
    fn period_tolerates_surrounding_whitespace() {
        let config =
            Config::resolve(Some("k".to_string()), Some(" 2 ".to_string()), file(None, None))
                .unwrap();

        assert_eq!(config.period_weeks, 2);
    }

    #[test]
    fn file_config_parses_partial_toml() {
        let parsed: FileConfig = toml::from_str("access_key = \"abc\"").unwrap();
        assert_eq!(parsed.access_key.as_deref(), Some("abc"));
        assert_eq!(parsed.period_weeks, None);
    }
}
