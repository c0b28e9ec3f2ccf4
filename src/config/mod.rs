//! Configuration management.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults (store file in the per-user data directory)
//! 2. TOML config file
//! 3. `CONTACTBOOK_STORE_PATH` environment variable
//! 4. Explicit overrides from the command line ([`ContactBookConfig::with_store_path`])
//!
//! ```toml
//! store_path = "~/contacts.json"
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! file = "/tmp/contactbook.log"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the backing file path.
pub const STORE_PATH_ENV: &str = "CONTACTBOOK_STORE_PATH";

/// Environment variable pointing at a config file.
pub const CONFIG_PATH_ENV: &str = "CONTACTBOOK_CONFIG_PATH";

/// Default backing file name inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "contacts.json";

/// Main configuration for the contact book.
#[derive(Debug, Clone)]
pub struct ContactBookConfig {
    /// Path of the backing store file.
    pub store_path: PathBuf,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `contactbook=debug`.
    pub level: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Optional file to append log lines to instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Backing store file.
    pub store_path: Option<String>,
    /// Logging configuration.
    pub logging: Option<LoggingSettings>,
}

impl Default for ContactBookConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            logging: LoggingSettings::default(),
        }
    }
}

impl ContactBookConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let mut config = Self::from_toml(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parses configuration from TOML text without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. The file named by `CONTACTBOOK_CONFIG_PATH`
    /// 2. Platform-specific config dir (`~/.config/contactbook/config.toml` on Linux)
    ///
    /// Falls back to defaults if no config file is found or it cannot be
    /// parsed. Environment overrides are applied in every case.
    #[must_use]
    pub fn load_default() -> Self {
        let candidates = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .into_iter()
            .chain(
                directories::BaseDirs::new()
                    .map(|b| b.config_dir().join("contactbook").join("config.toml")),
            );

        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Ignoring unreadable config file"
                    );
                },
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Converts a `ConfigFile` to `ContactBookConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(store_path) = file.store_path {
            config.store_path = expand_home(&store_path);
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Applies `CONTACTBOOK_STORE_PATH` if set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(STORE_PATH_ENV) {
            if !path.trim().is_empty() {
                self.store_path = expand_home(&path);
            }
        }
    }

    /// Sets the backing store path.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }
}

/// Returns the default backing file path.
///
/// Uses the per-user data directory, falling back to the current directory
/// when no home directory can be determined.
#[must_use]
pub fn default_store_path() -> PathBuf {
    crate::storage::get_user_data_dir().map_or_else(
        |err| {
            tracing::warn!(
                error = %err,
                "Failed to resolve user data dir; falling back to current dir"
            );
            PathBuf::from(DEFAULT_STORE_FILE)
        },
        |dir| dir.join(DEFAULT_STORE_FILE),
    )
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base_dirs) = directories::BaseDirs::new() {
            return base_dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_store_file_name() {
        let config = ContactBookConfig::default();
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_from_toml() {
        let config = ContactBookConfig::from_toml(
            r#"
            store_path = "/var/lib/contacts.json"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_path, PathBuf::from("/var/lib/contacts.json"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        let config = ContactBookConfig::from_toml("").unwrap();
        assert!(config.store_path.ends_with(DEFAULT_STORE_FILE));
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = ContactBookConfig::from_toml("store_path = [").unwrap_err();
        assert!(matches!(err, crate::Error::OperationFailed { ref operation, .. } if operation == "parse_config_file"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = ContactBookConfig::load_from_file(&dir.path().join("missing.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_store_path() {
        let config = ContactBookConfig::new().with_store_path("/tmp/x.json");
        assert_eq!(config.store_path, PathBuf::from("/tmp/x.json"));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("relative"), PathBuf::from("relative"));
    }
}
