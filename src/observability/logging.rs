//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Environment variable overriding the log filter.
pub const LOG_FILTER_ENV: &str = "CONTACTBOOK_LOG";

/// Filter used when nothing else is configured.
const DEFAULT_FILTER: &str = "warn";

/// Filter used when `--verbose` is passed.
const VERBOSE_FILTER: &str = "contactbook=debug,info";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
    /// Optional file to append to instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// Filter precedence: `CONTACTBOOK_LOG`, then `--verbose`, then the
    /// configured level, then `warn`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_filter = std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::resolve(settings, verbose, env_filter)
    }

    fn resolve(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        env_filter: Option<String>,
    ) -> Self {
        let configured = settings.and_then(|s| s.level.clone());
        let filter = env_filter
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or(configured)
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let format = settings
            .and_then(|s| s.format.as_deref())
            .map_or(LogFormat::Pretty, LogFormat::parse);
        let file = settings.and_then(|s| s.file.clone());

        Self {
            filter,
            format,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::resolve(None, false, None);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_verbose_overrides_configured_level() {
        let settings = LoggingSettings {
            level: Some("error".to_string()),
            ..LoggingSettings::default()
        };
        let config = LoggingConfig::resolve(Some(&settings), true, None);
        assert_eq!(config.filter, VERBOSE_FILTER);
    }

    #[test]
    fn test_env_overrides_everything() {
        let settings = LoggingSettings {
            level: Some("error".to_string()),
            format: Some("json".to_string()),
            file: Some(PathBuf::from("/tmp/log")),
        };
        let config = LoggingConfig::resolve(Some(&settings), true, Some("trace".to_string()));
        assert_eq!(config.filter, "trace");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/log")));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }
}
