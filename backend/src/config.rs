//! Runtime configuration.
//!
//! Values come from the command line first, then environment variables
//! (a `.env` file is loaded by the binary), then defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::parser::Delimiter;

/// Directory where result artifacts are written.
pub const ENV_OUTPUT_DIR: &str = "ROSTER_OUTPUT_DIR";

/// `,` `;` `tab` `|` or `auto`.
pub const ENV_DELIMITER: &str = "ROSTER_DELIMITER";

/// Log filter, e.g. `info` or `roster=debug`.
pub const ENV_LOG: &str = "ROSTER_LOG";

/// `json` or `pretty`.
pub const ENV_LOG_FORMAT: &str = "ROSTER_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

/// Parse a delimiter setting.
pub fn parse_delimiter(value: &str) -> ConfigResult<Delimiter> {
    match value {
        "auto" => Ok(Delimiter::Auto),
        "tab" | "\\t" | "\t" => Ok(Delimiter::Fixed(b'\t')),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(Delimiter::Fixed(c as u8)),
                _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
            }
        }
    }
}

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub delimiter: Delimiter,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            delimiter: Delimiter::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Build from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(delimiter) = lookup(ENV_DELIMITER).filter(|v| !v.is_empty()) {
            config.delimiter = parse_delimiter(&delimiter)?;
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            config.log_level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }

    /// Apply command line values on top.
    pub fn with_overrides(
        mut self,
        output_dir: Option<PathBuf>,
        delimiter: Option<&str>,
        log_level: Option<String>,
        log_format: Option<&str>,
    ) -> ConfigResult<Self> {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(delimiter) = delimiter {
            self.delimiter = parse_delimiter(delimiter)?;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(format) = log_format {
            self.log_format = format.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.delimiter, Delimiter::Fixed(b','));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_OUTPUT_DIR, "/tmp/out"),
            (ENV_DELIMITER, "auto"),
            (ENV_LOG, "debug"),
            (ENV_LOG_FORMAT, "pretty"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.delimiter, Delimiter::Auto);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::from_lookup(|k| (k == ENV_DELIMITER).then(|| ";".to_string()))
            .unwrap()
            .with_overrides(None, Some("tab"), Some("warn".into()), Some("json"))
            .unwrap();
        assert_eq!(config.delimiter, Delimiter::Fixed(b'\t'));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(parse_delimiter(";;"), Err(ConfigError::InvalidDelimiter(";;".into())));
        assert_eq!(parse_delimiter("é"), Err(ConfigError::InvalidDelimiter("é".into())));
        assert!("xml".parse::<LogFormat>().is_err());
        let err = Config::from_lookup(|k| (k == ENV_LOG_FORMAT).then(|| "xml".to_string())).unwrap_err();
        assert_eq!(err, ConfigError::InvalidLogFormat("xml".into()));
    }
}
