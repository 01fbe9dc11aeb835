use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_LOG_DIR: &str = "logs";

pub const ENV_API_BASE_URL: &str = "BLUEPRINT_API_BASE_URL";
pub const ENV_AUTH_TOKEN: &str = "BLUEPRINT_AUTH_TOKEN";
pub const ENV_FLUSH_INTERVAL_MS: &str = "BLUEPRINT_FLUSH_INTERVAL_MS";

/// Settings of an editor session.
///
/// Resolved in three layers: built-in defaults, then an optional JSON file, then the
/// `BLUEPRINT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub flush_interval_ms: u64,
    pub log_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            log_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn load(file_path: Option<&str>) -> Result<Self> {
        let config = match file_path {
            Some(path) => {
                log::info!("Reading session configuration from '{}'.", path);
                parse_json_file::<SessionConfig>(path)?
            }
            None => SessionConfig::default(),
        };

        let config = config.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_AUTH_TOKEN) {
            self.auth_token = Some(token).filter(|token| !token.is_empty());
        }
        if let Some(raw) = lookup(ENV_FLUSH_INTERVAL_MS) {
            self.flush_interval_ms = raw
                .trim()
                .parse()
                .map_err(|_| Error::ConfigError(format!("{} must be a number of milliseconds, got '{}'", ENV_FLUSH_INTERVAL_MS, raw)))?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(Error::ConfigError(format!("api base url '{}' is not an http(s) url", self.api_base_url)));
        }
        if self.flush_interval_ms == 0 {
            return Err(Error::ConfigError("flush interval must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_values_fill_in_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "apiBaseUrl": "https://api.example.test/api", "flushIntervalMs": 250 }}"#).unwrap();

        let config: SessionConfig = parse_json_file(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.api_base_url, "https://api.example.test/api");
        assert_eq!(config.flush_interval(), Duration::from_millis(250));
        assert_eq!(config.log_dir, DEFAULT_LOG_DIR);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = SessionConfig::default()
            .with_overrides(|key| match key {
                ENV_AUTH_TOKEN => Some("secret".to_string()),
                ENV_FLUSH_INTERVAL_MS => Some("500".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.flush_interval_ms, 500);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn bad_values_are_rejected() {
        let result = SessionConfig::default().with_overrides(|key| (key == ENV_FLUSH_INTERVAL_MS).then(|| "soon".to_string()));
        assert!(matches!(result, Err(Error::ConfigError(_))));

        let config = SessionConfig { api_base_url: "localhost:8000".to_string(), ..Default::default() };
        assert!(config.validate().is_err());

        let config = SessionConfig { flush_interval_ms: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
