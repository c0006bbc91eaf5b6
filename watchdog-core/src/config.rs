use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, WatchdogError};

pub const DEFAULT_BASE_URL: &str = "https://github.com";
pub const ENV_BASE_URL: &str = "WATCHDOG_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "WATCHDOG_TIMEOUT_SECS";

/// Settings for reaching the hosting site
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WatchdogConfig {
    pub base_url: String,
    /// Client-level timeout. Unset means the transport never gives up on its own.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: concat!("watchdog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WatchdogConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WatchdogConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading watchdog config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// File values (or defaults when no file is given), then process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                WatchdogError::InvalidConfiguration(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
            self.timeout_secs = Some(secs);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.parsed_base_url()?;
        if self.timeout_secs == Some(0) {
            return Err(WatchdogError::InvalidConfiguration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            WatchdogError::InvalidConfiguration(format!("base_url {:?}: {}", self.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(WatchdogError::InvalidConfiguration(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }

        if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
            return Err(WatchdogError::InvalidConfiguration(format!(
                "base_url must be a plain scheme://host[/prefix] without query or fragment, got {:?}",
                self.base_url
            )));
        }

        Ok(url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = WatchdogConfig::default();
        assert_eq!(config.base_url, "https://github.com");
        assert_eq!(config.timeout(), None);
        assert!(config.user_agent.starts_with("watchdog/"));
    }

    #[test]
    fn test_parse_toml() {
        let config = WatchdogConfig::from_toml_str(
            r#"
base_url = "https://git.example.org"
timeout_secs = 30
"#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://git.example.org");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.user_agent, WatchdogConfig::default().user_agent);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = WatchdogConfig::from_toml_str("retries = 3");
        assert!(matches!(result, Err(WatchdogError::ConfigParse(_))));
    }

    #[test]
    fn test_non_http_base_rejected() {
        let result = WatchdogConfig::from_toml_str(r#"base_url = "ftp://example.com""#);
        assert!(matches!(result, Err(WatchdogError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_base_with_query_or_fragment_rejected() {
        for base_url in ["http://example.com/?x=1", "https://example.com/github#top"] {
            let config = WatchdogConfig {
                base_url: base_url.to_string(),
                ..WatchdogConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(WatchdogError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_TIMEOUT_SECS, "5"),
        ]
        .into_iter()
        .collect();

        let config = WatchdogConfig::from_toml_str(r#"base_url = "https://git.example.org""#)
            .unwrap()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_bad_timeout_override() {
        let result = WatchdogConfig::default().with_overrides(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(WatchdogError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = WatchdogConfig::from_toml_str("timeout_secs = 0");
        assert!(matches!(result, Err(WatchdogError::InvalidConfiguration(_))));
    }
}
