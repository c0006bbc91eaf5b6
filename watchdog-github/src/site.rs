use std::fmt;
use std::sync::Arc;

use url::Url;
use watchdog_core::{FetchError, WatchdogConfig, WatchdogError, WorkflowFileRequest};

use crate::transport::{HttpTransport, ReqwestTransport};

/// A source-hosting site and the transport used to reach it.
///
/// Holds no mutable state; clone it or share it behind an `Arc` across tasks.
#[derive(Clone)]
pub struct GitHubApiSite {
    base_url: Url,
    client: Arc<dyn HttpTransport>,
}

impl GitHubApiSite {
    pub fn new(base_url: Url, client: Arc<dyn HttpTransport>) -> Self {
        Self { base_url, client }
    }

    pub fn with_transport<T: HttpTransport + 'static>(base_url: Url, transport: T) -> Self {
        Self::new(base_url, Arc::new(transport))
    }

    pub fn from_config(config: &WatchdogConfig) -> Result<Self, WatchdogError> {
        let base_url = config.parsed_base_url()?;
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::with_transport(base_url, transport))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client(&self) -> &dyn HttpTransport {
        self.client.as_ref()
    }

    pub fn raw_file_url(&self, request: &WorkflowFileRequest) -> Result<Url, FetchError> {
        request.raw_file_url(&self.base_url)
    }
}

impl fmt::Debug for GitHubApiSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubApiSite")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_uses_base_url() {
        let config = WatchdogConfig {
            base_url: "http://example.com".to_string(),
            ..WatchdogConfig::default()
        };

        let site = GitHubApiSite::from_config(&config).unwrap();
        assert_eq!(site.base_url().as_str(), "http://example.com/");

        let request = WorkflowFileRequest::new("MyOrg", "MyRepo", "12345678", "a.yaml");

        assert_eq!(
            site.raw_file_url(&request).unwrap().as_str(),
            "http://example.com/MyOrg/MyRepo/raw/12345678/a.yaml"
        );
    }

    #[test]
    fn test_from_config_rejects_bad_base() {
        let config = WatchdogConfig {
            base_url: "not a url".to_string(),
            ..WatchdogConfig::default()
        };

        assert!(matches!(
            GitHubApiSite::from_config(&config),
            Err(WatchdogError::InvalidConfiguration(_))
        ));
    }
}
