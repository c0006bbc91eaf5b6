use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;
use watchdog_core::TransportError;

use crate::transport::{HttpResponse, HttpTransport, ReqwestTransport};

/// Sends every request to `target`, whatever host the caller asked for.
pub(crate) struct RedirectTransport {
    target: Url,
    inner: ReqwestTransport,
    requested: Mutex<Vec<Url>>,
}

impl RedirectTransport {
    pub(crate) fn new(target: &str) -> Self {
        Self {
            target: Url::parse(target).unwrap(),
            inner: ReqwestTransport::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requested(&self) -> Vec<Url> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for RedirectTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.requested.lock().unwrap().push(url.clone());

        let mut redirected = url.clone();
        redirected.set_scheme(self.target.scheme()).unwrap();
        redirected.set_host(self.target.host_str()).unwrap();
        redirected.set_port(self.target.port()).unwrap();

        self.inner.get(&redirected).await
    }
}
