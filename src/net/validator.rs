//! Lightweight endpoint existence check
//!
//! Issues a HEAD request and reports the raw status code. `0` signals an
//! unreachable host, an unparseable URL or any transport error; it is
//! distinguishable from every real HTTP status and sits outside every
//! acceptance range the coordinator checks.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

pub const DEFAULT_VALIDATE_TIMEOUT: Duration = Duration::from_secs(10);

/// HEAD-equivalent status probe.
#[async_trait]
pub trait EndpointValidator: Send + Sync {
    /// Status code of the endpoint, or `0` on any failure.
    async fn status(&self, url: &str) -> u16;
}

/// reqwest-backed [`EndpointValidator`].
pub struct HttpEndpointValidator {
    timeout: Duration,
}

impl HttpEndpointValidator {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpEndpointValidator {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDATE_TIMEOUT)
    }
}

#[async_trait]
impl EndpointValidator for HttpEndpointValidator {
    async fn status(&self, url_str: &str) -> u16 {
        let Ok(url) = Url::parse(url_str) else {
            debug!(url = url_str, "validator: unparseable url");
            return 0;
        };

        let Ok(client) = reqwest::Client::builder().timeout(self.timeout).build() else {
            return 0;
        };

        match client.head(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!(url = url_str, status, "validator response");
                status
            }
            Err(e) => {
                debug!(url = url_str, error = %e, "validator request failed");
                0
            }
        }
    }
}
