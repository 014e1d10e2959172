//! Remote manifest fetch for the dropbox variant
//!
//! The dropbox-style source does not redirect to the destination; it hosts
//! a small JSON document whose single required field is the destination
//! URL. The fetch must see status 200 exactly and a body that deserializes
//! to that document; anything else is a failure the coordinator treats as
//! permanent.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_MANIFEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ManifestDocument {
    url: String,
}

/// Fetches the destination URL out of a remote JSON manifest.
///
/// Any failure (non-200 status, decode error, transport error) is `None`.
#[async_trait]
pub trait ManifestClient: Send + Sync {
    async fn fetch_destination(&self, manifest_url: &str) -> Option<String>;
}

/// reqwest-backed [`ManifestClient`].
pub struct HttpManifestClient {
    timeout: Duration,
}

impl HttpManifestClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpManifestClient {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST_TIMEOUT)
    }
}

#[async_trait]
impl ManifestClient for HttpManifestClient {
    async fn fetch_destination(&self, manifest_url: &str) -> Option<String> {
        let url = match Url::parse(manifest_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(manifest_url, error = %e, "invalid manifest url");
                return None;
            }
        };

        let client = reqwest::Client::builder().timeout(self.timeout).build().ok()?;

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(manifest_url, error = %e, "manifest fetch failed");
                return None;
            }
        };

        let status = response.status();
        if status.as_u16() != 200 {
            warn!(manifest_url, status = status.as_u16(), "manifest fetch rejected");
            return None;
        }

        match response.json::<ManifestDocument>().await {
            Ok(document) => {
                debug!(destination = %document.url, "manifest parsed");
                Some(document.url)
            }
            Err(e) => {
                warn!(manifest_url, error = %e, "manifest decode failed");
                None
            }
        }
    }
}
