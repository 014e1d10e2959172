//! Redirect-following resolution with path-id capture
//!
//! Follows a URL through its redirect chain with an ephemeral client and
//! records the last hop that carried a `pathid` query parameter. The final
//! response URL plus that captured id are what the coordinator persists and
//! reuses to refresh a stale cached destination.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::{debug, warn};
use url::Url;

use super::urls;

/// Redirect chains longer than this are cut off; the last response seen
/// becomes the final one.
const MAX_REDIRECT_HOPS: usize = 10;

pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of following a redirect chain to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// URL of the final response in the chain
    pub final_url: String,
    /// Last `pathid` query value observed anywhere along the chain
    pub path_id: Option<String>,
}

/// Follows redirects from a start URL, observing every intermediate hop.
///
/// Failure (transport error, timeout, unparseable start URL) is surfaced as
/// `None`; nothing escapes this boundary as an error.
#[async_trait]
pub trait RedirectResolver: Send + Sync {
    async fn resolve(&self, start_url: &str) -> Option<ResolvedTarget>;
}

/// reqwest-backed [`RedirectResolver`].
///
/// Builds a fresh client per call whose redirect policy writes each hop
/// carrying a path id into a shared accumulator; the last write wins, which
/// is exactly the "last one observed in the chain" contract.
pub struct HttpRedirectResolver {
    timeout: Duration,
}

impl HttpRedirectResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpRedirectResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVE_TIMEOUT)
    }
}

#[async_trait]
impl RedirectResolver for HttpRedirectResolver {
    async fn resolve(&self, start_url: &str) -> Option<ResolvedTarget> {
        let start = match Url::parse(start_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(start_url, error = %e, "unparseable start url");
                return None;
            }
        };

        debug!(start_url, "redirect resolution start");

        let marked: Arc<Mutex<Option<Url>>> = Arc::new(Mutex::new(None));
        let policy_marked = Arc::clone(&marked);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .redirect(Policy::custom(move |attempt| {
                if urls::extract_path_id(attempt.url()).is_some() {
                    debug!(url = %attempt.url(), "redirect hop carries path id");
                    *policy_marked.lock().unwrap() = Some(attempt.url().clone());
                }
                if attempt.previous().len() >= MAX_REDIRECT_HOPS {
                    attempt.stop()
                } else {
                    attempt.follow()
                }
            }))
            .build()
            .ok()?;

        let response = match client.get(start).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(start_url, error = %e, "redirect resolution failed");
                return None;
            }
        };

        // Chain cut off on an unfollowed redirect: its Location target may
        // still carry the id.
        if response.status().is_redirection() {
            if let Some(location) = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|raw| Url::parse(raw).ok())
            {
                if urls::extract_path_id(&location).is_some() {
                    debug!(url = %location, "unfollowed Location carries path id");
                    *marked.lock().unwrap() = Some(location);
                }
            }
        }

        let final_url = response.url().clone();
        let marked_url = marked.lock().unwrap().take();
        let path_id = marked_url
            .as_ref()
            .and_then(urls::extract_path_id)
            .or_else(|| urls::extract_path_id(&final_url));

        debug!(final_url = %final_url, path_id = ?path_id, "redirect resolution done");
        Some(ResolvedTarget {
            final_url: final_url.to_string(),
            path_id,
        })
    }
}
