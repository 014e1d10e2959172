//! One-shot network reachability probe
//!
//! Answers a single question per call: is any network path currently
//! usable. The underlying watcher task is torn down immediately after the
//! first observation — it must not keep running once the caller has its
//! answer.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tracing::debug;

/// Default endpoints probed for connectivity. Both are anycast resolvers
/// reachable from effectively any network with outbound connectivity.
const DEFAULT_ENDPOINTS: &[&str] = &["1.1.1.1:443", "8.8.8.8:53"];

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// One-shot boolean probe of network availability.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// Resolve on the first observation and release the watcher.
    async fn is_reachable(&self) -> bool;
}

/// TCP-connect based [`ReachabilityProbe`].
///
/// Spawns a watcher task that walks the endpoint list once; the first
/// successful connect reports reachable, exhausting the list reports
/// unreachable. The watcher is aborted as soon as its observation lands.
pub struct TcpReachabilityProbe {
    endpoints: Vec<String>,
    attempt_timeout: Duration,
}

impl TcpReachabilityProbe {
    pub fn new(endpoints: Vec<String>, attempt_timeout: Duration) -> Self {
        Self {
            endpoints,
            attempt_timeout,
        }
    }
}

impl Default for TcpReachabilityProbe {
    fn default() -> Self {
        Self::new(
            DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ATTEMPT_TIMEOUT,
        )
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachabilityProbe {
    async fn is_reachable(&self) -> bool {
        let (tx, rx) = oneshot::channel();
        let endpoints = self.endpoints.clone();
        let attempt_timeout = self.attempt_timeout;

        let watcher = tokio::spawn(async move {
            let mut reachable = false;
            for endpoint in &endpoints {
                match tokio::time::timeout(attempt_timeout, TcpStream::connect(endpoint.as_str()))
                    .await
                {
                    Ok(Ok(_)) => {
                        debug!(endpoint = %endpoint, "reachability probe connected");
                        reachable = true;
                        break;
                    }
                    Ok(Err(e)) => debug!(endpoint = %endpoint, error = %e, "probe connect failed"),
                    Err(_) => debug!(endpoint = %endpoint, "probe connect timed out"),
                }
            }
            let _ = tx.send(reachable);
        });

        // A dropped sender reads as unreachable.
        let reachable = rx.await.unwrap_or(false);

        // Mandatory teardown: the watcher must not outlive the observation.
        watcher.abort();

        debug!(reachable, "reachability probe resolved");
        reachable
    }
}
