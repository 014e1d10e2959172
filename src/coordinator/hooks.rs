//! Side-effect hooks published by the coordinator
//!
//! Basic-mode publications record an analytics event; the second enhanced
//! access schedules a one-time rating prompt. Both sit behind traits so the
//! host application (or a test) decides what actually happens.

use async_trait::async_trait;
use tracing::info;

/// Events the coordinator reports to the host's analytics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsEvent {
    /// Basic mode was published for this launch
    BasicLaunch,
}

/// Analytics event sink.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: AnalyticsEvent);
}

/// Native rating-prompt hook, invoked at most once per counter value.
#[async_trait]
pub trait RatingPrompter: Send + Sync {
    async fn request_review(&self);
}

/// Drops every event.
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn record(&self, _event: AnalyticsEvent) {}
}

/// Logs events instead of forwarding them anywhere.
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn record(&self, event: AnalyticsEvent) {
        info!(?event, "analytics event");
    }
}

/// Ignores review requests.
pub struct NoopRatingPrompter;

#[async_trait]
impl RatingPrompter for NoopRatingPrompter {
    async fn request_review(&self) {}
}

/// Logs review requests instead of prompting.
pub struct TracingRatingPrompter;

#[async_trait]
impl RatingPrompter for TracingRatingPrompter {
    async fn request_review(&self) {
        info!("rating prompt requested");
    }
}
