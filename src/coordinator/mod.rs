//! Resolution coordinator - decides basic vs enhanced display per launch
//!
//! On each launch the coordinator reads persisted flags and URLs, runs the
//! entry guards, dispatches on the content variant and publishes exactly
//! one terminal [`DisplayMode`]. Every network step is awaited to
//! completion before the next begins; no two operations for the same
//! decision run concurrently.
//!
//! ## Decision flow
//!
//! ```text
//! Loading → guards (url / form factor / gate date / reachability)
//!             ↓ all pass
//!           variant flow (dropbox | classic | privacy)
//!             ↓
//!           Basic | Enhanced(path)     (terminal for this launch)
//! ```
//!
//! Branches that end in `Basic` or a freshly computed `Enhanced` wait out a
//! fixed display delay first, so the loading screen has a consistent
//! duration regardless of network latency.

mod hooks;
mod mode;

pub use hooks::{
    AnalyticsEvent, AnalyticsSink, NoopAnalytics, NoopRatingPrompter, RatingPrompter,
    TracingAnalytics, TracingRatingPrompter,
};
pub use mode::{ContentVariant, DeviceProfile, DisplayMode, BLANK_CONTENT};

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::net::{
    EndpointValidator, HttpEndpointValidator, HttpManifestClient, HttpRedirectResolver,
    ManifestClient, ReachabilityProbe, RedirectResolver, TcpReachabilityProbe,
};
use crate::net::urls;
use crate::store::{keys, KeyValueStore};

/// Status codes accepted when validating a resolved destination.
const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=403;

/// Extra status the privacy variant accepts before its first successful
/// validation.
const PRIVACY_FIRST_EXTRA_STATUS: u16 = 405;

/// Enhanced-access count at which the rating prompt fires.
const RATING_PROMPT_ACCESS_COUNT: i64 = 2;

const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(1500);
const DEFAULT_RATING_PROMPT_DELAY: Duration = Duration::from_secs(2);

/// Construction-time inputs. Not re-read after the coordinator is built.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Configured content source URL
    pub source_url: String,
    /// Content source variant
    pub variant: ContentVariant,
    /// Device form-factor inputs for the large-screen guard
    pub device: DeviceProfile,
    /// Enhanced mode is disabled before this date regardless of state
    pub gate_date: NaiveDate,
    /// Fixed delay applied before publishing, masking latency variance
    pub display_delay: Duration,
    /// Delay before the rating prompt once the access counter hits 2
    pub rating_prompt_delay: Duration,
}

impl CoordinatorConfig {
    pub fn new(source_url: impl Into<String>, variant: ContentVariant) -> Self {
        Self {
            source_url: source_url.into(),
            variant,
            device: DeviceProfile::default(),
            gate_date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid gate date"),
            display_delay: DEFAULT_DISPLAY_DELAY,
            rating_prompt_delay: DEFAULT_RATING_PROMPT_DELAY,
        }
    }
}

/// The resolution coordinator.
///
/// Collaborators default to their network-backed implementations; each has
/// a `with_*` override so tests (or embedders) can swap in their own.
pub struct ContentCoordinator {
    config: CoordinatorConfig,
    store: Arc<dyn KeyValueStore>,
    probe: Arc<dyn ReachabilityProbe>,
    resolver: Arc<dyn RedirectResolver>,
    validator: Arc<dyn EndpointValidator>,
    manifest: Arc<dyn ManifestClient>,
    analytics: Arc<dyn AnalyticsSink>,
    ratings: Arc<dyn RatingPrompter>,
    mode: watch::Sender<DisplayMode>,
}

impl ContentCoordinator {
    pub fn new(config: CoordinatorConfig, store: Arc<dyn KeyValueStore>) -> Self {
        info!(variant = %config.variant, "coordinator created");
        let (mode, _) = watch::channel(DisplayMode::Loading);
        Self {
            store,
            probe: Arc::new(TcpReachabilityProbe::default()),
            resolver: Arc::new(HttpRedirectResolver::default()),
            validator: Arc::new(HttpEndpointValidator::default()),
            manifest: Arc::new(HttpManifestClient::default()),
            analytics: Arc::new(NoopAnalytics),
            ratings: Arc::new(NoopRatingPrompter),
            mode,
            config,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn RedirectResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn EndpointValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_manifest(mut self, manifest: Arc<dyn ManifestClient>) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn with_ratings(mut self, ratings: Arc<dyn RatingPrompter>) -> Self {
        self.ratings = ratings;
        self
    }

    /// Currently published mode.
    pub fn display_mode(&self) -> DisplayMode {
        self.mode.borrow().clone()
    }

    /// Observe mode publications. Observers see the final published value;
    /// it cannot change again after becoming terminal.
    pub fn subscribe(&self) -> watch::Receiver<DisplayMode> {
        self.mode.subscribe()
    }

    /// Run the launch decision to its terminal mode.
    ///
    /// Re-running against the same persisted state is idempotent: it
    /// produces an equivalent or better-cached outcome.
    pub async fn run(&self) -> DisplayMode {
        info!(variant = %self.config.variant, "resolution start");

        if self.config.source_url.trim().is_empty() {
            warn!("empty source url, forcing basic");
            self.delay().await;
            self.publish_basic();
            return self.display_mode();
        }

        if self.config.device.is_large_form_factor() {
            info!("large form factor device, forcing basic");
            self.delay().await;
            self.publish_basic();
            return self.display_mode();
        }

        let today = Local::now().date_naive();
        if today < self.config.gate_date {
            info!(gate_date = %self.config.gate_date, "before rollout gate, forcing basic");
            self.delay().await;
            self.publish_basic();
            return self.display_mode();
        }

        if !self.probe.is_reachable().await {
            warn!("network unreachable, forcing basic");
            self.delay().await;
            self.publish_basic();
            return self.display_mode();
        }

        match self.config.variant.clone() {
            ContentVariant::Dropbox => self.run_dropbox().await,
            ContentVariant::Classic => self.run_classic().await,
            ContentVariant::Privacy { owner_id } => self.run_privacy(&owner_id).await,
        }

        self.display_mode()
    }

    /// Called by the display surface when the rendered remote content
    /// itself reports a client error after loading. Forces basic mode
    /// directly; resolution is not re-run.
    pub fn handle_client_error(&self) {
        warn!("client error reported by display surface, forcing basic");
        if !matches!(self.config.variant, ContentVariant::Dropbox) {
            self.store.set_bool(keys::DISPLAY_MODE_FLAG, true);
        }
        self.mode.send_replace(DisplayMode::Basic);
        self.analytics.record(AnalyticsEvent::BasicLaunch);
    }

    // =========================================================================
    // Variant flows
    // =========================================================================

    async fn run_dropbox(&self) {
        if self.store.get_bool(keys::DROPBOX_FAILED) {
            info!("manifest source previously failed, forcing basic");
            self.delay().await;
            self.publish_basic();
            return;
        }

        // Nothing in this variant writes the cache key, but a value left
        // behind in the store is still honored.
        if let Some(saved) = self.store.get_string(keys::CONTENT_IDENTIFIER) {
            info!(url = %saved, "cached destination found");
            self.delay().await;
            self.publish_enhanced(saved);
            self.track_enhanced_access();
            return;
        }

        match self.manifest.fetch_destination(&self.config.source_url).await {
            Some(url) if !url.is_empty() => {
                info!(url = %url, "manifest destination loaded");
                self.delay().await;
                self.publish_enhanced(url);
                self.track_enhanced_access();
            }
            _ => {
                warn!("manifest fetch failed, forcing basic permanently");
                self.store.set_bool(keys::DROPBOX_FAILED, true);
                self.delay().await;
                self.publish_basic();
            }
        }
    }

    async fn run_classic(&self) {
        if self.store.get_bool(keys::DISPLAY_MODE_FLAG) {
            info!("basic already shown once, forcing basic");
            self.delay().await;
            self.publish_basic();
            return;
        }

        if let Some(saved) = self.store.get_string(keys::CONTENT_IDENTIFIER) {
            let status = self.validator.status(&saved).await;
            info!(url = %saved, status, "cached destination validated");
            if ACCEPTED_STATUS.contains(&status) {
                self.delay().await;
                self.publish_enhanced(saved);
                self.track_enhanced_access();
                return;
            }

            warn!(status, "cached destination rejected, refreshing via path id");
            match self.refresh_via_path_id(keys::CLASSIC_PATH_ID).await {
                Some(new_url) => {
                    let new_status = self.validator.status(&new_url).await;
                    info!(url = %new_url, status = new_status, "refreshed destination validated");
                    if ACCEPTED_STATUS.contains(&new_status) {
                        self.save_destination_gated(&new_url);
                        self.delay().await;
                        self.publish_enhanced(new_url);
                        self.track_enhanced_access();
                    } else {
                        // Keep the user on the enhanced surface, blank, and
                        // leave the cache untouched.
                        warn!(status = new_status, "refreshed destination rejected, blank surface");
                        self.publish_enhanced(BLANK_CONTENT);
                    }
                }
                None => {
                    warn!("refresh unavailable, blank surface");
                    self.publish_enhanced(BLANK_CONTENT);
                }
            }
            return;
        }

        // First launch: no cached destination yet.
        match self.resolver.resolve(&self.config.source_url).await {
            Some(target) => {
                if let Some(ref path_id) = target.path_id {
                    self.store.set_string(keys::CLASSIC_PATH_ID, path_id);
                    info!(path_id = %path_id, "path id persisted");
                }
                let status = self.validator.status(&target.final_url).await;
                info!(url = %target.final_url, status, "final destination validated");
                if ACCEPTED_STATUS.contains(&status) {
                    self.save_destination_gated(&target.final_url);
                    self.delay().await;
                    self.publish_enhanced(target.final_url);
                    self.track_enhanced_access();
                } else {
                    warn!(status, "final destination rejected, forcing basic");
                    self.delay().await;
                    self.publish_basic();
                }
            }
            None => {
                warn!("redirect resolution failed, forcing basic");
                self.delay().await;
                self.publish_basic();
            }
        }
    }

    async fn run_privacy(&self, owner_id: &str) {
        if self.store.get_bool(keys::DISPLAY_MODE_FLAG) {
            info!("basic already shown once, forcing basic");
            self.delay().await;
            self.publish_basic();
            return;
        }

        if let Some(saved) = self.store.get_string(keys::CONTENT_IDENTIFIER) {
            let validated_once = self.store.get_bool(keys::PRIVACY_VALIDATED_ONCE);
            let status = self.validator.status(&saved).await;
            // Lenient on the very first validation, exact 200 thereafter.
            let accepted = if validated_once {
                status == 200
            } else {
                ACCEPTED_STATUS.contains(&status) || status == PRIVACY_FIRST_EXTRA_STATUS
            };
            info!(url = %saved, status, validated_once, accepted, "cached destination validated");

            if accepted {
                self.delay().await;
                self.publish_enhanced(saved);
                self.track_enhanced_access();
                self.store.set_bool(keys::PRIVACY_VALIDATED_ONCE, true);
                return;
            }

            warn!(status, "cached destination rejected, refreshing via path id");
            match self.refresh_via_path_id(keys::PRIVACY_PATH_ID).await {
                Some(new_url) => {
                    // This variant caches the refreshed URL before
                    // validating it.
                    self.save_destination(&new_url);
                    let new_status = self.validator.status(&new_url).await;
                    info!(url = %new_url, status = new_status, "refreshed destination validated");
                    if new_status == 200 {
                        self.delay().await;
                        self.publish_enhanced(new_url);
                        self.track_enhanced_access();
                        self.store.set_bool(keys::PRIVACY_VALIDATED_ONCE, true);
                    } else if let Some(fallback) = self.path_id_fallback_url() {
                        warn!(status = new_status, "refreshed destination rejected, rebuilt from path id");
                        self.publish_enhanced(fallback);
                    } else {
                        warn!(status = new_status, "refreshed destination rejected, no stored path id");
                        self.publish_enhanced(new_url);
                    }
                }
                None => {
                    warn!("refresh unavailable, reusing cached destination");
                    self.publish_enhanced(saved);
                }
            }
            return;
        }

        // First launch.
        match self.resolver.resolve(&self.config.source_url).await {
            Some(target) => {
                if let Some(ref path_id) = target.path_id {
                    self.store.set_string(keys::PRIVACY_PATH_ID, path_id);
                    info!(path_id = %path_id, "path id persisted");
                }
                if !owner_id.is_empty() && target.final_url.contains(owner_id) {
                    // Owner carve-out applies on first launch only.
                    info!("owner identifier found in destination, forcing basic");
                    self.delay().await;
                    self.publish_basic();
                    return;
                }
                self.save_destination(&target.final_url);
                self.delay().await;
                self.publish_enhanced(target.final_url);
                self.track_enhanced_access();
                self.store.set_bool(keys::PRIVACY_VALIDATED_ONCE, true);
            }
            None => {
                warn!("redirect resolution failed, opening source directly");
                self.publish_enhanced(self.config.source_url.clone());
                self.track_enhanced_access();
            }
        }
    }

    // =========================================================================
    // Shared steps
    // =========================================================================

    /// Re-resolve a destination by appending the stored path id to the
    /// configured source URL. `None` when no id is stored, the URL cannot
    /// be built, or resolution fails.
    async fn refresh_via_path_id(&self, path_id_key: &str) -> Option<String> {
        let path_id = self.store.get_string(path_id_key)?;
        let refresh_url = urls::append_path_id(&self.config.source_url, &path_id)?;
        debug!(url = %refresh_url, "refresh resolution start");
        let target = self.resolver.resolve(&refresh_url).await?;
        debug!(url = %target.final_url, "refresh resolution done");
        Some(target.final_url)
    }

    /// Rebuild source-plus-path-id directly, without a redirect chain.
    fn path_id_fallback_url(&self) -> Option<String> {
        let path_id = self.store.get_string(keys::PRIVACY_PATH_ID)?;
        urls::append_path_id(&self.config.source_url, &path_id)
    }

    /// Cache the destination (path id stripped) unless it bounced back to
    /// the source's own base domain.
    fn save_destination_gated(&self, url: &str) {
        let stripped = urls::strip_path_id(url);
        if urls::same_base_domain(&stripped, &self.config.source_url) {
            info!(url = %stripped, "skip cache save, same base domain as source");
        } else {
            self.store.set_string(keys::CONTENT_IDENTIFIER, &stripped);
            info!(url = %stripped, "destination cached");
        }
    }

    /// Cache the destination (path id stripped) unconditionally.
    fn save_destination(&self, url: &str) {
        let stripped = urls::strip_path_id(url);
        self.store.set_string(keys::CONTENT_IDENTIFIER, &stripped);
        info!(url = %stripped, "destination cached");
    }

    // =========================================================================
    // Publication
    // =========================================================================

    async fn delay(&self) {
        tokio::time::sleep(self.config.display_delay).await;
    }

    fn publish_basic(&self) {
        // Dropbox never sets the sticky flag: the user never saw the
        // enhanced surface under that variant.
        if !matches!(self.config.variant, ContentVariant::Dropbox) {
            self.store.set_bool(keys::DISPLAY_MODE_FLAG, true);
        }
        self.transition(DisplayMode::Basic);
        self.analytics.record(AnalyticsEvent::BasicLaunch);
    }

    fn publish_enhanced(&self, path: impl Into<String>) {
        self.transition(DisplayMode::Enhanced(path.into()));
    }

    /// First terminal publication wins; later calls from the resolution
    /// flow are ignored.
    fn transition(&self, next: DisplayMode) {
        self.mode.send_if_modified(|current| {
            if matches!(current, DisplayMode::Loading) {
                info!(mode = %next, "display mode published");
                *current = next;
                true
            } else {
                false
            }
        });
    }

    /// Count the enhanced access; the second one schedules the rating
    /// prompt on a background task.
    fn track_enhanced_access(&self) {
        let count = self.store.get_i64(keys::ACCESS_COUNT) + 1;
        self.store.set_i64(keys::ACCESS_COUNT, count);
        info!(count, "enhanced access recorded");

        if count == RATING_PROMPT_ACCESS_COUNT {
            let ratings = Arc::clone(&self.ratings);
            let prompt_delay = self.config.rating_prompt_delay;
            tokio::spawn(async move {
                tokio::time::sleep(prompt_delay).await;
                ratings.request_review().await;
            });
        }
    }
}
