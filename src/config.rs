//! Configuration for signpost
//!
//! CLI arguments and environment variable handling using clap. Every magic
//! constant of the decision flow (gate date, display delay, rating prompt
//! delay) is a flag with the production default, not a literal in the flow.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::coordinator::{ContentVariant, CoordinatorConfig, DeviceProfile};

/// signpost - launch-time content-resolution coordinator
#[derive(Parser, Debug, Clone)]
#[command(name = "signpost")]
#[command(about = "Resolves the launch display mode: basic or enhanced")]
pub struct Args {
    /// Content source URL to resolve at launch (empty forces basic mode)
    #[arg(long, env = "SOURCE_URL", default_value = "")]
    pub source_url: String,

    /// How the source yields the destination URL
    #[arg(long, env = "CONTENT_VARIANT", value_enum, default_value = "classic")]
    pub variant: VariantKind,

    /// Owner identifier for the privacy variant's carve-out check
    #[arg(long, env = "OWNER_ID", default_value = "")]
    pub owner_id: String,

    /// Path of the JSON key-value store holding decision state
    #[arg(long, env = "STORE_PATH", default_value = "signpost-store.json")]
    pub store_path: PathBuf,

    /// Rollout gate date (YYYY-MM-DD); launches before it stay basic
    #[arg(long, env = "GATE_DATE", default_value = "2025-09-01")]
    pub gate_date: NaiveDate,

    /// Fixed delay in milliseconds before publishing a display mode
    #[arg(long, env = "DISPLAY_DELAY_MS", default_value = "1500")]
    pub display_delay_ms: u64,

    /// Delay in milliseconds before the rating prompt after the second
    /// enhanced access
    #[arg(long, env = "RATING_PROMPT_DELAY_MS", default_value = "2000")]
    pub rating_prompt_delay_ms: u64,

    /// Treat the device as a tablet-class form factor
    #[arg(long, env = "TABLET_IDIOM", default_value = "false")]
    pub tablet_idiom: bool,

    /// Device model string, checked for the tablet marker
    #[arg(long, env = "DEVICE_MODEL", default_value = "")]
    pub device_model: String,

    /// User-assigned device name, checked for the tablet marker
    #[arg(long, env = "DEVICE_NAME", default_value = "")]
    pub device_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Content-variant selector for the CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Dropbox,
    Classic,
    Privacy,
}

impl Args {
    /// Build the coordinator's variant tag, attaching the owner id for the
    /// privacy variant.
    pub fn content_variant(&self) -> ContentVariant {
        match self.variant {
            VariantKind::Dropbox => ContentVariant::Dropbox,
            VariantKind::Classic => ContentVariant::Classic,
            VariantKind::Privacy => ContentVariant::Privacy {
                owner_id: self.owner_id.clone(),
            },
        }
    }

    /// Device form-factor inputs for the large-screen guard.
    pub fn device_profile(&self) -> DeviceProfile {
        DeviceProfile {
            tablet_idiom: self.tablet_idiom,
            model: self.device_model.clone(),
            name: self.device_name.clone(),
            ..Default::default()
        }
    }

    /// Assemble the full coordinator configuration.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        let mut config = CoordinatorConfig::new(self.source_url.clone(), self.content_variant());
        config.device = self.device_profile();
        config.gate_date = self.gate_date;
        config.display_delay = Duration::from_millis(self.display_delay_ms);
        config.rating_prompt_delay = Duration::from_millis(self.rating_prompt_delay_ms);
        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.variant == VariantKind::Privacy && self.owner_id.trim().is_empty() {
            return Err("OWNER_ID is required for the privacy variant".to_string());
        }
        Ok(())
    }
}
