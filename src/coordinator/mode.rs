//! Display mode, content variant and device classification types

use std::fmt;

/// Sentinel path rendered as an empty enhanced surface when a refresh
/// cannot produce a usable destination.
pub const BLANK_CONTENT: &str = "about:blank";

/// The coordinator's single published output.
///
/// `Loading` is the initial state; `Basic` and `Enhanced` are terminal for
/// the launch. A fresh launch re-runs the whole decision from persisted
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    /// Resolution in progress
    Loading,
    /// Render native UI only — the permanent fallback state
    Basic,
    /// Render remote content at the given path (a URL or [`BLANK_CONTENT`])
    Enhanced(String),
}

impl DisplayMode {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DisplayMode::Loading)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Loading => write!(f, "loading"),
            DisplayMode::Basic => write!(f, "basic"),
            DisplayMode::Enhanced(path) => write!(f, "enhanced {path}"),
        }
    }
}

/// How the configured source yields the destination URL.
///
/// Chosen once at construction, immutable for the coordinator's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentVariant {
    /// Source hosts a JSON manifest containing the destination URL.
    /// One failure is sticky: the variant never retries across launches.
    Dropbox,
    /// Source redirects to the destination; a path id captured from the
    /// chain refreshes a stale cached URL on later launches.
    Classic,
    /// Classic resolution with stricter endpoint validation and an
    /// owner-identifier carve-out on first launch.
    Privacy {
        /// Substring that suppresses enhanced mode when present in the
        /// resolved destination URL. Empty disables the carve-out.
        owner_id: String,
    },
}

impl fmt::Display for ContentVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentVariant::Dropbox => write!(f, "dropbox"),
            ContentVariant::Classic => write!(f, "classic"),
            ContentVariant::Privacy { .. } => write!(f, "privacy"),
        }
    }
}

/// Device form-factor inputs for the large-screen entry guard.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    /// Platform-reported tablet idiom flag
    pub tablet_idiom: bool,
    /// Device model string
    pub model: String,
    /// User-assigned device name
    pub name: String,
    /// Substring marking a tablet-class model or name
    pub tablet_marker: String,
}

impl DeviceProfile {
    /// Any one of the three signals qualifies the device as large-screen.
    pub fn is_large_form_factor(&self) -> bool {
        self.tablet_idiom
            || (!self.tablet_marker.is_empty()
                && (self.model.contains(&self.tablet_marker)
                    || self.name.contains(&self.tablet_marker)))
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            tablet_idiom: false,
            model: String::new(),
            name: String::new(),
            tablet_marker: "iPad".to_string(),
        }
    }
}
