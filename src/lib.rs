//! signpost - launch-time content-resolution coordinator
//!
//! Decides, on each app launch, whether the host shows its native "basic"
//! UI or an "enhanced" remote-content surface, by resolving a chain of
//! redirects, caching results, detecting repeat failures and applying
//! per-variant policies.
//!
//! ## Components
//!
//! - **Coordinator**: the decision state machine, publishing one terminal
//!   display mode per launch
//! - **Net**: reachability probe, redirect resolver, endpoint validator,
//!   manifest client and URL utilities
//! - **Store**: durable key-value persistence of decision artifacts

pub mod config;
pub mod coordinator;
pub mod net;
pub mod store;
pub mod types;

pub use config::Args;
pub use coordinator::{
    ContentCoordinator, ContentVariant, CoordinatorConfig, DeviceProfile, DisplayMode,
};
pub use types::{Result, SignpostError};
