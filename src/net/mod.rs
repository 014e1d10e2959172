//! Network collaborators for the resolution coordinator
//!
//! Each collaborator sits behind a small async trait so the coordinator's
//! decision flow can be driven by fakes in tests. Concrete implementations
//! build their own reqwest clients with explicit timeouts and never let a
//! transport error escape: failure is an absence (`None`) or a `0` status,
//! and the caller picks the fallback branch.

pub mod manifest;
pub mod reachability;
pub mod redirect;
pub mod urls;
pub mod validator;

pub use manifest::{HttpManifestClient, ManifestClient};
pub use reachability::{ReachabilityProbe, TcpReachabilityProbe};
pub use redirect::{HttpRedirectResolver, RedirectResolver, ResolvedTarget};
pub use validator::{EndpointValidator, HttpEndpointValidator};
