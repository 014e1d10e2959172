//! Key-value persistence for coordinator decision state
//!
//! The coordinator records its decision artifacts (cached destination URL,
//! sticky fallback flags, access counter, per-variant path ids) under fixed
//! string keys. Values survive restarts, are created lazily on first write
//! and are never deleted — recovery from a sticky flag requires external
//! state reset.
//!
//! Writes are synchronous and last-writer-wins with no transactional
//! grouping: every read path treats each key independently and has a
//! defined fallback, so a crash between two related writes is tolerated.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Stable persistence keys. Fixed strings, no namespacing, no TTL.
pub mod keys {
    /// Cached resolved destination URL (path-id stripped)
    pub const CONTENT_IDENTIFIER: &str = "contentIdentifier";
    /// Basic mode was already shown once — sticky for non-dropbox variants
    pub const DISPLAY_MODE_FLAG: &str = "displayModeFlag";
    /// Dropbox manifest fetch failed once — sticky, forces basic forever
    pub const DROPBOX_FAILED: &str = "dropboxFailedKey";
    /// Count of launches that reached enhanced mode
    pub const ACCESS_COUNT: &str = "accessCountKey";
    /// Last-seen redirect path id, classic variant
    pub const CLASSIC_PATH_ID: &str = "classicPathIdKey";
    /// Last-seen redirect path id, privacy variant
    pub const PRIVACY_PATH_ID: &str = "privacyPathIdKey";
    /// Privacy variant completed its first successful validation
    pub const PRIVACY_VALIDATED_ONCE: &str = "privacyValidatedOnceKey";
}

/// Durable process-wide string-keyed store.
///
/// Defaults mirror a mobile preferences store: an absent bool reads as
/// `false`, an absent integer as `0`. Setters do not report failure; a
/// failed durable write is logged by the implementation and the in-memory
/// value stands until the process exits.
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_bool(&self, key: &str) -> bool;
    fn get_i64(&self, key: &str) -> i64;

    fn set_string(&self, key: &str, value: &str);
    fn set_bool(&self, key: &str, value: bool);
    fn set_i64(&self, key: &str, value: i64);
}
