//! # Core Traits (Ports)
//!
//! Any persistence plugin must implement these traits to back a `SiteStore`.

/// Key-value persistence contract, shaped after browser local storage.
///
/// Implementations are allowed to fail on any call. The store treats every
/// error as "nothing stored" on reads and as a dropped write on writes.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait KvStore: Send + Sync {
    /// Returns the raw value under `key`, or `None` when absent.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
