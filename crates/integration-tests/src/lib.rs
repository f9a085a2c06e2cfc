//! Shared fixtures for the cross-crate tests under `tests/`.

use std::sync::Arc;

use dai_core::store::SiteStore;
use dai_kv_file::FileKvStore;
use dai_kv_memory::MemoryKvStore;

/// A browser profile that can be "reloaded" by building a new store over
/// the same storage.
pub struct Browser<K> {
    pub kv: Arc<K>,
}

impl Browser<MemoryKvStore> {
    pub fn in_memory() -> Self {
        Self { kv: Arc::new(MemoryKvStore::new()) }
    }
}

impl Browser<FileKvStore> {
    pub fn on_disk(root: std::path::PathBuf) -> Self {
        Self { kv: Arc::new(FileKvStore::new(root)) }
    }
}

impl<K: dai_core::traits::KvStore + 'static> Browser<K> {
    /// Simulates a page load, optionally with `?admin=1` in the URL.
    pub fn load(&self, admin_signal: bool) -> SiteStore {
        SiteStore::init(self.kv.clone(), admin_signal)
    }
}
