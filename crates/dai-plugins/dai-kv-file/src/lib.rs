//! # dai-kv-file
//! dai-site/crates/dai-plugins/dai-kv-file/src/lib.rs
//! Local filesystem implementation of `KvStore`.
//! One file per key under a root directory, replaced atomically on write.
//! The temp file is created in the root and removed if the write fails.

use dai_core::error::AppError;
use dai_core::traits::KvStore;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

pub struct FileKvStore {
    /// Root directory for all keys (e.g., "./data/site")
    root_path: PathBuf,
}

impl FileKvStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps a key to "<root>/<key>.json". Keys are restricted to a plain
    /// filename alphabet so they can never escape the root.
    fn key_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::Storage(format!("invalid key {key:?}")).into());
        }
        Ok(self.root_path.join(format!("{key}.json")))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.root_path)?;

        let mut tmp = NamedTempFile::new_in(&self.root_path)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path)?;
        log::trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
