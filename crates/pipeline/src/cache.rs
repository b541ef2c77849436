//! Content-addressable cache of generated assets.
//!
//! The store maps a cache key (see `brandforge_core::hashing`) to the path
//! of a previously generated file. The full entry list is persisted as one
//! JSON file; every `store` re-reads and rewrites it (last-writer-wins).
//! An async mutex serializes the read-modify-write cycle so concurrent jobs
//! cannot interleave within one cycle. A lost race between processes only
//! costs a redundant remote call later, never corruption.
//!
//! Entries are never invalidated explicitly: a lookup whose recorded file
//! has disappeared from disk is simply a miss.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use brandforge_core::config::BrandConfig;
use brandforge_core::hashing::CacheFingerprint;
use brandforge_core::types::Timestamp;

/// Default cache file name, created in the working directory.
pub const DEFAULT_CACHE_FILE: &str = ".brandforge-cache.json";

/// One persisted cache record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    pub path: PathBuf,
    pub timestamp: Timestamp,
    /// Snapshot of the config fields that produced the asset.
    pub config: serde_json::Value,
}

/// Process-wide cache store, shared across jobs.
pub struct CacheStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl CacheStore {
    /// Open a store backed by the given JSON file (created on first store).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Store backed by [`DEFAULT_CACHE_FILE`] in the working directory.
    pub fn default_location() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }

    /// Look up a cache key.
    ///
    /// Returns a hit only when caching is enabled for the calling config,
    /// a record exists, and the recorded file still exists on disk.
    pub async fn lookup(&self, hash: &str, config: &BrandConfig) -> Option<PathBuf> {
        if !config.cache {
            return None;
        }

        let _guard = self.guard.lock().await;
        let entries = self.load().await;
        let entry = entries.get(hash)?;

        if tokio::fs::try_exists(&entry.path).await.unwrap_or(false) {
            tracing::debug!(hash, path = %entry.path.display(), "Cache hit");
            Some(entry.path.clone())
        } else {
            tracing::debug!(hash, "Cache entry points at a missing file, treating as miss");
            None
        }
    }

    /// Record a generated asset under its cache key.
    ///
    /// No-op when caching is disabled for the calling config. Write errors
    /// propagate: a run that cannot persist its cache is treated like any
    /// other local I/O failure.
    pub async fn store(
        &self,
        hash: &str,
        path: &Path,
        config: &BrandConfig,
    ) -> std::io::Result<()> {
        if !config.cache {
            return Ok(());
        }

        let _guard = self.guard.lock().await;
        let mut entries = self.load().await;
        entries.insert(
            hash.to_string(),
            CacheEntry {
                hash: hash.to_string(),
                path: path.to_path_buf(),
                timestamp: chrono::Utc::now(),
                config: serde_json::to_value(CacheFingerprint::of(config))
                    .unwrap_or(serde_json::Value::Null),
            },
        );
        self.save(&entries).await
    }

    /// Read the full entry list; a missing or corrupt file yields an empty
    /// cache rather than an error.
    async fn load(&self) -> HashMap<String, CacheEntry> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_slice::<Vec<CacheEntry>>(&data) {
            Ok(list) => list.into_iter().map(|e| (e.hash.clone(), e)).collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable cache file");
                HashMap::new()
            }
        }
    }

    async fn save(&self, entries: &HashMap<String, CacheEntry>) -> std::io::Result<()> {
        let mut list: Vec<&CacheEntry> = entries.values().collect();
        list.sort_by(|a, b| a.hash.cmp(&b.hash));
        let json = serde_json::to_vec_pretty(&list).expect("cache entries serialize");
        tokio::fs::write(&self.path, json).await
    }
}
