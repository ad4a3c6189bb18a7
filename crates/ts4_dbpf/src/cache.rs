//! Memoization of decompressed resource data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::entry::ResourceKey;

/// Counters describing how a [`ResourceCache`] has been used
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Decompressed resource data keyed by resource key
///
/// Values are immutable once stored and live until [`ResourceCache::clear`].
/// There is no eviction, so long passes over large packages should clear the
/// cache between unrelated work.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: RwLock<HashMap<ResourceKey, Arc<[u8]>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached data for `key`, or produce it with `load` and store it
    ///
    /// `load` runs without holding the lock. When two threads miss on the same
    /// key at once both run `load`, and the value stored first is the one every
    /// caller gets back. Errors from `load` are passed through and nothing is
    /// stored.
    pub fn get_or_try_insert<E>(
        &self,
        key: ResourceKey,
        load: impl FnOnce() -> Result<Vec<u8>, E>,
    ) -> Result<Arc<[u8]>, E> {
        if let Some(data) = self.get(&key) {
            return Ok(data);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let data: Arc<[u8]> = load()?.into();

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(entries.entry(key).or_insert(data).clone())
    }

    /// Look up `key` without loading it
    pub fn get(&self, key: &ResourceKey) -> Option<Arc<[u8]>> {
        let data = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        if data.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        data
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached value
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
