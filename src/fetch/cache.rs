// src/fetch/cache.rs
// =============================================================================
// This module puts a cache in front of the network.
//
// Scraping a month of an archive means hundreds of GETs. The first run fills
// the cache; later runs read everything back from disk and never hit the
// server again.
//
// How it works:
// 1. Turn the URL into a key (a percent-encoded, file-name-safe string)
// 2. If the store has that key, return the stored page (a "hit")
// 3. Otherwise fetch it, save it under the key, and return it (a "miss")
//
// Pieces:
// - Store: where cached pages live (DiskStore, or MemoryStore in tests)
// - CachedFetcher: wraps any Fetch plus any Store, counts hits and misses
//
// Rust concepts:
// - Generics: CachedFetcher<F, S> works with any fetcher and any store
// - Atomics: Counting hits/misses through a shared reference (&self)
// - Mutex: Interior mutability for the in-memory store
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{Fetch, FetchError};

// Everything except letters, digits and "_.-~" gets escaped, '/' included,
// so a whole URL becomes one flat file name
const KEY_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Turns a URL into a cache key.
///
/// `https://gcc.gnu.org/ml/x/msg1.html` becomes
/// `https%3A%2F%2Fgcc.gnu.org%2Fml%2Fx%2Fmsg1.html`.
pub fn cache_key(url: &str) -> String {
    utf8_percent_encode(url, KEY_ESCAPES).to_string()
}

/// A key-value store for fetched pages.
pub trait Store: Send + Sync {
    /// Returns the stored content, or None if the key is not stored.
    fn load(&self, key: &str) -> Result<Option<String>, FetchError>;

    fn save(&self, key: &str, content: &str) -> Result<(), FetchError>;
}

/// Stores one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    // The directory is created lazily, on the first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Store for DiskStore {
    fn load(&self, key: &str) -> Result<Option<String>, FetchError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FetchError::cache(path, e)),
        }
    }

    // The page goes to a temp file in the same directory and is renamed over
    // the key, so an interrupted write never leaves a truncated page behind
    fn save(&self, key: &str, content: &str) -> Result<(), FetchError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| FetchError::cache(&self.dir, e))?;

        let mut file = NamedTempFile::new_in(&self.dir).map_err(|e| FetchError::cache(&self.dir, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| FetchError::cache(file.path(), e))?;

        let path = self.path_for(key);
        file.persist(&path).map_err(|e| FetchError::cache(path, e.error))?;
        Ok(())
    }
}

/// Keeps pages in memory. Handy for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock can't leave the map half-updated,
    // so a poisoned lock is still safe to read
    fn pages(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.pages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.pages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, FetchError> {
        Ok(self.pages().get(key).cloned())
    }

    fn save(&self, key: &str, content: &str) -> Result<(), FetchError> {
        self.pages().insert(key.to_string(), content.to_string());
        Ok(())
    }
}

/// How often the cache saved us a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// A fetcher that consults a store before going to the network.
pub struct CachedFetcher<F, S> {
    fetcher: F,
    store: S,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<F: Fetch, S: Store> CachedFetcher<F, S> {
    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            fetcher,
            store,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    // Gets a page, from the store if we have it, from the network if not
    //
    // A failed fetch stores nothing, so the next run tries again.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let key = cache_key(url);

        if let Some(content) = self.store.load(&key)? {
            debug!(%url, "using cache");
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(content);
        }

        info!(%url, "GET");
        self.misses.fetch_add(1, Ordering::Relaxed);
        let content = self.fetcher.fetch(url).await?;
        self.store.save(&key, &content)?;

        Ok(content)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why AtomicUsize instead of a plain usize?
//    - get() takes &self, so we can't mutate normal fields
//    - Atomics can be updated through a shared reference
//    - Ordering::Relaxed is enough: the counts are just statistics
//
// 2. What is `Err(e) if e.kind() == ...`?
//    - A match guard: the arm only matches if the condition is true
//    - A missing file is a normal cache miss, any other I/O error is real
//
// 3. Why is the store a trait?
//    - The scraper doesn't care where pages are kept
//    - DiskStore for real runs, MemoryStore for tests
//    - Same CachedFetcher code works with both (generics)
// -----------------------------------------------------------------------------
