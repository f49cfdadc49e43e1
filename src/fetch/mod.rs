// src/fetch/mod.rs
// =============================================================================
// This module gets archive pages, from the local cache when possible.
//
// Submodules:
// - http: Downloads pages with reqwest
// - cache: Stores downloaded pages and serves repeats from the store
// - error: What can go wrong while fetching
//
// Nothing here knows about mails or patches; it only moves text around.
// =============================================================================

mod cache;
mod error;
mod http;

pub use cache::{cache_key, CacheStats, CachedFetcher, DiskStore, MemoryStore, Store};
pub use error::FetchError;
pub use http::{Fetch, FetchConfig, HttpFetcher};
