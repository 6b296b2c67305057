//! Scholarly Search
//!
//! `ScholarSearch` abstracts the external scholarly-search provider so the
//! pipeline can be exercised with injected fakes. `SerpApiClient` is the
//! production implementation over SerpAPI's Google Scholar engine with
//! multi-key failover: credentials are tried in order on any non-success
//! response, bounded by the number of configured keys, no backoff.
//!
//! Each run owns its own client instance, so credential rotation never
//! leaks across concurrent runs.

mod serpapi;

pub use serpapi::SerpApiClient;

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::{Result, SearchHit};

/// Shared search handle, constructed once per run and passed by reference
/// into the reference gatherer.
pub type SharedSearch = Arc<dyn ScholarSearch + Send + Sync>;

/// A scholarly-search backend returning ranked result snippets.
#[async_trait]
pub trait ScholarSearch: Send + Sync {
    /// Issue one query and return ranked hits, best first.
    /// A query may legitimately yield zero hits.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>>;
}
