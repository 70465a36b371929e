//! Query context: the explicitly passed object owning the API client and
//! a TTL response cache.
//!
//! Constructed once in `main` and passed by reference wherever queries are
//! issued; there is no global client singleton. Re-running the same query
//! descriptor within the TTL returns the cached result array instead of
//! issuing a second request.

use chrono::{DateTime, Duration, Utc};
use earnwatch_common::Result;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::api::BacktestApi;
use crate::batch::collect_batch;
use crate::query::QueryMode;
use crate::types::{BacktestRequest, BacktestResult};

/// Cache entry with TTL
#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<BacktestResult>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn new(results: Vec<BacktestResult>, ttl_secs: i64) -> Self {
        Self {
            results,
            expires_at: Utc::now() + Duration::seconds(ttl_secs),
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Application-scoped query context.
pub struct QueryContext<A: BacktestApi> {
    api: A,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl_secs: i64,
}

impl<A: BacktestApi> QueryContext<A> {
    /// Default cache TTL in seconds.
    pub const DEFAULT_TTL_SECS: i64 = 300;

    /// Create a context owning the given API client.
    pub fn new(api: A) -> Self {
        Self::with_ttl(api, Self::DEFAULT_TTL_SECS)
    }

    /// Create a context with a custom cache TTL.
    pub fn with_ttl(api: A, ttl_secs: i64) -> Self {
        Self {
            api,
            cache: RwLock::new(HashMap::new()),
            ttl_secs,
        }
    }

    /// Access the underlying API client (for history and AI operations
    /// that bypass the result cache).
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Execute a validated query mode, de-duplicating repeat requests
    /// within the TTL.
    ///
    /// Batch mode is aggregated via `collect_batch`; callers that want
    /// progress events should consume `run_batch` directly (uncached).
    pub async fn fetch(&self, mode: &QueryMode) -> Result<Vec<BacktestResult>> {
        mode.validate()?;

        let key = mode.cache_key();
        if let Some(hit) = self.cached(&key) {
            tracing::debug!(key = %key, "Query cache hit");
            return Ok(hit);
        }

        let results = match mode {
            QueryMode::Single {
                symbol,
                earnings_date,
            } => vec![self.api.stock_backtest(symbol, *earnings_date).await?],
            QueryMode::Search {
                symbol,
                start_date,
                end_date,
            } => {
                self.api
                    .search_stock_earnings(symbol, *start_date, *end_date)
                    .await?
            }
            QueryMode::Recent {
                days,
                min_market_cap,
            } => self.api.recent_earnings(*days, *min_market_cap).await?,
            QueryMode::Custom {
                start_date,
                end_date,
                min_market_cap,
            } => {
                let request = BacktestRequest {
                    start_date: *start_date,
                    end_date: *end_date,
                    min_market_cap: *min_market_cap,
                };
                self.api.run_backtest(&request).await?
            }
            QueryMode::Batch {
                symbols,
                start_date,
                end_date,
            } => {
                let outcome = collect_batch(&self.api, symbols, *start_date, *end_date).await;
                // A run with any failed symbol is incomplete; serve it once
                // but leave it uncached so the next invocation re-attempts.
                if !outcome.failed.is_empty() {
                    tracing::debug!(
                        key = %key,
                        failed = outcome.failed.len(),
                        "Batch had failures, skipping cache"
                    );
                    return Ok(outcome.results);
                }
                outcome.results
            }
        };

        self.store(key, results.clone());
        Ok(results)
    }

    fn cached(&self, key: &str) -> Option<Vec<BacktestResult>> {
        let cache = self.cache.read().ok()?;
        cache.get(key).and_then(|entry| {
            if entry.is_expired() {
                None
            } else {
                Some(entry.results.clone())
            }
        })
    }

    fn store(&self, key: String, results: Vec<BacktestResult>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, CacheEntry::new(results, self.ttl_secs));
        }
    }

    /// Invalidate one cached query.
    pub fn invalidate(&self, mode: &QueryMode) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(&mode.cache_key());
        }
    }

    /// Drop all cached responses.
    pub fn invalidate_all(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Drop expired entries.
    pub fn clear_expired(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.retain(|_, entry| !entry.is_expired());
        }
    }
}
