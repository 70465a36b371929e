//! History store client.
//!
//! Thin wrapper over the API's four history operations. Identifiers are
//! assigned by the storage collaborator and treated as opaque. Saves are
//! fire-and-forget: the upstream performs no deduplication, so repeated
//! saves of the same logical query produce distinct entries.

use earnwatch_common::Result;
use tracing::info;

use crate::api::BacktestApi;
use crate::query::QueryMode;
use crate::types::{BacktestResult, HistoryDetail, HistoryRecord};

/// Client for the saved-query history store.
pub struct HistoryStore<'a, A: BacktestApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: BacktestApi + ?Sized> HistoryStore<'a, A> {
    /// Wrap an API handle.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// List saved entries, newest first, filtered by query-type prefix
    /// ("stock/", "recent/", "custom/", or "" for all).
    pub async fn list(&self, prefix: &str, limit: u32) -> Result<Vec<HistoryRecord>> {
        self.api.list_history(prefix, limit).await
    }

    /// Fetch the full payload for one entry.
    pub async fn detail(&self, object_name: &str) -> Result<HistoryDetail> {
        self.api.history_detail(object_name).await
    }

    /// Delete one entry.
    pub async fn delete(&self, object_name: &str) -> Result<()> {
        self.api.delete_history(object_name).await?;
        info!(object_name, "History entry deleted");
        Ok(())
    }

    /// Save a result set together with its originating query.
    ///
    /// Returns the assigned identifier, or `None` for an empty result set
    /// (no request is issued).
    pub async fn save(
        &self,
        mode: &QueryMode,
        results: &[BacktestResult],
    ) -> Result<Option<String>> {
        let saved = self
            .api
            .save_history(mode.query_type(), &mode.params(), results)
            .await?;

        if let Some(ref object_name) = saved {
            info!(object_name = %object_name, count = results.len(), "Query saved to history");
        }

        Ok(saved)
    }
}
