//! Dashboard display state.
//!
//! Results live only in this transient state until explicitly saved.
//! Loading a history detail fully replaces the displayed set (one-way
//! override, never a merge); clearing the history view restores the prior
//! query-derived set. New query results are last-writer-wins: whatever
//! completes last overwrites the display, with no generation check.

use crate::query::QueryMode;
use crate::types::{BacktestResult, HistoryDetail};

/// Transient UI state for the dashboard.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// The query mode that produced the current query results
    mode: Option<QueryMode>,
    /// Displayed result set
    results: Vec<BacktestResult>,
    /// Query-derived results stashed while a history view is active
    stashed: Option<Vec<BacktestResult>>,
    /// Identifier of the loaded history entry, if any
    history_view: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the display with fresh query results (last-writer-wins).
    /// Any active history view is dropped.
    pub fn set_results(&mut self, mode: QueryMode, results: Vec<BacktestResult>) {
        self.mode = Some(mode);
        self.results = results;
        self.stashed = None;
        self.history_view = None;
    }

    /// Load a history detail, fully replacing the displayed set.
    ///
    /// The current query-derived set is stashed so it can be restored;
    /// loading a second history entry keeps the original stash.
    pub fn load_history(&mut self, object_name: &str, detail: HistoryDetail) {
        if self.history_view.is_none() {
            self.stashed = Some(std::mem::take(&mut self.results));
        }
        self.results = detail.results;
        self.history_view = Some(object_name.to_string());
    }

    /// Clear the history view, restoring the prior query-derived set.
    /// No-op when no history view is active.
    pub fn clear_history_view(&mut self) {
        if self.history_view.take().is_some() {
            self.results = self.stashed.take().unwrap_or_default();
        }
    }

    /// The result set currently displayed.
    pub fn displayed(&self) -> &[BacktestResult] {
        &self.results
    }

    /// The mode that produced the current query results, if any.
    pub fn mode(&self) -> Option<&QueryMode> {
        self.mode.as_ref()
    }

    /// Identifier of the loaded history entry, if a history view is active.
    pub fn history_view(&self) -> Option<&str> {
        self.history_view.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn result(symbol: &str) -> BacktestResult {
        BacktestResult {
            symbol: symbol.to_string(),
            company_name: format!("{} Inc.", symbol),
            market_cap: 2e9,
            earnings_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            earnings_time: None,
            price_before: 100.0,
            price_after: 110.0,
            price_change_pct: 0.10,
            date_before: NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
            date_after: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        }
    }

    fn detail(symbols: &[&str]) -> HistoryDetail {
        HistoryDetail {
            query_type: "stock".into(),
            params: serde_json::json!({}),
            results: symbols.iter().map(|s| result(s)).collect(),
            timestamp: "2025-08-20T10:00:00".into(),
            count: symbols.len(),
        }
    }

    fn mode() -> QueryMode {
        QueryMode::Recent {
            days: 7,
            min_market_cap: 1e9,
        }
    }

    #[test]
    fn test_history_load_replaces_and_clear_restores() {
        let mut state = DashboardState::new();
        state.set_results(mode(), vec![result("AAPL"), result("MSFT")]);

        state.load_history("stock/NVDA/x.json", detail(&["NVDA"]));
        assert_eq!(state.displayed().len(), 1);
        assert_eq!(state.displayed()[0].symbol, "NVDA");
        assert_eq!(state.history_view(), Some("stock/NVDA/x.json"));

        state.clear_history_view();
        assert_eq!(state.displayed().len(), 2);
        assert_eq!(state.displayed()[0].symbol, "AAPL");
        assert!(state.history_view().is_none());
    }

    #[test]
    fn test_second_history_load_keeps_original_stash() {
        let mut state = DashboardState::new();
        state.set_results(mode(), vec![result("AAPL")]);

        state.load_history("a.json", detail(&["NVDA"]));
        state.load_history("b.json", detail(&["TSLA", "AMD"]));
        assert_eq!(state.displayed().len(), 2);

        state.clear_history_view();
        assert_eq!(state.displayed().len(), 1);
        assert_eq!(state.displayed()[0].symbol, "AAPL");
    }

    #[test]
    fn test_new_results_drop_history_view() {
        let mut state = DashboardState::new();
        state.set_results(mode(), vec![result("AAPL")]);
        state.load_history("a.json", detail(&["NVDA"]));

        state.set_results(mode(), vec![result("GOOG")]);
        assert!(state.history_view().is_none());
        assert_eq!(state.displayed()[0].symbol, "GOOG");

        // Clearing after an overwrite must not resurrect the stash
        state.clear_history_view();
        assert_eq!(state.displayed()[0].symbol, "GOOG");
    }

    #[test]
    fn test_clear_without_history_view_is_noop() {
        let mut state = DashboardState::new();
        state.set_results(mode(), vec![result("AAPL")]);
        state.clear_history_view();
        assert_eq!(state.displayed().len(), 1);
    }
}
