//! Earnwatch client library.
//!
//! Talks to an upstream earnings-backtest HTTP API: builds query
//! descriptors from user-selected modes, fetches backtest result records,
//! aggregates batch queries sequentially with progress events, formats
//! results for display, and manages saved result sets through the API's
//! history endpoints.
//!
//! # Data Flow
//!
//! ```text
//! QueryMode ──> QueryContext ──> ApiClient ──> Vec<BacktestResult>
//!                                                   │
//!                          DashboardState <─────────┤
//!                          (table render)           └──> HistoryStore (save)
//! ```
//!
//! History retrieval flows back: a stored detail replaces the displayed
//! result set until the history view is cleared.

#![warn(clippy::all)]

pub mod api;
pub mod batch;
pub mod context;
pub mod format;
pub mod history;
pub mod query;
pub mod state;
pub mod types;

pub use api::{ApiClient, BacktestApi};
pub use batch::{collect_batch, run_batch, BatchEvent, BatchOutcome};
pub use context::QueryContext;
pub use history::HistoryStore;
pub use query::{parse_symbol_list, QueryMode, MAX_RANGE_DAYS};
pub use state::DashboardState;
pub use types::{
    BacktestRequest, BacktestResult, HistoryDetail, HistoryRecord, SessionFlag, ValidationResult,
};
