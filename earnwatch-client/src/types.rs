//! Wire types for the earnings-backtest API.
//!
//! All payloads are received as JSON and treated as immutable once
//! deserialized; result arrays keep the API-returned order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether an earnings announcement occurred before or after market hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionFlag {
    /// Before Market Open
    #[serde(rename = "BMO")]
    Bmo,
    /// After Market Close
    #[serde(rename = "AMC")]
    Amc,
}

impl std::fmt::Display for SessionFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bmo => write!(f, "BMO"),
            Self::Amc => write!(f, "AMC"),
        }
    }
}

/// One backtest record: the price move around a single earnings
/// announcement.
///
/// `price_change_pct` is a fraction (0.1234 = +12.34%), as serialized by
/// the upstream; conversion to percent happens at the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub company_name: String,
    /// Market capitalization in USD
    pub market_cap: f64,
    pub earnings_date: NaiveDate,
    /// Announcement session; None when the upstream could not determine it
    #[serde(default)]
    pub earnings_time: Option<SessionFlag>,
    /// Closing price before the announcement
    pub price_before: f64,
    /// Closing price after the announcement
    pub price_after: f64,
    /// Fractional price change between the two closes
    pub price_change_pct: f64,
    /// Trading date of `price_before`
    pub date_before: NaiveDate,
    /// Trading date of `price_after`
    pub date_after: NaiveDate,
}

/// Parameters for a ranged backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_min_market_cap")]
    pub min_market_cap: f64,
}

fn default_min_market_cap() -> f64 {
    1_000_000_000.0
}

/// Lightweight index entry for a saved result set.
///
/// The identifier is assigned by the storage collaborator and treated as
/// opaque; the client never generates or parses its structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub object_name: String,
    pub query_type: String,
    #[serde(default)]
    pub query_key: Option<String>,
    pub size: u64,
    pub last_modified: String,
}

/// Full saved payload for one history entry, fetched lazily per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDetail {
    pub query_type: String,
    /// The originating query parameters, as saved
    pub params: serde_json::Value,
    pub results: Vec<BacktestResult>,
    pub timestamp: String,
    pub count: usize,
}

/// AI-assisted validation verdict for one result record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub symbol: String,
    pub is_valid: bool,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Response from the history save endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveResponse {
    pub object_name: String,
    #[serde(default)]
    pub message: String,
}
