//! Query model for the dashboard.
//!
//! One tagged `QueryMode` holds only the fields relevant to the active
//! mode, so invalid cross-mode field combinations are unrepresentable.
//! Validation runs locally before any request is issued.

use chrono::NaiveDate;
use earnwatch_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum custom/batch date-range span in days (inclusive).
pub const MAX_RANGE_DAYS: i64 = 30;

/// Upper bound for the recent-window lookback.
pub const MAX_RECENT_DAYS: u32 = 30;

/// The active query mode with its mode-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum QueryMode {
    /// One symbol at one known earnings date
    Single {
        symbol: String,
        earnings_date: NaiveDate,
    },
    /// One symbol's earnings history over a date range
    Search {
        symbol: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// Earnings over the past N days with a market-cap floor
    Recent { days: u32, min_market_cap: f64 },
    /// Ranged backtest over a custom window
    Custom {
        start_date: NaiveDate,
        end_date: NaiveDate,
        min_market_cap: f64,
    },
    /// One search per symbol over a shared window
    Batch {
        symbols: Vec<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl QueryMode {
    /// Validate mode-specific inputs. An `Err` here means the search
    /// action is disabled; nothing is sent upstream.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Single { symbol, .. } => {
                if symbol.trim().is_empty() {
                    return Err(Error::InvalidInput("symbol must not be empty".into()));
                }
                Ok(())
            }
            Self::Search {
                symbol,
                start_date,
                end_date,
            } => {
                if symbol.trim().is_empty() {
                    return Err(Error::InvalidInput("symbol must not be empty".into()));
                }
                validate_range(*start_date, *end_date)
            }
            Self::Recent { days, .. } => {
                if *days == 0 || *days > MAX_RECENT_DAYS {
                    return Err(Error::InvalidInput(format!(
                        "days must be between 1 and {}, got {}",
                        MAX_RECENT_DAYS, days
                    )));
                }
                Ok(())
            }
            Self::Custom {
                start_date,
                end_date,
                ..
            } => validate_range(*start_date, *end_date),
            Self::Batch {
                symbols,
                start_date,
                end_date,
            } => {
                if symbols.is_empty() {
                    return Err(Error::InvalidInput(
                        "batch symbol list must not be empty".into(),
                    ));
                }
                validate_range(*start_date, *end_date)
            }
        }
    }

    /// Query type tag used by the history store ("stock", "recent",
    /// "custom", "batch"). Single-symbol range searches file under "stock",
    /// matching the store's object-name scheme.
    pub fn query_type(&self) -> &'static str {
        match self {
            Self::Single { .. } | Self::Search { .. } => "stock",
            Self::Recent { .. } => "recent",
            Self::Custom { .. } => "custom",
            Self::Batch { .. } => "batch",
        }
    }

    /// Originating parameters as a JSON object, saved alongside results.
    pub fn params(&self) -> serde_json::Value {
        match self {
            Self::Single {
                symbol,
                earnings_date,
            } => serde_json::json!({
                "symbol": symbol,
                "earnings_date": earnings_date.to_string(),
            }),
            Self::Search {
                symbol,
                start_date,
                end_date,
            } => serde_json::json!({
                "symbol": symbol,
                "start_date": start_date.to_string(),
                "end_date": end_date.to_string(),
            }),
            Self::Recent {
                days,
                min_market_cap,
            } => serde_json::json!({
                "days": days,
                "min_market_cap": min_market_cap,
            }),
            Self::Custom {
                start_date,
                end_date,
                min_market_cap,
            } => serde_json::json!({
                "start_date": start_date.to_string(),
                "end_date": end_date.to_string(),
                "min_market_cap": min_market_cap,
            }),
            Self::Batch {
                symbols,
                start_date,
                end_date,
            } => serde_json::json!({
                "symbols": symbols,
                "start_date": start_date.to_string(),
                "end_date": end_date.to_string(),
            }),
        }
    }

    /// Stable cache key for response de-duplication.
    pub fn cache_key(&self) -> String {
        match self {
            Self::Single {
                symbol,
                earnings_date,
            } => format!("stock:{}:{}", symbol, earnings_date),
            Self::Search {
                symbol,
                start_date,
                end_date,
            } => format!("search:{}:{}:{}", symbol, start_date, end_date),
            Self::Recent {
                days,
                min_market_cap,
            } => format!("recent:{}:{}", days, min_market_cap),
            Self::Custom {
                start_date,
                end_date,
                min_market_cap,
            } => format!("custom:{}:{}:{}", start_date, end_date, min_market_cap),
            Self::Batch {
                symbols,
                start_date,
                end_date,
            } => format!("batch:{}:{}:{}", symbols.join("+"), start_date, end_date),
        }
    }
}

/// Check that a custom window is non-empty and spans at most
/// `MAX_RANGE_DAYS` days (end inclusive).
fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::InvalidInput(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }

    let span = (end - start).num_days();
    if span > MAX_RANGE_DAYS {
        return Err(Error::InvalidInput(format!(
            "date range spans {} days, maximum is {}",
            span, MAX_RANGE_DAYS
        )));
    }

    Ok(())
}

/// Parse a free-text batch symbol list.
///
/// Splits on whitespace, commas, and semicolons (including the full-width
/// variants `，` `；` `、` and ideographic space), uppercases each token,
/// and keeps only tokens consisting entirely of ASCII letters. First-seen
/// order is preserved; duplicates are dropped.
pub fn parse_symbol_list(input: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for token in input.split(is_symbol_delimiter) {
        if token.is_empty() {
            continue;
        }

        let upper = token.to_uppercase();
        if !upper.chars().all(|c| c.is_ascii_uppercase()) {
            continue;
        }

        if !symbols.contains(&upper) {
            symbols.push(upper);
        }
    }

    symbols
}

fn is_symbol_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '，' | '；' | '、')
}
