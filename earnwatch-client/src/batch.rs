//! Sequential batch aggregation with progress events.
//!
//! Batch mode iterates the symbol list strictly sequentially, one fetch at
//! a time. The loop is an explicit await chain on purpose: the upstream
//! provider is rate-limited and the batch sizes are small, so fan-out buys
//! nothing. One symbol's failure is logged and skipped; the batch never
//! aborts.
//!
//! Instead of driving a UI directly, the runner yields a stream of
//! `BatchEvent`s that any front end can consume.

use chrono::NaiveDate;
use futures::Stream;
use tracing::{debug, warn};

use crate::api::BacktestApi;
use crate::types::BacktestResult;

/// One step of a batch run.
#[derive(Debug)]
pub enum BatchEvent {
    /// About to fetch `symbol` (`index` is zero-based).
    Progress {
        index: usize,
        total: usize,
        symbol: String,
    },
    /// Fetch for `symbol` succeeded.
    Results {
        symbol: String,
        results: Vec<BacktestResult>,
    },
    /// Fetch for `symbol` failed; the batch continues.
    Failed { symbol: String, error: String },
    /// All symbols processed.
    Done { total_results: usize },
}

/// Run a batch query, yielding one `Progress` and one `Results`/`Failed`
/// event per symbol, then `Done`.
pub fn run_batch<'a, A: BacktestApi + ?Sized>(
    api: &'a A,
    symbols: &'a [String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> impl Stream<Item = BatchEvent> + 'a {
    let total = symbols.len();

    async_stream::stream! {
        let mut total_results = 0usize;

        for (index, symbol) in symbols.iter().enumerate() {
            yield BatchEvent::Progress {
                index,
                total,
                symbol: symbol.clone(),
            };

            match api.search_stock_earnings(symbol, start_date, end_date).await {
                Ok(results) => {
                    debug!(symbol = %symbol, count = results.len(), "Batch symbol fetched");
                    total_results += results.len();
                    yield BatchEvent::Results {
                        symbol: symbol.clone(),
                        results,
                    };
                }
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "Batch symbol failed, continuing");
                    yield BatchEvent::Failed {
                        symbol: symbol.clone(),
                        error: e.to_string(),
                    };
                }
            }
        }

        yield BatchEvent::Done { total_results };
    }
}

/// Aggregated outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful results, concatenated in input order
    pub results: Vec<BacktestResult>,
    /// Symbols whose fetch failed (their results are simply absent)
    pub failed: Vec<String>,
}

/// Fold a batch run into a flat result list plus the failed symbols.
///
/// Per-symbol result order is preserved and symbols are concatenated in
/// input order; a failed symbol contributes nothing to `results`.
pub async fn collect_batch<A: BacktestApi + ?Sized>(
    api: &A,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> BatchOutcome {
    use futures::StreamExt;

    let mut outcome = BatchOutcome::default();
    let stream = run_batch(api, symbols, start_date, end_date);
    futures::pin_mut!(stream);

    while let Some(event) = stream.next().await {
        match event {
            BatchEvent::Results { mut results, .. } => {
                outcome.results.append(&mut results);
            }
            BatchEvent::Failed { symbol, .. } => {
                outcome.failed.push(symbol);
            }
            _ => {}
        }
    }

    outcome
}
