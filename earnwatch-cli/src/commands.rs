//! Command handlers for the Earnwatch CLI.
//!
//! Each query subcommand builds a `QueryMode`, validates it locally, runs
//! it through the shared `QueryContext`, renders the table, and optionally
//! saves the result set to history.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use futures::StreamExt;

use earnwatch_client::batch::{run_batch, BatchEvent};
use earnwatch_client::history::HistoryStore;
use earnwatch_client::{parse_symbol_list, ApiClient, BacktestApi, QueryContext, QueryMode};
use earnwatch_common::Config;

use crate::table;

/// Earnwatch subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a ranged backtest over a custom window (max 30 days)
    Run {
        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        /// Minimum market capitalization in USD
        #[arg(long)]
        min_cap: Option<f64>,

        /// Save the result set to history
        #[arg(long)]
        save: bool,
    },

    /// Fetch recent earnings results
    Recent {
        /// Lookback window in days (1-30)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=30))]
        days: Option<u32>,

        /// Minimum market capitalization in USD
        #[arg(long)]
        min_cap: Option<f64>,

        /// Save the result set to history
        #[arg(long)]
        save: bool,
    },

    /// Backtest one symbol at a known earnings date
    Stock {
        /// Stock symbol (e.g. NVDA)
        symbol: String,

        /// Earnings date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// Save the result set to history
        #[arg(long)]
        save: bool,
    },

    /// Search one symbol's earnings history over a date range
    Search {
        /// Stock symbol (e.g. NVDA)
        symbol: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        /// Save the result set to history
        #[arg(long)]
        save: bool,
    },

    /// Run one search per symbol from a free-text list, sequentially
    Batch {
        /// Symbol list; whitespace, comma, and semicolon delimited
        /// (full-width variants accepted)
        symbols: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        /// Save the aggregated result set to history
        #[arg(long)]
        save: bool,
    },

    /// AI-assisted validation of a saved result set
    Validate {
        /// History entry identifier
        id: String,
    },

    /// AI-assisted pattern analysis of a saved result set
    Analyze {
        /// History entry identifier
        id: String,
    },

    /// Manage saved query history
    History {
        #[command(subcommand)]
        history_command: HistoryCommands,
    },
}

/// History subcommands.
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List saved result sets
    List {
        /// Filter by prefix (stock/, recent/, custom/)
        #[arg(long, default_value = "")]
        prefix: String,

        /// Maximum entries to return (1-200)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: Option<u32>,
    },

    /// Show one saved result set
    Show {
        /// History entry identifier
        id: String,
    },

    /// Delete one saved result set
    Delete {
        /// History entry identifier
        id: String,
    },
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date {:?}: {}", s, e))
}

/// Dispatch a parsed command.
pub async fn handle(
    command: Commands,
    context: &QueryContext<ApiClient>,
    config: &Config,
) -> Result<()> {
    match command {
        Commands::Run {
            start,
            end,
            min_cap,
            save,
        } => {
            let mode = QueryMode::Custom {
                start_date: start,
                end_date: end,
                min_market_cap: min_cap.unwrap_or(config.defaults.min_market_cap),
            };
            run_query(context, mode, save).await
        }

        Commands::Recent {
            days,
            min_cap,
            save,
        } => {
            let mode = QueryMode::Recent {
                days: days.unwrap_or(config.defaults.recent_days),
                min_market_cap: min_cap.unwrap_or(config.defaults.min_market_cap),
            };
            run_query(context, mode, save).await
        }

        Commands::Stock { symbol, date, save } => {
            let mode = QueryMode::Single {
                symbol: symbol.to_uppercase(),
                earnings_date: date,
            };
            run_query(context, mode, save).await
        }

        Commands::Search {
            symbol,
            start,
            end,
            save,
        } => {
            let mode = QueryMode::Search {
                symbol: symbol.to_uppercase(),
                start_date: start,
                end_date: end,
            };
            run_query(context, mode, save).await
        }

        Commands::Batch {
            symbols,
            start,
            end,
            save,
        } => handle_batch(context, &symbols, start, end, save).await,

        Commands::Validate { id } => handle_validate(context.api(), &id).await,

        Commands::Analyze { id } => handle_analyze(context.api(), &id).await,

        Commands::History { history_command } => {
            handle_history(context.api(), history_command, config).await
        }
    }
}

/// Validate, fetch, render, and optionally save one query.
async fn run_query(
    context: &QueryContext<ApiClient>,
    mode: QueryMode,
    save: bool,
) -> Result<()> {
    mode.validate()
        .context("Search rejected before any request was issued")?;

    let results = context
        .fetch(&mode)
        .await
        .with_context(|| format!("Query failed against {}", context.api().base_url()))?;

    table::render_results(&results);
    save_if_requested(context.api(), &mode, &results, save).await
}

/// Batch mode with live progress lines, consuming the event stream.
async fn handle_batch(
    context: &QueryContext<ApiClient>,
    raw_symbols: &str,
    start: NaiveDate,
    end: NaiveDate,
    save: bool,
) -> Result<()> {
    let symbols = parse_symbol_list(raw_symbols);
    let mode = QueryMode::Batch {
        symbols: symbols.clone(),
        start_date: start,
        end_date: end,
    };
    mode.validate()
        .context("Search rejected before any request was issued")?;

    let mut accumulator = Vec::new();
    {
        let stream = run_batch(context.api(), &symbols, start, end);
        futures::pin_mut!(stream);

        while let Some(event) = stream.next().await {
            match event {
                BatchEvent::Progress {
                    index,
                    total,
                    symbol,
                } => {
                    println!(
                        "[{}/{}] {} ...",
                        index + 1,
                        total,
                        style(&symbol).bold()
                    );
                }
                BatchEvent::Results { mut results, .. } => {
                    accumulator.append(&mut results);
                }
                BatchEvent::Failed { symbol, error } => {
                    eprintln!("  {} {}: {}", style("skipped").yellow(), symbol, error);
                }
                BatchEvent::Done { total_results } => {
                    println!();
                    println!("Batch complete: {} result(s)", total_results);
                }
            }
        }
    }

    table::render_results(&accumulator);
    save_if_requested(context.api(), &mode, &accumulator, save).await
}

async fn save_if_requested(
    api: &ApiClient,
    mode: &QueryMode,
    results: &[earnwatch_client::BacktestResult],
    save: bool,
) -> Result<()> {
    if !save {
        return Ok(());
    }

    let store = HistoryStore::new(api);
    match store.save(mode, results).await? {
        Some(object_name) => println!("Saved to history: {}", object_name),
        None => println!("Nothing to save (empty result set)."),
    }
    Ok(())
}

async fn handle_validate(api: &ApiClient, id: &str) -> Result<()> {
    let store = HistoryStore::new(api);
    let detail = store
        .detail(id)
        .await
        .with_context(|| format!("Failed to load history entry {}", id))?;

    let verdicts = api
        .validate_results(&detail.results)
        .await
        .context("Validation request failed")?;

    println!("Validation of {} ({} result(s))", id, detail.count);
    println!("{}", "-".repeat(60));
    for v in &verdicts {
        let mark = if v.is_valid {
            style("ok").green()
        } else {
            style("FAIL").red()
        };
        println!("  {:<8} [{}] {}", v.symbol, mark, v.message);
    }
    Ok(())
}

async fn handle_analyze(api: &ApiClient, id: &str) -> Result<()> {
    let store = HistoryStore::new(api);
    let detail = store
        .detail(id)
        .await
        .with_context(|| format!("Failed to load history entry {}", id))?;

    let report = api
        .analyze_pattern(&detail.results)
        .await
        .context("Analysis request failed")?;

    println!("Pattern analysis of {} ({} result(s))", id, detail.count);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn handle_history(
    api: &ApiClient,
    command: HistoryCommands,
    config: &Config,
) -> Result<()> {
    let store = HistoryStore::new(api);

    match command {
        HistoryCommands::List { prefix, limit } => {
            let records = store
                .list(&prefix, limit.unwrap_or(config.defaults.history_limit))
                .await
                .context("Failed to list history")?;
            table::render_history(&records);
            Ok(())
        }

        HistoryCommands::Show { id } => {
            let detail = store
                .detail(&id)
                .await
                .with_context(|| format!("Failed to load history entry {}", id))?;

            println!(
                "{} query saved at {} ({} result(s))",
                detail.query_type, detail.timestamp, detail.count
            );
            println!("Parameters: {}", serde_json::to_string(&detail.params)?);
            println!();
            table::render_results(&detail.results);
            Ok(())
        }

        HistoryCommands::Delete { id } => {
            store
                .delete(&id)
                .await
                .with_context(|| format!("Failed to delete history entry {}", id))?;
            println!("Deleted {}", id);
            Ok(())
        }
    }
}
