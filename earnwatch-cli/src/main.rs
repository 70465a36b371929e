//! Earnwatch - terminal dashboard for earnings-backtest queries.
//!
//! Queries an upstream earnings-backtest API, renders result tables, and
//! manages saved result sets.

mod commands;
mod table;

use anyhow::Result;
use clap::Parser;
use earnwatch_client::{ApiClient, QueryContext};
use earnwatch_common::logging::init_logging;
use earnwatch_common::Config;

use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "earnwatch",
    version,
    about = "Dashboard for earnings-announcement price backtests"
)]
struct Cli {
    /// Override the API base URL (also: EARNWATCH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.endpoint = url;
    }

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::debug!(endpoint = %config.api.endpoint, "Earnwatch v{}", env!("CARGO_PKG_VERSION"));

    let context = QueryContext::new(ApiClient::new(&config));
    commands::handle(cli.command, &context, &config).await
}
