//! HTTP client for the earnings-backtest API.
//!
//! The `BacktestApi` trait is the seam between the dashboard and the
//! upstream service: the batch aggregator, the history store, and the CLI
//! all work against the trait, so tests can substitute a mock.
//!
//! Failures are surfaced, never retried; a transport error and a non-2xx
//! status both map to the common error type.

use async_trait::async_trait;
use chrono::NaiveDate;
use earnwatch_common::{Config, Error, Result};
use tracing::debug;

use crate::types::{
    BacktestRequest, BacktestResult, HistoryDetail, HistoryRecord, SaveResponse, ValidationResult,
};

/// Operations exposed by the upstream earnings-backtest service.
#[async_trait]
pub trait BacktestApi: Send + Sync {
    /// Run a ranged backtest (POST /api/backtest/run).
    async fn run_backtest(&self, request: &BacktestRequest) -> Result<Vec<BacktestResult>>;

    /// Fetch recent earnings results with a market-cap floor
    /// (GET /api/backtest/recent).
    async fn recent_earnings(&self, days: u32, min_market_cap: f64)
        -> Result<Vec<BacktestResult>>;

    /// Fetch one symbol's backtest at a known earnings date
    /// (GET /api/backtest/stock/{symbol}).
    async fn stock_backtest(&self, symbol: &str, earnings_date: NaiveDate)
        -> Result<BacktestResult>;

    /// Search one symbol's earnings history over a date range
    /// (GET /api/backtest/stock-search/{symbol}).
    async fn search_stock_earnings(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<BacktestResult>>;

    /// AI-assisted validation of a result set (POST /api/backtest/validate).
    async fn validate_results(&self, results: &[BacktestResult]) -> Result<Vec<ValidationResult>>;

    /// AI-assisted pattern analysis of a result set
    /// (POST /api/backtest/analyze).
    async fn analyze_pattern(&self, results: &[BacktestResult]) -> Result<serde_json::Value>;

    /// List saved result sets (GET /api/backtest/history).
    async fn list_history(&self, prefix: &str, limit: u32) -> Result<Vec<HistoryRecord>>;

    /// Fetch one saved result set (GET /api/backtest/history/{id}).
    async fn history_detail(&self, object_name: &str) -> Result<HistoryDetail>;

    /// Delete one saved result set (DELETE /api/backtest/history/{id}).
    async fn delete_history(&self, object_name: &str) -> Result<()>;

    /// Persist a result set plus its originating parameters
    /// (POST /api/backtest/history/save). Returns the assigned identifier,
    /// or `None` when `results` is empty (no request is issued).
    async fn save_history(
        &self,
        query_type: &str,
        params: &serde_json::Value,
        results: &[BacktestResult],
    ) -> Result<Option<String>>;
}

/// Reqwest-backed client for the earnings-backtest API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client from configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.api.endpoint, config.api.timeout_secs)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a response to the common error type, passing 2xx through.
    async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(what.to_string()));
        }

        Err(Error::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let raw = resp.text().await.map_err(Error::transport)?;
        serde_json::from_str(&raw).map_err(Error::Json)
    }
}

#[async_trait]
impl BacktestApi for ApiClient {
    async fn run_backtest(&self, request: &BacktestRequest) -> Result<Vec<BacktestResult>> {
        debug!(
            start = %request.start_date,
            end = %request.end_date,
            min_market_cap = request.min_market_cap,
            "Running ranged backtest"
        );

        let resp = self
            .client
            .post(self.url("/api/backtest/run"))
            .json(request)
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, "backtest run").await?).await
    }

    async fn recent_earnings(
        &self,
        days: u32,
        min_market_cap: f64,
    ) -> Result<Vec<BacktestResult>> {
        let resp = self
            .client
            .get(self.url("/api/backtest/recent"))
            .query(&[("days", days.to_string()), ("min_market_cap", min_market_cap.to_string())])
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, "recent earnings").await?).await
    }

    async fn stock_backtest(
        &self,
        symbol: &str,
        earnings_date: NaiveDate,
    ) -> Result<BacktestResult> {
        let resp = self
            .client
            .get(self.url(&format!("/api/backtest/stock/{}", symbol)))
            .query(&[("earnings_date", earnings_date.to_string())])
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, symbol).await?).await
    }

    async fn search_stock_earnings(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<BacktestResult>> {
        debug!(symbol, start = %start_date, end = %end_date, "Searching stock earnings");

        let resp = self
            .client
            .get(self.url(&format!("/api/backtest/stock-search/{}", symbol)))
            .query(&[
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
            ])
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, symbol).await?).await
    }

    async fn validate_results(&self, results: &[BacktestResult]) -> Result<Vec<ValidationResult>> {
        let resp = self
            .client
            .post(self.url("/api/backtest/validate"))
            .json(results)
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, "validation").await?).await
    }

    async fn analyze_pattern(&self, results: &[BacktestResult]) -> Result<serde_json::Value> {
        let resp = self
            .client
            .post(self.url("/api/backtest/analyze"))
            .json(results)
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, "analysis").await?).await
    }

    async fn list_history(&self, prefix: &str, limit: u32) -> Result<Vec<HistoryRecord>> {
        let resp = self
            .client
            .get(self.url("/api/backtest/history"))
            .query(&[("prefix", prefix.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, "history list").await?).await
    }

    async fn history_detail(&self, object_name: &str) -> Result<HistoryDetail> {
        let resp = self
            .client
            .get(self.url(&format!("/api/backtest/history/{}", object_name)))
            .send()
            .await
            .map_err(Error::transport)?;

        Self::parse(Self::check(resp, object_name).await?).await
    }

    async fn delete_history(&self, object_name: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/backtest/history/{}", object_name)))
            .send()
            .await
            .map_err(Error::transport)?;

        Self::check(resp, object_name).await?;
        Ok(())
    }

    async fn save_history(
        &self,
        query_type: &str,
        params: &serde_json::Value,
        results: &[BacktestResult],
    ) -> Result<Option<String>> {
        // Empty result sets are never persisted
        if results.is_empty() {
            debug!(query_type, "Skipping save of empty result set");
            return Ok(None);
        }

        let body = serde_json::json!({
            "params": params,
            "results": results,
        });

        let resp = self
            .client
            .post(self.url("/api/backtest/history/save"))
            .query(&[("query_type", query_type)])
            .json(&body)
            .send()
            .await
            .map_err(Error::transport)?;

        let saved: SaveResponse = Self::parse(Self::check(resp, "history save").await?).await?;
        Ok(Some(saved.object_name))
    }
}
