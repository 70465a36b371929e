//! HTTP-level tests for `ApiClient` against a wiremock server.

use chrono::NaiveDate;
use earnwatch_client::api::{ApiClient, BacktestApi};
use earnwatch_client::types::BacktestRequest;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_result_json(symbol: &str) -> serde_json::Value {
    serde_json::json!({
        "symbol": symbol,
        "company_name": format!("{} Inc.", symbol),
        "market_cap": 5_000_000_000.0,
        "earnings_date": "2025-08-01",
        "earnings_time": "AMC",
        "price_before": 100.0,
        "price_after": 112.0,
        "price_change_pct": 0.12,
        "date_before": "2025-08-01",
        "date_after": "2025-08-04"
    })
}

#[tokio::test]
async fn recent_earnings_sends_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backtest/recent"))
        .and(query_param("days", "7"))
        .and(query_param("min_market_cap", "1000000000"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([sample_result_json("NVDA")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let results = client.recent_earnings(7, 1_000_000_000.0).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, "NVDA");
}

#[tokio::test]
async fn run_backtest_posts_request_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backtest/run"))
        .and(body_partial_json(serde_json::json!({
            "start_date": "2025-08-01",
            "end_date": "2025-08-15"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let request = BacktestRequest {
        start_date: date(2025, 8, 1),
        end_date: date(2025, 8, 15),
        min_market_cap: 1e9,
    };

    let results = client.run_backtest(&request).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn stock_backtest_404_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backtest/stock/ZZZZ"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "no data for ZZZZ"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let err = client
        .stock_backtest("ZZZZ", date(2025, 8, 1))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backtest/history"))
        .respond_with(ResponseTemplate::new(500).set_body_string("storage unavailable"))
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let err = client.list_history("", 50).await.unwrap_err();

    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("storage unavailable"));
}

#[tokio::test]
async fn save_history_sends_query_type_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/backtest/history/save"))
        .and(query_param("query_type", "stock"))
        .and(body_partial_json(serde_json::json!({
            "params": { "symbol": "NVDA" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "object_name": "stock/NVDA/20250825_120000.json",
            "message": "saved"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let results = vec![serde_json::from_value(sample_result_json("NVDA")).unwrap()];
    let params = serde_json::json!({ "symbol": "NVDA" });

    let saved = client
        .save_history("stock", &params, &results)
        .await
        .unwrap();

    assert_eq!(saved.as_deref(), Some("stock/NVDA/20250825_120000.json"));
}

#[tokio::test]
async fn save_history_empty_results_issues_no_request() {
    // No mock mounted: any request would fail the test via a transport
    // error against a 404ing mock server default.
    let server = MockServer::start().await;
    let client = ApiClient::with_base_url(&server.uri(), 5);

    let saved = client
        .save_history("stock", &serde_json::json!({}), &[])
        .await
        .unwrap();

    assert!(saved.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_history_hits_the_entry_path() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/backtest/history/stock/NVDA/20250825_120000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    client
        .delete_history("stock/NVDA/20250825_120000.json")
        .await
        .unwrap();
}

#[tokio::test]
async fn history_detail_round_trips_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backtest/history/stock/NVDA/20250825_120000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "query_type": "stock",
            "params": { "symbol": "NVDA" },
            "results": [sample_result_json("NVDA")],
            "timestamp": "2025-08-25T12:00:00",
            "count": 1
        })))
        .mount(&server)
        .await;

    let client = ApiClient::with_base_url(&server.uri(), 5);
    let detail = client
        .history_detail("stock/NVDA/20250825_120000.json")
        .await
        .unwrap();

    assert_eq!(detail.query_type, "stock");
    assert_eq!(detail.count, 1);
    assert_eq!(detail.results[0].symbol, "NVDA");
}
