//! Publishing tests against a mock Sheets API
//!
//! These tests verify the exact update request the publisher emits (path,
//! query, bearer token, JSON body) and the publish wiring of
//! `run_and_publish`, including that a failed run publishes nothing.

mod common;

use albion_prices::{
    NoOpPublisher, PriceRecord, Publisher, SheetsPublisher, Stage, Table, run_and_publish,
};
use common::{ORE_IN_LYMHURST, pipeline_config, with_sheets, write_token};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ore_table() -> Table {
    let mut table = Table::new();
    table.insert(PriceRecord {
        item_id: "ORE".to_string(),
        city: "Lymhurst".to_string(),
        sell_price_min: 120,
        buy_price_max: 90,
    });
    table
}

#[tokio::test]
async fn publisher_puts_the_table_to_the_configured_range() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_path = write_token(&dir, "tok");

    let mut config = albion_prices::Config::default();
    with_sheets(&mut config, &server.uri(), token_path);
    let publisher = SheetsPublisher::new(&config.sheets).unwrap();

    publisher.publish(&ore_table()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    assert_eq!(
        request.url.path(),
        "/v4/spreadsheets/sheet-1/values/MarketData%21A1"
    );
    assert_eq!(request.url.query(), Some("valueInputOption=USER_ENTERED"));
    assert_eq!(
        request.headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer tok")
    );

    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(
        body,
        json!({
            "values": [
                ["", "Lymhurst", "Lymhurst"],
                ["ORE", 120, 90],
            ]
        })
    );
}

#[tokio::test]
async fn run_and_publish_pushes_the_aggregated_table() {
    let prices = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ORE,"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ORE_IN_LYMHURST, "application/json"))
        .expect(1)
        .mount(&prices)
        .await;

    let sheets = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sheets)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = pipeline_config(&prices.uri(), &dir, &[], &["ORE"]);
    with_sheets(&mut config, &sheets.uri(), write_token(&dir, "tok"));

    let publisher = SheetsPublisher::new(&config.sheets).unwrap();
    let table = run_and_publish(&config, &publisher).await.unwrap();

    assert_eq!(table.item_count(), 1);

    let requests = sheets.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "values": [
                ["", "Lymhurst", "Lymhurst"],
                ["ORE", 120, 90],
            ]
        })
    );
}

#[tokio::test]
async fn failed_run_publishes_nothing() {
    let prices = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&prices)
        .await;

    let sheets = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&sheets)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = pipeline_config(&prices.uri(), &dir, &[], &["ORE"]);
    with_sheets(&mut config, &sheets.uri(), write_token(&dir, "tok"));

    let publisher = SheetsPublisher::new(&config.sheets).unwrap();
    let err = run_and_publish(&config, &publisher).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Fetch));
    assert!(sheets.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn publish_failure_after_a_good_run_is_surfaced() {
    let prices = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ORE,"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ORE_IN_LYMHURST, "application/json"))
        .mount(&prices)
        .await;

    let sheets = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&sheets)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = pipeline_config(&prices.uri(), &dir, &[], &["ORE"]);
    with_sheets(&mut config, &sheets.uri(), write_token(&dir, "expired"));

    let publisher = SheetsPublisher::new(&config.sheets).unwrap();
    let err = run_and_publish(&config, &publisher).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Publish));
    assert!(err.to_string().contains("403"));
}

#[tokio::test]
async fn noop_publisher_needs_no_token_file() {
    let prices = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ORE,"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ORE_IN_LYMHURST, "application/json"))
        .mount(&prices)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = pipeline_config(&prices.uri(), &dir, &[], &["ORE"]);

    let table = run_and_publish(&config, &NoOpPublisher).await.unwrap();

    assert_eq!(table.item_count(), 1);
}
