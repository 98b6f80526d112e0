//! End-to-end agent tests against a mock pricing server.
//!
//! The mock serves the same sample rules as the storefront demo server:
//! TR +5%, US +0%, DE +7%, all priority 10, in the lean shape (no
//! timestamps, no countryId).

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use geoprice_agent::{
    Agent, AgentConfig, AgentError, DetectionSource, MemoryElement, MemoryStorefront, PageEvent,
    RuleClient,
};

async fn country_rules(Path(code): Path<String>) -> Result<Json<Value>, StatusCode> {
    let (id, value) = match code.as_str() {
        "TR" => (1, 5),
        "US" => (2, 0),
        "DE" => (3, 7),
        _ => return Err(StatusCode::NOT_FOUND),
    };

    Ok(Json(json!([{
        "id": id,
        "type": "percentage",
        "value": value,
        "productId": null,
        "productCategory": "all",
        "priority": 10
    }])))
}

async fn geo_de() -> Json<Value> {
    Json(json!({ "country_code": "DE", "country_name": "Germany" }))
}

async fn geo_broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Starts the mock on an ephemeral port and returns its base URL.
async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/api/prices/country-code/{code}", get(country_rules))
        .route("/geo", get(geo_de))
        .route("/geo-broken", get(geo_broken));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn config(base: &str, geo_path: Option<&str>) -> AgentConfig {
    AgentConfig {
        api_base_url: format!("{}/api", base),
        geolocation_url: geo_path.map(|p| format!("{}{}", base, p)),
        locale: Some("tr-TR".to_string()),
        default_country: "US".to_string(),
        debounce_ms: 10,
        request_timeout_secs: 5,
    }
}

fn product_page() -> MemoryStorefront {
    MemoryStorefront::new()
        .with_element(MemoryElement::new("price-main", "$100.00"))
        .with_element(MemoryElement::new("price-related", "$19.99"))
}

#[tokio::test]
async fn test_geolocated_visitor_sees_adjusted_prices() {
    let base = spawn_mock().await;
    let agent = Agent::new(config(&base, Some("/geo")));

    let mut context = agent.init().await;
    assert_eq!(context.country(), "DE");
    assert_eq!(context.rules().len(), 1);

    let mut page = product_page();
    let summary = context.update_prices(&mut page);

    assert_eq!(summary.updated, 2);
    assert_eq!(page.element("price-main").unwrap().text, "$107.00");
    assert_eq!(page.element("price-related").unwrap().text, "$21.39");
    assert_eq!(page.indicator.as_deref(), Some("Prices shown for DE"));
}

#[tokio::test]
async fn test_geolocation_failure_falls_back_to_locale() {
    let base = spawn_mock().await;
    let agent = Agent::new(config(&base, Some("/geo-broken")));

    let detected = agent.detect_country().await;
    assert_eq!(detected.code, "TR");
    assert_eq!(detected.source, DetectionSource::Locale);

    let mut context = agent.init().await;
    let mut page = product_page();
    context.update_prices(&mut page);
    assert_eq!(page.element("price-main").unwrap().text, "$105.00");
}

#[tokio::test]
async fn test_unknown_country_yields_no_rules() {
    let base = spawn_mock().await;
    let mut cfg = config(&base, None);
    cfg.locale = Some("fr-FR".to_string());
    let agent = Agent::new(cfg.clone());

    let mut context = agent.init().await;
    assert_eq!(context.country(), "FR");
    assert!(context.rules().is_empty());

    let mut page = product_page();
    context.update_prices(&mut page);
    assert_eq!(page.element("price-main").unwrap().text, "$100.00");

    let client = RuleClient::new(reqwest::Client::new(), &cfg);
    let err = client.try_fetch_rules("FR").await.unwrap_err();
    assert!(matches!(err, AgentError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_unreachable_api_yields_no_rules() {
    let cfg = AgentConfig {
        api_base_url: "http://127.0.0.1:1/api".to_string(),
        geolocation_url: None,
        locale: None,
        request_timeout_secs: 2,
        ..Default::default()
    };
    let agent = Agent::new(cfg);

    let context = agent.init().await;
    assert_eq!(context.country(), "US");
    assert!(context.rules().is_empty());
}

#[tokio::test]
async fn test_run_prices_page_and_follows_mutations() {
    let base = spawn_mock().await;
    let agent = Agent::new(config(&base, Some("/geo")));

    let (tx, rx) = mpsc::channel(8);
    tx.send(PageEvent::Mutation {
        adds_price_elements: true,
    })
    .await
    .unwrap();
    tx.send(PageEvent::Mutation {
        adds_price_elements: true,
    })
    .await
    .unwrap();
    drop(tx);

    let mut page = product_page();
    let (context, stats) = agent.run(&mut page, rx).await;

    assert_eq!(context.country(), "DE");
    assert_eq!(stats.events, 2);
    assert_eq!(stats.rescans, 1);
    // Re-scans start from the remembered original
    assert_eq!(page.element("price-main").unwrap().text, "$107.00");
    assert_eq!(context.original_price("price-main"), Some("100.00"));
}
