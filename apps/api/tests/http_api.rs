//! HTTP surface tests, driven through the router with `oneshot` against an
//! in-memory database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use geoprice_api::{app, cors_layer, AppState};
use geoprice_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    app(AppState::new(db), cors_layer(None).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_country(app: &Router, name: &str, code: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/countries",
        Some(json!({ "name": name, "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

async fn create_rule(app: &Router, rule: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/api/prices", Some(rule)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/api/health/db", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_country_crud() {
    let app = test_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/countries",
        Some(json!({ "name": "Turkey", "code": " tr " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["code"], "TR");
    assert_eq!(created["active"], true);
    let tr = created["id"].as_i64().unwrap();

    let de = create_country(&app, "Germany", "DE").await;

    // Duplicate code, different case
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/countries",
        Some(json!({ "name": "Türkiye", "code": "tr" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/countries",
        Some(json!({ "name": "Turkey", "code": "TUR" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, list) = send(&app, Method::GET, "/api/countries", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Germany", "Turkey"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/countries/{}", de),
        Some(json!({ "name": "Deutschland", "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Deutschland");
    assert_eq!(updated["code"], "DE");

    // Changing DE's code to TR collides with another country
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/countries/{}", de),
        Some(json!({ "code": "tr" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, active) = send(&app, Method::GET, "/api/countries/active", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["id"].as_i64(), Some(tr));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/countries/{}", tr), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Country deleted successfully");

    let (status, body) = send(&app, Method::GET, &format!("/api/countries/{}", tr), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/countries/{}", tr), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/countries/999",
        Some(json!({ "name": "Nowhere" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rule_crud() {
    let app = test_app().await;
    let tr = create_country(&app, "Turkey", "TR").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/prices",
        Some(json!({ "type": "percentage", "value": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid country ID");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/prices",
        Some(json!({ "countryId": 999, "type": "percentage", "value": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid country ID");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/prices",
        Some(json!({ "countryId": tr, "type": "discount", "value": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let rule = create_rule(
        &app,
        json!({ "countryId": tr, "type": "percentage", "value": 5, "productId": "" }),
    )
    .await;
    assert_eq!(rule["productCategory"], "all");
    assert_eq!(rule["productId"], Value::Null);
    assert_eq!(rule["minOrderValue"], 0.0);
    assert_eq!(rule["active"], true);
    assert_eq!(rule["description"], "");
    assert_eq!(rule["priority"], 0);
    assert_eq!(rule["country"]["code"], "TR");
    assert_eq!(rule["country"]["name"], "Turkey");
    let id = rule["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/prices/{}", id),
        Some(json!({ "productId": "SKU-1", "active": false, "priority": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["productId"], "SKU-1");
    assert_eq!(updated["active"], false);
    assert_eq!(updated["type"], "percentage");

    let (status, cleared) = send(
        &app,
        Method::PUT,
        &format!("/api/prices/{}", id),
        Some(json!({ "productId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["productId"], Value::Null);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/prices/{}", id),
        Some(json!({ "countryId": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/prices/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["priority"], 3);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/prices/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Price rule deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/api/prices/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rule_listing_and_filters() {
    let app = test_app().await;
    let tr = create_country(&app, "Turkey", "TR").await;
    let us = create_country(&app, "United States", "US").await;

    create_rule(&app, json!({ "countryId": tr, "type": "fixed", "value": 1, "priority": 1 })).await;
    create_rule(&app, json!({ "countryId": tr, "type": "percentage", "value": 5, "priority": 10 })).await;
    create_rule(
        &app,
        json!({ "countryId": tr, "type": "percentage", "value": 50, "priority": 99, "active": false }),
    )
    .await;
    create_rule(&app, json!({ "countryId": us, "type": "percentage", "value": 0, "priority": 10 })).await;

    let (_, all) = send(&app, Method::GET, "/api/prices", None).await;
    let priorities: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["priority"].as_i64().unwrap())
        .collect();
    assert_eq!(priorities, vec![99, 10, 10, 1]);

    let (_, inactive) = send(&app, Method::GET, "/api/prices?active=false", None).await;
    assert_eq!(inactive.as_array().unwrap().len(), 1);

    let (_, us_rules) = send(&app, Method::GET, &format!("/api/prices?countryId={}", us), None).await;
    assert_eq!(us_rules.as_array().unwrap().len(), 1);
    assert_eq!(us_rules[0]["country"]["code"], "US");

    let (status, _) = send(&app, Method::GET, "/api/prices?active=maybe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, by_id) = send(&app, Method::GET, &format!("/api/prices/country/{}", tr), None).await;
    assert_eq!(by_id.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::GET, "/api/prices/country/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Storefront feed: active only, priority descending, code case-insensitive
    let (status, feed) = send(&app, Method::GET, "/api/prices/country-code/tr", None).await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<f64> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![5.0, 1.0]);

    let (status, body) = send(&app, Method::GET, "/api/prices/country-code/ZZ", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_calculate() {
    let app = test_app().await;
    let tr = create_country(&app, "Turkey", "TR").await;
    let de = create_country(&app, "Germany", "DE").await;

    create_rule(&app, json!({ "countryId": tr, "type": "percentage", "value": 5, "priority": 10 })).await;
    create_rule(&app, json!({ "countryId": de, "type": "fixed", "value": 10, "priority": 5 })).await;
    let product_rule = create_rule(
        &app,
        json!({ "countryId": de, "type": "percentage", "value": 20, "priority": 10, "productId": "X" }),
    )
    .await;

    let (status, calc) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "TR", "originalPrice": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calc["originalPrice"], 100.0);
    assert_eq!(calc["adjustedPrice"], 105.0);
    assert_eq!(calc["countryCode"], "TR");
    assert_eq!(calc["countryName"], "Turkey");
    assert_eq!(calc["appliedRule"]["value"], 5.0);

    // Product rule outranks the general fixed rule
    let (_, calc) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "de", "productId": "X", "originalPrice": "50" })),
    )
    .await;
    assert_eq!(calc["adjustedPrice"], 60.0);
    assert_eq!(calc["appliedRule"]["id"], product_rule["id"]);

    // Other products only see the general rule
    let (_, calc) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "DE", "productId": "Y", "originalPrice": 50 })),
    )
    .await;
    assert_eq!(calc["adjustedPrice"], 60.0);
    assert_eq!(calc["appliedRule"]["type"], "fixed");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "ZZ", "originalPrice": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "originalPrice": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "TR", "originalPrice": "free" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_country_without_rules_keeps_price() {
    let app = test_app().await;
    create_country(&app, "United States", "US").await;

    let (status, calc) = send(
        &app,
        Method::POST,
        "/api/prices/calculate",
        Some(json!({ "countryCode": "US", "originalPrice": 42.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calc["adjustedPrice"], 42.5);
    assert_eq!(calc["appliedRule"], Value::Null);
}

#[tokio::test]
async fn test_deleting_country_removes_its_rules() {
    let app = test_app().await;
    let tr = create_country(&app, "Turkey", "TR").await;
    let rule = create_rule(&app, json!({ "countryId": tr, "type": "fixed", "value": 2 })).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/countries/{}", tr), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &format!("/api/prices/{}", rule["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(&app, Method::GET, "/api/prices", None).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_input_is_json_error() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/countries/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/countries",
        Some(json!({ "name": 5, "code": "TR" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
