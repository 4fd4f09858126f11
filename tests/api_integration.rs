#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use solar_quote::api::{AppState, router};
use solar_quote::config::QuoteConfig;
use tower::util::ServiceExt;

fn app_with(config: QuoteConfig) -> axum::Router {
    router(Arc::new(AppState { config }))
}

async fn post_json(uri: &str, body: String) -> (StatusCode, serde_json::Value) {
    post_json_to(app_with(common::default_config()), uri, body).await
}

async fn post_json_to(
    app: axum::Router,
    uri: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn quote_endpoint_runs_every_component() {
    let body = serde_json::to_string(&common::default_quote()).unwrap();
    let (status, json) = post_json("/quote", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stc"]["stc_count"], 63);
    assert_eq!(json["eligibility"]["eligible"], true);
    assert_eq!(json["compliance"]["is_compliant"], true);
    assert_eq!(json["projection"]["break_even_year"], 7);
}

#[tokio::test]
async fn compliance_endpoint_returns_recommendations() {
    let body = serde_json::json!({
        "array": common::default_array(),
        "inverter": common::default_inverter(),
        "cables": common::cable_runs(6.0, 15.0, 4.0, 10.0),
        "protection": {
            "dc_isolator_present": true,
            "ac_isolator_present": true,
            "surge_protection_present": false,
            "earthing_present": true
        }
    });
    let (status, json) = post_json("/compliance", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_compliant"], false);
    assert_eq!(json["recommendations"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn eligibility_endpoint_lists_missing_items() {
    let body = serde_json::json!({
        "panels_validated": true,
        "inverter_validated": true,
        "electrical_certificate": false,
        "compliance_statement": true,
        "customer_declaration": true,
        "installation_photos": true
    });
    let (status, json) = post_json("/eligibility", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["eligible"], false);
    assert_eq!(json["missing_requirements"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn invalid_cable_returns_400() {
    let body = serde_json::json!({
        "array": common::default_array(),
        "inverter": common::default_inverter(),
        "cables": common::cable_runs(0.0, 15.0, 4.0, 10.0),
        "protection": {
            "dc_isolator_present": true,
            "ac_isolator_present": true,
            "surge_protection_present": true,
            "earthing_present": true
        }
    });
    let (status, json) = post_json("/compliance", body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn paid_is_terminal() {
    let (status, _) = post_json(
        "/submission/transition",
        r#"{"from":"PAID","to":"PENDING"}"#.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unusable_server_config_is_rejected_per_request() {
    let mut config = common::default_config();
    config.electrical.cable_sizing_divisor = 0.0;
    config.rebate.market_price_per_stc = f64::NAN;
    let body = serde_json::to_string(&common::default_quote()).unwrap();
    let (status, json) = post_json_to(app_with(config), "/quote", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "validation");
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("rebate.market_price_per_stc"))
    );
}
