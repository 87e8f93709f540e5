use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use nr_geodata::{CollectorSettings, FeatureCollector};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::{api, cache::FeatureCache, state::AppState};

/// Router whose upstreams point at a port nobody listens on, so every
/// feature falls back to its default without touching the network.
fn setup_app() -> axum::Router {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let settings = CollectorSettings {
        overpass_url: format!("http://{addr}/api/interpreter"),
        elevation_url: format!("http://{addr}/api/v1/lookup"),
        request_timeout: Duration::from_secs(2),
        ..CollectorSettings::default()
    };
    let state = Arc::new(AppState::with_parts(
        FeatureCollector::new(settings),
        FeatureCache::disabled(),
    ));
    api::routes().with_state(state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/result")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let response = setup_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn entry_form_is_served() {
    let response = setup_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("action=\"/result\""));
}

#[tokio::test]
async fn configuration_with_dead_upstreams_is_baseline() {
    let response = setup_app()
        .oneshot(get("/v1/configuration?lat=48.8566&lon=2.3522"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["matched_rule"], "baseline");
    assert_eq!(body["priority"], 5);
    assert_eq!(body["configuration"]["frequency_band"], "700 MHz");
    assert_eq!(body["configuration"]["output_power"], "Low");
    assert_eq!(body["configuration"]["coverage_radius_km"], 10.0);
    assert_eq!(body["features"]["land_type"], "Unknown");
    assert_eq!(body["features"]["building_density"], 0);
    assert_eq!(body["fallbacks"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_query_is_bad_request() {
    for uri in [
        "/v1/configuration?lat=abc&lon=2.35",
        "/v1/configuration?lat=48.85",
        "/v1/configuration?lat=95&lon=0",
    ] {
        let response = setup_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body = read_json(response).await;
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn empty_form_redirects_to_entry_form() {
    let response = setup_app().oneshot(form("lat=&lon=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn numeric_form_returns_report() {
    let response = setup_app()
        .oneshot(form("lat=45.0&lon=7.0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["coordinate"]["latitude"], 45.0);
    assert_eq!(body["configuration"]["subcarrier_spacing"], "15 kHz");
}
