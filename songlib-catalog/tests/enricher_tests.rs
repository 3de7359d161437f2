//! Lookup client tests against local stand-in services
//!
//! Each test serves a small axum router on an ephemeral port and points a
//! `LookupEnricher` at it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use songlib_catalog::enricher::{Enrich, Enrichment, LookupEnricher, LookupError};
use songlib_catalog::mock_lookup::{mock_lookup_router, sample_enrichment};

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn enricher(base_url: String, timeout: Duration) -> LookupEnricher {
    LookupEnricher::new(Some(base_url), timeout).unwrap()
}

#[tokio::test]
async fn test_successful_lookup() {
    let base_url = spawn_server(mock_lookup_router()).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    let outcome = enricher.enrich("Muse", "Supermassive Black Hole").await;

    assert!(!outcome.used_fallback());
    assert_eq!(outcome.enrichment, sample_enrichment());
}

#[tokio::test]
async fn test_query_parameters_are_escaped() {
    let seen: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();

    let router = Router::new().route(
        "/info",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = Some(params);
                Json(sample_enrichment())
            }
        }),
    );
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    let outcome = enricher.enrich("AC/DC & Friends", "Back in Black?#=1").await;
    assert!(!outcome.used_fallback());

    let params = seen.lock().unwrap().clone().expect("request should be recorded");
    assert_eq!(params.get("group").unwrap(), "AC/DC & Friends");
    assert_eq!(params.get("title").unwrap(), "Back in Black?#=1");
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let router = Router::new().nest("/api", mock_lookup_router());
    let base_url = spawn_server(router).await;
    let enricher = enricher(format!("{}/api", base_url), Duration::from_secs(5));

    assert_eq!(enricher.lookup("Muse", "Hysteria").await, Ok(sample_enrichment()));
}

#[tokio::test]
async fn test_error_status_falls_back() {
    let router = Router::new().route(
        "/info",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    assert_eq!(
        enricher.lookup("Muse", "Hysteria").await,
        Err(LookupError::Status(500))
    );

    let outcome = enricher.enrich("Muse", "Hysteria").await;
    assert_eq!(outcome.enrichment, Enrichment::fallback());
}

#[tokio::test]
async fn test_missing_parameters_status_from_stand_in() {
    let base_url = spawn_server(mock_lookup_router()).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    // The stand-in rejects empty values with 400
    assert_eq!(
        enricher.lookup("", "Hysteria").await,
        Err(LookupError::Status(400))
    );
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let router = Router::new().route("/info", get(|| async { "definitely not json" }));
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    assert!(matches!(
        enricher.lookup("Muse", "Hysteria").await,
        Err(LookupError::Decode(_))
    ));

    let outcome = enricher.enrich("Muse", "Hysteria").await;
    assert_eq!(outcome.enrichment, Enrichment::fallback());
}

#[tokio::test]
async fn test_wrong_shape_falls_back() {
    let router = Router::new().route(
        "/info",
        get(|| async { Json(json!({ "releaseDate": "2006-07-16" })) }),
    );
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    assert!(matches!(
        enricher.lookup("Muse", "Hysteria").await,
        Err(LookupError::Decode(_))
    ));
}

#[tokio::test]
async fn test_empty_field_falls_back() {
    let router = Router::new().route(
        "/info",
        get(|| async {
            Json(json!({
                "release_date": "2006-07-16",
                "text": "",
                "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
            }))
        }),
    );
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_secs(5));

    assert_eq!(
        enricher.lookup("Muse", "Hysteria").await,
        Err(LookupError::Incomplete)
    );

    // Nothing from a partial answer is kept
    let outcome = enricher.enrich("Muse", "Hysteria").await;
    assert_eq!(outcome.enrichment, Enrichment::fallback());
}

#[tokio::test]
async fn test_slow_lookup_times_out() {
    let router = Router::new().route(
        "/info",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(sample_enrichment())
        }),
    );
    let base_url = spawn_server(router).await;
    let enricher = enricher(base_url, Duration::from_millis(200));

    let started = std::time::Instant::now();
    let result = enricher.lookup("Muse", "Hysteria").await;

    assert_eq!(result, Err(LookupError::Timeout));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_connection_refused_falls_back() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let enricher = enricher(format!("http://{}", addr), Duration::from_secs(5));

    assert!(matches!(
        enricher.lookup("Muse", "Hysteria").await,
        Err(LookupError::Transport(_))
    ));

    let outcome = enricher.enrich("Muse", "Hysteria").await;
    assert_eq!(outcome.enrichment, Enrichment::fallback());
    assert!(outcome.used_fallback());
}
