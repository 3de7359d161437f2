//! Stand-in lookup service
//!
//! Serves `GET /info?group=&title=` with fixed sample data so the catalog can
//! be exercised without the real lookup service. Used by the
//! `songlib-mock-lookup` binary and by integration tests.

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{info, warn};

use crate::enricher::{Enrichment, LOOKUP_PATH};

/// Sample release date returned for every song
pub const SAMPLE_RELEASE_DATE: &str = "2006-07-16";

/// Sample lyric text (two verses) returned for every song
pub const SAMPLE_TEXT: &str = "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses\nHow long before you let me go?";

/// Sample link returned for every song
pub const SAMPLE_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

/// Data the stand-in returns
pub fn sample_enrichment() -> Enrichment {
    Enrichment {
        release_date: SAMPLE_RELEASE_DATE.to_string(),
        text: SAMPLE_TEXT.to_string(),
        link: SAMPLE_LINK.to_string(),
    }
}

/// GET /info
async fn song_info(Query(params): Query<HashMap<String, String>>) -> Response {
    let group = params.get("group").filter(|v| !v.is_empty());
    let title = params
        .get("title")
        .or_else(|| params.get("song"))
        .filter(|v| !v.is_empty());

    match (group, title) {
        (Some(group), Some(title)) => {
            info!(group = %group, title = %title, "Serving sample song details");
            Json(sample_enrichment()).into_response()
        }
        _ => {
            warn!("Missing group or title");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing group or title" })),
            )
                .into_response()
        }
    }
}

/// Router serving the stand-in lookup endpoint
pub fn mock_lookup_router() -> Router {
    Router::new().route(LOOKUP_PATH, get(song_info))
}
