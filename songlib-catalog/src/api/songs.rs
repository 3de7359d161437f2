//! Song endpoints
//!
//! - `GET    /songs`             filtered, paginated list
//! - `POST   /songs`             add (with metadata lookup)
//! - `GET    /songs/:id/verses`  paginated verses
//! - `PUT    /songs/:id`         full update
//! - `DELETE /songs/:id`         delete
//! - `POST   /songs/truncate`    remove all songs, restart ids

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use songlib_common::db::{SongFields, SongFilter, SongRecord};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::pagination::{PageRequest, DEFAULT_SONG_LIMIT, DEFAULT_VERSE_LIMIT};
use crate::verses::Verse;
use crate::AppState;

/// Query parameters for song listing
#[derive(Debug, Default, Deserialize)]
pub struct ListSongsQuery {
    pub group: Option<String>,
    #[serde(alias = "song")]
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters for verse listing
#[derive(Debug, Default, Deserialize)]
pub struct VersesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Body of `POST /songs`
#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub group: String,
    #[serde(alias = "song")]
    pub title: String,
}

/// Body of `PUT /songs/:id`
#[derive(Debug, Deserialize)]
pub struct UpdateSongRequest {
    pub group: String,
    #[serde(alias = "song")]
    pub title: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

impl From<UpdateSongRequest> for SongFields {
    fn from(req: UpdateSongRequest) -> Self {
        Self {
            group: req.group,
            title: req.title,
            release_date: req.release_date,
            text: req.text,
            link: req.link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddSongResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Parse an optional positive integer parameter
fn parse_count(raw: Option<&str>, default: u32, message: &str) -> ApiResult<u32> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| ApiError::BadRequest(message.to_string())),
    }
}

fn page_request(
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: u32,
) -> ApiResult<PageRequest> {
    let page = parse_count(page, 1, "Invalid page number")?;
    let limit = parse_count(limit, default_limit, "Invalid limit")?;
    Ok(PageRequest::new(page, limit)?)
}

fn parse_song_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest("Invalid song ID".to_string()))
}

/// GET /songs
pub async fn list_songs(
    State(state): State<AppState>,
    query: Result<Query<ListSongsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SongRecord>>> {
    let Query(query) = query?;
    let page = page_request(query.page.as_deref(), query.limit.as_deref(), DEFAULT_SONG_LIMIT)?;

    let filter = SongFilter {
        group: query.group,
        title: query.title,
        release_date: query.release_date,
    };

    let songs = state.catalog.list_songs(filter, page).await?;
    Ok(Json(songs))
}

/// POST /songs
pub async fn add_song(
    State(state): State<AppState>,
    payload: Result<Json<AddSongRequest>, JsonRejection>,
) -> ApiResult<Json<AddSongResponse>> {
    let Json(req) = payload?;

    let id = state.catalog.add_song(&req.group, &req.title).await?;
    Ok(Json(AddSongResponse { id }))
}

/// GET /songs/:id/verses
pub async fn get_verses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<VersesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Verse>>> {
    let id = parse_song_id(&id)?;
    let Query(query) = query?;
    let page = page_request(query.page.as_deref(), query.limit.as_deref(), DEFAULT_VERSE_LIMIT)?;

    let verses = state.catalog.get_verses(id, page).await?;
    Ok(Json(verses))
}

/// PUT /songs/:id
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSongRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_song_id(&id)?;
    let Json(req) = payload?;

    state.catalog.update_song(id, req.into()).await?;
    Ok(MessageResponse::new("Song updated"))
}

/// DELETE /songs/:id
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_song_id(&id)?;

    state.catalog.delete_song(id).await?;
    Ok(MessageResponse::new("Song deleted"))
}

/// POST /songs/truncate
pub async fn truncate_songs(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.catalog.truncate().await?;
    info!("Songs table truncated via API");
    Ok(MessageResponse::new("Table truncated and ID sequence reset"))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(list_songs).post(add_song))
        .route("/songs/truncate", post(truncate_songs))
        .route("/songs/:id", put(update_song).delete(delete_song))
        .route("/songs/:id/verses", get(get_verses))
}
