//! songlib-catalog library
//!
//! Song catalog: add songs enriched from an external lookup service, list
//! them with filters, and page through their lyrics verse by verse.

use std::sync::Arc;

use axum::Router;
use songlib_common::config::ServiceConfig;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod cli;
pub mod enricher;
pub mod error;
pub mod mock_lookup;
pub mod pagination;
pub mod store;
pub mod verses;

pub use crate::catalog::Catalog;
pub use crate::error::{ApiError, ApiResult, CatalogError, CatalogResult};

use crate::enricher::{LookupEnricher, LookupError};
use crate::store::SqliteSongStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

/// Wire the SQLite store and HTTP lookup enricher into a catalog
pub fn build_catalog(pool: SqlitePool, config: &ServiceConfig) -> Result<Catalog, LookupError> {
    let enricher = LookupEnricher::new(config.lookup_base_url.clone(), config.lookup_timeout)?;
    let store = SqliteSongStore::new(pool);

    Ok(Catalog::new(Arc::new(store), Arc::new(enricher)))
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::song_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
