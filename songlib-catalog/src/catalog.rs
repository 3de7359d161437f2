//! Catalog operations
//!
//! Composes the metadata enricher and the song store. Input is validated
//! before any store or network call; store failures propagate unchanged.

use std::sync::Arc;

use songlib_common::db::{SongFields, SongFilter, SongRecord};
use tracing::{debug, error, info, warn};

use crate::enricher::Enrich;
use crate::error::{CatalogError, CatalogResult};
use crate::pagination::PageRequest;
use crate::store::SongStore;
use crate::verses::{paginate_verses, Verse};

/// Maximum length (in characters) of group and title
pub const MAX_NAME_CHARS: usize = 255;

/// Maximum length of the release date
pub const MAX_RELEASE_DATE_CHARS: usize = 10;

/// Maximum length of the link
pub const MAX_LINK_CHARS: usize = 255;

/// Song catalog service
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn SongStore>,
    enricher: Arc<dyn Enrich>,
}

impl Catalog {
    pub fn new(store: Arc<dyn SongStore>, enricher: Arc<dyn Enrich>) -> Self {
        Self { store, enricher }
    }

    /// Add a song, enriching it with looked-up metadata
    ///
    /// Succeeds whenever the store does: lookup failures fall back to
    /// placeholder data.
    pub async fn add_song(&self, group: &str, title: &str) -> CatalogResult<i64> {
        validate_name("group", group)?;
        validate_name("title", title)?;

        info!(group = %group, title = %title, "Adding song");

        let outcome = self.enricher.enrich(group, title).await;
        if let Some(cause) = &outcome.fallback_cause {
            debug!(cause = %cause, "Storing fallback metadata");
        }

        let fields = SongFields {
            group: group.to_string(),
            title: title.to_string(),
            release_date: outcome.enrichment.release_date,
            text: outcome.enrichment.text,
            link: outcome.enrichment.link,
        };

        let id = self.store.insert(&fields).await.map_err(|e| {
            error!(error = %e, "Failed to add song to database");
            CatalogError::from(e)
        })?;

        info!(id, "Song added");
        Ok(id)
    }

    /// Filtered, paginated songs ordered by identifier
    pub async fn list_songs(
        &self,
        filter: SongFilter,
        page: PageRequest,
    ) -> CatalogResult<Vec<SongRecord>> {
        let filter = filter.normalized();
        debug!(?filter, page = page.page(), limit = page.limit(), "Fetching songs");

        let songs = self
            .store
            .select_filtered(&filter, page.limit(), page.offset())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch songs from database");
                CatalogError::from(e)
            })?;

        info!(count = songs.len(), "Songs fetched");
        Ok(songs)
    }

    /// One page of a song's verses
    pub async fn get_verses(&self, id: i64, page: PageRequest) -> CatalogResult<Vec<Verse>> {
        debug!(id, page = page.page(), limit = page.limit(), "Fetching verses");

        let song = self
            .store
            .select_by_id(id)
            .await
            .map_err(|e| {
                error!(id, error = %e, "Failed to fetch song");
                CatalogError::from(e)
            })?
            .ok_or_else(|| {
                warn!(id, "Song not found");
                CatalogError::NotFound(id)
            })?;

        let verses = paginate_verses(&song.text, page);
        info!(id, count = verses.len(), "Verses retrieved");
        Ok(verses)
    }

    /// Replace a song's editable fields
    pub async fn update_song(&self, id: i64, fields: SongFields) -> CatalogResult<()> {
        validate_fields(&fields)?;
        debug!(id, "Updating song");

        let affected = self.store.update(id, &fields).await.map_err(|e| {
            error!(id, error = %e, "Failed to update song");
            CatalogError::from(e)
        })?;

        if affected == 0 {
            warn!(id, "Song not found");
            return Err(CatalogError::NotFound(id));
        }

        info!(id, "Song updated");
        Ok(())
    }

    /// Delete a song
    pub async fn delete_song(&self, id: i64) -> CatalogResult<()> {
        debug!(id, "Deleting song");

        let affected = self.store.delete(id).await.map_err(|e| {
            error!(id, error = %e, "Failed to delete song");
            CatalogError::from(e)
        })?;

        if affected == 0 {
            warn!(id, "Song not found");
            return Err(CatalogError::NotFound(id));
        }

        info!(id, "Song deleted");
        Ok(())
    }

    /// Remove every song and restart identifiers at 1
    pub async fn truncate(&self) -> CatalogResult<()> {
        debug!("Truncating songs");

        self.store.truncate().await.map_err(|e| {
            error!(error = %e, "Failed to truncate songs");
            CatalogError::from(e)
        })?;

        info!("Songs truncated and identifier sequence reset");
        Ok(())
    }
}

fn validate_name(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{} is required", field)));
    }
    validate_max_chars(field, value, MAX_NAME_CHARS)
}

fn validate_max_chars(field: &str, value: &str, max: usize) -> CatalogResult<()> {
    if value.chars().count() > max {
        return Err(CatalogError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn validate_fields(fields: &SongFields) -> CatalogResult<()> {
    validate_name("group", &fields.group)?;
    validate_name("title", &fields.title)?;
    validate_max_chars("release_date", &fields.release_date, MAX_RELEASE_DATE_CHARS)?;
    validate_max_chars("link", &fields.link, MAX_LINK_CHARS)
}
