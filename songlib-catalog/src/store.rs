//! Song persistence
//!
//! [`SongStore`] is the narrow interface the catalog needs from the database.
//! Update and delete report the affected-row count of their single statement;
//! callers decide "not found" from that count, never from a separate probe.

use async_trait::async_trait;
use chrono::Utc;
use songlib_common::db::{SongFields, SongFilter, SongRecord};
use songlib_common::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

const SONG_COLUMNS: &str =
    "id, group_name, song_name, release_date, text, link, created_at, updated_at";

/// Persistence operations for song records
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Insert a song, returning its new identifier
    async fn insert(&self, fields: &SongFields) -> Result<i64>;

    /// Filtered page of songs ordered by identifier
    async fn select_filtered(
        &self,
        filter: &SongFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<SongRecord>>;

    /// Song by identifier
    async fn select_by_id(&self, id: i64) -> Result<Option<SongRecord>>;

    /// Replace the editable fields; returns affected rows
    async fn update(&self, id: i64, fields: &SongFields) -> Result<u64>;

    /// Delete a song; returns affected rows
    async fn delete(&self, id: i64) -> Result<u64>;

    /// Remove every song and restart identifier allocation
    async fn truncate(&self) -> Result<()>;
}

/// SQLite-backed [`SongStore`]
#[derive(Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Case-folded copy used for filtering; SQLite only folds ASCII itself
fn fold(value: &str) -> String {
    value.to_lowercase()
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn insert(&self, fields: &SongFields) -> Result<i64> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO songs (group_name, song_name, group_name_folded, song_name_folded,
                               release_date, text, link, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.group)
        .bind(&fields.title)
        .bind(fold(&fields.group))
        .bind(fold(&fields.title))
        .bind(&fields.release_date)
        .bind(&fields.text)
        .bind(&fields.link)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Inserted song row");
        Ok(id)
    }

    async fn select_filtered(
        &self,
        filter: &SongFilter,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<SongRecord>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM songs WHERE 1=1", SONG_COLUMNS));

        // instr matches literally, so % and _ need no escaping
        if let Some(group) = &filter.group {
            query
                .push(" AND instr(group_name_folded, ")
                .push_bind(fold(group))
                .push(") > 0");
        }
        if let Some(title) = &filter.title {
            query
                .push(" AND instr(song_name_folded, ")
                .push_bind(fold(title))
                .push(") > 0");
        }
        if let Some(release_date) = &filter.release_date {
            query.push(" AND release_date = ").push_bind(release_date.clone());
        }

        query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let songs = query
            .build_query_as::<SongRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(songs)
    }

    async fn select_by_id(&self, id: i64) -> Result<Option<SongRecord>> {
        let song = sqlx::query_as::<_, SongRecord>(&format!(
            "SELECT {} FROM songs WHERE id = ?",
            SONG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(song)
    }

    async fn update(&self, id: i64, fields: &SongFields) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET group_name = ?, song_name = ?, group_name_folded = ?, song_name_folded = ?,
                release_date = ?, text = ?, link = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.group)
        .bind(&fields.title)
        .bind(fold(&fields.group))
        .bind(fold(&fields.title))
        .bind(&fields.release_date)
        .bind(&fields.text)
        .bind(&fields.link)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn truncate(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM songs").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'songs'")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
