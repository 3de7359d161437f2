//! Database schema migrations
//!
//! Versioned, idempotent schema migrations tracked in the `schema_version`
//! table.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases upgraded from older versions depend on them
//! 2. **Always add new migrations** - one function per schema change
//! 3. **Use IF NOT EXISTS / ALTER TABLE** - never drop user data

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Get current schema version from database
///
/// Returns 0 if no migration has been recorded yet
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

/// Set schema version in database
async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations (safe to call on every startup)
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;

    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("Migration v2 completed");
    }

    if current_version < 3 {
        migrate_v3(pool).await?;
        set_schema_version(pool, 3).await?;
        info!("Migration v3 completed");
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Migration v1: songs table
///
/// AUTOINCREMENT keeps identifiers from being reused after deletes; the
/// `sqlite_sequence` row it maintains is what truncation resets.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: Create songs table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_name TEXT NOT NULL CHECK (length(group_name) BETWEEN 1 AND 255),
            song_name TEXT NOT NULL CHECK (length(song_name) BETWEEN 1 AND 255),
            release_date TEXT NOT NULL DEFAULT '' CHECK (length(release_date) <= 10),
            text TEXT NOT NULL DEFAULT '',
            link TEXT NOT NULL DEFAULT '' CHECK (length(link) <= 255),
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Migration v2: filter indexes for group, title and release date
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v2: Add songs filter indexes");

    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_songs_group_name ON songs(group_name)",
        "CREATE INDEX IF NOT EXISTS idx_songs_song_name ON songs(song_name)",
        "CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs(release_date)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

/// Migration v3: case-folded group and title columns for filtering
///
/// SQLite `LIKE` and `lower()` only fold ASCII, so the folded copies are
/// computed in Rust. Existing rows are backfilled here.
async fn migrate_v3(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v3: Add case-folded name columns");

    let mut tx = pool.begin().await?;

    for statement in [
        "ALTER TABLE songs ADD COLUMN group_name_folded TEXT NOT NULL DEFAULT ''",
        "ALTER TABLE songs ADD COLUMN song_name_folded TEXT NOT NULL DEFAULT ''",
        "CREATE INDEX IF NOT EXISTS idx_songs_group_name_folded ON songs(group_name_folded)",
        "CREATE INDEX IF NOT EXISTS idx_songs_song_name_folded ON songs(song_name_folded)",
    ] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    let rows: Vec<(i64, String, String)> =
        sqlx::query_as("SELECT id, group_name, song_name FROM songs")
            .fetch_all(&mut *tx)
            .await?;

    let backfilled = rows.len();
    for (id, group_name, song_name) in rows {
        sqlx::query("UPDATE songs SET group_name_folded = ?, song_name_folded = ? WHERE id = ?")
            .bind(group_name.to_lowercase())
            .bind(song_name.to_lowercase())
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    if backfilled > 0 {
        info!("Backfilled folded names for {} songs", backfilled);
    }
    Ok(())
}
