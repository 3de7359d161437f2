//! Song catalog models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored song
///
/// `release_date`, `text` and `link` are empty strings, never null, when no
/// data was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongRecord {
    pub id: i64,
    #[sqlx(rename = "group_name")]
    pub group: String,
    #[sqlx(rename = "song_name")]
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The five editable fields of a song
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFields {
    pub group: String,
    pub title: String,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Optional list filters; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    /// Case-insensitive substring of the group name
    pub group: Option<String>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact release date
    pub release_date: Option<String>,
}

impl SongFilter {
    /// Drop empty filter values so they match everything
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            group: keep(self.group),
            title: keep(self.title),
            release_date: keep(self.release_date),
        }
    }
}
