//! Song metadata enrichment
//!
//! Looks up release date, lyric text and link for a (group, title) pair from
//! the external lookup service. Enrichment never fails from the caller's
//! point of view: every lookup failure resolves to the fixed fallback data,
//! so songs can always be added while the store is healthy.
//!
//! Lookup contract: `GET <base>/info?group=<escaped>&title=<escaped>`
//! answering 200 with `{"release_date": .., "text": .., "link": ..}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Path of the lookup endpoint below the configured base URL
pub const LOOKUP_PATH: &str = "/info";

/// Placeholder release date used when the lookup is unavailable
pub const FALLBACK_RELEASE_DATE: &str = "2000-01-01";

/// Placeholder lyric text used when the lookup is unavailable
pub const FALLBACK_TEXT: &str = "Verse 1\n\nVerse 2\n\nVerse 3";

/// Placeholder link used when the lookup is unavailable
pub const FALLBACK_LINK: &str = "https://example.com";

/// Supplementary song metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub release_date: String,
    pub text: String,
    pub link: String,
}

impl Enrichment {
    /// Fixed placeholder data
    pub fn fallback() -> Self {
        Self {
            release_date: FALLBACK_RELEASE_DATE.to_string(),
            text: FALLBACK_TEXT.to_string(),
            link: FALLBACK_LINK.to_string(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.release_date.is_empty() && !self.text.is_empty() && !self.link.is_empty()
    }
}

/// Why a lookup could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No lookup URL configured
    #[error("lookup service not configured")]
    NotConfigured,

    /// Request did not finish within the timeout
    #[error("lookup timed out")]
    Timeout,

    /// Connection or other transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Lookup answered with a non-2xx status
    #[error("lookup returned status {0}")]
    Status(u16),

    /// Body was not `{release_date, text, link}`
    #[error("malformed lookup response: {0}")]
    Decode(String),

    /// Body decoded but one or more fields were empty
    #[error("lookup response has empty fields")]
    Incomplete,
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

/// Result of an enrichment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    /// Data to store with the song
    pub enrichment: Enrichment,
    /// Set when `enrichment` is the fallback; for logging only
    pub fallback_cause: Option<LookupError>,
}

impl EnrichmentOutcome {
    pub fn from_lookup(result: Result<Enrichment, LookupError>) -> Self {
        match result {
            Ok(enrichment) => Self {
                enrichment,
                fallback_cause: None,
            },
            Err(cause) => Self {
                enrichment: Enrichment::fallback(),
                fallback_cause: Some(cause),
            },
        }
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback_cause.is_some()
    }
}

/// Source of song metadata
#[async_trait]
pub trait Enrich: Send + Sync {
    /// Enrich a song; always produces data
    async fn enrich(&self, group: &str, title: &str) -> EnrichmentOutcome;
}

/// HTTP lookup client with fallback
pub struct LookupEnricher {
    http_client: reqwest::Client,
    base_url: Option<String>,
}

impl LookupEnricher {
    /// Create an enricher whose requests are bounded by `timeout`
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("songlib/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self::with_client(http_client, base_url))
    }

    /// Use an existing client (shared connection pool)
    pub fn with_client(http_client: reqwest::Client, base_url: Option<String>) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Query the lookup service once, without fallback
    pub async fn lookup(&self, group: &str, title: &str) -> Result<Enrichment, LookupError> {
        let base_url = self.base_url.as_deref().ok_or(LookupError::NotConfigured)?;
        let url = format!("{}{}", base_url, LOOKUP_PATH);

        debug!(url = %url, group = %group, title = %title, "Querying lookup service");

        let response = self
            .http_client
            .get(&url)
            .query(&[("group", group), ("title", title)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let enrichment: Enrichment = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        if !enrichment.is_complete() {
            return Err(LookupError::Incomplete);
        }

        Ok(enrichment)
    }
}

#[async_trait]
impl Enrich for LookupEnricher {
    async fn enrich(&self, group: &str, title: &str) -> EnrichmentOutcome {
        let outcome = EnrichmentOutcome::from_lookup(self.lookup(group, title).await);

        match &outcome.fallback_cause {
            None => info!(group = %group, title = %title, "Lookup service provided song details"),
            Some(cause) => warn!(
                group = %group,
                title = %title,
                cause = %cause,
                "Lookup service unavailable, using fallback data"
            ),
        }

        outcome
    }
}
