//! Species lookup client
//!
//! Talks to the greenhouse proxy (or anything honoring its contract) and
//! normalizes the upstream plant-database payload into `SpeciesSummary`
//! values ready to attach to a new plant.
//!
//! The upstream is loose with shapes: `scientific_name` arrives as a
//! string or a list, `sunlight` likewise, text fields may be empty
//! strings. Decoding tolerates all of it; empty strings normalize away.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::model::SpeciesSummary;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Species lookup failures
#[derive(Debug, Error)]
pub enum SpeciesError {
    /// Query was empty after trimming; no request was sent
    #[error("search query is empty")]
    EmptyQuery,

    /// Transport failure or timeout
    #[error("species lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Proxy answered with a non-success status
    #[error("species lookup returned HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON shape
    #[error("species payload could not be decoded: {0}")]
    Decode(String),
}

/// HTTP client for the species search endpoint
pub struct SpeciesClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpeciesClient {
    /// Create a client for a proxy at `base_url` (scheme + host + port)
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(concat!("greenhouse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search the plant database by free-text query
    ///
    /// The query is trimmed before sending; an empty result is rejected
    /// locally. Results arrive normalized, best matches first.
    pub async fn search(&self, query: &str) -> Result<Vec<SpeciesSummary>, SpeciesError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SpeciesError::EmptyQuery);
        }

        let url = format!("{}/api/plants/search", self.base_url);
        let response = self.http.get(&url).query(&[("q", query)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeciesError::Status(status.as_u16()));
        }

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|err| SpeciesError::Decode(err.to_string()))?;

        let results: Vec<SpeciesSummary> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(RawSpecies::normalize)
            .collect();
        debug!(query = %query, count = results.len(), "species search completed");
        Ok(results)
    }
}

/// Top-level upstream payload; everything of interest is under `data`,
/// which arrives missing or null on empty result pages
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<Vec<RawSpecies>>,
}

/// One species as the upstream sends it
#[derive(Debug, Deserialize)]
struct RawSpecies {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    common_name: Option<String>,
    #[serde(default)]
    scientific_name: Option<OneOrMany>,
    #[serde(default)]
    watering: Option<String>,
    #[serde(default)]
    sunlight: Option<OneOrMany>,
    #[serde(default)]
    cycle: Option<String>,
    #[serde(default)]
    default_image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    small_url: Option<String>,
}

/// Fields the upstream sends as either a bare string or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn first(self) -> Option<String> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(values) => values.into_iter().next(),
        }
    }

    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

impl RawSpecies {
    fn normalize(self) -> SpeciesSummary {
        SpeciesSummary {
            species_id: self.id,
            common_name: non_empty(self.common_name),
            scientific_name: non_empty(self.scientific_name.and_then(OneOrMany::first)),
            watering: non_empty(self.watering),
            sunlight: self.sunlight.map(OneOrMany::into_vec).unwrap_or_default(),
            cycle: non_empty(self.cycle),
            thumbnail: non_empty(self.default_image.and_then(|img| img.small_url)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
