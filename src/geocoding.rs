//! Forward and reverse geocoding against a Nominatim-compatible service.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::{
    config::{NetworkConfig, SearchConfig},
    error::AppError,
    model::{Coordinates, SearchResult},
};

/// Label shown when the detected position cannot be named.
pub const FALLBACK_PLACE_NAME: &str = "Location detected";

/// City-level granularity for reverse lookups.
const REVERSE_ZOOM: u8 = 10;

/// One entry of the search endpoint's response list.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRecord {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub place_type: String,
    #[serde(default)]
    pub importance: Option<f64>,
}

/// Response of the reverse endpoint: either a place or an error message.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseRecord {
    pub display_name: Option<String>,
    pub error: Option<String>,
}

/// `"First, Last"` comma segments of a display name; the full string when it
/// has a single segment.
pub fn short_name(display_name: &str) -> String {
    let parts: Vec<&str> = display_name.split(", ").collect();
    match (parts.first(), parts.last()) {
        (Some(first), Some(last)) if parts.len() >= 2 => format!("{}, {}", first, last),
        _ => display_name.to_string(),
    }
}

/// Heuristic ocean exclusion: a reverse-resolved name mentioning "Ocean" or
/// "Sea" is treated as open water. Known to misfire on coastal regions.
pub fn looks_like_open_water(display_name: &str) -> bool {
    display_name.contains("Ocean") || display_name.contains("Sea")
}

/// Keep settlements above the importance floor, converting them to results.
pub fn filter_places(records: Vec<PlaceRecord>, config: &SearchConfig) -> Vec<SearchResult> {
    records
        .into_iter()
        .filter_map(|record| {
            let importance = record.importance.unwrap_or(0.0);
            if importance <= config.min_importance
                || !config.place_types.iter().any(|t| *t == record.place_type)
            {
                return None;
            }
            let latitude = record.lat.trim().parse::<f64>().ok()?;
            let longitude = record.lon.trim().parse::<f64>().ok()?;
            Some(SearchResult {
                name: short_name(&record.display_name),
                display_name: record.display_name,
                latitude,
                longitude,
                place_type: record.place_type,
                importance,
            })
        })
        .collect()
}

/// Client for place search and reverse lookups.
#[derive(Clone, Debug)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    search: SearchConfig,
}

impl GeocodingClient {
    pub fn new(
        base_url: String,
        user_agent: &str,
        search: SearchConfig,
        network_config: &NetworkConfig,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            search,
        })
    }

    pub fn search_url(&self, text: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[
                ("format", "json".to_string()),
                ("q", text.to_string()),
                ("limit", self.search.limit.to_string()),
                ("addressdetails", "1".to_string()),
            ],
        )
        .context("Invalid geocoding URL")
    }

    pub fn reverse_url(&self, coordinates: Coordinates) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/reverse", self.base_url),
            &[
                ("format", "json".to_string()),
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("zoom", REVERSE_ZOOM.to_string()),
            ],
        )
        .context("Invalid geocoding URL")
    }

    /// Search settlements by free text. Low-relevance and non-settlement
    /// matches are dropped.
    pub async fn search_by_name(&self, text: &str) -> Result<Vec<SearchResult>> {
        let text = text.trim();
        if text.is_empty() {
            anyhow::bail!("Search text is empty");
        }

        let url = self.search_url(text)?;
        tracing::debug!("Searching places: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to geocoding API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Geocoding API returned error status: {}", status);
        }

        let records = response
            .json::<Vec<PlaceRecord>>()
            .await
            .context("Failed to parse geocoding search response")?;

        let total = records.len();
        let results = filter_places(records, &self.search);
        tracing::debug!("Search {:?}: kept {} of {} places", text, results.len(), total);
        Ok(results)
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<ReverseRecord> {
        let url = self.reverse_url(coordinates)?;
        tracing::debug!("Reverse geocoding: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to geocoding API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Geocoding API returned error status: {}", status);
        }

        response
            .json::<ReverseRecord>()
            .await
            .context("Failed to parse reverse geocoding response")
    }

    /// Resolve coordinates to a short place name.
    pub async fn reverse_resolve(&self, coordinates: Coordinates) -> Result<String> {
        let record = self.reverse(coordinates).await?;
        if let Some(err) = record.error {
            anyhow::bail!("Reverse lookup failed: {}", err);
        }
        match record.display_name {
            Some(name) if !name.trim().is_empty() => Ok(short_name(&name)),
            _ => anyhow::bail!("Reverse lookup returned no place name"),
        }
    }

    /// Lenient lookup for a detected position: any failure degrades to
    /// [`FALLBACK_PLACE_NAME`].
    pub async fn describe(&self, coordinates: Coordinates) -> String {
        match self.reverse_resolve(coordinates).await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("Could not name {}: {:#}", coordinates, e);
                FALLBACK_PLACE_NAME.to_string()
            }
        }
    }

    /// Strict lookup for user-entered coordinates: the place must resolve and
    /// must not look like open water.
    pub async fn validate_place(&self, coordinates: Coordinates) -> Result<String, AppError> {
        let record = self
            .reverse(coordinates)
            .await
            .map_err(AppError::network)?;

        let display_name = match (record.error, record.display_name) {
            (None, Some(name)) if !name.trim().is_empty() => name,
            _ => return Err(AppError::InvalidPlace),
        };

        if looks_like_open_water(&display_name) {
            tracing::info!("Rejecting {}: {:?} looks like open water", coordinates, display_name);
            return Err(AppError::InvalidPlace);
        }

        Ok(short_name(&display_name))
    }
}
