//! Device position acquisition.
//!
//! A desktop has no browser geolocation prompt, so the position comes from an
//! IP lookup service, a configured fixed point, or nowhere at all when the
//! user has switched it off. All sources share the same one-shot contract:
//! a timeout and a cache tolerance for recently obtained positions.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    config::{GeolocationConfig, GeolocationSourceKind, NetworkConfig},
    error::LocationError,
    model::Coordinates,
    traits::Clock,
};

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_cache_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_cache_age: Duration::from_secs(60),
        }
    }
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            max_cache_age: Duration::from_secs(config.max_cache_age_secs),
        }
    }
}

/// Payload of the IP geolocation endpoint.
#[derive(Debug, Deserialize)]
struct IpLookup {
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Where positions come from.
#[derive(Debug, Clone)]
pub enum PositionSource {
    Ip { client: reqwest::Client, url: String },
    Fixed(Coordinates),
    Disabled,
}

impl PositionSource {
    pub fn ip(url: String, network_config: &NetworkConfig) -> Result<Self> {
        // Request timeout is governed by PositionOptions; only bound the connect.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(PositionSource::Ip { client, url })
    }

    async fn request(&self, high_accuracy: bool) -> Result<Coordinates, LocationError> {
        match self {
            PositionSource::Fixed(coordinates) => Ok(*coordinates),
            PositionSource::Disabled => Err(LocationError::PermissionDenied),
            PositionSource::Ip { client, url } => {
                if high_accuracy {
                    tracing::debug!("IP geolocation is city-level; high accuracy is best effort");
                }
                let response = client.get(url).send().await.map_err(|e| {
                    tracing::warn!("IP geolocation request failed: {}", e);
                    LocationError::Unavailable
                })?;
                if !response.status().is_success() {
                    tracing::warn!("IP geolocation returned status {}", response.status());
                    return Err(LocationError::Unavailable);
                }
                let lookup = response.json::<IpLookup>().await.map_err(|e| {
                    tracing::warn!("IP geolocation payload unreadable: {}", e);
                    LocationError::Unavailable
                })?;
                if lookup.status.as_deref().is_some_and(|s| s != "success") {
                    return Err(LocationError::Unavailable);
                }
                match (lookup.lat, lookup.lon) {
                    (Some(lat), Some(lon)) => {
                        Coordinates::new(lat, lon).map_err(|_| LocationError::Unavailable)
                    }
                    _ => Err(LocationError::Unavailable),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedPosition {
    coordinates: Coordinates,
    obtained_at: DateTime<Utc>,
}

/// One-shot position requests with timeout and cache tolerance.
#[derive(Clone)]
pub struct LocationProvider {
    source: PositionSource,
    options: PositionOptions,
    clock: Arc<dyn Clock>,
    cache: Arc<Mutex<Option<CachedPosition>>>,
}

impl std::fmt::Debug for LocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationProvider")
            .field("source", &self.source)
            .field("options", &self.options)
            .finish()
    }
}

impl LocationProvider {
    pub fn new(source: PositionSource, options: PositionOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            options,
            clock,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Build the provider selected by configuration. A `fixed` source without
    /// both coordinates is a configuration error.
    pub fn from_config(
        config: &GeolocationConfig,
        ip_url: &str,
        network: &NetworkConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let source = match config.source {
            GeolocationSourceKind::Ip => PositionSource::ip(ip_url.to_string(), network)?,
            GeolocationSourceKind::Fixed => {
                let (lat, lon) = config
                    .fixed_latitude
                    .zip(config.fixed_longitude)
                    .context("geolocation.source = \"fixed\" needs fixed_latitude and fixed_longitude")?;
                let coordinates = Coordinates::new(lat, lon)
                    .context("Configured fixed position is out of range")?;
                PositionSource::Fixed(coordinates)
            }
            GeolocationSourceKind::Disabled => PositionSource::Disabled,
        };
        Ok(Self::new(source, PositionOptions::from(config), clock))
    }

    pub fn options(&self) -> PositionOptions {
        self.options
    }

    /// Request the current position, reusing one younger than the cache
    /// tolerance.
    pub async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let now = self.clock.now_utc();
        if let Some(cached) = self.cached(now) {
            tracing::debug!("Reusing cached position {}", cached);
            return Ok(cached);
        }

        let coordinates =
            tokio::time::timeout(self.options.timeout, self.source.request(self.options.high_accuracy))
                .await
                .map_err(|_| LocationError::Timeout)??;

        if let Ok(mut slot) = self.cache.lock() {
            *slot = Some(CachedPosition {
                coordinates,
                obtained_at: self.clock.now_utc(),
            });
        }
        tracing::info!("Acquired position {}", coordinates);
        Ok(coordinates)
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<Coordinates> {
        let max_age = chrono::Duration::from_std(self.options.max_cache_age).ok()?;
        let slot = self.cache.lock().ok()?;
        (*slot)
            .filter(|c| now - c.obtained_at <= max_age)
            .map(|c| c.coordinates)
    }
}
