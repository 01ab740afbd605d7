//! Async operations behind the UI: each one maps client failures into the
//! typed errors the state understands.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::{
    api::PrayerTimesClient,
    config::AppConfig,
    error::{AppError, LocationError},
    geocoding::GeocodingClient,
    geolocation::LocationProvider,
    model::{Coordinates, Location, PrayerSchedule, SearchResult},
    state::CITY_REQUIRED,
    traits::Clock,
};

#[derive(Clone)]
pub struct Services {
    prayer: PrayerTimesClient,
    geocoder: GeocodingClient,
    locator: LocationProvider,
    clock: Arc<dyn Clock>,
}

impl Services {
    pub fn new(
        prayer: PrayerTimesClient,
        geocoder: GeocodingClient,
        locator: LocationProvider,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prayer,
            geocoder,
            locator,
            clock,
        }
    }

    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let prayer = PrayerTimesClient::new(
            config.endpoints.prayer_api_url.clone(),
            config.prayer.calculation_method,
            &config.network,
        )?;
        let geocoder = GeocodingClient::new(
            config.endpoints.geocoding_url.clone(),
            &config.endpoints.user_agent,
            config.search.clone(),
            &config.network,
        )?;
        let locator = LocationProvider::from_config(
            &config.geolocation,
            &config.endpoints.ip_geolocation_url,
            &config.network,
            clock.clone(),
        )?;
        Ok(Self::new(prayer, geocoder, locator, clock))
    }

    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now_local()
    }

    /// Device position named by reverse lookup; an unnamed position still
    /// succeeds with the fallback label.
    pub async fn acquire_current_location(&self) -> Result<Location, LocationError> {
        let coordinates = self.locator.current_position().await?;
        let name = self.geocoder.describe(coordinates).await;
        Ok(Location::new(coordinates, name))
    }

    /// User-entered coordinates, accepted only if they resolve to a place.
    pub async fn location_from_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<Location, AppError> {
        let name = self.geocoder.validate_place(coordinates).await?;
        Ok(Location::new(coordinates, name))
    }

    pub async fn search(&self, text: &str) -> Result<Vec<SearchResult>, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(CITY_REQUIRED.to_string()));
        }
        self.geocoder
            .search_by_name(text)
            .await
            .map_err(AppError::network)
    }

    /// Best match for a city name, used by the headless `--city` option.
    pub async fn locate_by_name(&self, text: &str) -> Result<Location, AppError> {
        self.search(text)
            .await?
            .first()
            .map(SearchResult::to_location)
            .ok_or(AppError::NoResults)
    }

    /// Today's schedule, where "today" is the local calendar date.
    pub async fn fetch_schedule(&self, location: &Location) -> Result<PrayerSchedule, AppError> {
        let date = self.now_local().date();
        self.prayer
            .fetch_schedule(location.coordinates, date)
            .await
            .map_err(AppError::network)
    }
}
