use std::{collections::HashMap, time::Duration};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use url::Url;

use crate::{
    config::NetworkConfig,
    model::{Coordinates, Prayer, PrayerSchedule},
    schedule::parse_time,
};

/// Response envelope of the timings endpoint.
#[derive(Debug, Deserialize)]
pub struct TimingsResponse {
    pub data: TimingsData,
}

#[derive(Debug, Deserialize)]
pub struct TimingsData {
    /// Keyed by capitalized English name; also carries Sunrise, Sunset,
    /// Imsak, Midnight and friends which are ignored.
    pub timings: HashMap<String, String>,
}

impl TimingsResponse {
    /// Extract the five prayers, failing if any is missing or malformed.
    pub fn prayer_times(&self) -> Result<[NaiveTime; 5]> {
        let mut times = [NaiveTime::default(); 5];
        for prayer in Prayer::ALL {
            let raw = self
                .data
                .timings
                .get(prayer.api_name())
                .with_context(|| format!("Timings response is missing {}", prayer))?;
            times[prayer.index()] = parse_time(raw)
                .with_context(|| format!("Invalid {} time: {:?}", prayer, raw))?;
        }
        Ok(times)
    }
}

/// API client for the prayer-time calculation service.
#[derive(Clone, Debug)]
pub struct PrayerTimesClient {
    client: reqwest::Client,
    base_url: String,
    method: u32,
}

impl PrayerTimesClient {
    /// Create a new API client with configurable timeouts.
    pub fn new(base_url: String, method: u32, network_config: &NetworkConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network_config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network_config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            method,
        })
    }

    pub fn timings_url(&self, coordinates: Coordinates, date: NaiveDate) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/timings/{}", self.base_url, date.format("%Y-%m-%d")),
            &[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("method", self.method.to_string()),
            ],
        )
        .context("Invalid prayer API URL")
    }

    /// Fetch the day's five prayer times. Non-success statuses are not retried.
    pub async fn fetch_schedule(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
    ) -> Result<PrayerSchedule> {
        let url = self.timings_url(coordinates, date)?;
        tracing::debug!("Fetching prayer times: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request to prayer API")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Prayer API returned error status: {}", status);
        }

        let data = response
            .json::<TimingsResponse>()
            .await
            .context("Failed to parse prayer API response")?;

        let times = data.prayer_times()?;
        Ok(PrayerSchedule::new(date, coordinates, times))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(pairs: &[(&str, &str)]) -> TimingsResponse {
        TimingsResponse {
            data: TimingsData {
                timings: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        }
    }

    fn full_day() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Fajr", "05:10"),
            ("Sunrise", "06:25"),
            ("Dhuhr", "12:05"),
            ("Asr", "15:25"),
            ("Sunset", "17:44"),
            ("Maghrib", "17:44"),
            ("Isha", "19:05"),
            ("Midnight", "00:05"),
        ]
    }

    // ==================== TimingsResponse Parsing Tests ====================

    #[test]
    fn test_prayer_times_extracts_five() {
        let times = make_response(&full_day()).prayer_times().unwrap();
        assert_eq!(times[0], NaiveTime::from_hms_opt(5, 10, 0).unwrap());
        assert_eq!(times[4], NaiveTime::from_hms_opt(19, 5, 0).unwrap());
    }

    #[test]
    fn test_prayer_times_missing_prayer_fails() {
        let pairs: Vec<_> = full_day()
            .into_iter()
            .filter(|(k, _)| *k != "Asr")
            .collect();
        let err = make_response(&pairs).prayer_times().unwrap_err();
        assert!(err.to_string().contains("Asr"));
    }

    #[test]
    fn test_prayer_times_invalid_value_fails() {
        let mut pairs = full_day();
        pairs[0] = ("Fajr", "five o'clock");
        assert!(make_response(&pairs).prayer_times().is_err());
    }

    #[test]
    fn test_prayer_times_accepts_timezone_suffix() {
        let mut pairs = full_day();
        pairs[2] = ("Dhuhr", "12:05 (AST)");
        let times = make_response(&pairs).prayer_times().unwrap();
        assert_eq!(times[1], NaiveTime::from_hms_opt(12, 5, 0).unwrap());
    }

    // ==================== PrayerTimesClient Tests ====================

    #[test]
    fn test_api_client_creation() {
        let config = NetworkConfig::default();
        let result = PrayerTimesClient::new("https://api.aladhan.com/v1".to_string(), 2, &config);
        assert!(result.is_ok());
    }

    #[test]
    fn test_timings_url_shape() {
        let client = PrayerTimesClient::new(
            "https://api.aladhan.com/v1/".to_string(),
            2,
            &NetworkConfig::default(),
        )
        .unwrap();
        let url = client
            .timings_url(
                Coordinates {
                    latitude: 21.4225,
                    longitude: 39.8262,
                },
                NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.aladhan.com/v1/timings/2026-10-18?latitude=21.4225&longitude=39.8262&method=2"
        );
    }
}
