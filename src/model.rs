use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validate each bound independently; latitude is checked first.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if latitude.is_nan() || longitude.is_nan() {
            return Err(CoordinateError::NotANumber);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse raw text fields as typed by the user.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, CoordinateError> {
        let lat = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::NotANumber)?;
        let lon = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::NotANumber)?;
        Self::new(lat, lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// The single "current" place the schedule is computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: Coordinates,
    pub display_name: String,
}

impl Location {
    pub fn new(coordinates: Coordinates, display_name: impl Into<String>) -> Self {
        Self {
            coordinates,
            display_name: display_name.into(),
        }
    }
}

/// The five daily prayers in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Key used by the timings endpoint (capitalized English).
    pub fn api_name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// One day's five prayer times for a set of coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSchedule {
    pub date: NaiveDate,
    pub coordinates: Coordinates,
    times: [NaiveTime; 5],
}

impl PrayerSchedule {
    pub fn new(date: NaiveDate, coordinates: Coordinates, times: [NaiveTime; 5]) -> Self {
        Self {
            date,
            coordinates,
            times,
        }
    }

    pub fn time(&self, prayer: Prayer) -> NaiveTime {
        self.times[prayer.index()]
    }

    /// Prayers with their times, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, NaiveTime)> + '_ {
        Prayer::ALL.iter().map(|&p| (p, self.time(p)))
    }
}

/// A settlement returned by a name search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `"First, Last"` segments of the display name, e.g. `"Paris, France"`.
    pub name: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_type: String,
    pub importance: f64,
}

impl SearchResult {
    /// Middle segments of the display name (region, state, ...).
    pub fn details(&self) -> String {
        let parts: Vec<&str> = self.display_name.split(", ").collect();
        if parts.len() <= 2 {
            return String::new();
        }
        parts[1..parts.len() - 1].join(", ")
    }

    pub fn coordinates_label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    pub fn to_location(&self) -> Location {
        Location::new(
            Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            self.name.clone(),
        )
    }
}
