//! Prayer Times Library
//!
//! Location lookup, prayer-time fetching, schedule classification and the
//! application state behind the desktop widget and the headless mode.

pub mod api;
pub mod autocomplete;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod geolocation;
pub mod model;
pub mod quotes;
pub mod schedule;
pub mod services;
pub mod state;
pub mod traits;

// GUI-only modules
#[cfg(feature = "gui")]
pub mod style;
#[cfg(feature = "gui")]
pub mod widgets;

// Re-export commonly used types
pub use api::{PrayerTimesClient, TimingsResponse};
pub use config::AppConfig;
pub use error::{AppError, CoordinateError, LocationError};
pub use geocoding::GeocodingClient;
pub use geolocation::{LocationProvider, PositionOptions, PositionSource};
pub use model::{Coordinates, Location, Prayer, PrayerSchedule, SearchResult};
pub use schedule::{PrayerStatus, classify_prayers, format_twelve_hour};
pub use services::Services;
pub use state::AppState;
pub use traits::{Clock, MockClock, SystemClock};
