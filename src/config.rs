use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub endpoints: EndpointsConfig,
    pub network: NetworkConfig,
    pub prayer: PrayerConfig,
    pub geolocation: GeolocationConfig,
    pub search: SearchConfig,
    pub autocomplete: AutocompleteConfig,
    pub refresh: RefreshConfig,
    pub window: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    pub prayer_api_url: String,
    pub geocoding_url: String,
    pub ip_geolocation_url: String,
    /// Sent with every geocoding request; Nominatim rejects anonymous clients.
    pub user_agent: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            prayer_api_url: "https://api.aladhan.com/v1".to_string(),
            geocoding_url: "https://nominatim.openstreetmap.org".to_string(),
            ip_geolocation_url: "http://ip-api.com/json".to_string(),
            user_agent: concat!("prayer-times/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrayerConfig {
    /// Opaque calculation method identifier passed to the timings endpoint.
    pub calculation_method: u32,
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            calculation_method: 2,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationSourceKind {
    #[default]
    Ip,
    Fixed,
    Disabled,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeolocationConfig {
    pub source: GeolocationSourceKind,
    pub timeout_secs: u64,
    pub max_cache_age_secs: u64,
    pub high_accuracy: bool,
    pub fixed_latitude: Option<f64>,
    pub fixed_longitude: Option<f64>,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            source: GeolocationSourceKind::Ip,
            timeout_secs: 10,
            max_cache_age_secs: 60,
            high_accuracy: true,
            fixed_latitude: None,
            fixed_longitude: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub limit: u32,
    pub min_importance: f64,
    pub place_types: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            min_importance: 0.1,
            place_types: DEFAULT_PLACE_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Settlement types kept by city search; streets, rivers and landmarks are dropped.
pub const DEFAULT_PLACE_TYPES: [&str; 5] = ["city", "town", "village", "suburb", "neighbourhood"];

#[derive(Debug, Deserialize, Clone)]
pub struct AutocompleteConfig {
    pub min_chars: usize,
    pub max_suggestions: usize,
    pub blur_grace_ms: u64,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_chars: 2,
            max_suggestions: 5,
            blur_grace_ms: 150,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub classify_interval_secs: u64,
    pub modal_error_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            classify_interval_secs: 60,
            modal_error_secs: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Prayer Times".to_string(),
            width: 960.0,
            height: 780.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, optional config files and `PRAYER__*` env vars.
    pub fn load() -> Result<Self> {
        Self::build(None)
    }

    /// Same as [`AppConfig::load`], with one extra required file layered above the
    /// user config directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(Some(path))
    }

    fn build(extra: Option<&Path>) -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prayer-times");

        let mut builder = Self::with_defaults(Config::builder())?
            // 2. Load from local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // 3. Load from user config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false));

        if let Some(path) = extra {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // 4. Load from Environment variables (PRAYER__NETWORK__REQUEST_TIMEOUT_SECS=...)
        let builder = builder.add_source(Environment::with_prefix("PRAYER").separator("__"));

        let s = builder.build().context("Failed to assemble configuration")?;
        Ok(s.try_deserialize()?)
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>> {
        let endpoints = EndpointsConfig::default();
        let builder = builder
            // Endpoints
            .set_default("endpoints.prayer_api_url", endpoints.prayer_api_url)?
            .set_default("endpoints.geocoding_url", endpoints.geocoding_url)?
            .set_default("endpoints.ip_geolocation_url", endpoints.ip_geolocation_url)?
            .set_default("endpoints.user_agent", endpoints.user_agent)?
            // Network
            .set_default("network.request_timeout_secs", 30)?
            .set_default("network.connect_timeout_secs", 10)?
            // Prayer
            .set_default("prayer.calculation_method", 2)?
            // Geolocation
            .set_default("geolocation.source", "ip")?
            .set_default("geolocation.timeout_secs", 10)?
            .set_default("geolocation.max_cache_age_secs", 60)?
            .set_default("geolocation.high_accuracy", true)?
            // Search
            .set_default("search.limit", 10)?
            .set_default("search.min_importance", 0.1)?
            .set_default("search.place_types", DEFAULT_PLACE_TYPES.to_vec())?
            // Autocomplete
            .set_default("autocomplete.min_chars", 2)?
            .set_default("autocomplete.max_suggestions", 5)?
            .set_default("autocomplete.blur_grace_ms", 150)?
            // Refresh
            .set_default("refresh.classify_interval_secs", 60)?
            .set_default("refresh.modal_error_secs", 3)?
            // Window
            .set_default("window.title", "Prayer Times")?
            .set_default("window.width", 960.0)?
            .set_default("window.height", 780.0)?;
        Ok(builder)
    }
}
