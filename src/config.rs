use std::env;
use std::time::Duration;

use crate::providers::OpenWeatherSettings;

pub(crate) struct Config {
    pub host: String,
    pub port: u16,
    pub weather_api_key: String,
    pub weather_base_url: String,
    pub geo_api_key: String,
    pub geo_base_url: String,
    pub geo_country_hint: Option<String>,
    pub uv_api_url: String,
    /// Upper bound on a single bus request/reply exchange.
    pub backend_timeout: Duration,
    /// Upper bound on a single provider HTTP request.
    pub provider_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let weather_api_key = env::var("WEATHER_API_KEY").unwrap_or_default();
        if weather_api_key.is_empty() {
            log::warn!("WEATHER_API_KEY is not set; provider requests will be rejected");
        }

        Self {
            host: env::var("SERVER_IP").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3010),
            geo_api_key: env::var("GEO_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| weather_api_key.clone()),
            weather_api_key,
            weather_base_url: env::var("BASE_WEATHER_API_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".into()),
            geo_base_url: env::var("BASE_GEO_API_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/geo/1.0".into()),
            geo_country_hint: Some(env::var("GEO_COUNTRY_HINT").unwrap_or_else(|_| "br".into()))
                .filter(|h| !h.is_empty()),
            uv_api_url: env::var("UV_API_URL")
                .unwrap_or_else(|_| "https://currentuvindex.com/api/v1/uvi".into()),
            backend_timeout: seconds_var("BACKEND_TIMEOUT_SECS", 10),
            provider_timeout: seconds_var("PROVIDER_TIMEOUT_SECS", 10),
        }
    }

    pub fn openweather(&self) -> OpenWeatherSettings {
        OpenWeatherSettings {
            weather_base_url: self.weather_base_url.trim_end_matches('/').to_string(),
            geo_base_url: self.geo_base_url.trim_end_matches('/').to_string(),
            api_key: self.weather_api_key.clone(),
            geo_api_key: self.geo_api_key.clone(),
            country_hint: self.geo_country_hint.clone(),
        }
    }
}

fn seconds_var(name: &str, default: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|&s| s > 0)
        .unwrap_or(default);
    Duration::from_secs(secs)
}
