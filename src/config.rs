use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub weather_api_key: String,
    pub weather_api_base_url: String,
    pub weather_api_history_path: String,
    pub weather_api_search_path: String,
    pub open_meteo_base_url: String,
    pub open_meteo_forecast_path: String,
    pub geocoding_base_url: String,
    pub geocoding_search_path: String,
    pub cache_ttl: Duration,
    pub search_cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            weather_api_key: env::var("WEATHER_API_KEY")
                .map_err(|_| anyhow::anyhow!("WEATHER_API_KEY not set"))?,
            weather_api_base_url: env::var("WEATHER_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.weatherapi.com".to_string()),
            weather_api_history_path: env::var("WEATHER_API_HISTORY_PATH")
                .unwrap_or_else(|_| "/v1/history.json".to_string()),
            weather_api_search_path: env::var("WEATHER_API_SEARCH_PATH")
                .unwrap_or_else(|_| "/v1/search.json".to_string()),
            open_meteo_base_url: env::var("OPEN_METEO_BASE_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com".to_string()),
            open_meteo_forecast_path: env::var("OPEN_METEO_FORECAST_PATH")
                .unwrap_or_else(|_| "/v1/forecast".to_string()),
            geocoding_base_url: env::var("GEOCODING_BASE_URL")
                .unwrap_or_else(|_| "https://geocoding-api.open-meteo.com".to_string()),
            geocoding_search_path: env::var("GEOCODING_SEARCH_PATH")
                .unwrap_or_else(|_| "/v1/search".to_string()),
            cache_ttl: Duration::from_secs(
                env::var("CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(600),
            ),
            // City metadata changes far less often than weather
            search_cache_ttl: Duration::from_secs(
                env::var("SEARCH_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(86_400),
            ),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        })
    }
}
