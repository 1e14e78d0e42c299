use super::types::{CurrentPayload, ForecastPayload, GeocodedCity, GeocodingResponse};
use super::{get_json, UpstreamError};
use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const GEOCODING: &str = "open-meteo geocoding";
const FORECAST: &str = "open-meteo forecast";

/// Variables requested for the current-conditions shape.
const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,pressure_msl,visibility";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
wind_speed_10m_max,sunrise,sunset,precipitation_probability_max,uv_index_max";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weather_code";

/// Client for Open-Meteo's geocoding and forecast APIs. Both are keyless.
pub struct OpenMeteoClient {
    client: Client,
    config: Config,
}

impl OpenMeteoClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("WeatherProxyServer/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Resolve a city name to coordinates plus display metadata.
    ///
    /// Returns `Ok(None)` when the provider knows no matching place; the
    /// first match is authoritative, no disambiguation is attempted.
    pub async fn geocode(&self, name: &str) -> Result<Option<GeocodedCity>, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.geocoding_base_url, self.config.geocoding_search_path
        );

        let payload = get_json(
            &self.client,
            GEOCODING,
            &url,
            &[
                ("name", name),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ],
        )
        .await?;

        let decoded: GeocodingResponse = serde_json::from_value(payload)
            .map_err(|source| UpstreamError::Decode { provider: GEOCODING, source })?;

        Ok(first_match(decoded))
    }

    pub async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentPayload, UpstreamError> {
        let payload = self
            .forecast_request(&[
                ("latitude", &latitude.to_string()),
                ("longitude", &longitude.to_string()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
            ])
            .await?;

        serde_json::from_value(payload)
            .map_err(|source| UpstreamError::Decode { provider: FORECAST, source })
    }

    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u32,
    ) -> Result<ForecastPayload, UpstreamError> {
        // Open-Meteo serves at most 16 forecast days
        let days = days.clamp(1, 16);

        let payload = self
            .forecast_request(&[
                ("latitude", &latitude.to_string()),
                ("longitude", &longitude.to_string()),
                ("current", CURRENT_FIELDS),
                ("daily", DAILY_FIELDS),
                ("hourly", HOURLY_FIELDS),
                ("forecast_days", &days.to_string()),
                ("timezone", "auto"),
            ])
            .await?;

        serde_json::from_value(payload)
            .map_err(|source| UpstreamError::Decode { provider: FORECAST, source })
    }

    async fn forecast_request(&self, params: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.open_meteo_base_url, self.config.open_meteo_forecast_path
        );

        let payload = get_json(&self.client, FORECAST, &url, params).await?;
        check_provider_error(FORECAST, &payload)?;
        Ok(payload)
    }
}

fn first_match(response: GeocodingResponse) -> Option<GeocodedCity> {
    response
        .results
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
}

/// Open-Meteo reports failures in-band as `{"error": true, "reason": "..."}`.
fn check_provider_error(provider: &'static str, payload: &Value) -> Result<(), UpstreamError> {
    if payload.get("error").and_then(Value::as_bool).unwrap_or(false) {
        let reason = payload
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(UpstreamError::Provider { provider, reason });
    }
    Ok(())
}
