use super::types::SearchResult;
use super::{get_json, UpstreamError};
use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const PROVIDER: &str = "weatherapi";

/// Client for WeatherAPI.com, which serves the history and city-search
/// endpoints. Requires an API key (`WEATHER_API_KEY`).
pub struct WeatherApiClient {
    client: Client,
    config: Config,
}

impl WeatherApiClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("WeatherProxyServer/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch the raw history document for a city and date (`YYYY-MM-DD`).
    /// The document is passed through to the caller unshaped.
    pub async fn fetch_history(&self, city: &str, date: &str) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.weather_api_base_url, self.config.weather_api_history_path
        );

        let payload = get_json(
            &self.client,
            PROVIDER,
            &url,
            &[
                ("key", self.config.weather_api_key.as_str()),
                ("q", city),
                ("dt", date),
            ],
        )
        .await?;

        check_provider_error(&payload)?;
        Ok(payload)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.weather_api_base_url, self.config.weather_api_search_path
        );

        let payload = get_json(
            &self.client,
            PROVIDER,
            &url,
            &[("key", self.config.weather_api_key.as_str()), ("q", query)],
        )
        .await?;

        check_provider_error(&payload)?;

        serde_json::from_value(payload)
            .map_err(|source| UpstreamError::Decode { provider: PROVIDER, source })
    }
}

/// WeatherAPI reports failures in-band as `{"error": {"code", "message"}}`.
fn check_provider_error(payload: &Value) -> Result<(), UpstreamError> {
    if let Some(message) = payload
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Err(UpstreamError::Provider {
            provider: PROVIDER,
            reason: message.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_provider_error_flags_error_object() {
        let payload = json!({ "error": { "code": 1006, "message": "No matching location found." } });
        let err = check_provider_error(&payload).unwrap_err();
        assert!(err.to_string().contains("No matching location found."));
    }

    #[test]
    fn test_check_provider_error_passes_history_document() {
        let payload = json!({
            "location": { "name": "London" },
            "forecast": { "forecastday": [] }
        });
        assert!(check_provider_error(&payload).is_ok());
    }

    #[test]
    fn test_search_results_decode_subset_of_fields() {
        let payload = json!([
            { "id": 2801268, "name": "London", "region": "City of London", "country": "United Kingdom", "lat": 51.52, "lon": -0.11 },
            { "id": 315398, "name": "Londrina", "region": "Parana", "country": "Brazil", "lat": -23.3, "lon": -51.16 }
        ]);

        let results: Vec<SearchResult> = serde_json::from_value(payload).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 2801268);
        assert_eq!(results[1].country, "Brazil");
    }
}
