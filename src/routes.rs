use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    cache::{cache_key, CacheStore},
    config::Config,
    error::ApiError,
    shape::{shape_current, shape_forecast, shape_history_series, Location},
    upstream::{openmeteo::OpenMeteoClient, weatherapi::WeatherApiClient},
};

const HISTORY_SERIES_DAYS: i64 = 7;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<CacheStore>,
    pub open_meteo: Arc<OpenMeteoClient>,
    pub weather_api: Arc<WeatherApiClient>,
}

// Request/Response types
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub q: Option<String>,
    pub city: Option<String>,
}

impl CityQuery {
    /// The two historical frontends disagreed on the parameter name, so
    /// both `q` and `city` are accepted, with `q` taking precedence.
    fn city(&self) -> Option<&str> {
        self.q
            .as_deref()
            .or(self.city.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub q: Option<String>,
    pub city: Option<String>,
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub q: Option<String>,
    pub city: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
}

/// Spread a `source` tag into a shaped document, mirroring the
/// `{source, ...data}` response contract.
fn tag_source(document: Value, source: &str) -> Value {
    match document {
        Value::Object(mut map) => {
            map.insert("source".to_string(), Value::String(source.to_string()));
            Value::Object(map)
        }
        other => other,
    }
}

fn to_document<T: Serialize>(shaped: &T) -> Result<Value, ApiError> {
    serde_json::to_value(shaped).map_err(|err| ApiError::Internal(err.into()))
}

// Route handlers
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn current(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<Value>, ApiError> {
    let city = params.city().ok_or(ApiError::BadRequest("Missing city name"))?;

    let key = cache_key("current", &[city]);
    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!("Cache hit for {}", key);
        return Ok(Json(tag_source(cached, "cache")));
    }

    let resolved = state
        .open_meteo
        .geocode(city)
        .await?
        .ok_or(ApiError::NotFound)?;

    let payload = state
        .open_meteo
        .fetch_current(resolved.latitude, resolved.longitude)
        .await?;

    let document = to_document(&shape_current(Location::from(&resolved), &payload))?;
    state
        .cache
        .set(key, document.clone(), state.config.cache_ttl)
        .await;

    Ok(Json(tag_source(document, "api")))
}

pub async fn forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<Value>, ApiError> {
    let city_params = CityQuery {
        q: params.q,
        city: params.city,
    };
    let city = city_params
        .city()
        .ok_or(ApiError::BadRequest("Missing city name"))?;
    let days = params.days.unwrap_or(7);

    let key = cache_key("forecast", &[city, &days.to_string()]);
    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!("Cache hit for {}", key);
        return Ok(Json(tag_source(cached, "cache")));
    }

    let resolved = state
        .open_meteo
        .geocode(city)
        .await?
        .ok_or(ApiError::NotFound)?;

    let payload = state
        .open_meteo
        .fetch_forecast(resolved.latitude, resolved.longitude, days)
        .await?;

    let document = to_document(&shape_forecast(Location::from(&resolved), &payload))?;
    state
        .cache
        .set(key, document.clone(), state.config.cache_ttl)
        .await;

    Ok(Json(tag_source(document, "api")))
}

pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Value>, ApiError> {
    let city_params = CityQuery {
        q: params.q,
        city: params.city,
    };
    let (city, date) = match (city_params.city(), params.date.as_deref()) {
        (Some(city), Some(date)) => (city, date),
        _ => return Err(ApiError::BadRequest("Missing city name or date")),
    };

    let key = cache_key("history", &[city, date]);
    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!("Cache hit for {}", key);
        return Ok(Json(tag_source(cached, "cache")));
    }

    // WeatherAPI resolves the city itself; the raw history document is
    // passed through unshaped.
    let document = state.weather_api.fetch_history(city, date).await?;
    state
        .cache
        .set(key, document.clone(), state.config.cache_ttl)
        .await;

    Ok(Json(tag_source(document, "api")))
}

pub async fn history_series(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<Value>, ApiError> {
    let city = params.city().ok_or(ApiError::BadRequest("Missing city name"))?;

    let today = chrono::Utc::now().date_naive();
    let mut days = Vec::with_capacity(HISTORY_SERIES_DAYS as usize);
    let mut all_cached = true;

    // Walk back from today; each per-day document shares the /history
    // cache keys, so a warm series run touches the upstream zero times.
    for offset in 0..HISTORY_SERIES_DAYS {
        let date = (today - chrono::Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string();

        let key = cache_key("history", &[city, &date]);
        let document = match state.cache.get(&key).await {
            Some(cached) => cached,
            None => {
                all_cached = false;
                let fetched = state.weather_api.fetch_history(city, &date).await?;
                state
                    .cache
                    .set(key, fetched.clone(), state.config.cache_ttl)
                    .await;
                fetched
            }
        };

        days.push((date, document));
    }

    let series = shape_history_series(city, &days);
    let document = to_document(&series)?;
    let source = if all_cached { "cache" } else { "api" };

    Ok(Json(tag_source(document, source)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<Value>, ApiError> {
    let query = params.city().ok_or(ApiError::BadRequest("Missing query"))?;

    let key = cache_key("search", &[query]);
    if let Some(cached) = state.cache.get(&key).await {
        tracing::debug!("Cache hit for {}", key);
        return Ok(Json(tag_source(cached, "cache")));
    }

    let results = state.weather_api.search(query).await?;
    let document = serde_json::json!({ "results": results });

    state
        .cache
        .set(key, document.clone(), state.config.search_cache_ttl)
        .await;

    Ok(Json(tag_source(document, "api")))
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    let weather = Router::new()
        .route("/current", get(current))
        .route("/forecast", get(forecast))
        .route("/history", get(history))
        .route("/history/series", get(history_series))
        .route("/search", get(search));

    Router::new()
        .route("/health", get(health))
        .nest("/api/weather", weather)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_city_query_prefers_q_over_city() {
        let params = CityQuery {
            q: Some("Paris".to_string()),
            city: Some("London".to_string()),
        };
        assert_eq!(params.city(), Some("Paris"));
    }

    #[test]
    fn test_city_query_falls_back_to_city() {
        let params = CityQuery {
            q: None,
            city: Some("London".to_string()),
        };
        assert_eq!(params.city(), Some("London"));
    }

    #[test]
    fn test_city_query_trims_and_rejects_blank() {
        let params = CityQuery {
            q: Some("  Oslo  ".to_string()),
            city: None,
        };
        assert_eq!(params.city(), Some("Oslo"));

        let blank = CityQuery {
            q: Some("   ".to_string()),
            city: None,
        };
        assert_eq!(blank.city(), None);

        let empty = CityQuery { q: None, city: None };
        assert_eq!(empty.city(), None);
    }

    #[test]
    fn test_tag_source_spreads_into_document() {
        let tagged = tag_source(json!({ "location": { "name": "Paris" } }), "api");

        assert_eq!(tagged["source"], json!("api"));
        assert_eq!(tagged["location"]["name"], json!("Paris"));
    }

    #[test]
    fn test_tag_source_overwrites_stale_tag() {
        let tagged = tag_source(json!({ "source": "api", "x": 1 }), "cache");
        assert_eq!(tagged["source"], json!("cache"));
        assert_eq!(tagged["x"], json!(1));
    }
}
