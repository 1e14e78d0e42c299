use serde::{Deserialize, Serialize};

// Open-Meteo geocoding

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    /// Absent entirely when the query matches no known place.
    pub results: Option<Vec<GeocodedCity>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodedCity {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

// Open-Meteo forecast
//
// All array fields within `daily` and `hourly` are index-aligned with their
// `time` array. That alignment is trusted, not checked: a misaligned
// response yields defaulted values in the shaped output, never an error.

#[derive(Debug, Deserialize)]
pub struct CurrentPayload {
    pub current: RawCurrent,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub current: RawCurrent,
    pub daily: RawDaily,
    pub hourly: RawHourly,
}

#[derive(Debug, Deserialize)]
pub struct RawCurrent {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub weather_code: u16,
    pub wind_speed_10m: f64,
    pub pressure_msl: f64,
    /// Meters; the shaped document reports kilometers.
    pub visibility: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDaily {
    pub time: Vec<String>,
    #[serde(default)]
    pub weather_code: Vec<u16>,
    #[serde(default)]
    pub temperature_2m_max: Vec<f64>,
    #[serde(default)]
    pub temperature_2m_min: Vec<f64>,
    #[serde(default)]
    pub wind_speed_10m_max: Vec<f64>,
    /// Combined date-time strings, e.g. "2026-08-06T06:12".
    #[serde(default)]
    pub sunrise: Vec<String>,
    #[serde(default)]
    pub sunset: Vec<String>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<u8>>,
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<u8>>,
    #[serde(default)]
    pub weather_code: Vec<u16>,
}

// WeatherAPI city search

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: i64,
    pub name: String,
    pub country: String,
}
