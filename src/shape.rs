//! Pure transforms from raw upstream payloads to the normalized weather
//! documents served to the client. No I/O, no hidden state: shaping the
//! same payload twice yields identical output.

use serde::Serialize;
use serde_json::Value;

use crate::conditions::{describe, WeatherCondition};
use crate::upstream::types::{CurrentPayload, ForecastPayload, GeocodedCity, RawCurrent, RawHourly};

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
}

impl From<&GeocodedCity> for Location {
    fn from(city: &GeocodedCity) -> Self {
        Self {
            name: city.name.clone(),
            country: city.country.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub condition: WeatherCondition,
    pub wind_kph: f64,
    pub humidity: f64,
    pub pressure_mb: f64,
    pub vis_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feelslike_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CurrentDocument {
    pub location: Location,
    pub current: CurrentConditions,
}

#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub maxwind_kph: f64,
    pub condition: WeatherCondition,
    pub daily_chance_of_rain: u8,
}

#[derive(Debug, Serialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Serialize)]
pub struct HourlyPoint {
    pub time: String,
    pub temp_c: f64,
    pub chance_of_rain: u8,
    pub condition: WeatherCondition,
}

#[derive(Debug, Serialize)]
pub struct ForecastDay {
    pub date: String,
    pub day: DaySummary,
    pub astro: Astro,
    pub hour: Vec<HourlyPoint>,
}

#[derive(Debug, Serialize)]
pub struct ForecastBlock {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Serialize)]
pub struct ForecastDocument {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: ForecastBlock,
}

#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub max: f64,
    pub min: f64,
}

#[derive(Debug, Serialize)]
pub struct HistorySeries {
    pub city: String,
    pub history: Vec<HistoryDay>,
}

fn shape_conditions(raw: &RawCurrent) -> CurrentConditions {
    CurrentConditions {
        temp_c: raw.temperature_2m,
        condition: describe(raw.weather_code),
        wind_kph: raw.wind_speed_10m,
        humidity: raw.relative_humidity_2m,
        pressure_mb: raw.pressure_msl,
        // Upstream reports visibility in meters
        vis_km: raw.visibility / 1000.0,
        feelslike_c: None,
        uv: None,
    }
}

pub fn shape_current(location: Location, payload: &CurrentPayload) -> CurrentDocument {
    CurrentDocument {
        location,
        current: shape_conditions(&payload.current),
    }
}

/// Shape a combined current+daily+hourly payload into the forecast document.
///
/// One `ForecastDay` is built per daily time point; the flat hourly arrays
/// are partitioned into the days by matching each hour's timestamp prefix
/// against the day's date. Array fields are trusted to be index-aligned
/// with `time`; short arrays yield defaulted values, never an error.
pub fn shape_forecast(location: Location, payload: &ForecastPayload) -> ForecastDocument {
    let daily = &payload.daily;
    let hourly = &payload.hourly;

    let mut current = shape_conditions(&payload.current);
    // The query carries no apparent-temperature variable; mirror the air
    // temperature. UV is proxied by the first day's daily maximum.
    current.feelslike_c = Some(payload.current.temperature_2m);
    current.uv = daily.uv_index_max.first().copied().flatten();

    let forecastday = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| ForecastDay {
            date: date.clone(),
            day: DaySummary {
                maxtemp_c: daily.temperature_2m_max.get(i).copied().unwrap_or_default(),
                mintemp_c: daily.temperature_2m_min.get(i).copied().unwrap_or_default(),
                maxwind_kph: daily.wind_speed_10m_max.get(i).copied().unwrap_or_default(),
                condition: describe(daily.weather_code.get(i).copied().unwrap_or_default()),
                daily_chance_of_rain: daily
                    .precipitation_probability_max
                    .get(i)
                    .copied()
                    .flatten()
                    .unwrap_or(0),
            },
            astro: Astro {
                sunrise: time_of_day(daily.sunrise.get(i)),
                sunset: time_of_day(daily.sunset.get(i)),
            },
            hour: hours_for_day(hourly, date),
        })
        .collect();

    ForecastDocument {
        location,
        current,
        forecast: ForecastBlock { forecastday },
    }
}

fn hours_for_day(hourly: &RawHourly, date: &str) -> Vec<HourlyPoint> {
    hourly
        .time
        .iter()
        .enumerate()
        .filter(|(_, time)| time.starts_with(date))
        .map(|(i, time)| HourlyPoint {
            time: time.replace('T', " "),
            temp_c: hourly.temperature_2m.get(i).copied().unwrap_or_default(),
            chance_of_rain: hourly
                .precipitation_probability
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(0),
            condition: describe(hourly.weather_code.get(i).copied().unwrap_or_default()),
        })
        .collect()
}

/// Extract the time-of-day component of a combined date-time string
/// ("2026-08-06T06:12" -> "06:12").
fn time_of_day(timestamp: Option<&String>) -> String {
    timestamp
        .and_then(|ts| ts.split_once('T'))
        .map(|(_, time)| time.to_string())
        .unwrap_or_default()
}

/// Build the 7-day temperature series from per-day raw history documents.
///
/// `days` is ordered newest to oldest as collected; the output is reversed
/// so the oldest day comes first. Days whose document carries no
/// forecast-day data are silently skipped.
pub fn shape_history_series(city: &str, days: &[(String, Value)]) -> HistorySeries {
    let mut history = Vec::new();

    for (date, document) in days {
        let day = document
            .get("forecast")
            .and_then(|forecast| forecast.get("forecastday"))
            .and_then(|forecastday| forecastday.get(0))
            .and_then(|first| first.get("day"));

        let day = match day {
            Some(day) => day,
            None => continue,
        };

        let max = day.get("maxtemp_c").and_then(Value::as_f64);
        let min = day.get("mintemp_c").and_then(Value::as_f64);

        if let (Some(max), Some(min)) = (max, min) {
            history.push(HistoryDay {
                date: date.clone(),
                max,
                min,
            });
        }
    }

    history.reverse();

    HistorySeries {
        city: city.to_string(),
        history,
    }
}
