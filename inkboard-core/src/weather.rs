//! Current weather via the Open-Meteo forecast API.
//!
//! Recomputed on every request; failures surface to the caller instead of
//! being cached or retried.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InkboardError, InkboardResult};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const FORECAST_DAYS: usize = 2;

/// The weather snapshot served by `/api/weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: i32,
    /// WMO weather code.
    pub condition: u32,
    /// 1 = day, 0 = night.
    pub is_day: u8,
    /// Observation time as reported by the API.
    pub time: String,
    pub forecast: Vec<DailyForecast>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub min: i32,
    pub max: i32,
    pub condition: u32,
}

#[derive(Deserialize, Default)]
struct ApiResponse {
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
    #[serde(default)]
    hourly: Option<Hourly>,
    #[serde(default)]
    daily: Option<Daily>,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u32,
    #[serde(default)]
    is_day: u8,
    #[serde(default)]
    time: String,
}

#[derive(Deserialize)]
struct Hourly {
    #[serde(default)]
    relativehumidity_2m: Vec<f64>,
    #[serde(default)]
    apparent_temperature: Vec<f64>,
}

#[derive(Deserialize)]
struct Daily {
    #[serde(default)]
    time: Vec<NaiveDate>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    weathercode: Vec<u32>,
}

pub async fn fetch_weather(
    client: &reqwest::Client,
    lat: f64,
    lon: f64,
) -> InkboardResult<WeatherReport> {
    let response: ApiResponse = client
        .get(FORECAST_URL)
        .query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("current_weather", "true".to_string()),
            (
                "hourly",
                "relativehumidity_2m,apparent_temperature,temperature_2m".to_string(),
            ),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,weathercode".to_string(),
            ),
            ("timezone", "auto".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .map_err(|e| InkboardError::Parse(e.to_string()))?;

    Ok(report_from_response(response))
}

fn report_from_response(response: ApiResponse) -> WeatherReport {
    let current = response.current_weather;
    let hourly = response.hourly;

    let temp = current.as_ref().map(|c| c.temperature).unwrap_or(0.0);
    let feels_like = hourly
        .as_ref()
        .and_then(|h| h.apparent_temperature.first().copied())
        .unwrap_or(0.0);
    let humidity = hourly
        .as_ref()
        .and_then(|h| h.relativehumidity_2m.first().copied())
        .unwrap_or(0.0);

    let forecast = response
        .daily
        .map(|daily| {
            daily
                .time
                .iter()
                .zip(daily.temperature_2m_min.iter())
                .zip(daily.temperature_2m_max.iter())
                .zip(daily.weathercode.iter())
                .take(FORECAST_DAYS)
                .map(|(((date, min), max), condition)| DailyForecast {
                    date: *date,
                    min: min.round() as i32,
                    max: max.round() as i32,
                    condition: *condition,
                })
                .collect()
        })
        .unwrap_or_default();

    WeatherReport {
        temp: temp.round() as i32,
        feels_like: feels_like.round() as i32,
        humidity: humidity.round() as i32,
        condition: current.as_ref().map(|c| c.weathercode).unwrap_or(0),
        is_day: current.as_ref().map(|c| c.is_day).unwrap_or(0),
        time: current.map(|c| c.time).unwrap_or_default(),
        forecast,
    }
}
