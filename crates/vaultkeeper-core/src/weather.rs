//! Today's forecast from Open-Meteo
//!
//! Weather only decorates day planning, so every failure collapses to `None`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,\
precipitation_probability_max,weathercode,wind_speed_10m_max,sunrise,sunset";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weathercode";

/// Daylight hours considered for outdoor activity
const FIRST_OUTDOOR_HOUR: u32 = 7;
const LAST_OUTDOOR_HOUR: u32 = 19;
const COMFORT_TEMP_F: f64 = 68.0;
const DEFAULT_TEMP_F: f64 = 70.0;
const DEFAULT_PRECIP_PCT: f64 = 50.0;

const NO_HOURLY_WINDOW: &str = "midday (no hourly data available)";
const FALLBACK_WINDOW: &str = "midday";

/// Summary of today's forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherInfo {
    pub temperature_high_f: f64,
    pub temperature_low_f: f64,
    pub condition: String,
    pub precipitation_chance: f64,
    pub wind_speed_mph: f64,
    /// Local time, `HH:MM`
    pub sunrise: String,
    pub sunset: String,
    /// `HH:00-HH:00` or a midday fallback
    pub best_outdoor_window: String,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    daily: Daily,
    #[serde(default)]
    hourly: Option<Hourly>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_probability_max: Vec<f64>,
    weathercode: Vec<i64>,
    wind_speed_10m_max: Vec<f64>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
}

/// Hourly series; entries may be null
#[derive(Debug, Default, Deserialize)]
pub struct Hourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability: Vec<Option<f64>>,
}

/// Blocking Open-Meteo client
pub struct WeatherClient {
    agent: ureq::Agent,
    url: String,
}

impl Default for WeatherClient {
    fn default() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        WeatherClient {
            agent: ureq::Agent::new_with_config(config),
            url: OPEN_METEO_URL.to_string(),
        }
    }
}

impl WeatherClient {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Today's forecast at a location, `None` on any failure
    #[tracing::instrument(skip(self))]
    pub fn fetch(&self, latitude: f64, longitude: f64) -> Option<WeatherInfo> {
        match self.try_fetch(latitude, longitude) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!(error = %e, "weather lookup failed");
                None
            }
        }
    }

    fn try_fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherInfo> {
        let mut response = self
            .agent
            .get(&self.url)
            .query("latitude", latitude.to_string())
            .query("longitude", longitude.to_string())
            .query("daily", DAILY_FIELDS)
            .query("hourly", HOURLY_FIELDS)
            .query("temperature_unit", "fahrenheit")
            .query("wind_speed_unit", "mph")
            .query("timezone", "auto")
            .query("forecast_days", "1")
            .call()
            .map_err(VaultError::oracle)?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(VaultError::oracle)?;
        parse_forecast(&body)
    }
}

/// Today's forecast using the default client
pub fn fetch_weather(latitude: f64, longitude: f64) -> Option<WeatherInfo> {
    WeatherClient::default().fetch(latitude, longitude)
}

fn parse_forecast(body: &str) -> Result<WeatherInfo> {
    let forecast: Forecast = serde_json::from_str(body)?;
    let daily = forecast.daily;

    let first = |values: &[f64], name: &str| -> Result<f64> {
        values
            .first()
            .copied()
            .ok_or_else(|| VaultError::oracle(format!("forecast is missing {}", name)))
    };

    let high = first(&daily.temperature_2m_max, "temperature_2m_max")?;
    let low = first(&daily.temperature_2m_min, "temperature_2m_min")?;
    let precip = first(
        &daily.precipitation_probability_max,
        "precipitation_probability_max",
    )?;
    let wind = first(&daily.wind_speed_10m_max, "wind_speed_10m_max")?;
    let code = daily
        .weathercode
        .first()
        .copied()
        .ok_or_else(|| VaultError::oracle("forecast is missing weathercode"))?;

    let condition = condition_for_code(code).to_string();
    let summary = format!(
        "{}, high {:.0}F / low {:.0}F, {:.0}% chance of rain, wind {:.0} mph",
        condition, high, low, precip, wind
    );

    Ok(WeatherInfo {
        temperature_high_f: high,
        temperature_low_f: low,
        condition,
        precipitation_chance: precip,
        wind_speed_mph: wind,
        sunrise: local_time(daily.sunrise.first()),
        sunset: local_time(daily.sunset.first()),
        best_outdoor_window: best_outdoor_window(forecast.hourly.as_ref()),
        summary,
    })
}

/// `2026-01-15T07:12` -> `07:12`
fn local_time(stamp: Option<&Option<String>>) -> String {
    stamp
        .and_then(|s| s.as_deref())
        .and_then(|s| s.split_once('T'))
        .map(|(_, time)| time.to_string())
        .unwrap_or_default()
}

/// WMO weather interpretation code as text
pub fn condition_for_code(code: i64) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "foggy",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown",
    }
}

/// Driest, most comfortable daylight hour as `HH:00-HH:00`.
///
/// Score is `2 * max(0, 100 - precip) + max(0, 50 - |temp - 68|)`; ties keep
/// the earlier hour.
pub fn best_outdoor_window(hourly: Option<&Hourly>) -> String {
    let Some(hourly) = hourly.filter(|h| !h.time.is_empty()) else {
        return NO_HOURLY_WINDOW.to_string();
    };

    let mut best: Option<(u32, f64)> = None;
    for (i, stamp) in hourly.time.iter().enumerate() {
        let Some(hour) = hour_of(stamp) else {
            continue;
        };
        if !(FIRST_OUTDOOR_HOUR..=LAST_OUTDOOR_HOUR).contains(&hour) {
            continue;
        }

        let temp = hourly
            .temperature_2m
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_TEMP_F);
        let precip = hourly
            .precipitation_probability
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_PRECIP_PCT);

        let precip_score = (100.0 - precip).max(0.0);
        let temp_score = (50.0 - (temp - COMFORT_TEMP_F).abs()).max(0.0);
        let score = precip_score * 2.0 + temp_score;

        let better = match best {
            Some((_, best_score)) => score > best_score,
            None => true,
        };
        if better {
            best = Some((hour, score));
        }
    }

    match best {
        Some((hour, _)) => format!("{:02}:00-{:02}:00", hour, hour + 1),
        None => FALLBACK_WINDOW.to_string(),
    }
}

fn hour_of(stamp: &str) -> Option<u32> {
    let (_, time) = stamp.split_once('T')?;
    time.split(':').next()?.parse().ok()
}
