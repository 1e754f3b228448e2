//! OpenWeatherMap weather provider

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ProviderError, WeatherProvider};
use crate::config::WeatherConfig;
use crate::domain::{CurrentConditions, DailyWeather, MAX_TRIP_DAYS, WeatherBundle};

/// The free forecast endpoint returns 3-hour slots; one in eight is one per day
const SLOTS_PER_DAY: usize = 8;

/// Days the free forecast covers
const FORECAST_DAYS: usize = 5;

/// OpenWeatherMap client using the current-weather and 5-day forecast endpoints
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl OpenWeatherClient {
    /// Create a new client from configuration
    pub fn from_config(config: &WeatherConfig) -> Result<Self, ProviderError> {
        debug!(base_url = %config.base_url, "OpenWeatherClient::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, location: &str) -> Result<T, ProviderError> {
        debug!(%endpoint, %location, "get: called");
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .http
            .get(url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "get: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn forecast(&self, location: &str, start: NaiveDate, end: NaiveDate) -> Result<WeatherBundle, ProviderError> {
        debug!(%location, %start, %end, "OpenWeatherClient::forecast: called");
        let current: CurrentResponse = self.get("weather", location).await?;
        let current_name = current.name.clone();
        let current = current.into_conditions();

        let samples = match self.get::<ForecastResponse>("forecast", location).await {
            Ok(forecast) => forecast.list.into_iter().map(ForecastSample::from).collect(),
            Err(e) => {
                warn!(%location, error = %e, "Forecast unavailable, padding with current conditions");
                Vec::new()
            }
        };

        Ok(WeatherBundle {
            location: if current_name.is_empty() {
                location.to_string()
            } else {
                current_name
            },
            daily: expand_forecast(&current, &samples, start, end),
            current,
        })
    }
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub temperature: f64,
    pub description: String,
    pub wind_speed: f64,
}

/// Build the per-day series for a trip's date range
///
/// Day `i` takes the forecast slot `i * 8` while the 5-day forecast lasts;
/// later days repeat the current conditions. The range is capped at
/// `MAX_TRIP_DAYS` days.
pub fn expand_forecast(
    current: &CurrentConditions,
    samples: &[ForecastSample],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyWeather> {
    let days = (end - start).num_days().max(0) as u64 + 1;
    let days = days.min(u64::from(MAX_TRIP_DAYS));
    debug!(%days, samples = samples.len(), "expand_forecast: called");

    let mut forecast = samples.iter().step_by(SLOTS_PER_DAY).take(FORECAST_DAYS);

    (0..days)
        .filter_map(|offset| {
            let date = start.checked_add_days(Days::new(offset))?;
            let day = match forecast.next() {
                Some(sample) => DailyWeather {
                    date,
                    temperature: sample.temperature,
                    description: sample.description.clone(),
                    wind_speed: sample.wind_speed,
                },
                None => DailyWeather {
                    date,
                    temperature: current.temperature,
                    description: current.description.clone(),
                    wind_speed: current.wind_speed,
                },
            };
            Some(day)
        })
        .collect()
}

// OpenWeatherMap response types

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<DescriptionBlock>,
    #[serde(default)]
    wind: WindBlock,
}

impl CurrentResponse {
    fn into_conditions(self) -> CurrentConditions {
        CurrentConditions {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            description: first_description(&self.weather),
            wind_speed: self.wind.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<DescriptionBlock>,
    #[serde(default)]
    wind: WindBlock,
}

impl From<ForecastEntry> for ForecastSample {
    fn from(entry: ForecastEntry) -> Self {
        Self {
            temperature: entry.main.temp,
            description: first_description(&entry.weather),
            wind_speed: entry.wind.speed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DescriptionBlock {
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

fn first_description(blocks: &[DescriptionBlock]) -> String {
    blocks
        .first()
        .map(|b| b.description.clone())
        .unwrap_or_else(|| "clear sky".to_string())
}
