//! Weather observations and the viability assessment derived from them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point-in-time conditions at the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Temperature in °C
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    /// Free-text description (e.g. "scattered clouds")
    pub description: String,
    /// Wind speed in the provider's unit (m/s for metric OpenWeatherMap)
    pub wind_speed: f64,
}

/// One day of the trip's forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub temperature: f64,
    pub description: String,
    pub wind_speed: f64,
}

impl DailyWeather {
    /// Weekday name, e.g. "Saturday"
    pub fn day_name(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// Everything the weather capability returned for a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBundle {
    /// Location as resolved by the provider
    pub location: String,
    pub current: CurrentConditions,
    /// Ordered per-day series over the trip's dates; may be empty
    #[serde(default)]
    pub daily: Vec<DailyWeather>,
}

impl WeatherBundle {
    /// True when a multi-day breakdown is available
    pub fn has_daily(&self) -> bool {
        !self.daily.is_empty()
    }
}

/// Canonical weather verdict for a trip
///
/// Produced only by `scoring::assess_viability`. The trip state stores this
/// one value and exposes score and verdict through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viability {
    /// 0-100
    pub score: f64,
    /// Go/no-go
    pub viable: bool,
    pub reason: String,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}
