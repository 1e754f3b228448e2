//! External data capabilities
//!
//! The workflow only sees the traits below. Concrete adapters: an
//! OpenWeatherMap client, an offline catalog for lodging, attractions and
//! flights, and an unavailable adapter standing in for unconfigured weather.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, warn};

mod catalog;
mod error;
mod openweather;

pub use catalog::CatalogSearch;
pub use error::ProviderError;
pub use openweather::{ForecastSample, OpenWeatherClient, expand_forecast};

use crate::config::Config;
use crate::domain::{Attraction, Flight, Lodging, WeatherBundle};
use crate::llm::{self, TextGenerator};

/// Current conditions plus a per-day forecast for a date range
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn forecast(&self, location: &str, start: NaiveDate, end: NaiveDate) -> Result<WeatherBundle, ProviderError>;
}

/// Lodging candidates near a location
#[async_trait]
pub trait LodgingSearch: Send + Sync {
    async fn find(&self, location: &str, budget: f64) -> Result<Vec<Lodging>, ProviderError>;
}

/// Attractions at a location, favoring the traveler's preferences
#[async_trait]
pub trait AttractionSearch: Send + Sync {
    async fn find(&self, location: &str, preferences: &BTreeSet<String>) -> Result<Vec<Attraction>, ProviderError>;
}

/// Flight offers between two cities on a date
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn find(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        budget: f64,
    ) -> Result<Vec<Flight>, ProviderError>;
}

/// Every external collaborator the workflow uses
#[derive(Clone)]
pub struct Capabilities {
    pub weather: Arc<dyn WeatherProvider>,
    pub lodging: Arc<dyn LodgingSearch>,
    pub attractions: Arc<dyn AttractionSearch>,
    pub flights: Arc<dyn FlightSearch>,
    pub generator: Arc<dyn TextGenerator>,
}

impl Capabilities {
    /// Build the production adapters from configuration
    ///
    /// Missing API keys swap in adapters whose calls fail.
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        debug!("Capabilities::from_config: called");
        let weather: Arc<dyn WeatherProvider> = match OpenWeatherClient::from_config(&config.weather) {
            Ok(client) => Arc::new(client),
            Err(ProviderError::Unavailable(reason)) => {
                warn!(%reason, "Weather provider disabled");
                Arc::new(UnavailableWeather::new(reason))
            }
            Err(e) => return Err(eyre::eyre!("Failed to create weather client: {}", e)),
        };

        let catalog = Arc::new(CatalogSearch::new());
        let generator = llm::create_generator(&config.llm).map_err(|e| eyre::eyre!("Failed to create generator: {}", e))?;

        Ok(Self {
            weather,
            lodging: catalog.clone(),
            attractions: catalog.clone(),
            flights: catalog,
            generator,
        })
    }
}

/// Weather provider used when none is configured; every call fails
#[derive(Debug, Clone)]
pub struct UnavailableWeather {
    reason: String,
}

impl UnavailableWeather {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl WeatherProvider for UnavailableWeather {
    async fn forecast(&self, location: &str, _start: NaiveDate, _end: NaiveDate) -> Result<WeatherBundle, ProviderError> {
        debug!(%location, "UnavailableWeather::forecast: called");
        Err(ProviderError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
pub mod mock {
    //! Scriptable capabilities for unit tests

    use super::*;
    use std::time::Duration;

    use crate::domain::{CurrentConditions, DailyWeather};
    use crate::llm::client::mock::MockGenerator;

    /// Weather provider returning a fixed bundle, or failing
    pub struct FixedWeather(pub Option<WeatherBundle>);

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn forecast(&self, _location: &str, _s: NaiveDate, _e: NaiveDate) -> Result<WeatherBundle, ProviderError> {
            self.0
                .clone()
                .ok_or_else(|| ProviderError::InvalidResponse("scripted weather failure".to_string()))
        }
    }

    /// Search provider returning fixed candidates for every search
    #[derive(Default)]
    pub struct FixedSearch {
        pub lodging: Vec<Lodging>,
        pub attractions: Vec<Attraction>,
        pub flights: Vec<Flight>,
    }

    #[async_trait]
    impl LodgingSearch for FixedSearch {
        async fn find(&self, _location: &str, _budget: f64) -> Result<Vec<Lodging>, ProviderError> {
            Ok(self.lodging.clone())
        }
    }

    #[async_trait]
    impl AttractionSearch for FixedSearch {
        async fn find(&self, _location: &str, _p: &BTreeSet<String>) -> Result<Vec<Attraction>, ProviderError> {
            Ok(self.attractions.clone())
        }
    }

    #[async_trait]
    impl FlightSearch for FixedSearch {
        async fn find(&self, _o: &str, _d: &str, _date: NaiveDate, _b: f64) -> Result<Vec<Flight>, ProviderError> {
            Ok(self.flights.clone())
        }
    }

    /// Provider whose every call fails
    pub struct FailingSource;

    #[async_trait]
    impl LodgingSearch for FailingSource {
        async fn find(&self, _location: &str, _budget: f64) -> Result<Vec<Lodging>, ProviderError> {
            Err(ProviderError::Unavailable("lodging down".to_string()))
        }
    }

    #[async_trait]
    impl AttractionSearch for FailingSource {
        async fn find(&self, _location: &str, _p: &BTreeSet<String>) -> Result<Vec<Attraction>, ProviderError> {
            Err(ProviderError::Unavailable("attractions down".to_string()))
        }
    }

    #[async_trait]
    impl FlightSearch for FailingSource {
        async fn find(&self, _o: &str, _d: &str, _date: NaiveDate, _b: f64) -> Result<Vec<Flight>, ProviderError> {
            Err(ProviderError::Unavailable("flights down".to_string()))
        }
    }

    /// Provider that panics instead of answering
    pub struct PanickingSource;

    #[async_trait]
    impl LodgingSearch for PanickingSource {
        async fn find(&self, _location: &str, _budget: f64) -> Result<Vec<Lodging>, ProviderError> {
            panic!("lodging index corrupted")
        }
    }

    #[async_trait]
    impl WeatherProvider for PanickingSource {
        async fn forecast(&self, _location: &str, _s: NaiveDate, _e: NaiveDate) -> Result<WeatherBundle, ProviderError> {
            panic!("weather exploded")
        }
    }

    /// Flight search that never answers in time
    pub struct SlowFlights(pub Duration);

    #[async_trait]
    impl FlightSearch for SlowFlights {
        async fn find(&self, _o: &str, _d: &str, _date: NaiveDate, _b: f64) -> Result<Vec<Flight>, ProviderError> {
            tokio::time::sleep(self.0).await;
            Ok(Vec::new())
        }
    }

    pub fn conditions(temperature: f64, description: &str) -> CurrentConditions {
        CurrentConditions {
            temperature,
            feels_like: None,
            humidity: None,
            description: description.to_string(),
            wind_speed: 3.0,
        }
    }

    /// A bundle whose every day has the same conditions
    pub fn uniform_weather(days: u32, temperature: f64, description: &str) -> WeatherBundle {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        WeatherBundle {
            location: "Lisbon".to_string(),
            current: conditions(temperature, description),
            daily: (0..days)
                .map(|i| DailyWeather {
                    date: start + chrono::Days::new(u64::from(i)),
                    temperature,
                    description: description.to_string(),
                    wind_speed: 3.0,
                })
                .collect(),
        }
    }

    pub fn lodging(name: &str, price_per_night: f64, rating: f64) -> Lodging {
        Lodging {
            name: name.to_string(),
            price_per_night,
            rating,
            amenities: vec!["WiFi".to_string()],
            category: "mid-range".to_string(),
            description: format!("{} near the center", name),
        }
    }

    pub fn attraction(name: &str, category: &str) -> Attraction {
        Attraction {
            name: name.to_string(),
            category: category.to_string(),
            rating: 4.5,
            price_range: "$".to_string(),
            description: format!("{} is worth a visit", name),
        }
    }

    pub fn flight(airline: &str, price: f64) -> Flight {
        Flight {
            airline: airline.to_string(),
            flight_number: "XX100".to_string(),
            origin: "New York".to_string(),
            destination: "Lisbon".to_string(),
            price,
            departure_time: "08:00".to_string(),
            arrival_time: "15:00".to_string(),
            duration: "7h 0m".to_string(),
            layovers: 0,
            rating: 4.2,
        }
    }

    /// Capabilities with the given weather and generator and a small fixed catalog
    pub fn capabilities(weather: Option<WeatherBundle>, generator: Arc<MockGenerator>) -> Capabilities {
        let search = Arc::new(FixedSearch {
            lodging: vec![
                lodging("Harbor Inn", 90.0, 4.1),
                lodging("Grand Palace", 400.0, 4.9),
                lodging("Old Town Hostel", 35.0, 3.8),
            ],
            attractions: vec![attraction("Belem Tower", "Historical"), attraction("Alfama Walk", "Cultural")],
            flights: vec![flight("Atlas Air", 520.0), flight("Meridian", 430.0)],
        });

        Capabilities {
            weather: Arc::new(FixedWeather(weather)),
            lodging: search.clone(),
            attractions: search.clone(),
            flights: search,
            generator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_weather_fails() {
        let provider = UnavailableWeather::new("OPENWEATHER_API_KEY not set");
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let err = provider.forecast("Lisbon", day, day).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn test_from_config_without_keys() {
        let mut config = Config::default();
        config.weather.api_key_env = "TRIPPLANNER_TEST_UNSET_WEATHER_KEY".to_string();
        config.llm.api_key_env = "TRIPPLANNER_TEST_UNSET_LLM_KEY".to_string();
        assert!(Capabilities::from_config(&config).is_ok());
    }
}
