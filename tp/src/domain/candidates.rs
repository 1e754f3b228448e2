//! Lodging, attraction and flight candidates returned by search capabilities

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duration assumed when a flight's duration string cannot be parsed
const DEFAULT_FLIGHT_MINUTES: u32 = 150;

/// A place to stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lodging {
    pub name: String,
    pub price_per_night: f64,
    /// 0-5
    pub rating: f64,
    pub amenities: Vec<String>,
    /// "budget", "mid-range" or "luxury"
    pub category: String,
    pub description: String,
}

impl Lodging {
    /// Total cost of staying `nights` nights
    pub fn stay_cost(&self, nights: u32) -> f64 {
        self.price_per_night * f64::from(nights.max(1))
    }
}

/// Something to see or do at the destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub name: String,
    pub category: String,
    pub rating: f64,
    /// "Free", "$" or "$$"
    pub price_range: String,
    pub description: String,
}

/// One flight offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub price: f64,
    /// "HH:MM"
    pub departure_time: String,
    /// "HH:MM"
    pub arrival_time: String,
    /// e.g. "2h 15m"
    pub duration: String,
    pub layovers: u32,
    pub rating: f64,
}

impl Flight {
    /// Parse the "Xh Ym" duration into minutes
    pub fn duration_minutes(&self) -> u32 {
        let mut total: u32 = 0;
        let mut parsed_any = false;

        for part in self.duration.split_whitespace() {
            if let Some(hours) = part.strip_suffix('h').and_then(|h| h.parse::<u32>().ok()) {
                total = total.saturating_add(hours.saturating_mul(60));
                parsed_any = true;
            } else if let Some(minutes) = part.strip_suffix('m').and_then(|m| m.parse::<u32>().ok()) {
                total = total.saturating_add(minutes);
                parsed_any = true;
            }
        }

        if parsed_any { total } else { DEFAULT_FLIGHT_MINUTES }
    }
}

/// Standout flights among a set of offers
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPicks<'a> {
    pub cheapest: &'a Flight,
    pub best_rated: &'a Flight,
    pub quickest: &'a Flight,
}

impl<'a> FlightPicks<'a> {
    /// Pick the cheapest, best-rated and quickest flights; None when empty
    pub fn from_flights(flights: &'a [Flight]) -> Option<Self> {
        debug!(count = flights.len(), "FlightPicks::from_flights: called");
        let cheapest = flights.iter().min_by(|a, b| a.price.total_cmp(&b.price))?;
        let best_rated = flights.iter().max_by(|a, b| a.rating.total_cmp(&b.rating))?;
        let quickest = flights.iter().min_by_key(|f| f.duration_minutes())?;

        Some(Self {
            cheapest,
            best_rated,
            quickest,
        })
    }
}

/// External data source consulted during data collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Weather,
    Lodging,
    Attractions,
    Flights,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weather => "weather",
            Self::Lodging => "lodging",
            Self::Attractions => "attractions",
            Self::Flights => "flights",
        };
        write!(f, "{}", name)
    }
}

/// Marker recording that one data source failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceError {
    pub source: DataSource,
    pub message: String,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}
