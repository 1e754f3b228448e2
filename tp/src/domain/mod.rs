//! Domain types for trip planning
//!
//! Request facts, gathered candidates, weather observations and the shared
//! `TripState` with its `TripPatch` update type.

mod candidates;
mod request;
mod state;
mod weather;

pub use candidates::{Attraction, DataSource, Flight, FlightPicks, Lodging, SourceError};
pub use request::{DATE_RANGE_SEPARATOR, DateRangeError, MAX_TRIP_DAYS, MIN_BUDGET, TripRequest, parse_travel_dates};
pub use state::{PlanStatus, Recommendation, TripPatch, TripState};
pub use weather::{CurrentConditions, DailyWeather, Viability, WeatherBundle};
