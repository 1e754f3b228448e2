//! Template contexts built from the trip state
//!
//! Values are pre-formatted strings so templates stay free of logic.

use serde::Serialize;
use tracing::debug;

use crate::domain::{FlightPicks, MAX_TRIP_DAYS, TripState};
use crate::scoring::{SuitabilityLevel, VIABLE_THRESHOLD, assess_day};

const TOP_HOTELS: usize = 3;
const TOP_ATTRACTIONS: usize = 5;

/// Text used when the traveler listed no preferences
pub const NO_PREFERENCES: &str = "general sightseeing";

/// Issue text used when alternatives are requested without a recorded reason
pub const DEFAULT_ISSUE: &str = "Planning constraints encountered";

/// One day of the trip as shown to templates
#[derive(Debug, Clone, Serialize)]
pub struct DayContext {
    pub number: u32,
    pub date: String,
    pub day_name: String,
    pub weather: String,
    pub level: String,
    pub advice: String,
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

/// Context for the itinerary prompt and the fallback itinerary
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryContext {
    pub destination: String,
    pub origin: String,
    pub travel_dates: String,
    pub duration: u32,
    pub budget: String,
    pub travel_type: String,
    pub preferences: String,
    pub weather_summary: String,
    pub weather_analysis: Option<String>,
    pub days: Vec<DayContext>,
    pub flights: Vec<String>,
    pub flight: Option<String>,
    pub hotels: Vec<String>,
    pub stay: String,
    pub attractions: Vec<String>,
    pub feedback: Option<String>,
}

pub(crate) fn money(amount: f64) -> String {
    format!("${:.0}", amount)
}

pub(crate) fn preferences_text(state: &TripState) -> String {
    if state.preferences.is_empty() {
        NO_PREFERENCES.to_string()
    } else {
        state.preferences.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

impl ItineraryContext {
    pub fn from_state(state: &TripState) -> Self {
        debug!(destination = %state.destination, "ItineraryContext::from_state: called");
        let weather_summary = match &state.viability {
            Some(v) if state.weather.is_some() => format!(
                "Weather viability score: {:.0}/100 ({})",
                v.score,
                SuitabilityLevel::from_score(v.score)
            ),
            Some(v) => v.reason.clone(),
            None => "Weather not assessed".to_string(),
        };

        let flights = match FlightPicks::from_flights(&state.flights) {
            Some(picks) => vec![
                format!("Cheapest: {}", flight_line(picks.cheapest)),
                format!("Best rated: {}", flight_line(picks.best_rated)),
                format!("Quickest: {}", flight_line(picks.quickest)),
            ],
            None => Vec::new(),
        };
        let flight = flights.first().cloned();

        let hotels: Vec<String> = state
            .lodging
            .iter()
            .take(TOP_HOTELS)
            .map(|l| {
                format!(
                    "{} ({}) - {}/night, rated {:.1}: {}",
                    l.name,
                    l.category,
                    money(l.price_per_night),
                    l.rating,
                    l.amenities.join(", ")
                )
            })
            .collect();
        let stay = hotels
            .first()
            .cloned()
            .unwrap_or_else(|| format!("choose a well-reviewed hotel in central {}", state.destination));

        let attractions = state
            .attractions
            .iter()
            .take(TOP_ATTRACTIONS)
            .map(|a| format!("{} ({}, {}) - {}", a.name, a.category, a.price_range, a.description))
            .collect();

        Self {
            destination: state.destination.clone(),
            origin: state.origin.clone(),
            travel_dates: state.travel_dates.clone(),
            duration: state.duration,
            budget: money(state.budget),
            travel_type: state.travel_type.clone(),
            preferences: preferences_text(state),
            weather_summary,
            weather_analysis: state.weather_analysis.clone(),
            days: day_contexts(state),
            flights,
            flight,
            hotels,
            stay,
            attractions,
            feedback: state.user_feedback.clone(),
        }
    }
}

fn flight_line(flight: &crate::domain::Flight) -> String {
    format!(
        "{} {} {} ({} layovers, {} to {}, {}, rated {:.1})",
        flight.airline,
        flight.flight_number,
        money(flight.price),
        flight.layovers,
        flight.departure_time,
        flight.arrival_time,
        flight.duration,
        flight.rating
    )
}

/// One entry per trip day, with forecast details where a forecast exists
///
/// Capped at `MAX_TRIP_DAYS` entries whatever the requested duration.
fn day_contexts(state: &TripState) -> Vec<DayContext> {
    let daily = state.daily_weather();
    let count = state
        .duration
        .max(1)
        .max(u32::try_from(daily.len()).unwrap_or(u32::MAX))
        .min(MAX_TRIP_DAYS);
    let sights: Vec<&str> = state.attractions.iter().map(|a| a.name.as_str()).collect();

    let sight = |slot: usize| -> String {
        if sights.is_empty() {
            format!("Explore the main sights of {}", state.destination)
        } else {
            format!("Visit {}", sights[slot % sights.len()])
        }
    };

    (0..count)
        .map(|i| {
            let index = i as usize;
            let mut morning = sight(index * 2);
            let mut afternoon = sight(index * 2 + 1);
            let evening = "Dinner at a local restaurant and an evening stroll".to_string();

            match daily.get(index) {
                Some(day) => {
                    let assessment = assess_day(day);
                    if assessment.score < VIABLE_THRESHOLD {
                        morning = format!("{} (have an indoor backup ready)", morning);
                        afternoon = "Indoor activities: museums, galleries or a cooking class".to_string();
                    }
                    DayContext {
                        number: i + 1,
                        date: day.date.to_string(),
                        day_name: day.day_name(),
                        weather: format!("{:.0}°C, {}", day.temperature, day.description),
                        level: assessment.level.to_string(),
                        advice: assessment.recommendations.join(", "),
                        morning,
                        afternoon,
                        evening,
                    }
                }
                None => DayContext {
                    number: i + 1,
                    date: String::new(),
                    day_name: String::new(),
                    weather: "Forecast unavailable".to_string(),
                    level: String::new(),
                    advice: String::new(),
                    morning,
                    afternoon,
                    evening,
                },
            }
        })
        .collect()
}

/// Context for the alternatives prompt
#[derive(Debug, Clone, Serialize)]
pub struct AlternativesContext {
    pub destination: String,
    pub travel_dates: String,
    pub duration: u32,
    pub budget: String,
    pub issue: String,
    pub preferences: String,
}

impl AlternativesContext {
    pub fn from_state(state: &TripState) -> Self {
        let issue = state
            .error
            .clone()
            .or_else(|| state.issue.clone())
            .unwrap_or_else(|| DEFAULT_ISSUE.to_string());

        Self {
            destination: state.destination.clone(),
            travel_dates: state.travel_dates.clone(),
            duration: state.duration,
            budget: money(state.budget),
            issue,
            preferences: preferences_text(state),
        }
    }
}
