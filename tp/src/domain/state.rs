//! TripState - the record threaded through every workflow node
//!
//! Nodes never mutate the state directly. Each node reads an immutable
//! snapshot and returns a `TripPatch`; the engine merges the patch with
//! shallow-override semantics. Request facts have no patch field, so they
//! are read-only after construction.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Attraction, DailyWeather, Flight, Lodging, SourceError, TripRequest, Viability, WeatherBundle};

/// Outcome category of a finished plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// An itinerary was accepted
    Completed,
    /// The plan ended with alternative suggestions
    Alternatives,
    /// The workflow itself failed
    Failed,
}

/// Summary shown to the caller once the workflow finishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub status: PlanStatus,
    pub headline: String,
    pub quality_score: f64,
    pub weather_score: Option<f64>,
    pub lodging_options: usize,
    pub flight_options: usize,
    pub alternatives: usize,
}

impl Recommendation {
    /// A preliminary recommendation carrying only status and headline
    pub fn headline(status: PlanStatus, headline: impl Into<String>) -> Self {
        Self {
            status,
            headline: headline.into(),
            quality_score: 0.0,
            weather_score: None,
            lodging_options: 0,
            flight_options: 0,
            alternatives: 0,
        }
    }
}

/// Shared state for one planning request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    // Request facts
    pub id: Uuid,
    pub destination: String,
    pub origin: String,
    pub travel_dates: String,
    pub duration: u32,
    pub budget: f64,
    pub preferences: BTreeSet<String>,
    pub travel_type: String,

    // Gathered data
    pub weather: Option<WeatherBundle>,
    pub lodging: Vec<Lodging>,
    pub attractions: Vec<Attraction>,
    pub flights: Vec<Flight>,
    pub source_errors: Vec<SourceError>,

    // Derived metrics
    pub viability: Option<Viability>,
    pub weather_analysis: Option<String>,
    pub itinerary_quality: f64,
    pub budget_compliant: bool,

    // Generated artifacts
    pub itinerary: Option<String>,
    pub alternatives: Vec<String>,
    pub final_recommendation: Option<Recommendation>,

    // Control bookkeeping
    /// Display tag only; dispatch never reads it
    pub current_step: String,
    pub missing_fields: Vec<String>,
    pub error: Option<String>,
    /// Non-fatal reason the workflow went to alternatives
    pub issue: Option<String>,
    pub retry_count: u32,
    pub iteration: u32,
    pub max_iterations: u32,
    pub should_continue: bool,
    pub user_feedback: Option<String>,
    pub feedback_pending: bool,
    /// Append-only "node: note" log
    pub history: Vec<String>,
}

impl TripState {
    /// Create the initial state for a request
    ///
    /// `default_origin` is used when the request names no origin city.
    pub fn new(request: TripRequest, default_origin: &str, max_iterations: u32) -> Self {
        debug!(destination = %request.destination, %max_iterations, "TripState::new: called");
        let origin = request
            .origin
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| default_origin.to_string());

        Self {
            id: Uuid::now_v7(),
            destination: request.destination.trim().to_string(),
            origin,
            travel_dates: request.travel_dates.trim().to_string(),
            duration: request.duration,
            budget: request.budget,
            preferences: request.preferences,
            travel_type: if request.travel_type.trim().is_empty() {
                "leisure".to_string()
            } else {
                request.travel_type
            },
            weather: None,
            lodging: Vec::new(),
            attractions: Vec::new(),
            flights: Vec::new(),
            source_errors: Vec::new(),
            viability: None,
            weather_analysis: None,
            itinerary_quality: 0.0,
            budget_compliant: false,
            itinerary: None,
            alternatives: Vec::new(),
            final_recommendation: None,
            current_step: "input_collection".to_string(),
            missing_fields: Vec::new(),
            error: None,
            issue: None,
            retry_count: 0,
            iteration: 0,
            max_iterations,
            should_continue: true,
            user_feedback: None,
            feedback_pending: false,
            history: Vec::new(),
        }
    }

    /// Required request fields that are empty or zero
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.destination.is_empty() {
            missing.push("destination".to_string());
        }
        if self.travel_dates.is_empty() {
            missing.push("travel_dates".to_string());
        }
        if self.duration == 0 {
            missing.push("duration".to_string());
        }
        if self.budget <= 0.0 {
            missing.push("budget".to_string());
        }
        missing
    }

    /// Canonical weather score; 0 until the weather has been assessed
    pub fn weather_score(&self) -> f64 {
        self.viability.as_ref().map_or(0.0, |v| v.score)
    }

    /// Canonical weather verdict; false until the weather has been assessed
    pub fn weather_viable(&self) -> bool {
        self.viability.as_ref().is_some_and(|v| v.viable)
    }

    /// Per-day forecast for the trip, empty when unavailable
    pub fn daily_weather(&self) -> &[DailyWeather] {
        self.weather.as_ref().map(|w| w.daily.as_slice()).unwrap_or_default()
    }

    /// True when the state holds something a caller can display
    pub fn has_displayable_result(&self) -> bool {
        self.itinerary.as_deref().is_some_and(|i| !i.trim().is_empty()) || !self.alternatives.is_empty()
    }

    /// Merge a node's patch into the state
    ///
    /// Every field present in the patch overrides the state's field; absent
    /// fields are left alone. The patch note is appended to the history,
    /// tagged with the step that produced it.
    pub fn apply(&mut self, patch: TripPatch) {
        debug!(step = ?patch.current_step, "TripState::apply: called");

        macro_rules! overwrite {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )+
            };
        }

        overwrite!(
            current_step,
            missing_fields,
            weather,
            lodging,
            attractions,
            flights,
            source_errors,
            viability,
            weather_analysis,
            itinerary_quality,
            budget_compliant,
            itinerary,
            alternatives,
            final_recommendation,
            error,
            issue,
            retry_count,
            should_continue,
            feedback_pending,
        );

        if let Some(note) = patch.note {
            self.history.push(format!("{}: {}", self.current_step, note));
        }
    }
}

/// Partial update returned by a workflow node
///
/// `None` means "leave unchanged". For nullable state fields the inner
/// option distinguishes setting a value from clearing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripPatch {
    pub current_step: Option<String>,
    pub note: Option<String>,
    pub missing_fields: Option<Vec<String>>,
    pub weather: Option<Option<WeatherBundle>>,
    pub lodging: Option<Vec<Lodging>>,
    pub attractions: Option<Vec<Attraction>>,
    pub flights: Option<Vec<Flight>>,
    pub source_errors: Option<Vec<SourceError>>,
    pub viability: Option<Option<Viability>>,
    pub weather_analysis: Option<Option<String>>,
    pub itinerary_quality: Option<f64>,
    pub budget_compliant: Option<bool>,
    pub itinerary: Option<Option<String>>,
    pub alternatives: Option<Vec<String>>,
    pub final_recommendation: Option<Option<Recommendation>>,
    pub error: Option<Option<String>>,
    pub issue: Option<Option<String>>,
    pub retry_count: Option<u32>,
    pub should_continue: Option<bool>,
    pub feedback_pending: Option<bool>,
}

impl TripPatch {
    /// Start a patch that moves the display step tag
    pub fn step(step: impl Into<String>) -> Self {
        Self {
            current_step: Some(step.into()),
            ..Default::default()
        }
    }

    /// Attach a history note
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Set the error message
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(Some(message.into()));
        self
    }

    /// Set the planning issue
    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(Some(issue.into()));
        self
    }
}
