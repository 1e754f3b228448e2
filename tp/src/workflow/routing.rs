//! Routing: pure decisions over the trip state
//!
//! Each branching node has its own decision enum. `route` computes the
//! decision for the node that just ran and maps it to the next node; every
//! mapping is an exhaustive match.

use tracing::debug;

use super::feedback::classify_feedback;
use super::node::{Node, Transition};
use crate::domain::TripState;
use crate::scoring::{ACCEPTANCE_THRESHOLD, POOR_THRESHOLD};

/// After CollectInput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDecision {
    Error,
    Complete,
    Incomplete,
}

/// After GatherData
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherDecision {
    Error,
    WeatherCheck,
    DirectPlanning,
}

/// After AnalyzeWeather
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherDecision {
    Favorable,
    Unfavorable,
    Conditional,
}

/// After GenerateItinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryDecision {
    Error,
    Success,
    NeedsImprovement,
}

/// After Finalize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeDecision {
    Accepted,
    NeedsRevision,
    Rejected,
}

/// After HandleFeedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackDecision {
    WeatherRecheck,
    NewSearch,
    Regenerate,
}

pub fn route_input(state: &TripState) -> InputDecision {
    if state.error.is_some() {
        InputDecision::Error
    } else if state.missing_fields.is_empty() {
        InputDecision::Complete
    } else {
        InputDecision::Incomplete
    }
}

pub fn route_gather(state: &TripState) -> GatherDecision {
    if state.error.is_some() {
        GatherDecision::Error
    } else if state.weather.is_some() {
        GatherDecision::WeatherCheck
    } else {
        GatherDecision::DirectPlanning
    }
}

/// Reads only the canonical assessment; an error also counts as unfavorable
pub fn route_weather(state: &TripState) -> WeatherDecision {
    if state.error.is_some() || state.weather_score() < POOR_THRESHOLD {
        WeatherDecision::Unfavorable
    } else if state.weather_viable() {
        WeatherDecision::Favorable
    } else {
        WeatherDecision::Conditional
    }
}

pub fn route_itinerary(state: &TripState) -> ItineraryDecision {
    if state.error.is_some() {
        ItineraryDecision::Error
    } else if state.itinerary_quality >= ACCEPTANCE_THRESHOLD {
        ItineraryDecision::Success
    } else {
        ItineraryDecision::NeedsImprovement
    }
}

pub fn route_finalize(state: &TripState) -> FinalizeDecision {
    if state.feedback_pending {
        FinalizeDecision::NeedsRevision
    } else if !state.has_displayable_result() {
        FinalizeDecision::Rejected
    } else {
        FinalizeDecision::Accepted
    }
}

pub fn route_feedback(state: &TripState) -> FeedbackDecision {
    classify_feedback(state.user_feedback.as_deref().unwrap_or_default())
}

impl InputDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::Error => Transition::To(Node::ProvideAlternatives),
            Self::Complete => Transition::To(Node::GatherData),
            Self::Incomplete => Transition::To(Node::CollectInput),
        }
    }
}

impl GatherDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::Error => Transition::To(Node::ProvideAlternatives),
            Self::WeatherCheck => Transition::To(Node::AnalyzeWeather),
            Self::DirectPlanning => Transition::To(Node::SearchFlights),
        }
    }
}

impl WeatherDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::Favorable => Transition::To(Node::SearchLodging),
            Self::Unfavorable => Transition::To(Node::ProvideAlternatives),
            Self::Conditional => Transition::To(Node::SearchFlights),
        }
    }
}

impl ItineraryDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::Error => Transition::To(Node::ProvideAlternatives),
            Self::Success => Transition::To(Node::Finalize),
            Self::NeedsImprovement => Transition::To(Node::ProvideAlternatives),
        }
    }
}

impl FinalizeDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::Accepted => Transition::End,
            Self::NeedsRevision => Transition::To(Node::HandleFeedback),
            Self::Rejected => Transition::To(Node::ProvideAlternatives),
        }
    }
}

impl FeedbackDecision {
    pub fn target(self) -> Transition {
        match self {
            Self::WeatherRecheck => Transition::To(Node::AnalyzeWeather),
            Self::NewSearch => Transition::To(Node::GatherData),
            Self::Regenerate => Transition::To(Node::GenerateItinerary),
        }
    }
}

/// Next step after `node` has run and its patch has been applied
pub fn route(node: Node, state: &TripState) -> Transition {
    let transition = match node {
        Node::CollectInput => route_input(state).target(),
        Node::GatherData => route_gather(state).target(),
        Node::AnalyzeWeather => route_weather(state).target(),
        Node::SearchLodging => Transition::To(Node::SearchFlights),
        Node::SearchFlights => Transition::To(Node::GenerateItinerary),
        Node::GenerateItinerary => route_itinerary(state).target(),
        Node::ProvideAlternatives => Transition::To(Node::Finalize),
        Node::Finalize => route_finalize(state).target(),
        Node::HandleFeedback => route_feedback(state).target(),
    };
    debug!(%node, ?transition, "route: decided");
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::domain::TripRequest;
    use crate::scoring::viability_from_score;

    fn state() -> TripState {
        TripState::new(
            TripRequest {
                destination: "Lisbon".to_string(),
                origin: None,
                travel_dates: "2025-06-01 to 2025-06-03".to_string(),
                duration: 3,
                budget: 1500.0,
                preferences: BTreeSet::new(),
                travel_type: "leisure".to_string(),
            },
            "New York",
            10,
        )
    }

    fn with_score(score: f64) -> TripState {
        let mut state = state();
        state.viability = Some(viability_from_score(score, "", vec![]));
        state
    }

    #[test]
    fn test_route_input() {
        let mut state = state();
        assert_eq!(route_input(&state), InputDecision::Complete);

        state.missing_fields = vec!["budget".to_string()];
        assert_eq!(route_input(&state), InputDecision::Incomplete);
        assert_eq!(route(Node::CollectInput, &state), Transition::To(Node::CollectInput));

        state.error = Some("boom".to_string());
        assert_eq!(route_input(&state), InputDecision::Error);
    }

    #[test]
    fn test_route_input_is_pure() {
        let state = state();
        assert_eq!(route_input(&state), InputDecision::Complete);
        assert_eq!(route_input(&state), InputDecision::Complete);
        assert_eq!(route(Node::CollectInput, &state), route(Node::CollectInput, &state));
    }

    #[test]
    fn test_route_gather() {
        let mut state = state();
        assert_eq!(route_gather(&state), GatherDecision::DirectPlanning);
        assert_eq!(route(Node::GatherData, &state), Transition::To(Node::SearchFlights));

        state.error = Some("All data sources failed".to_string());
        assert_eq!(route(Node::GatherData, &state), Transition::To(Node::ProvideAlternatives));
    }

    #[test]
    fn test_route_weather_thresholds() {
        assert_eq!(route_weather(&with_score(20.0)), WeatherDecision::Unfavorable);
        assert_eq!(route_weather(&with_score(35.0)), WeatherDecision::Conditional);
        assert_eq!(route_weather(&with_score(40.0)), WeatherDecision::Favorable);
        assert_eq!(route_weather(&with_score(90.0)), WeatherDecision::Favorable);
        assert_eq!(route_weather(&state()), WeatherDecision::Unfavorable);
    }

    #[test]
    fn test_route_itinerary() {
        let mut state = state();
        state.itinerary_quality = 70.0;
        assert_eq!(route_itinerary(&state), ItineraryDecision::Success);

        state.itinerary_quality = 69.9;
        assert_eq!(route_itinerary(&state), ItineraryDecision::NeedsImprovement);

        state.error = Some("generation failed".to_string());
        assert_eq!(route_itinerary(&state), ItineraryDecision::Error);
    }

    #[test]
    fn test_route_finalize() {
        let mut state = state();
        assert_eq!(route_finalize(&state), FinalizeDecision::Rejected);

        state.alternatives = vec!["Go in autumn".to_string()];
        assert_eq!(route_finalize(&state), FinalizeDecision::Accepted);
        assert_eq!(route(Node::Finalize, &state), Transition::End);

        state.feedback_pending = true;
        assert_eq!(route_finalize(&state), FinalizeDecision::NeedsRevision);
    }

    #[test]
    fn test_route_feedback() {
        let mut state = state();
        state.user_feedback = Some("Find a cheaper hotel".to_string());
        assert_eq!(route(Node::HandleFeedback, &state), Transition::To(Node::GatherData));

        state.user_feedback = None;
        assert_eq!(route_feedback(&state), FeedbackDecision::Regenerate);
    }

    #[test]
    fn test_route_feedback_phrases() {
        let cases = [
            ("the weather looks stormy", FeedbackDecision::WeatherRecheck, Node::AnalyzeWeather),
            ("need a different hotel", FeedbackDecision::NewSearch, Node::GatherData),
            ("looks fine", FeedbackDecision::Regenerate, Node::GenerateItinerary),
        ];

        for (feedback, decision, next) in cases {
            let mut state = state();
            state.user_feedback = Some(feedback.to_string());
            assert_eq!(route_feedback(&state), decision, "{feedback}");
            assert_eq!(route(Node::HandleFeedback, &state), Transition::To(next), "{feedback}");
        }
    }

    #[test]
    fn test_fixed_edges() {
        let state = state();
        assert_eq!(route(Node::SearchLodging, &state), Transition::To(Node::SearchFlights));
        assert_eq!(route(Node::SearchFlights, &state), Transition::To(Node::GenerateItinerary));
        assert_eq!(route(Node::ProvideAlternatives, &state), Transition::To(Node::Finalize));
    }
}
