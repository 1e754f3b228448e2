//! Workflow nodes and transitions

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of the planning state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    CollectInput,
    GatherData,
    AnalyzeWeather,
    SearchLodging,
    SearchFlights,
    GenerateItinerary,
    ProvideAlternatives,
    Finalize,
    HandleFeedback,
}

impl Node {
    /// Step tag recorded in `TripState::current_step`
    pub fn step(&self) -> &'static str {
        match self {
            Self::CollectInput => "input_collection",
            Self::GatherData => "data_gathering",
            Self::AnalyzeWeather => "weather_analysis",
            Self::SearchLodging => "lodging_search",
            Self::SearchFlights => "flight_search",
            Self::GenerateItinerary => "itinerary_generation",
            Self::ProvideAlternatives => "alternatives",
            Self::Finalize => "finalization",
            Self::HandleFeedback => "feedback_processing",
        }
    }

    /// Nodes that always run, even past the iteration ceiling
    pub fn is_recovery(&self) -> bool {
        matches!(self, Self::ProvideAlternatives | Self::Finalize)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step())
    }
}

/// Where the engine goes after a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    To(Node),
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_nodes() {
        assert!(Node::ProvideAlternatives.is_recovery());
        assert!(Node::Finalize.is_recovery());
        assert!(!Node::CollectInput.is_recovery());
        assert!(!Node::HandleFeedback.is_recovery());
    }

    #[test]
    fn test_display_uses_step_tag() {
        assert_eq!(Node::GatherData.to_string(), "data_gathering");
    }
}
