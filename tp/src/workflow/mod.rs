//! Planning workflow
//!
//! A state machine over `TripState`: nodes produce patches, routing picks
//! the next node, and the engine enforces the iteration ceiling.

mod alternatives;
mod engine;
mod feedback;
mod node;
mod nodes;
mod routing;

pub use alternatives::{ALTERNATIVE_COUNT, fallback_alternatives, parse_alternatives};
pub use engine::{FAILURE_HEADLINE, Planner, WorkflowError};
pub use feedback::classify_feedback;
pub use node::{Node, Transition};
pub use nodes::{ALTERNATIVES_HEADLINE, select_lodging};
pub use routing::{
    FeedbackDecision, FinalizeDecision, GatherDecision, InputDecision, ItineraryDecision, WeatherDecision, route,
};
