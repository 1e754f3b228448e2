//! TripPlanner - weather-aware multi-day trip planning
//!
//! A planning workflow that gathers weather, lodging, attraction and flight
//! data, scores the weather, and routes between itinerary generation and
//! alternative suggestions depending on what it finds.
//!
//! # Modules
//!
//! - [`scoring`] - Weather suitability, trip viability and itinerary quality
//! - [`gather`] - Concurrent data collection across capabilities
//! - [`workflow`] - Planning state machine and its nodes
//! - [`providers`] - Capability traits and their adapters
//! - [`llm`] - Text generation trait and Anthropic implementation
//! - [`prompts`] - Handlebars prompt templates
//! - [`report`] - Plain-text plan rendering
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod gather;
pub mod llm;
pub mod prompts;
pub mod providers;
pub mod report;
pub mod scoring;
pub mod workflow;

// Re-export commonly used types
pub use config::{Config, LlmConfig, PlannerConfig, WeatherConfig};
pub use domain::{PlanStatus, Recommendation, TripPatch, TripRequest, TripState, Viability, WeatherBundle};
pub use llm::{LlmError, TextGenerator};
pub use providers::{AttractionSearch, Capabilities, FlightSearch, LodgingSearch, ProviderError, WeatherProvider};
pub use workflow::{Node, Planner, WorkflowError};
