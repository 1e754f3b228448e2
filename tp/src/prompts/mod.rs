//! Prompt templates for itinerary and alternative generation

mod context;
pub mod embedded;
mod loader;

pub use context::{AlternativesContext, DEFAULT_ISSUE, DayContext, ItineraryContext, NO_PREFERENCES};
pub use loader::PromptLoader;
