//! Pure scoring functions: weather suitability, trip viability, itinerary quality

pub mod itinerary;
pub mod viability;
pub mod weather;

pub use itinerary::{ACCEPTANCE_THRESHOLD, itinerary_quality};
pub use viability::{
    MODERATE_THRESHOLD, POOR_THRESHOLD, VIABLE_THRESHOLD, assess_viability, viability_from_score, weather_analysis,
};
pub use weather::{
    DayAssessment, PointScore, SuitabilityLevel, assess_day, daily_recommendations, daily_score,
    overall_recommendation, point_score, trip_score,
};
