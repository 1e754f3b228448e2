//! Feedback classification
//!
//! A coarse keyword table: the first rule with a keyword contained in the
//! lowercased feedback decides. Anything unmatched regenerates the itinerary.

use tracing::debug;

use super::routing::FeedbackDecision;

const FEEDBACK_RULES: &[(&[&str], FeedbackDecision)] = &[
    (&["weather", "rain", "storm"], FeedbackDecision::WeatherRecheck),
    (&["hotel", "accommodation", "stay", "flight"], FeedbackDecision::NewSearch),
    (&["itinerary", "schedule", "plan"], FeedbackDecision::Regenerate),
];

/// Decide which part of the plan a piece of feedback asks to redo
pub fn classify_feedback(feedback: &str) -> FeedbackDecision {
    let lowered = feedback.to_lowercase();
    let decision = FEEDBACK_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(FeedbackDecision::Regenerate, |(_, decision)| *decision);
    debug!(?decision, "classify_feedback: classified");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_feedback() {
        assert_eq!(classify_feedback("Worried about RAIN"), FeedbackDecision::WeatherRecheck);
        assert_eq!(classify_feedback("cheaper accommodation please"), FeedbackDecision::NewSearch);
        assert_eq!(classify_feedback("Earlier flight?"), FeedbackDecision::NewSearch);
        assert_eq!(classify_feedback("Make the schedule lighter"), FeedbackDecision::Regenerate);
        assert_eq!(classify_feedback("more museums"), FeedbackDecision::Regenerate);
        assert_eq!(classify_feedback(""), FeedbackDecision::Regenerate);
    }

    #[test]
    fn test_first_rule_wins() {
        // Mentions both weather and hotel; the weather rule comes first
        assert_eq!(
            classify_feedback("The hotel is fine but the weather looks bad"),
            FeedbackDecision::WeatherRecheck
        );
    }
}
