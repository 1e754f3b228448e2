//! Itinerary quality heuristic

use tracing::debug;

/// Quality an itinerary needs before it is accepted without alternatives
pub const ACCEPTANCE_THRESHOLD: f64 = 70.0;

/// Texts longer than this many characters earn the length bonus
pub const LENGTH_THRESHOLD: usize = 500;

/// Any one of these shows day-by-day structure
pub const STRUCTURE_MARKERS: &[&str] = &["Day 1", "Day 2", "Morning", "Afternoon"];

/// All of these (case-insensitive) show lodging, activity and dining coverage
pub const CONTENT_KEYWORDS: &[&str] = &["hotel", "activities", "restaurant"];

const BASE_QUALITY: f64 = 50.0;
const LENGTH_BONUS: f64 = 20.0;
const STRUCTURE_BONUS: f64 = 20.0;
const CONTENT_BONUS: f64 = 10.0;

/// Grade itinerary text on a 0-100 scale
///
/// Empty text scores 0. Anything else starts at 50 and earns the length,
/// structure and content bonuses it qualifies for, capped at 100.
pub fn itinerary_quality(itinerary: &str) -> f64 {
    if itinerary.trim().is_empty() {
        debug!("itinerary_quality: empty itinerary");
        return 0.0;
    }

    let mut score = BASE_QUALITY;

    if itinerary.chars().count() > LENGTH_THRESHOLD {
        score += LENGTH_BONUS;
    }

    if STRUCTURE_MARKERS.iter().any(|m| itinerary.contains(m)) {
        score += STRUCTURE_BONUS;
    }

    let lowered = itinerary.to_lowercase();
    if CONTENT_KEYWORDS.iter().all(|k| lowered.contains(k)) {
        score += CONTENT_BONUS;
    }

    let score = score.min(100.0);
    debug!(len = itinerary.len(), %score, "itinerary_quality: computed");
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(core: &str, len: usize) -> String {
        let mut text = core.to_string();
        while text.chars().count() < len {
            text.push_str(" lorem");
        }
        text
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(itinerary_quality(""), 0.0);
        assert_eq!(itinerary_quality("   \n"), 0.0);
    }

    #[test]
    fn test_full_marks() {
        let text = padded("Day 1: check in at the hotel, afternoon activities, dinner at a restaurant.", 600);
        assert_eq!(itinerary_quality(&text), 100.0);
    }

    #[test]
    fn test_short_unstructured_text_gets_base() {
        assert_eq!(itinerary_quality("Walk around."), 50.0);
    }

    #[test]
    fn test_structure_marker_is_case_sensitive() {
        assert_eq!(itinerary_quality("day 1 walk"), 50.0);
        assert_eq!(itinerary_quality("Morning walk"), 70.0);
    }

    #[test]
    fn test_content_bonus_needs_all_keywords() {
        assert_eq!(itinerary_quality("Hotel and activities"), 50.0);
        assert_eq!(itinerary_quality("Hotel, Activities, Restaurant"), 60.0);
    }

    #[test]
    fn test_long_text_without_markers() {
        let text = padded("Wander.", 501);
        assert_eq!(itinerary_quality(&text), 70.0);
    }
}
