//! Weather suitability scoring
//!
//! A score starts at 100 and takes one adjustment from each of three
//! independent axes (temperature, condition keywords, wind), then clamps to
//! [0, 100]. The same tables serve the per-day score and the single-point
//! score; the single-point variant adds a small bonus for the wider
//! 15-30 °C comfort band.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CurrentConditions, DailyWeather};

/// Score every calculation starts from
pub const BASE_SCORE: f64 = 100.0;

/// One axis' contribution to a score
#[derive(Debug, Clone, Copy, PartialEq)]
struct Adjustment {
    delta: f64,
    reason: Option<&'static str>,
    advice: Option<&'static str>,
}

impl Adjustment {
    const NONE: Self = Self {
        delta: 0.0,
        reason: None,
        advice: None,
    };

    const fn new(delta: f64, reason: &'static str, advice: Option<&'static str>) -> Self {
        Self {
            delta,
            reason: Some(reason),
            advice,
        }
    }
}

/// Condition keyword tiers, checked in order; the first tier with a matching
/// keyword is the only one applied
struct ConditionRule {
    keywords: &'static [&'static str],
    adjustment: Adjustment,
}

const CONDITION_RULES: &[ConditionRule] = &[
    ConditionRule {
        keywords: &["storm", "hurricane", "tornado"],
        adjustment: Adjustment::new(-50.0, "Storm conditions", Some("Consider rescheduling - storm warning")),
    },
    ConditionRule {
        keywords: &["heavy rain", "thunderstorm"],
        adjustment: Adjustment::new(-40.0, "Heavy rain expected", Some("Plan indoor activities")),
    },
    ConditionRule {
        keywords: &["rain", "shower"],
        adjustment: Adjustment::new(-20.0, "Rain expected", Some("Carry umbrella or raincoat")),
    },
    ConditionRule {
        keywords: &["snow", "sleet"],
        adjustment: Adjustment::new(-30.0, "Snow conditions", Some("Check travel advisories")),
    },
    ConditionRule {
        keywords: &["clear", "sunny"],
        adjustment: Adjustment::new(15.0, "Excellent weather conditions", None),
    },
    ConditionRule {
        keywords: &["cloud"],
        adjustment: Adjustment::new(5.0, "Cloudy but suitable", None),
    },
];

fn temperature_adjustment(temperature: f64, comfort_band_bonus: bool) -> Adjustment {
    if temperature <= 0.0 || temperature >= 40.0 {
        Adjustment::new(
            -40.0,
            "Extreme temperature",
            Some("Consider rescheduling due to extreme temperatures"),
        )
    } else if temperature < 5.0 || temperature > 35.0 {
        Adjustment::new(-25.0, "Harsh temperature", Some("Pack for harsh temperatures"))
    } else if temperature < 10.0 || temperature > 30.0 {
        Adjustment::new(-15.0, "Uncomfortable temperature", None)
    } else if (18.0..=28.0).contains(&temperature) {
        Adjustment::new(10.0, "Perfect temperature", None)
    } else if comfort_band_bonus && (15.0..=30.0).contains(&temperature) {
        Adjustment::new(5.0, "Good temperature", None)
    } else {
        Adjustment::NONE
    }
}

fn condition_adjustment(description: &str) -> Adjustment {
    let lowered = description.to_lowercase();
    CONDITION_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map_or(Adjustment::NONE, |rule| rule.adjustment)
}

fn wind_adjustment(wind_speed: f64) -> Adjustment {
    if wind_speed > 25.0 {
        Adjustment::new(-20.0, "High winds", Some("Secure outdoor items"))
    } else if wind_speed > 15.0 {
        Adjustment::new(-10.0, "Moderate winds", None)
    } else {
        Adjustment::NONE
    }
}

fn score_axes(temperature: f64, description: &str, wind_speed: f64, comfort_band_bonus: bool) -> (f64, [Adjustment; 3]) {
    let axes = [
        temperature_adjustment(temperature, comfort_band_bonus),
        condition_adjustment(description),
        wind_adjustment(wind_speed),
    ];
    let raw = BASE_SCORE + axes.iter().map(|a| a.delta).sum::<f64>();
    (raw.clamp(0.0, BASE_SCORE), axes)
}

/// Daily weather suitability score in [0, 100]
///
/// Depends only on its three arguments.
pub fn daily_score(temperature: f64, description: &str, wind_speed: f64) -> f64 {
    let (score, _) = score_axes(temperature, description, wind_speed, false);
    debug!(%temperature, %description, %wind_speed, %score, "daily_score: computed");
    score
}

/// Single-point score from current conditions, with its reasons and advice
#[derive(Debug, Clone, PartialEq)]
pub struct PointScore {
    pub score: f64,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Score current conditions when no per-day series exists
pub fn point_score(current: &CurrentConditions) -> PointScore {
    debug!(temperature = %current.temperature, description = %current.description, "point_score: called");
    let (score, axes) = score_axes(current.temperature, &current.description, current.wind_speed, true);

    PointScore {
        score,
        reasons: axes.iter().filter_map(|a| a.reason).map(String::from).collect(),
        recommendations: axes.iter().filter_map(|a| a.advice).map(String::from).collect(),
    }
}

/// Human-readable bucket for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuitabilityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl SuitabilityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else if score >= 20.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for SuitabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Activity advice for one day
pub fn daily_recommendations(temperature: f64, description: &str) -> Vec<String> {
    let lowered = description.to_lowercase();
    let mut advice: Vec<&str> = Vec::new();

    if temperature > 30.0 {
        advice.extend(["Stay hydrated", "Wear light clothing", "Seek shade during peak hours"]);
    } else if temperature < 10.0 {
        advice.extend(["Warm layers needed", "Limit outdoor exposure", "Hot beverages recommended"]);
    }

    if lowered.contains("storm") || lowered.contains("thunder") {
        advice.extend(["Avoid outdoor activities", "Seek shelter if needed", "Check weather alerts"]);
    } else if lowered.contains("rain") || lowered.contains("drizzle") {
        advice.extend(["Carry umbrella", "Waterproof footwear", "Have indoor backup plans"]);
    } else if lowered.contains("clear") || lowered.contains("sunny") {
        advice.extend(["Perfect for outdoor activities", "Sunscreen recommended", "Great for photography"]);
    }

    if advice.is_empty() {
        advice.push("Generally good conditions for activities");
    }
    advice.into_iter().map(String::from).collect()
}

/// Trip-level advice for a trip score
pub fn overall_recommendation(score: f64) -> &'static str {
    match SuitabilityLevel::from_score(score) {
        SuitabilityLevel::Excellent => "Excellent weather conditions for your trip!",
        SuitabilityLevel::Good => "Good weather conditions with minor considerations.",
        SuitabilityLevel::Fair => "Fair weather - some days may require alternative plans.",
        SuitabilityLevel::Poor | SuitabilityLevel::VeryPoor => {
            "Poor weather conditions - consider rescheduling or indoor alternatives."
        }
    }
}

/// A scored forecast day
#[derive(Debug, Clone, PartialEq)]
pub struct DayAssessment<'a> {
    pub day: &'a DailyWeather,
    pub score: f64,
    pub level: SuitabilityLevel,
    pub recommendations: Vec<String>,
}

/// Score one forecast day
pub fn assess_day(day: &DailyWeather) -> DayAssessment<'_> {
    let score = daily_score(day.temperature, &day.description, day.wind_speed);
    DayAssessment {
        day,
        score,
        level: SuitabilityLevel::from_score(score),
        recommendations: daily_recommendations(day.temperature, &day.description),
    }
}

/// Arithmetic mean of per-day scores; None for an empty slice
pub fn trip_score(daily_scores: &[f64]) -> Option<f64> {
    if daily_scores.is_empty() {
        return None;
    }
    Some(daily_scores.iter().sum::<f64>() / daily_scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ideal_day_clamps_to_100() {
        assert_eq!(daily_score(25.0, "clear sky", 5.0), 100.0);
    }

    #[test]
    fn test_freezing_thunderstorm() {
        // "thunderstorm" contains "storm", so the first tier (-50) applies
        assert_eq!(daily_score(-5.0, "thunderstorm", 10.0), 10.0);
        assert_eq!(SuitabilityLevel::from_score(10.0), SuitabilityLevel::VeryPoor);
    }

    #[test]
    fn test_heavy_rain_tier() {
        assert_eq!(daily_score(20.0, "Heavy Rain", 0.0), 70.0);
    }

    #[test]
    fn test_condition_first_match_wins() {
        // "light rain, clearing later": rain tier wins over clear
        assert_eq!(daily_score(12.0, "light rain, clearing later", 0.0), 80.0);
    }

    #[test]
    fn test_temperature_bands() {
        assert_eq!(daily_score(0.0, "", 0.0), 60.0);
        assert_eq!(daily_score(40.0, "", 0.0), 60.0);
        assert_eq!(daily_score(3.0, "", 0.0), 75.0);
        assert_eq!(daily_score(36.0, "", 0.0), 75.0);
        assert_eq!(daily_score(7.0, "", 0.0), 85.0);
        assert_eq!(daily_score(32.0, "", 0.0), 85.0);
        assert_eq!(daily_score(12.0, "", 0.0), 100.0);
        assert_eq!(daily_score(29.0, "", 0.0), 100.0);
    }

    #[test]
    fn test_wind_bands() {
        assert_eq!(daily_score(12.0, "overcast", 15.0), 100.0);
        assert_eq!(daily_score(12.0, "overcast", 16.0), 90.0);
        assert_eq!(daily_score(12.0, "overcast", 25.0), 90.0);
        assert_eq!(daily_score(12.0, "overcast", 26.0), 80.0);
    }

    #[test]
    fn test_point_score_comfort_band_bonus() {
        let current = CurrentConditions {
            temperature: 16.0,
            feels_like: None,
            humidity: None,
            description: "few clouds".to_string(),
            wind_speed: 3.0,
        };
        // Daily table gives no temperature bonus at 16 °C
        assert_eq!(daily_score(16.0, "few clouds", 3.0), 100.0);

        let point = point_score(&CurrentConditions {
            description: "light rain".to_string(),
            ..current
        });
        assert_eq!(point.score, 85.0);
        assert_eq!(point.reasons, vec!["Good temperature", "Rain expected"]);
        assert_eq!(point.recommendations, vec!["Carry umbrella or raincoat"]);
    }

    #[test]
    fn test_suitability_levels() {
        assert_eq!(SuitabilityLevel::from_score(80.0), SuitabilityLevel::Excellent);
        assert_eq!(SuitabilityLevel::from_score(79.9), SuitabilityLevel::Good);
        assert_eq!(SuitabilityLevel::from_score(60.0), SuitabilityLevel::Good);
        assert_eq!(SuitabilityLevel::from_score(40.0), SuitabilityLevel::Fair);
        assert_eq!(SuitabilityLevel::from_score(20.0), SuitabilityLevel::Poor);
        assert_eq!(SuitabilityLevel::from_score(19.9).label(), "Very Poor");
    }

    #[test]
    fn test_trip_score_is_mean() {
        assert_eq!(trip_score(&[80.0, 60.0, 40.0]), Some(60.0));
        assert_eq!(trip_score(&[]), None);
    }

    #[test]
    fn test_daily_recommendations() {
        let hot_storm = daily_recommendations(33.0, "thunderstorm");
        assert!(hot_storm.contains(&"Stay hydrated".to_string()));
        assert!(hot_storm.contains(&"Avoid outdoor activities".to_string()));

        assert_eq!(daily_recommendations(20.0, "mist"), vec!["Generally good conditions for activities"]);
    }

    proptest! {
        #[test]
        fn prop_daily_score_in_bounds(
            temperature in -60.0f64..70.0,
            wind in 0.0f64..80.0,
            description in "(clear|sunny|storm|rain|snow|cloud|mist| |heavy)*",
        ) {
            let score = daily_score(temperature, &description, wind);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_daily_score_is_deterministic(temperature in -20.0f64..45.0, wind in 0.0f64..40.0) {
            prop_assert_eq!(
                daily_score(temperature, "scattered clouds", wind),
                daily_score(temperature, "scattered clouds", wind)
            );
        }
    }
}
