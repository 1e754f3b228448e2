//! Trip-level weather viability
//!
//! `assess_viability` is the only producer of the canonical weather score
//! and verdict. When a per-day series exists its mean is authoritative; the
//! single-point score is used only when it does not.

use tracing::{debug, info};

use super::weather::{SuitabilityLevel, assess_day, overall_recommendation, point_score, trip_score};
use crate::domain::{Viability, WeatherBundle};

/// Scores at or above this are a "go"
pub const VIABLE_THRESHOLD: f64 = 40.0;

/// Scores below this draw a poor-conditions warning and count as unfavorable
pub const POOR_THRESHOLD: f64 = 30.0;

/// Scores below this (and not poor) draw a moderate-conditions warning
pub const MODERATE_THRESHOLD: f64 = 50.0;

pub const POOR_WARNING: &str = "Poor weather conditions expected";
pub const MODERATE_WARNING: &str = "Moderate weather conditions";

/// Build the verdict for an already computed score
pub fn viability_from_score(score: f64, reason: impl Into<String>, recommendations: Vec<String>) -> Viability {
    let mut warnings = Vec::new();
    if score < POOR_THRESHOLD {
        warnings.push(POOR_WARNING.to_string());
    } else if score < MODERATE_THRESHOLD {
        warnings.push(MODERATE_WARNING.to_string());
    }

    Viability {
        score,
        viable: score >= VIABLE_THRESHOLD,
        reason: reason.into(),
        warnings,
        recommendations,
    }
}

/// Assess the trip's weather
pub fn assess_viability(weather: Option<&WeatherBundle>) -> Viability {
    let Some(bundle) = weather else {
        debug!("assess_viability: no weather data");
        return Viability {
            score: 0.0,
            viable: false,
            reason: "Weather data unavailable".to_string(),
            warnings: vec!["Cannot verify weather conditions".to_string()],
            recommendations: vec!["Check weather manually".to_string()],
        };
    };

    let viability = if bundle.has_daily() {
        let days: Vec<_> = bundle.daily.iter().map(assess_day).collect();
        let scores: Vec<f64> = days.iter().map(|d| d.score).collect();
        let score = trip_score(&scores).unwrap_or_default();
        debug!(days = days.len(), %score, "assess_viability: using per-day mean");

        let mut recommendations: Vec<String> = Vec::new();
        for rec in days.iter().flat_map(|d| d.recommendations.iter()) {
            if !recommendations.contains(rec) {
                recommendations.push(rec.clone());
            }
        }
        viability_from_score(score, overall_recommendation(score), recommendations)
    } else {
        debug!("assess_viability: no per-day series, using current conditions");
        let point = point_score(&bundle.current);
        viability_from_score(point.score, point.reasons.join("; "), point.recommendations)
    };

    info!(
        location = %bundle.location,
        score = viability.score,
        viable = viability.viable,
        "Weather assessed"
    );
    viability
}

/// Narrative weather analysis for the trip
///
/// Quotes the canonical score from `viability`; never recomputes one.
pub fn weather_analysis(weather: Option<&WeatherBundle>, viability: &Viability) -> String {
    let Some(bundle) = weather else {
        return format!("Weather analysis unavailable: {}", viability.reason);
    };

    let current = &bundle.current;
    let level = SuitabilityLevel::from_score(viability.score);
    let mut analysis = format!(
        "Current weather in {}: {:.0}°C, {}. Weather viability score: {:.0}/100 ({}). ",
        bundle.location, current.temperature, current.description, viability.score, level
    );

    analysis.push_str(match level {
        SuitabilityLevel::Excellent => "Excellent conditions for travel! ",
        SuitabilityLevel::Good => "Good conditions with minor considerations. ",
        SuitabilityLevel::Fair => "Fair conditions - some adjustments needed. ",
        SuitabilityLevel::Poor | SuitabilityLevel::VeryPoor => "Challenging conditions - consider alternatives. ",
    });

    if current.temperature > 30.0 {
        analysis.push_str("Hot weather - stay hydrated and seek shade. ");
    } else if current.temperature < 10.0 {
        analysis.push_str("Cold weather - pack warm clothing. ");
    }

    let description = current.description.to_lowercase();
    if description.contains("rain") {
        analysis.push_str("Rain expected - pack rain gear. ");
    }
    if description.contains("wind") || current.wind_speed > 15.0 {
        analysis.push_str("Windy conditions expected. ");
    }

    analysis.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrentConditions, DailyWeather};
    use chrono::NaiveDate;

    fn current(temperature: f64, description: &str) -> CurrentConditions {
        CurrentConditions {
            temperature,
            feels_like: None,
            humidity: None,
            description: description.to_string(),
            wind_speed: 4.0,
        }
    }

    fn day(offset: u32, temperature: f64, description: &str) -> DailyWeather {
        DailyWeather {
            date: NaiveDate::from_ymd_opt(2025, 6, 1 + offset).unwrap(),
            temperature,
            description: description.to_string(),
            wind_speed: 4.0,
        }
    }

    fn bundle(current: CurrentConditions, daily: Vec<DailyWeather>) -> WeatherBundle {
        WeatherBundle {
            location: "Lisbon".to_string(),
            current,
            daily,
        }
    }

    #[test]
    fn test_verdict_and_warnings_by_score() {
        let poor = viability_from_score(25.0, "", vec![]);
        assert!(!poor.viable);
        assert_eq!(poor.warnings, vec![POOR_WARNING]);

        let moderate = viability_from_score(45.0, "", vec![]);
        assert!(moderate.viable);
        assert_eq!(moderate.warnings, vec![MODERATE_WARNING]);

        let good = viability_from_score(85.0, "", vec![]);
        assert!(good.viable);
        assert!(good.warnings.is_empty());
    }

    #[test]
    fn test_missing_weather() {
        let v = assess_viability(None);
        assert_eq!(v.score, 0.0);
        assert!(!v.viable);
        assert_eq!(v.reason, "Weather data unavailable");
    }

    #[test]
    fn test_daily_mean_is_authoritative() {
        // Current conditions alone would score 100; the per-day series wins
        let weather = bundle(
            current(24.0, "clear sky"),
            vec![day(0, 20.0, "light rain"), day(1, 12.0, "overcast"), day(2, -2.0, "snow")],
        );
        // 90, 100, 30
        let v = assess_viability(Some(&weather));
        assert!((v.score - 220.0 / 3.0).abs() < 1e-9);
        assert!(v.viable);
        assert_eq!(v.reason, overall_recommendation(v.score));
        assert!(v.recommendations.contains(&"Carry umbrella".to_string()));
    }

    #[test]
    fn test_point_score_fallback() {
        let weather = bundle(current(16.0, "light rain"), vec![]);
        let v = assess_viability(Some(&weather));
        assert_eq!(v.score, 85.0);
        assert_eq!(v.reason, "Good temperature; Rain expected");
        assert_eq!(v.recommendations, vec!["Carry umbrella or raincoat"]);
    }

    #[test]
    fn test_analysis_quotes_canonical_score() {
        let weather = bundle(current(33.0, "moderate rain"), vec![day(0, 25.0, "clear sky")]);
        let v = assess_viability(Some(&weather));
        let analysis = weather_analysis(Some(&weather), &v);

        assert!(analysis.contains("Weather viability score: 100/100 (Excellent)"));
        assert!(analysis.contains("Hot weather"));
        assert!(analysis.contains("Rain expected"));
    }

    #[test]
    fn test_analysis_without_weather() {
        let v = assess_viability(None);
        assert_eq!(
            weather_analysis(None, &v),
            "Weather analysis unavailable: Weather data unavailable"
        );
    }
}
