//! Plain-text rendering of a finished plan

use std::fmt::Write;

use tracing::debug;

use crate::domain::{FlightPicks, PlanStatus, TripState};
use crate::scoring::{SuitabilityLevel, assess_day};

const RULE: &str = "==================================================";

/// Render the plan as a plain-text report
///
/// The canonical weather score is printed once, in the summary; per-day
/// lines show only each day's own level.
pub fn render_plan(state: &TripState) -> String {
    debug!(id = %state.id, "render_plan: called");
    let mut out = String::new();

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "TRIP PLAN: {}", state.destination.to_uppercase());
    let _ = writeln!(out, "{}", RULE);
    if let Some(recommendation) = &state.final_recommendation {
        let _ = writeln!(out, "{}", recommendation.headline);
    }
    let _ = writeln!(out, "From: {}", state.origin);
    let _ = writeln!(out, "Dates: {} ({} days)", state.travel_dates, state.duration);
    let _ = writeln!(
        out,
        "Budget: ${:.0}{}",
        state.budget,
        if state.budget_compliant { " (within budget)" } else { "" }
    );

    if let Some(viability) = &state.viability {
        let _ = writeln!(
            out,
            "Weather score: {:.0}/100 ({}){}",
            viability.score,
            SuitabilityLevel::from_score(viability.score),
            if viability.viable { "" } else { " - not recommended" }
        );
        for warning in &viability.warnings {
            let _ = writeln!(out, "  ! {}", warning);
        }
    }

    let daily = state.daily_weather();
    if !daily.is_empty() {
        let _ = writeln!(out, "\nDAILY FORECAST");
        for day in daily {
            let assessment = assess_day(day);
            let _ = writeln!(
                out,
                "  {} {}: {:.0}°C, {} [{}]",
                day.date,
                day.day_name(),
                day.temperature,
                day.description,
                assessment.level
            );
        }
    }

    if !state.lodging.is_empty() {
        let _ = writeln!(out, "\nLODGING");
        for lodging in &state.lodging {
            let _ = writeln!(
                out,
                "  {} - ${:.0}/night, rated {:.1} ({})",
                lodging.name, lodging.price_per_night, lodging.rating, lodging.category
            );
        }
    }

    if let Some(picks) = FlightPicks::from_flights(&state.flights) {
        let _ = writeln!(out, "\nFLIGHTS");
        for (label, flight) in [
            ("Cheapest", picks.cheapest),
            ("Best rated", picks.best_rated),
            ("Quickest", picks.quickest),
        ] {
            let _ = writeln!(
                out,
                "  {}: {} {} ${:.0}, {} ({} layovers)",
                label, flight.airline, flight.flight_number, flight.price, flight.duration, flight.layovers
            );
        }
    }

    if let Some(itinerary) = &state.itinerary {
        let _ = writeln!(out, "\nITINERARY (quality {:.0}/100)", state.itinerary_quality);
        let _ = writeln!(out, "{}", itinerary.trim_end());
    }

    if !state.alternatives.is_empty() {
        let _ = writeln!(out, "\nALTERNATIVES");
        for (i, alternative) in state.alternatives.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, alternative);
        }
    }

    let problems: Vec<String> = state
        .error
        .iter()
        .cloned()
        .chain(state.issue.iter().cloned())
        .chain(state.source_errors.iter().map(|e| e.to_string()))
        .collect();
    if !problems.is_empty() {
        let _ = writeln!(out, "\nNOTES");
        for problem in problems {
            let _ = writeln!(out, "  - {}", problem);
        }
    }

    out
}

/// One-line outcome summary
pub fn summary_line(state: &TripState) -> String {
    match &state.final_recommendation {
        Some(r) => match r.status {
            PlanStatus::Completed => format!("Plan ready: {}", r.headline),
            PlanStatus::Alternatives => format!("Alternatives suggested: {}", r.headline),
            PlanStatus::Failed => format!("Planning failed: {}", r.headline),
        },
        None => "Planning did not finish".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use crate::domain::{DataSource, Recommendation, SourceError, TripRequest};
    use crate::providers::mock::{flight, lodging, uniform_weather};
    use crate::scoring::assess_viability;

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

    #[test]
    fn test_weather_score_printed_once() {
        let mut state = state();
        state.weather = Some(uniform_weather(3, 24.0, "clear sky"));
        state.viability = Some(assess_viability(state.weather.as_ref()));
        state.lodging = vec![lodging("Harbor Inn", 90.0, 4.1)];
        state.flights = vec![flight("Meridian", 430.0)];
        state.itinerary = Some("Day 1 Morning: walk".to_string());

        let report = render_plan(&state);
        assert_eq!(report.matches("Weather score").count(), 1);
        assert!(report.contains("Weather score: 100/100 (Excellent)"));
        assert_eq!(report.matches("[Excellent]").count(), 3);
        assert!(report.contains("Harbor Inn - $90/night"));
        assert!(report.contains("Cheapest: Meridian"));
        assert!(report.contains("ITINERARY"));
    }

    #[test]
    fn test_alternatives_and_notes() {
        let mut state = state();
        state.alternatives = vec!["Visit Porto".to_string(), "Go in autumn".to_string()];
        state.error = Some("Data gathering failed".to_string());
        state.source_errors = vec![SourceError {
            source: DataSource::Weather,
            message: "timed out".to_string(),
        }];
        state.final_recommendation = Some(Recommendation::headline(PlanStatus::Alternatives, "Try these"));

        let report = render_plan(&state);
        assert!(report.contains("  1. Visit Porto"));
        assert!(report.contains("  2. Go in autumn"));
        assert!(report.contains("  - Data gathering failed"));
        assert!(report.contains("  - weather: timed out"));
        assert!(!report.contains("Weather score"));
        assert_eq!(summary_line(&state), "Alternatives suggested: Try these");
    }

    #[test]
    fn test_summary_without_recommendation() {
        assert_eq!(summary_line(&state()), "Planning did not finish");
    }
}
