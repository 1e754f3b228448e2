//! Node implementations
//!
//! Every node reads an immutable snapshot of the state and returns a
//! `TripPatch`. Nodes never route; the engine does that after merging.

use tracing::{debug, info, warn};

use super::alternatives::{fallback_alternatives, parse_alternatives};
use super::engine::{FAILURE_HEADLINE, Planner};
use super::feedback::classify_feedback;
use super::node::Node;
use crate::domain::{Lodging, PlanStatus, Recommendation, TripPatch, TripState};
use crate::gather::{AggregationError, gather_trip_data};
use crate::llm::LlmError;
use crate::prompts::{AlternativesContext, ItineraryContext};
use crate::scoring::{
    ACCEPTANCE_THRESHOLD, POOR_THRESHOLD, SuitabilityLevel, assess_viability, itinerary_quality, weather_analysis,
};

/// Lodging options kept for the itinerary
const KEPT_LODGING: usize = 3;

/// Headline recorded when the plan ends with alternatives
pub const ALTERNATIVES_HEADLINE: &str = "Alternative travel suggestions provided";

fn base(node: Node) -> TripPatch {
    TripPatch::step(node.step())
}

impl Planner {
    /// Complete a system + user prompt under the generation timeout
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let limit = self.generation_timeout;
        match tokio::time::timeout(limit, self.caps.generator.complete(system, user)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(limit)),
        }
    }

    pub(super) fn collect_input(&self, state: &TripState) -> TripPatch {
        debug!(destination = %state.destination, "collect_input: called");
        let missing = state.missing_required();
        let note = if missing.is_empty() {
            "Input complete".to_string()
        } else {
            format!("Need information: {}", missing.join(", "))
        };

        TripPatch {
            missing_fields: Some(missing),
            ..base(Node::CollectInput).note(note)
        }
    }

    pub(super) async fn gather_data(&self, state: &TripState) -> TripPatch {
        debug!(destination = %state.destination, "gather_data: called");
        match gather_trip_data(&self.caps, state, self.config.call_timeout()).await {
            Ok(data) => {
                let note = format!(
                    "Gathered weather: {}, {} lodging, {} attractions, {} flights ({} sources failed)",
                    if data.weather.is_some() { "yes" } else { "no" },
                    data.lodging.len(),
                    data.attractions.len(),
                    data.flights.len(),
                    data.errors.len()
                );
                TripPatch {
                    weather: Some(data.weather),
                    lodging: Some(data.lodging),
                    attractions: Some(data.attractions),
                    flights: Some(data.flights),
                    source_errors: Some(data.errors),
                    // A previous assessment described the old data
                    viability: Some(None),
                    weather_analysis: Some(None),
                    ..base(Node::GatherData).note(note)
                }
            }
            Err(e) => {
                warn!(error = %e, "Data gathering failed");
                let source_errors = match &e {
                    AggregationError::AllSourcesFailed(errors) => Some(errors.clone()),
                    AggregationError::MissingDestination => None,
                };
                let message = format!("Data gathering failed: {}", e);
                TripPatch {
                    source_errors,
                    ..base(Node::GatherData).error(message.clone()).note(message)
                }
            }
        }
    }

    pub(super) fn analyze_weather(&self, state: &TripState) -> TripPatch {
        debug!(has_weather = state.weather.is_some(), "analyze_weather: called");
        let viability = assess_viability(state.weather.as_ref());
        let analysis = weather_analysis(state.weather.as_ref(), &viability);
        let level = SuitabilityLevel::from_score(viability.score);

        let mut patch = TripPatch {
            weather_analysis: Some(Some(analysis)),
            ..base(Node::AnalyzeWeather).note(format!(
                "Weather score {:.0}/100 ({}), viable: {}",
                viability.score, level, viability.viable
            ))
        };
        if viability.score < POOR_THRESHOLD {
            patch = patch.issue(format!(
                "Unfavorable weather: score {:.0}/100 ({})",
                viability.score, viability.reason
            ));
        }
        patch.viability = Some(Some(viability));
        patch
    }

    pub(super) fn search_lodging(&self, state: &TripState) -> TripPatch {
        debug!(candidates = state.lodging.len(), budget = state.budget, "search_lodging: called");
        let (kept, note) = select_lodging(&state.lodging, state.duration, state.budget);
        TripPatch {
            lodging: Some(kept),
            ..base(Node::SearchLodging).note(note)
        }
    }

    pub(super) fn search_flights(&self, state: &TripState) -> TripPatch {
        debug!(candidates = state.flights.len(), "search_flights: called");
        let mut flights = state.flights.clone();
        flights.sort_by(|a, b| a.price.total_cmp(&b.price));

        let cheapest_flight = flights.first().map_or(0.0, |f| f.price);
        let cheapest_stay = state
            .lodging
            .iter()
            .map(|l| l.stay_cost(state.duration))
            .min_by(f64::total_cmp)
            .unwrap_or(0.0);
        let estimate = cheapest_flight + cheapest_stay;
        let compliant = estimate <= state.budget;

        let note = format!(
            "{} flights, cheapest trip estimate ${:.0} of ${:.0} budget",
            flights.len(),
            estimate,
            state.budget
        );
        TripPatch {
            flights: Some(flights),
            budget_compliant: Some(compliant),
            ..base(Node::SearchFlights).note(note)
        }
    }

    pub(super) async fn generate_itinerary(&self, state: &TripState) -> TripPatch {
        debug!(destination = %state.destination, "generate_itinerary: called");
        let context = ItineraryContext::from_state(state);

        let generated = match (self.prompts.text("itinerary-system"), self.prompts.render("itinerary", &context)) {
            (Ok(system), Ok(user)) => self
                .generate(&system, &user)
                .await
                .map_err(|e| e.to_string())
                .and_then(|text| {
                    if text.trim().is_empty() {
                        Err("empty itinerary".to_string())
                    } else {
                        Ok(text)
                    }
                }),
            (Err(e), _) | (_, Err(e)) => Err(e.to_string()),
        };

        let (itinerary, source) = match generated {
            Ok(text) => (text, "generated"),
            Err(reason) => {
                warn!(%reason, "Itinerary generation failed, using template");
                match self.prompts.render("itinerary-fallback", &context) {
                    Ok(text) => (text, "template"),
                    Err(e) => {
                        let message = format!("Itinerary generation failed: {}", e);
                        return TripPatch {
                            itinerary: Some(None),
                            itinerary_quality: Some(0.0),
                            ..base(Node::GenerateItinerary).error(message.clone()).note(message)
                        };
                    }
                }
            }
        };

        let quality = itinerary_quality(&itinerary);
        info!(%quality, %source, "Itinerary ready");

        let mut patch = TripPatch {
            itinerary: Some(Some(itinerary)),
            itinerary_quality: Some(quality),
            ..base(Node::GenerateItinerary).note(format!("Itinerary {} with quality {:.0}/100", source, quality))
        };
        if quality < ACCEPTANCE_THRESHOLD {
            patch = patch.issue(format!(
                "Itinerary quality {:.0}/100 is below {:.0}",
                quality, ACCEPTANCE_THRESHOLD
            ));
        }
        patch
    }

    pub(super) async fn provide_alternatives(&self, state: &TripState) -> TripPatch {
        debug!(error = ?state.error, issue = ?state.issue, "provide_alternatives: called");
        let context = AlternativesContext::from_state(state);

        let parsed = match (self.prompts.text("alternatives-system"), self.prompts.render("alternatives", &context)) {
            (Ok(system), Ok(user)) => match self.generate(&system, &user).await {
                Ok(text) => parse_alternatives(&text),
                Err(e) => {
                    warn!(error = %e, "Alternative generation failed");
                    Vec::new()
                }
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Alternative prompt unavailable");
                Vec::new()
            }
        };

        let (alternatives, source) = if parsed.is_empty() {
            (fallback_alternatives(&state.destination), "template")
        } else {
            (parsed, "generated")
        };

        let note = format!("{} alternatives ({}) for: {}", alternatives.len(), source, context.issue);
        TripPatch {
            alternatives: Some(alternatives),
            final_recommendation: Some(Some(Recommendation::headline(
                PlanStatus::Alternatives,
                ALTERNATIVES_HEADLINE,
            ))),
            ..base(Node::ProvideAlternatives).note(note)
        }
    }

    pub(super) fn finalize(&self, state: &TripState) -> TripPatch {
        debug!(feedback_pending = state.feedback_pending, "finalize: called");
        if state.feedback_pending {
            return base(Node::Finalize).note("Revision requested");
        }

        let has_itinerary = state.itinerary.as_deref().is_some_and(|i| !i.trim().is_empty());
        let (status, headline) = if !state.alternatives.is_empty() {
            (PlanStatus::Alternatives, ALTERNATIVES_HEADLINE.to_string())
        } else if has_itinerary {
            (
                PlanStatus::Completed,
                format!("Your {}-day trip to {} is ready", state.duration, state.destination),
            )
        } else {
            (PlanStatus::Failed, FAILURE_HEADLINE.to_string())
        };

        let recommendation = Recommendation {
            status,
            headline,
            quality_score: state.itinerary_quality,
            weather_score: state.viability.as_ref().map(|v| v.score),
            lodging_options: state.lodging.len(),
            flight_options: state.flights.len(),
            alternatives: state.alternatives.len(),
        };

        TripPatch {
            final_recommendation: Some(Some(recommendation)),
            should_continue: Some(false),
            ..base(Node::Finalize).note(format!("Plan finalized: {:?}", status))
        }
    }

    pub(super) fn handle_feedback(&self, state: &TripState) -> TripPatch {
        let feedback = state.user_feedback.as_deref().unwrap_or_default();
        let decision = classify_feedback(feedback);
        debug!(%feedback, ?decision, "handle_feedback: called");

        TripPatch {
            error: Some(None),
            issue: Some(None),
            alternatives: Some(Vec::new()),
            final_recommendation: Some(None),
            feedback_pending: Some(false),
            should_continue: Some(true),
            retry_count: Some(state.retry_count + 1),
            ..base(Node::HandleFeedback).note(format!("Feedback '{}' routed to {:?}", feedback, decision))
        }
    }
}

/// Keep the best-rated stays whose total cost fits the budget, or the
/// cheapest ones when none fit
pub fn select_lodging(candidates: &[Lodging], nights: u32, budget: f64) -> (Vec<Lodging>, String) {
    let mut fitting: Vec<Lodging> = candidates
        .iter()
        .filter(|l| l.stay_cost(nights) <= budget)
        .cloned()
        .collect();

    if !fitting.is_empty() {
        fitting.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        fitting.truncate(KEPT_LODGING);
        let note = format!("Selected {} lodging options within budget", fitting.len());
        return (fitting, note);
    }

    let mut cheapest = candidates.to_vec();
    cheapest.sort_by(|a, b| a.price_per_night.total_cmp(&b.price_per_night));
    cheapest.truncate(KEPT_LODGING);
    let note = format!("No lodging fits the budget; kept the {} cheapest", cheapest.len());
    (cheapest, note)
}
