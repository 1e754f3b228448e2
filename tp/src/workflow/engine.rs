//! Planner - runs the planning state machine for one request

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::node::{Node, Transition};
use super::routing::route;
use crate::config::{LlmConfig, PlannerConfig};
use crate::domain::{PlanStatus, Recommendation, TripPatch, TripRequest, TripState};
use crate::gather::panic_message;
use crate::prompts::PromptLoader;
use crate::providers::Capabilities;

/// Steps allowed beyond the iteration ceiling for the recovery nodes
const RECOVERY_STEPS: u32 = 8;

/// Headline recorded when the workflow itself fails
pub const FAILURE_HEADLINE: &str = "Unable to generate travel plan. Please try again.";

/// Failures of the workflow itself, as opposed to degraded data
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Step limit of {limit} exceeded at {node}")]
    StepLimitExceeded { limit: u32, node: Node },

    #[error("Workflow panicked: {0}")]
    Panicked(String),
}

/// Runs planning requests against a set of capabilities
///
/// A planner holds no per-request state; one instance can serve concurrent
/// requests.
pub struct Planner {
    pub(super) caps: Capabilities,
    pub(super) prompts: PromptLoader,
    pub(super) config: PlannerConfig,
    pub(super) generation_timeout: Duration,
}

impl Planner {
    /// Create a planner using the embedded prompt templates
    pub fn new(caps: Capabilities, config: PlannerConfig) -> Self {
        debug!(max_iterations = config.max_iterations, "Planner::new: called");
        Self {
            caps,
            prompts: PromptLoader::embedded_only(),
            config,
            generation_timeout: LlmConfig::default().call_budget(),
        }
    }

    /// Replace the prompt loader
    pub fn with_prompts(mut self, prompts: PromptLoader) -> Self {
        self.prompts = prompts;
        self
    }

    /// Bound each text generation call, retries included
    pub fn with_generation_timeout(mut self, limit: Duration) -> Self {
        self.generation_timeout = limit;
        self
    }

    /// Plan a trip from scratch
    ///
    /// Never fails: workflow failures come back as a failure state with the
    /// error message set.
    pub async fn plan_trip(&self, request: TripRequest) -> TripState {
        info!(destination = %request.destination, dates = %request.travel_dates, "Planning trip");
        let state = TripState::new(request, &self.config.default_origin, self.config.max_iterations);
        self.run_guarded(Node::CollectInput, state).await
    }

    /// Revise a finished plan with user feedback
    ///
    /// Re-enters the graph at HandleFeedback with a fresh iteration budget.
    pub async fn submit_feedback(&self, mut state: TripState, feedback: &str) -> TripState {
        info!(id = %state.id, "Revising plan with feedback");
        state.user_feedback = Some(feedback.trim().to_string());
        state.feedback_pending = true;
        state.should_continue = true;
        state.iteration = 0;
        self.run_guarded(Node::HandleFeedback, state).await
    }

    /// Run the graph, converting a workflow error or panic into a failure state
    async fn run_guarded(&self, start: Node, mut state: TripState) -> TripState {
        let outcome = AssertUnwindSafe(self.run_from(start, &mut state)).catch_unwind().await;

        let message = match outcome {
            Ok(Ok(())) => {
                info!(
                    id = %state.id,
                    steps = state.iteration,
                    status = ?state.final_recommendation.as_ref().map(|r| r.status),
                    "Planning finished"
                );
                return state;
            }
            Ok(Err(e)) => e.to_string(),
            Err(panic) => WorkflowError::Panicked(panic_message(panic.as_ref())).to_string(),
        };

        error!(id = %state.id, %message, "Trip planning failed");
        state.apply(TripPatch {
            itinerary: Some(None),
            final_recommendation: Some(Some(Recommendation::headline(PlanStatus::Failed, FAILURE_HEADLINE))),
            should_continue: Some(false),
            feedback_pending: Some(false),
            ..TripPatch::step("error").error(format!("Trip planning failed: {}", message))
        });
        state
    }

    /// Execute nodes from `start` until a transition ends the run
    ///
    /// Each executed node increments `iteration`. Once the ceiling is reached
    /// every node other than the recovery nodes is replaced by
    /// ProvideAlternatives; an absolute cap bounds the recovery nodes.
    pub async fn run_from(&self, start: Node, state: &mut TripState) -> Result<(), WorkflowError> {
        debug!(%start, max_iterations = state.max_iterations, "run_from: called");
        let hard_limit = state.max_iterations.saturating_add(RECOVERY_STEPS);
        let mut current = start;

        loop {
            if state.iteration >= hard_limit {
                return Err(WorkflowError::StepLimitExceeded {
                    limit: hard_limit,
                    node: current,
                });
            }

            let node = if !current.is_recovery() && state.iteration >= state.max_iterations {
                warn!(node = %current, iteration = state.iteration, "Iteration limit reached, diverting to alternatives");
                let message = format!(
                    "Iteration limit of {} reached while at {}",
                    state.max_iterations, current
                );
                state.apply(TripPatch {
                    feedback_pending: Some(false),
                    ..TripPatch::step(current.step()).error(message.clone()).note(message)
                });
                Node::ProvideAlternatives
            } else {
                current
            };

            state.iteration += 1;
            info!(%node, iteration = state.iteration, "Running node");
            let patch = self.execute(node, state).await;
            state.apply(patch);

            match route(node, state) {
                Transition::To(next) => current = next,
                Transition::End => return Ok(()),
            }
        }
    }

    async fn execute(&self, node: Node, state: &TripState) -> TripPatch {
        match node {
            Node::CollectInput => self.collect_input(state),
            Node::GatherData => self.gather_data(state).await,
            Node::AnalyzeWeather => self.analyze_weather(state),
            Node::SearchLodging => self.search_lodging(state),
            Node::SearchFlights => self.search_flights(state),
            Node::GenerateItinerary => self.generate_itinerary(state).await,
            Node::ProvideAlternatives => self.provide_alternatives(state).await,
            Node::Finalize => self.finalize(state),
            Node::HandleFeedback => self.handle_feedback(state),
        }
    }
}
