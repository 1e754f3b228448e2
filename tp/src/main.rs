//! TripPlanner - weather-aware trip planning
//!
//! CLI entry point for planning trips and revising saved plans.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{info, warn};

use tripplanner::cli::{Cli, Command, OutputFormat};
use tripplanner::config::Config;
use tripplanner::domain::{PlanStatus, TripRequest, TripState};
use tripplanner::prompts::PromptLoader;
use tripplanner::providers::Capabilities;
use tripplanner::report::{render_plan, summary_line};
use tripplanner::scoring::{SuitabilityLevel, daily_recommendations, daily_score};
use tripplanner::workflow::Planner;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file so stdout stays clean for the report
    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;
    let filter = tracing_subscriber::EnvFilter::try_new(level.to_lowercase())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .or_else(|| Config::load_log_level(cli.config.as_ref()))
        .unwrap_or_else(|| "info".to_string());
    setup_logging(&level).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "TripPlanner loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Plan {
            destination,
            dates,
            duration,
            budget,
            preferences,
            travel_type,
            origin,
            format,
            save,
        } => {
            let request = TripRequest {
                destination,
                origin,
                travel_dates: dates,
                duration,
                budget: budget.unwrap_or(config.planner.default_budget),
                preferences: preferences.into_iter().collect::<BTreeSet<_>>(),
                travel_type,
            };
            cmd_plan(&config, request, format, save.as_deref()).await
        }
        Command::Feedback {
            state,
            feedback,
            format,
            save,
        } => cmd_feedback(&config, &state, &feedback, format, save.as_deref()).await,
        Command::Score {
            temperature,
            description,
            wind,
        } => cmd_score(temperature, &description, wind),
    }
}

fn build_planner(config: &Config) -> Result<Planner> {
    let caps = Capabilities::from_config(config).context("Failed to create capabilities")?;
    let root = std::env::current_dir().context("Failed to read current directory")?;
    Ok(Planner::new(caps, config.planner.clone())
        .with_prompts(PromptLoader::new(root))
        .with_generation_timeout(config.llm.call_budget()))
}

/// Plan a trip and print the result
async fn cmd_plan(config: &Config, request: TripRequest, format: OutputFormat, save: Option<&Path>) -> Result<()> {
    for problem in request.validate() {
        warn!(%problem, "Request validation");
        eprintln!("{} {}", "Warning:".yellow(), problem);
    }

    let planner = build_planner(config)?;
    eprintln!("Planning trip to {}...", request.destination.cyan());
    let state = planner.plan_trip(request).await;

    output(&state, format, save)
}

/// Revise a saved plan with feedback
async fn cmd_feedback(
    config: &Config,
    path: &Path,
    feedback: &str,
    format: OutputFormat,
    save: Option<&Path>,
) -> Result<()> {
    let content = fs::read_to_string(path).context(format!("Failed to read saved plan {}", path.display()))?;
    let state: TripState =
        serde_json::from_str(&content).context(format!("Failed to parse saved plan {}", path.display()))?;

    let planner = build_planner(config)?;
    eprintln!("Revising plan for {}...", state.destination.cyan());
    let state = planner.submit_feedback(state, feedback).await;

    output(&state, format, save)
}

fn output(state: &TripState, format: OutputFormat, save: Option<&Path>) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(state)?),
        OutputFormat::Text => {
            println!();
            print!("{}", render_plan(state));
            println!();
            let summary = summary_line(state);
            match state.final_recommendation.as_ref().map(|r| r.status) {
                Some(PlanStatus::Completed) => println!("{} {}", "✓".green(), summary),
                Some(PlanStatus::Alternatives) => println!("{} {}", "⚠".yellow(), summary),
                _ => println!("{} {}", "✗".red(), summary),
            }
        }
    }

    if let Some(path) = save {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
        eprintln!("{} Saved plan to {}", "✓".green(), path.display());
    }

    Ok(())
}

/// Score one day's weather
fn cmd_score(temperature: f64, description: &str, wind: f64) -> Result<()> {
    let score = daily_score(temperature, description, wind);
    let level = SuitabilityLevel::from_score(score);
    println!("Score: {:.0}/100 ({})", score, level);
    for recommendation in daily_recommendations(temperature, description) {
        println!("  - {}", recommendation);
    }
    Ok(())
}
