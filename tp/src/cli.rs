//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TripPlanner - weather-aware trip planning
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan multi-day trips around the weather",
    version,
    after_help = "Logs are written to: ~/.local/share/tripplanner/logs/tripplanner.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Plan a trip
    Plan {
        /// Destination city
        #[arg(short, long)]
        destination: String,

        /// Travel dates, "YYYY-MM-DD to YYYY-MM-DD"
        #[arg(long)]
        dates: String,

        /// Trip length in days
        #[arg(long)]
        duration: u32,

        /// Budget ceiling (config default when omitted)
        #[arg(short, long)]
        budget: Option<f64>,

        /// Preference tag; repeat for several
        #[arg(short, long = "preference")]
        preferences: Vec<String>,

        /// Travel type
        #[arg(short = 't', long, default_value = "leisure")]
        travel_type: String,

        /// Departure city
        #[arg(short, long)]
        origin: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Write the final state as JSON to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Revise a saved plan with feedback
    Feedback {
        /// Saved state file from `tp plan --save`
        state: PathBuf,

        /// What to change
        feedback: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Write the revised state as JSON to this file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Score a single day's weather
    Score {
        /// Temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temperature: f64,

        /// Weather description, e.g. "light rain"
        #[arg(short, long)]
        description: String,

        /// Wind speed
        #[arg(short, long, default_value = "0")]
        wind: f64,
    },
}

/// Output format for plan results
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_plan() {
        let cli = Cli::parse_from([
            "tp",
            "plan",
            "-d",
            "Lisbon",
            "--dates",
            "2025-06-01 to 2025-06-03",
            "--duration",
            "3",
            "-p",
            "food",
            "-p",
            "museums",
        ]);
        if let Command::Plan {
            destination,
            duration,
            budget,
            preferences,
            travel_type,
            format,
            ..
        } = cli.command
        {
            assert_eq!(destination, "Lisbon");
            assert_eq!(duration, 3);
            assert!(budget.is_none());
            assert_eq!(preferences, vec!["food", "museums"]);
            assert_eq!(travel_type, "leisure");
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Plan command");
        }
    }

    #[test]
    fn test_cli_parse_feedback() {
        let cli = Cli::parse_from(["tp", "feedback", "plan.json", "cheaper hotel", "-f", "json"]);
        if let Command::Feedback {
            state, feedback, format, ..
        } = cli.command
        {
            assert_eq!(state, PathBuf::from("plan.json"));
            assert_eq!(feedback, "cheaper hotel");
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Feedback command");
        }
    }

    #[test]
    fn test_cli_parse_score_negative_temperature() {
        let cli = Cli::parse_from(["tp", "score", "--temperature", "-3", "-d", "snow"]);
        assert!(matches!(cli.command, Command::Score { temperature, wind, .. } if temperature == -3.0 && wind == 0.0));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["tp", "-c", "/path/to/config.yml", "-l", "debug", "score", "--temperature", "20", "-d", "clear"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }
}
