//! Trip request facts and travel date parsing

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Separator between start and end date in a travel-dates string
pub const DATE_RANGE_SEPARATOR: &str = " to ";

/// Smallest budget the planner considers realistic
pub const MIN_BUDGET: f64 = 50.0;

/// Longest trip the planner builds day-by-day detail for
pub const MAX_TRIP_DAYS: u32 = 30;

/// Facts supplied by the caller for one planning request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city (e.g. "Lisbon, Portugal")
    pub destination: String,

    /// Departure city for flight search; config default when absent
    pub origin: Option<String>,

    /// "YYYY-MM-DD to YYYY-MM-DD", or a single date
    pub travel_dates: String,

    /// Trip length in days
    pub duration: u32,

    /// Budget ceiling for the whole trip
    pub budget: f64,

    /// Preference tags (e.g. "food", "museums")
    pub preferences: BTreeSet<String>,

    /// Travel type category (e.g. "leisure", "business")
    pub travel_type: String,
}

impl TripRequest {
    /// Soft validation of request values
    ///
    /// Returns human-readable problems. Missing required fields are left to
    /// the workflow's input collection step; these are sanity checks on the
    /// values that are present.
    pub fn validate(&self) -> Vec<String> {
        debug!(destination = %self.destination, "TripRequest::validate: called");
        let mut problems = Vec::new();

        if self.duration == 0 {
            problems.push("Duration must be at least 1 day".to_string());
        }
        if self.duration > MAX_TRIP_DAYS {
            problems.push(format!(
                "Duration of {} days exceeds {}; only the first {} days are planned in detail",
                self.duration, MAX_TRIP_DAYS, MAX_TRIP_DAYS
            ));
        }
        if self.budget < MIN_BUDGET {
            problems.push(format!("Budget must be at least ${}", MIN_BUDGET));
        }
        if !self.travel_dates.trim().is_empty() {
            if let Err(e) = parse_travel_dates(&self.travel_dates) {
                problems.push(e.to_string());
            }
        }

        problems
    }
}

/// Errors parsing a travel-dates string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid travel date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Travel dates end ({end}) before they start ({start})")]
    Reversed { start: NaiveDate, end: NaiveDate },
}

/// Parse "YYYY-MM-DD to YYYY-MM-DD" into an inclusive date range
///
/// A single date yields a one-day range.
pub fn parse_travel_dates(dates: &str) -> Result<(NaiveDate, NaiveDate), DateRangeError> {
    debug!(%dates, "parse_travel_dates: called");
    let mut parts = dates.split(DATE_RANGE_SEPARATOR).map(str::trim);

    let start_raw = parts.next().unwrap_or_default();
    let start = parse_date(start_raw)?;
    let end = match parts.next() {
        Some(end_raw) if !end_raw.is_empty() => parse_date(end_raw)?,
        _ => start,
    };

    if end < start {
        debug!(%start, %end, "parse_travel_dates: reversed range");
        return Err(DateRangeError::Reversed { start, end });
    }

    Ok((start, end))
}

fn parse_date(raw: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DateRangeError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TripRequest {
        TripRequest {
            destination: "Lisbon".to_string(),
            origin: None,
            travel_dates: "2025-05-10 to 2025-05-13".to_string(),
            duration: 4,
            budget: 1500.0,
            preferences: BTreeSet::from(["food".to_string()]),
            travel_type: "leisure".to_string(),
        }
    }

    #[test]
    fn test_parse_range() {
        let (start, end) = parse_travel_dates("2025-05-10 to 2025-05-13").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 5, 13).unwrap());
    }

    #[test]
    fn test_parse_single_date() {
        let (start, end) = parse_travel_dates("2025-05-10").unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_parse_invalid_date() {
        let err = parse_travel_dates("next tuesday").unwrap_err();
        assert_eq!(err, DateRangeError::InvalidDate("next tuesday".to_string()));
    }

    #[test]
    fn test_parse_reversed_range() {
        let err = parse_travel_dates("2025-05-13 to 2025-05-10").unwrap_err();
        assert!(matches!(err, DateRangeError::Reversed { .. }));
    }

    #[test]
    fn test_validate_clean_request() {
        assert!(request().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_value_problems() {
        let req = TripRequest {
            duration: 0,
            budget: 20.0,
            travel_dates: "soon".to_string(),
            ..request()
        };
        let problems = req.validate();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("Duration"));
        assert!(problems[1].contains("Budget"));
    }

    #[test]
    fn test_validate_reports_overlong_trip() {
        let req = TripRequest {
            duration: u32::MAX,
            ..request()
        };
        let problems = req.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("exceeds 30"));
    }
}
