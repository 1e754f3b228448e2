//! Data aggregation: one concurrent round of weather, lodging, attraction
//! and flight lookups
//!
//! Every source is awaited under its own timeout. A failing or panicking
//! source becomes a `SourceError` marker and never aborts the round; the
//! round as a whole only fails when there is no destination or every source
//! failed.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Attraction, DataSource, Flight, Lodging, SourceError, TripState, WeatherBundle, parse_travel_dates};
use crate::providers::{Capabilities, ProviderError};

/// Why a gather round produced nothing usable
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("No destination to gather data for")]
    MissingDestination,

    #[error("All data sources failed: {}", join_errors(.0))]
    AllSourcesFailed(Vec<SourceError>),
}

fn join_errors(errors: &[SourceError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Results of one gather round, kept per source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatheredData {
    pub weather: Option<WeatherBundle>,
    pub lodging: Vec<Lodging>,
    pub attractions: Vec<Attraction>,
    pub flights: Vec<Flight>,
    pub errors: Vec<SourceError>,
}

/// Text of a caught panic payload
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Await one provider call under a timeout, turning any failure into a marker
async fn fetch<T, F>(source: DataSource, limit: Duration, call: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let result = match AssertUnwindSafe(tokio::time::timeout(limit, call)).catch_unwind().await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ProviderError::Timeout(limit)),
        Err(panic) => Err(ProviderError::Panicked(panic_message(panic.as_ref()))),
    };

    result.map_err(|e| {
        warn!(%source, timed_out = e.is_timeout(), error = %e, "Data source failed");
        SourceError {
            source,
            message: e.to_string(),
        }
    })
}

/// Run all four lookups for the trip concurrently
pub async fn gather_trip_data(
    caps: &Capabilities,
    state: &TripState,
    call_timeout: Duration,
) -> Result<GatheredData, AggregationError> {
    debug!(destination = %state.destination, dates = %state.travel_dates, "gather_trip_data: called");
    if state.destination.is_empty() {
        debug!("gather_trip_data: no destination");
        return Err(AggregationError::MissingDestination);
    }

    let dates = parse_travel_dates(&state.travel_dates);
    let flight_date = match &dates {
        Ok((start, _)) => *start,
        Err(_) => chrono::Utc::now().date_naive(),
    };

    let weather = async {
        match &dates {
            Ok((start, end)) => {
                fetch(
                    DataSource::Weather,
                    call_timeout,
                    caps.weather.forecast(&state.destination, *start, *end),
                )
                .await
            }
            Err(e) => Err(SourceError {
                source: DataSource::Weather,
                message: format!("Invalid travel dates: {}", e),
            }),
        }
    };
    let lodging = fetch(
        DataSource::Lodging,
        call_timeout,
        caps.lodging.find(&state.destination, state.budget),
    );
    let attractions = fetch(
        DataSource::Attractions,
        call_timeout,
        caps.attractions.find(&state.destination, &state.preferences),
    );
    let flights = fetch(
        DataSource::Flights,
        call_timeout,
        caps.flights
            .find(&state.origin, &state.destination, flight_date, state.budget),
    );

    let (weather, lodging, attractions, flights) = tokio::join!(weather, lodging, attractions, flights);

    let mut data = GatheredData::default();
    match weather {
        Ok(bundle) => data.weather = Some(bundle),
        Err(e) => data.errors.push(e),
    }
    match lodging {
        Ok(options) => data.lodging = options,
        Err(e) => data.errors.push(e),
    }
    match attractions {
        Ok(options) => data.attractions = options,
        Err(e) => data.errors.push(e),
    }
    match flights {
        Ok(options) => data.flights = options,
        Err(e) => data.errors.push(e),
    }

    if data.errors.len() == 4 {
        return Err(AggregationError::AllSourcesFailed(data.errors));
    }

    info!(
        destination = %state.destination,
        weather = data.weather.is_some(),
        lodging = data.lodging.len(),
        attractions = data.attractions.len(),
        flights = data.flights.len(),
        failed = data.errors.len(),
        "Trip data gathered"
    );
    Ok(data)
}
