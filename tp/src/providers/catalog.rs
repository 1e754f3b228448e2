//! Offline catalog search for lodging, attractions and flights
//!
//! Generates plausible candidates without any network access. Output is
//! deterministic: each search seeds its RNG from the destination (and for
//! flights the route and date), so the same request always yields the same
//! candidates.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{AttractionSearch, FlightSearch, LodgingSearch, ProviderError};
use crate::domain::{Attraction, Flight, Lodging};

const LODGING_COUNT: usize = 6;
const FLIGHT_COUNT: usize = 5;

/// Lodging tiers: category, nightly price range, amenities
const LODGING_TIERS: &[(&str, (f64, f64), &[&str])] = &[
    ("budget", (35.0, 90.0), &["Free WiFi", "24-hour front desk", "Shared lounge"]),
    ("mid-range", (90.0, 200.0), &["Free WiFi", "Pool", "Fitness center", "Restaurant"]),
    ("luxury", (200.0, 450.0), &["Spa", "Pool", "Concierge", "Fine dining", "Room service"]),
];

const LODGING_PREFIXES: &[&str] = &["Grand", "Harbor", "Old Town", "Garden", "Central", "Riverside", "Royal", "Plaza"];
const LODGING_SUFFIXES: &[&str] = &["Hotel", "Inn", "Suites", "Residence", "Guesthouse", "Lodge"];

/// Attraction templates: category, name pattern, price range, description
const ATTRACTION_TEMPLATES: &[(&str, &str, &str, &str)] = &[
    ("Historical", "{} Old Town", "Free", "Cobbled streets and centuries-old landmarks"),
    ("Cultural", "{} Museum of Art", "$$", "Regional and international collections"),
    ("Nature", "{} Botanical Garden", "$", "Shaded paths and native plants"),
    ("Beach", "{} Beachfront", "Free", "Sand, promenade and sunset views"),
    ("Food", "{} Central Market", "$", "Local produce and street food stalls"),
    ("Shopping", "{} Shopping Quarter", "$$", "Boutiques, crafts and design stores"),
    ("Religious", "{} Cathedral", "Free", "Historic place of worship with guided tours"),
    ("Nature", "{} Viewpoint Hike", "Free", "Panoramic views over the city"),
    ("General", "{} Walking Tour", "$", "Guided introduction to the city's neighborhoods"),
];

/// Preference keywords and the attraction categories they favor
const PREFERENCE_CATEGORIES: &[(&str, &str)] = &[
    ("beach", "Beach"),
    ("culture", "Cultural"),
    ("cultural", "Cultural"),
    ("museum", "Cultural"),
    ("art", "Cultural"),
    ("nature", "Nature"),
    ("hiking", "Nature"),
    ("outdoor", "Nature"),
    ("shopping", "Shopping"),
    ("religious", "Religious"),
    ("history", "Historical"),
    ("historical", "Historical"),
    ("food", "Food"),
    ("cuisine", "Food"),
];

const AIRLINES: &[&str] = &["Atlas Air", "Meridian", "Northwind", "Coastal Jet", "SkyWays", "Polar Express"];

/// Deterministic offline search for lodging, attractions and flights
#[derive(Debug, Clone, Default)]
pub struct CatalogSearch;

impl CatalogSearch {
    pub fn new() -> Self {
        Self
    }
}

/// FNV-1a over the lowercased parts, so seeds are stable across runs and platforms
fn seed_for(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.trim().to_lowercase().bytes().chain(std::iter::once(0xff)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
    }
    hash
}

fn round_price(price: f64) -> f64 {
    price.round()
}

fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

fn require_location(location: &str) -> Result<&str, ProviderError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(ProviderError::InvalidRequest("location is empty".to_string()));
    }
    Ok(location)
}

fn categories_for(preferences: &BTreeSet<String>) -> BTreeSet<&'static str> {
    preferences
        .iter()
        .flat_map(|p| {
            let p = p.to_lowercase();
            PREFERENCE_CATEGORIES
                .iter()
                .filter(move |(keyword, _)| p.contains(keyword))
                .map(|(_, category)| *category)
        })
        .collect()
}

#[async_trait]
impl LodgingSearch for CatalogSearch {
    /// Up to six stays across the three tiers; options whose single night
    /// already exceeds the whole budget are left out unless that would leave
    /// fewer than three
    async fn find(&self, location: &str, budget: f64) -> Result<Vec<Lodging>, ProviderError> {
        debug!(%location, %budget, "CatalogSearch::find lodging: called");
        let location = require_location(location)?;
        let mut rng = StdRng::seed_from_u64(seed_for(&[location, "lodging"]));

        let mut options: Vec<Lodging> = (0..LODGING_COUNT)
            .map(|i| {
                let (category, (low, high), amenities) = LODGING_TIERS[i % LODGING_TIERS.len()];
                let prefix = LODGING_PREFIXES.choose(&mut rng).copied().unwrap_or("Central");
                let suffix = LODGING_SUFFIXES.choose(&mut rng).copied().unwrap_or("Hotel");
                let name = format!("{} {} {}", location, prefix, suffix);
                Lodging {
                    description: format!("A {} stay in {} with {}", category, location, amenities.join(", ")),
                    name,
                    price_per_night: round_price(rng.random_range(low..high)),
                    rating: round_rating(rng.random_range(3.2..4.9)),
                    amenities: amenities.iter().map(|a| a.to_string()).collect(),
                    category: category.to_string(),
                }
            })
            .collect();

        options.sort_by(|a, b| a.price_per_night.total_cmp(&b.price_per_night));
        let affordable = options.iter().filter(|l| l.price_per_night <= budget).count();
        options.truncate(affordable.max(3));

        debug!(count = options.len(), "CatalogSearch::find lodging: generated");
        Ok(options)
    }
}

#[async_trait]
impl AttractionSearch for CatalogSearch {
    /// Attractions in categories matching the preferences come first
    async fn find(&self, location: &str, preferences: &BTreeSet<String>) -> Result<Vec<Attraction>, ProviderError> {
        debug!(%location, ?preferences, "CatalogSearch::find attractions: called");
        let location = require_location(location)?;
        let mut rng = StdRng::seed_from_u64(seed_for(&[location, "attractions"]));
        let favored = categories_for(preferences);

        let mut attractions: Vec<Attraction> = ATTRACTION_TEMPLATES
            .iter()
            .map(|(category, pattern, price_range, description)| Attraction {
                name: pattern.replace("{}", location),
                category: category.to_string(),
                rating: round_rating(rng.random_range(3.8..4.9)),
                price_range: price_range.to_string(),
                description: description.to_string(),
            })
            .collect();

        // Stable sort keeps template order within each group
        attractions.sort_by_key(|a| !favored.contains(a.category.as_str()));

        debug!(count = attractions.len(), favored = favored.len(), "CatalogSearch::find attractions: generated");
        Ok(attractions)
    }
}

#[async_trait]
impl FlightSearch for CatalogSearch {
    /// Five offers sorted by price; offers above the budget are dropped
    /// unless that would leave fewer than two
    async fn find(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
        budget: f64,
    ) -> Result<Vec<Flight>, ProviderError> {
        debug!(%origin, %destination, %date, %budget, "CatalogSearch::find flights: called");
        let origin = require_location(origin)?;
        let destination = require_location(destination)?;
        let date_key = date.to_string();
        let mut rng = StdRng::seed_from_u64(seed_for(&[origin, destination, &date_key]));

        let mut flights: Vec<Flight> = (0..FLIGHT_COUNT)
            .map(|_| {
                let airline = AIRLINES.choose(&mut rng).copied().unwrap_or("Atlas Air");
                let code: String = airline
                    .split_whitespace()
                    .filter_map(|w| w.chars().next())
                    .chain(airline.chars().skip(1))
                    .take(2)
                    .collect::<String>()
                    .to_uppercase();
                let layovers = rng.random_range(0..=2u32);
                let minutes = rng.random_range(60..=600u32) + layovers * 90;
                let departure = rng.random_range(5 * 60..22 * 60u32);
                let arrival = (departure + minutes) % (24 * 60);
                let base = 120.0 + f64::from(minutes) * 0.9;

                Flight {
                    airline: airline.to_string(),
                    flight_number: format!("{}{}", code, rng.random_range(100..1000u32)),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    price: round_price(base * rng.random_range(0.8..1.4) - f64::from(layovers) * 40.0),
                    departure_time: format!("{:02}:{:02}", departure / 60, departure % 60),
                    arrival_time: format!("{:02}:{:02}", arrival / 60, arrival % 60),
                    duration: format!("{}h {}m", minutes / 60, minutes % 60),
                    layovers,
                    rating: round_rating(rng.random_range(3.0..4.9)),
                }
            })
            .collect();

        flights.sort_by(|a, b| a.price.total_cmp(&b.price));
        let affordable = flights.iter().filter(|f| f.price <= budget).count();
        flights.truncate(affordable.max(2));

        debug!(count = flights.len(), "CatalogSearch::find flights: generated");
        Ok(flights)
    }
}
