//! Feature construction for the risk models
//!
//! Time-series disasters get one row per forecast day:
//! `[latitude, longitude, day_of_year, telemetry_a, telemetry_b]`.
//! Lookup disasters get the terrain attributes of the containing region,
//! or nothing when the point lies outside every region.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use tracing::debug;

use crate::geospatial::{GeospatialIndex, TerrainAttributes};
use crate::models::{DisasterType, Location};

/// Width of a time-series feature row
pub const SERIES_FEATURE_WIDTH: usize = 5;

/// Width of a terrain feature vector
pub const TERRAIN_FEATURE_WIDTH: usize = 3;

pub type SeriesRow = [f64; SERIES_FEATURE_WIDTH];

/// Live-telemetry readings that fill the last two slots of a series row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Earthquake: seismic activity index. Hurricane: sea-surface temperature anomaly (°C).
    pub primary: f64,
    /// Earthquake: hypocentre depth (km). Hurricane: central pressure deficit (hPa).
    pub secondary: f64,
}

/// Source of the telemetry slots for time-series features
pub trait TelemetrySource: Send + Sync {
    fn sample(&self, disaster: DisasterType, location: &Location, date: NaiveDate) -> TelemetrySample;
}

/// Deterministic synthetic telemetry.
///
/// Each sample is drawn from a `StdRng` whose seed is mixed from the
/// configured seed, the disaster type, the coordinates and the date with
/// [`telemetry_seed`]. The mix is fixed, so the same inputs produce the same
/// sample on every build. Primary values fall in `[0, 10)`,
/// secondary values in `[0, 100)`.
#[derive(Debug, Clone)]
pub struct SeededTelemetry {
    seed: u64,
}

impl SeededTelemetry {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, disaster: DisasterType, location: &Location, date: NaiveDate) -> StdRng {
        StdRng::seed_from_u64(telemetry_seed(self.seed, disaster, location, date))
    }
}

/// Seed for one telemetry draw, folded through the splitmix64 finalizer
#[must_use]
pub fn telemetry_seed(seed: u64, disaster: DisasterType, location: &Location, date: NaiveDate) -> u64 {
    let disaster_code: u64 = match disaster {
        DisasterType::Earthquake => 0,
        DisasterType::Flood => 1,
        DisasterType::Wildfire => 2,
        DisasterType::Hurricane => 3,
    };
    [
        seed,
        disaster_code,
        location.latitude.to_bits(),
        location.longitude.to_bits(),
        i64::from(date.num_days_from_ce()) as u64,
    ]
    .into_iter()
    .fold(0, splitmix)
}

fn splitmix(state: u64, value: u64) -> u64 {
    let mut z = (state ^ value).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl TelemetrySource for SeededTelemetry {
    fn sample(&self, disaster: DisasterType, location: &Location, date: NaiveDate) -> TelemetrySample {
        let mut rng = self.rng_for(disaster, location, date);
        TelemetrySample {
            primary: rng.random_range(0.0..10.0),
            secondary: rng.random_range(0.0..100.0),
        }
    }
}

/// Model input for one request
#[derive(Debug, Clone, PartialEq)]
pub enum Features {
    /// One row per day, in request order
    Series(Vec<SeriesRow>),
    /// Terrain of the containing region
    Terrain([f64; TERRAIN_FEATURE_WIDTH]),
    /// The point lies outside every known region
    NoRegion,
}

/// Builds model features from requests and reference data
pub struct FeatureBuilder {
    index: Arc<GeospatialIndex>,
    telemetry: Arc<dyn TelemetrySource>,
}

impl FeatureBuilder {
    pub fn new(index: Arc<GeospatialIndex>, telemetry: Arc<dyn TelemetrySource>) -> Self {
        Self { index, telemetry }
    }

    pub fn build(&self, disaster: DisasterType, location: &Location, dates: &[NaiveDate]) -> Features {
        if disaster.is_time_series() {
            Features::Series(self.series_features(disaster, location, dates))
        } else {
            match self.terrain_features(location) {
                Some(terrain) => Features::Terrain(terrain.as_features()),
                None => Features::NoRegion,
            }
        }
    }

    fn series_features(
        &self,
        disaster: DisasterType,
        location: &Location,
        dates: &[NaiveDate],
    ) -> Vec<SeriesRow> {
        debug!("Building {} feature rows for {}", dates.len(), disaster);

        dates
            .iter()
            .map(|date| {
                let telemetry = self.telemetry.sample(disaster, location, *date);
                [
                    location.latitude,
                    location.longitude,
                    f64::from(date.ordinal()),
                    telemetry.primary,
                    telemetry.secondary,
                ]
            })
            .collect()
    }

    fn terrain_features(&self, location: &Location) -> Option<TerrainAttributes> {
        self.index
            .find_containing_region(location)
            .map(|region| region.terrain)
    }
}
