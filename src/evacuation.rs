//! Evacuation shelter planning
//!
//! Shelters inside the disaster radius are excluded; the rest are ranked by
//! great-circle distance from the start point, nearest first, with larger
//! capacity breaking exact distance ties.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::geospatial::GeospatialIndex;
use crate::models::{DisasterType, EvacuationPlan, EvacuationRequest, Location, Shelter, ShelterCandidate};
use crate::{DisasterWatchError, Result};

/// Number of alternates returned when not configured otherwise
pub const DEFAULT_MAX_ALTERNATES: usize = 3;

pub struct EvacuationPlanner {
    index: Arc<GeospatialIndex>,
    max_alternates: usize,
}

impl EvacuationPlanner {
    pub fn new(index: Arc<GeospatialIndex>, max_alternates: usize) -> Self {
        Self {
            index,
            max_alternates,
        }
    }

    pub fn plan(&self, request: &EvacuationRequest) -> Result<EvacuationPlan> {
        let disaster: DisasterType = request.disaster_type.parse()?;
        request.start_point.validate()?;
        let radius_km = request.disaster_radius;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(DisasterWatchError::validation(format!(
                "disaster_radius must be a positive number of kilometres, got {radius_km}"
            )));
        }

        let mut ranked = rank_candidates(&request.start_point, self.index.all_shelters(), radius_km);
        debug!(
            "{} of {} shelters lie outside {} km of ({})",
            ranked.len(),
            self.index.all_shelters().len(),
            radius_km,
            request.start_point.format_coordinates()
        );

        ranked.truncate(self.max_alternates + 1);
        let mut ranked = ranked.into_iter();
        let recommended_shelter = ranked
            .next()
            .ok_or(DisasterWatchError::NoSafeShelterFound { radius_km })?;

        Ok(EvacuationPlan {
            recommended_shelter,
            alternative_shelters: ranked.collect(),
            disaster_type: disaster,
        })
    }
}

/// Shelters strictly farther than `radius_km` from `start`, best first.
///
/// Order is ascending distance, then descending capacity. The sort is
/// stable, so shelters that tie on both keep their dataset order.
pub fn rank_candidates(start: &Location, shelters: &[Shelter], radius_km: f64) -> Vec<ShelterCandidate> {
    let mut candidates: Vec<ShelterCandidate> = shelters
        .iter()
        .map(|shelter| ShelterCandidate {
            distance_km: start.distance_km(&shelter.location),
            shelter: shelter.clone(),
        })
        .filter(|candidate| candidate.distance_km > radius_km)
        .collect();

    candidates.sort_by(|a, b| match a.distance_km.total_cmp(&b.distance_km) {
        Ordering::Equal => b.shelter.capacity.cmp(&a.shelter.capacity),
        other => other,
    });

    candidates
}
