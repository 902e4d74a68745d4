//! Geospatial reference data
//!
//! This module owns the read-only reference datasets loaded at startup:
//! - Regions with terrain attributes, indexed by an R-tree over their bounding boxes
//! - Evacuation shelters with capacity
//! - Evacuation route geometries
//!
//! Regions are assumed not to overlap. When they do, or when a point sits on
//! a shared boundary, the region that comes first in the dataset wins.

pub mod loader;
pub mod region;

use std::path::Path;

use rstar::{AABB, RTree};
use tracing::{debug, info, warn};

use crate::Result;
use crate::models::{Location, Shelter};
use region::RegionEnvelope;

pub use loader::DatasetLoader;
pub use region::{Region, RouteGeometry, TerrainAttributes};

/// Immutable index over regions, shelters and routes
pub struct GeospatialIndex {
    regions: Vec<Region>,
    region_tree: RTree<RegionEnvelope>,
    shelters: Vec<Shelter>,
    routes: Vec<RouteGeometry>,
}

impl GeospatialIndex {
    #[must_use]
    pub fn new(regions: Vec<Region>, shelters: Vec<Shelter>, routes: Vec<RouteGeometry>) -> Self {
        let envelopes = regions
            .iter()
            .enumerate()
            .filter_map(|(index, region)| {
                let entry = RegionEnvelope::new(index, region);
                if entry.is_none() {
                    warn!("Region {} has an empty geometry and will never match", region.id);
                }
                entry
            })
            .collect();

        Self {
            region_tree: RTree::bulk_load(envelopes),
            regions,
            shelters,
            routes,
        }
    }

    /// Load all three datasets from GeoJSON files
    pub fn load(regions: &Path, shelters: &Path, routes: &Path) -> Result<Self> {
        let index = Self::new(
            DatasetLoader::load_regions(regions)?,
            DatasetLoader::load_shelters(shelters)?,
            DatasetLoader::load_routes(routes)?,
        );

        info!(
            "Geospatial index ready: {} regions, {} shelters, {} routes",
            index.regions.len(),
            index.shelters.len(),
            index.routes.len()
        );

        Ok(index)
    }

    /// Region containing the point, first in dataset order on ties
    #[must_use]
    pub fn find_containing_region(&self, location: &Location) -> Option<&Region> {
        let point_envelope = AABB::from_point([location.longitude, location.latitude]);

        let mut candidates: Vec<usize> = self
            .region_tree
            .locate_in_envelope_intersecting(&point_envelope)
            .map(|entry| entry.index)
            .collect();
        candidates.sort_unstable();

        let region = candidates
            .into_iter()
            .map(|index| &self.regions[index])
            .find(|region| region.contains(location));

        debug!(
            "Region lookup at ({}): {:?}",
            location.format_coordinates(),
            region.map(|r| &r.id)
        );

        region
    }

    #[must_use]
    pub fn all_shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn routes(&self) -> &[RouteGeometry] {
        &self.routes
    }

    /// Great-circle distance in kilometres
    #[must_use]
    pub fn distance_km(&self, from: &Location, to: &Location) -> f64 {
        from.distance_km(to)
    }
}
