//! Reference geometry records held by the geospatial index

use geo::{BoundingRect, Intersects, MultiLineString, MultiPolygon};
use rstar::{AABB, RTreeObject};

use crate::models::Location;

/// Terrain attributes of an administrative region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainAttributes {
    /// Mean elevation in metres
    pub elevation: f64,
    /// Distance to the nearest river in kilometres
    pub river_dist: f64,
    /// Volumetric soil moisture
    pub soil_moisture: f64,
}

impl TerrainAttributes {
    /// Feature vector in the order the lookup models expect
    #[must_use]
    pub fn as_features(&self) -> [f64; 3] {
        [self.elevation, self.river_dist, self.soil_moisture]
    }
}

/// An administrative region: polygon plus terrain
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
    pub terrain: TerrainAttributes,
}

impl Region {
    /// Boundary points count as contained
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        self.geometry.intersects(&location.to_point())
    }
}

/// An evacuation route geometry
#[derive(Debug, Clone)]
pub struct RouteGeometry {
    pub id: Option<String>,
    pub geometry: MultiLineString<f64>,
}

/// R-tree entry pointing back at a region by its dataset position
#[derive(Debug, Clone)]
pub(crate) struct RegionEnvelope {
    pub index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RegionEnvelope {
    pub fn new(index: usize, region: &Region) -> Option<Self> {
        let rect = region.geometry.bounding_rect()?;
        Some(Self {
            index,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        })
    }
}

impl RTreeObject for RegionEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use geo::{LineString, Polygon};

    use super::*;

    /// Axis-aligned square region from (min_lon, min_lat) to (max_lon, max_lat)
    pub fn square_region(id: &str, min: (f64, f64), max: (f64, f64), terrain: TerrainAttributes) -> Region {
        let ring = LineString::from(vec![
            (min.0, min.1),
            (max.0, min.1),
            (max.0, max.1),
            (min.0, max.1),
            (min.0, min.1),
        ]);
        Region {
            id: id.to_string(),
            name: None,
            geometry: MultiPolygon::new(vec![Polygon::new(ring, vec![])]),
            terrain,
        }
    }

    pub fn terrain(elevation: f64) -> TerrainAttributes {
        TerrainAttributes {
            elevation,
            river_dist: 1.5,
            soil_moisture: 0.3,
        }
    }
}
