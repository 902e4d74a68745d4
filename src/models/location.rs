//! Location model for WGS84 coordinates

use geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

use crate::{DisasterWatchError, Result};

/// A point on the earth's surface
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    #[serde(rename = "lat", alias = "latitude")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lon", alias = "longitude")]
    pub longitude: f64,
}

impl Location {
    /// Create a new location without range checks
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a location, rejecting coordinates outside the WGS84 ranges
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self> {
        let location = Self::new(latitude, longitude);
        location.validate()?;
        Ok(location)
    }

    /// Check -90 <= lat <= 90 and -180 <= lon <= 180
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DisasterWatchError::validation(format!(
                "latitude {} must be within [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DisasterWatchError::validation(format!(
                "longitude {} must be within [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Geometry point (x = longitude, y = latitude)
    #[must_use]
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Great-circle distance to another location in kilometres
    #[must_use]
    pub fn distance_km(&self, other: &Location) -> f64 {
        Haversine::distance(self.to_point(), other.to_point()) / 1000.0
    }
}

impl From<Point<f64>> for Location {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}
