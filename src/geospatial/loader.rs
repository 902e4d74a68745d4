//! GeoJSON reference dataset loading
//!
//! Reads the region, shelter and evacuation-route datasets from
//! GeoJSON FeatureCollections. Individual malformed features are skipped
//! with a warning; a file that yields nothing but errors is rejected.

use std::fs;
use std::path::Path;

use geo::{Geometry, MultiLineString, MultiPolygon};
use geojson::{Feature, GeoJson, feature::Id};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use super::region::{Region, RouteGeometry, TerrainAttributes};
use crate::models::{Location, Shelter};
use crate::{DisasterWatchError, Result};

/// Loader for the three reference datasets
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load administrative regions with terrain attributes
    pub fn load_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>> {
        let content = Self::read(path.as_ref(), "regions")?;
        Self::parse_regions(&content)
    }

    /// Load evacuation shelters
    pub fn load_shelters<P: AsRef<Path>>(path: P) -> Result<Vec<Shelter>> {
        let content = Self::read(path.as_ref(), "shelters")?;
        Self::parse_shelters(&content)
    }

    /// Load evacuation route geometries
    pub fn load_routes<P: AsRef<Path>>(path: P) -> Result<Vec<RouteGeometry>> {
        let content = Self::read(path.as_ref(), "routes")?;
        Self::parse_routes(&content)
    }

    pub fn parse_regions(content: &str) -> Result<Vec<Region>> {
        Self::parse_features(content, "regions", |index, feature| {
            let geometry = match Self::geometry(feature)? {
                Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
                Geometry::MultiPolygon(multi) => multi,
                _ => return Err("region geometry must be a Polygon or MultiPolygon".to_string()),
            };

            Ok(Region {
                id: Self::feature_id(feature).unwrap_or_else(|| format!("region_{index}")),
                name: feature
                    .property("name")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string),
                geometry,
                terrain: TerrainAttributes {
                    elevation: Self::number(feature, "elevation")?,
                    river_dist: Self::number(feature, "river_dist")?,
                    soil_moisture: Self::number(feature, "soil_moisture")?,
                },
            })
        })
    }

    pub fn parse_shelters(content: &str) -> Result<Vec<Shelter>> {
        Self::parse_features(content, "shelters", |_, feature| {
            let point = match Self::geometry(feature)? {
                Geometry::Point(point) => point,
                _ => return Err("shelter geometry must be a Point".to_string()),
            };
            let location = Location::from(point);
            location.validate().map_err(|e| e.to_string())?;

            let id = Self::feature_id(feature).ok_or("shelter has no id")?;
            let capacity = feature
                .property("capacity")
                .and_then(JsonValue::as_u64)
                .and_then(|c| u32::try_from(c).ok())
                .filter(|c| *c > 0)
                .ok_or_else(|| format!("shelter {id} needs a positive integer capacity"))?;

            Ok(Shelter {
                id,
                location,
                capacity,
            })
        })
    }

    pub fn parse_routes(content: &str) -> Result<Vec<RouteGeometry>> {
        Self::parse_features(content, "routes", |_, feature| {
            let geometry = match Self::geometry(feature)? {
                Geometry::LineString(line) => MultiLineString::new(vec![line]),
                Geometry::MultiLineString(multi) => multi,
                _ => return Err("route geometry must be a LineString or MultiLineString".to_string()),
            };

            Ok(RouteGeometry {
                id: Self::feature_id(feature),
                geometry,
            })
        })
    }

    fn read(path: &Path, dataset: &str) -> Result<String> {
        info!("Loading {} from: {:?}", dataset, path);

        if !path.exists() {
            return Err(DisasterWatchError::dataset(format!(
                "{dataset} file not found: {}",
                path.display()
            )));
        }

        Ok(fs::read_to_string(path)?)
    }

    fn parse_features<T>(
        content: &str,
        dataset: &str,
        convert: impl Fn(usize, &Feature) -> std::result::Result<T, String>,
    ) -> Result<Vec<T>> {
        let geojson: GeoJson = content.parse().map_err(|e| {
            DisasterWatchError::dataset(format!("Failed to parse {dataset} GeoJSON: {e}"))
        })?;

        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(DisasterWatchError::dataset(format!(
                    "{dataset} must be a FeatureCollection, found a bare geometry"
                )));
            }
        };

        let mut records = Vec::with_capacity(features.len());
        let mut parse_errors = 0;

        for (index, feature) in features.iter().enumerate() {
            match convert(index, feature) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping {} feature {}: {}", dataset, index, e);
                    parse_errors += 1;
                }
            }
        }

        info!(
            "Loaded {} {} ({} parse errors)",
            records.len(),
            dataset,
            parse_errors
        );

        if records.is_empty() && parse_errors > 0 {
            return Err(DisasterWatchError::dataset(format!(
                "No valid {dataset} could be parsed"
            )));
        }

        Ok(records)
    }

    fn geometry(feature: &Feature) -> std::result::Result<Geometry<f64>, String> {
        let geometry = feature.geometry.as_ref().ok_or("feature has no geometry")?;
        Geometry::<f64>::try_from(&geometry.value).map_err(|e| e.to_string())
    }

    /// `id` property first, then the feature's own id member
    fn feature_id(feature: &Feature) -> Option<String> {
        let from_property = feature.property("id").and_then(|value| match value {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        });

        from_property.or_else(|| {
            feature.id.as_ref().map(|id| match id {
                Id::String(s) => s.clone(),
                Id::Number(n) => n.to_string(),
            })
        })
    }

    fn number(feature: &Feature, key: &str) -> std::result::Result<f64, String> {
        feature
            .property(key)
            .and_then(JsonValue::as_f64)
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("missing numeric property '{key}'"))
    }
}
