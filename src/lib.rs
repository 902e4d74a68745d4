//! `DisasterWatch` - Natural disaster risk prediction and evacuation planning
//!
//! This library provides per-location risk prediction for earthquakes,
//! floods, wildfires and hurricanes, and ranks evacuation shelters that lie
//! outside a disaster radius.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod evacuation;
pub mod geospatial;
pub mod logging;
pub mod models;
pub mod risk;
pub mod web;

// Re-export core types for public API
pub use config::DisasterWatchConfig;
pub use context::AppContext;
pub use error::{DisasterWatchError, ErrorCode};
pub use evacuation::EvacuationPlanner;
pub use geospatial::{DatasetLoader, GeospatialIndex, Region};
pub use models::{
    DisasterType, EvacuationPlan, EvacuationRequest, Location, PredictionRequest, RiskAssessment,
    RiskResult, Shelter, ShelterCandidate,
};
pub use risk::{RiskModelRegistry, RiskPredictionOrchestrator, SeededTelemetry, TelemetrySource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DisasterWatchError>;
