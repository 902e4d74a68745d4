//! Disaster risk prediction
//!
//! - `features`: per-disaster feature construction and the telemetry seam
//! - `models`: time-series and point-classifier models, plus their JSON artifacts
//! - `registry`: one model per disaster type, dispatching features to it
//! - `orchestrator`: the request workflow producing a `RiskResult`

pub mod features;
pub mod models;
pub mod orchestrator;
pub mod registry;

pub use features::{FeatureBuilder, Features, SeededTelemetry, TelemetrySample, TelemetrySource};
pub use models::{
    LogisticClassifier, ModelArtifact, PointClassifier, RiskModel, SequenceLogisticModel,
    TimeSeriesPredictor,
};
pub use orchestrator::RiskPredictionOrchestrator;
pub use registry::{ModelPaths, RiskModelRegistry, RiskModelRegistryBuilder, RiskOutput};
