//! Process-wide application context
//!
//! Reference data, models and the telemetry source are loaded once at
//! startup and shared read-only by every request.

use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::config::DisasterWatchConfig;
use crate::evacuation::EvacuationPlanner;
use crate::geospatial::GeospatialIndex;
use crate::risk::{FeatureBuilder, RiskModelRegistry, RiskPredictionOrchestrator, SeededTelemetry, TelemetrySource};

#[derive(Clone)]
pub struct AppContext {
    pub index: Arc<GeospatialIndex>,
    pub registry: Arc<RiskModelRegistry>,
    pub telemetry: Arc<dyn TelemetrySource>,
    pub max_time_window: u32,
    pub default_time_window: u32,
    pub max_alternates: usize,
}

impl AppContext {
    /// Load datasets and models; any failure here aborts startup
    pub fn from_config(config: &DisasterWatchConfig) -> Result<Self> {
        let index = GeospatialIndex::load(&config.data.regions, &config.data.shelters, &config.data.routes)?;
        let registry = RiskModelRegistry::load(&config.models.paths())?;
        info!("Telemetry seed: {}", config.telemetry.seed);

        Ok(Self::new(
            Arc::new(index),
            Arc::new(registry),
            Arc::new(SeededTelemetry::new(config.telemetry.seed)),
            config,
        ))
    }

    /// Assemble a context from already loaded parts
    pub fn new(
        index: Arc<GeospatialIndex>,
        registry: Arc<RiskModelRegistry>,
        telemetry: Arc<dyn TelemetrySource>,
        config: &DisasterWatchConfig,
    ) -> Self {
        Self {
            index,
            registry,
            telemetry,
            max_time_window: config.defaults.max_time_window_days,
            default_time_window: config.defaults.time_window_days,
            max_alternates: config.defaults.max_alternates,
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> RiskPredictionOrchestrator {
        RiskPredictionOrchestrator::new(
            Arc::clone(&self.registry),
            FeatureBuilder::new(Arc::clone(&self.index), Arc::clone(&self.telemetry)),
            self.max_time_window,
        )
    }

    #[must_use]
    pub fn planner(&self) -> EvacuationPlanner {
        EvacuationPlanner::new(Arc::clone(&self.index), self.max_alternates)
    }
}
