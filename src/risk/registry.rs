//! Registry binding each disaster type to exactly one loaded model

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use super::features::Features;
use super::models::{RiskModel, clamp_probability};
use crate::models::DisasterType;
use crate::{DisasterWatchError, Result};

/// Artifact locations for the four models
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub earthquake: PathBuf,
    pub flood: PathBuf,
    pub wildfire: PathBuf,
    pub hurricane: PathBuf,
}

impl ModelPaths {
    #[must_use]
    pub fn path_for(&self, disaster: DisasterType) -> &PathBuf {
        match disaster {
            DisasterType::Earthquake => &self.earthquake,
            DisasterType::Flood => &self.flood,
            DisasterType::Wildfire => &self.wildfire,
            DisasterType::Hurricane => &self.hurricane,
        }
    }
}

/// Raw model output, before dates are attached
#[derive(Debug, Clone, PartialEq)]
pub enum RiskOutput {
    Series(Vec<f64>),
    Scalar(f64),
}

#[derive(Debug)]
pub struct RiskModelRegistry {
    models: HashMap<DisasterType, RiskModel>,
}

impl RiskModelRegistry {
    /// Load every model; the first failure aborts
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        let mut builder = Self::builder();
        for disaster in DisasterType::ALL {
            builder = builder.with(disaster, RiskModel::load(disaster, paths.path_for(disaster))?);
        }
        let registry = builder.build()?;
        info!("Loaded {} risk models", registry.models.len());
        Ok(registry)
    }

    #[must_use]
    pub fn builder() -> RiskModelRegistryBuilder {
        RiskModelRegistryBuilder::default()
    }

    pub fn predict(&self, disaster: DisasterType, features: &Features) -> Result<RiskOutput> {
        let model = self.models.get(&disaster).ok_or_else(|| {
            DisasterWatchError::model_unavailable(disaster, "no model registered")
        })?;

        match (model, features) {
            (RiskModel::TimeSeries(predictor), Features::Series(rows)) => {
                let risks = predictor.predict(rows);
                if risks.len() != rows.len() {
                    return Err(DisasterWatchError::inference(
                        disaster,
                        format!("model returned {} values for {} days", risks.len(), rows.len()),
                    ));
                }
                Ok(RiskOutput::Series(risks.into_iter().map(clamp_probability).collect()))
            }
            (RiskModel::Scalar(classifier), Features::Terrain(terrain)) => {
                Ok(RiskOutput::Scalar(clamp_probability(classifier.predict(terrain))))
            }
            (RiskModel::Scalar(_), Features::NoRegion) => Ok(RiskOutput::Scalar(0.0)),
            (model, _) => Err(DisasterWatchError::inference(
                disaster,
                format!("{} model cannot consume these features", model.kind()),
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct RiskModelRegistryBuilder {
    models: HashMap<DisasterType, RiskModel>,
}

impl RiskModelRegistryBuilder {
    #[must_use]
    pub fn with(mut self, disaster: DisasterType, model: RiskModel) -> Self {
        self.models.insert(disaster, model);
        self
    }

    /// Fails if a disaster type has no model or a model of the wrong variant
    pub fn build(self) -> Result<RiskModelRegistry> {
        for disaster in DisasterType::ALL {
            match self.models.get(&disaster) {
                None => {
                    return Err(DisasterWatchError::model_unavailable(
                        disaster,
                        "no model registered",
                    ));
                }
                Some(model) if !model.serves(disaster) => {
                    return Err(DisasterWatchError::model_unavailable(
                        disaster,
                        format!("a {} model cannot serve this disaster type", model.kind()),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(RiskModelRegistry {
            models: self.models,
        })
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::super::features::SeriesRow;
    use super::super::models::{PointClassifier, TimeSeriesPredictor};
    use super::*;

    /// Returns the same probability for every day
    #[derive(Debug)]
    pub struct ConstantSeries(pub f64);

    impl TimeSeriesPredictor for ConstantSeries {
        fn predict(&self, rows: &[SeriesRow]) -> Vec<f64> {
            vec![self.0; rows.len()]
        }
    }

    /// Echoes the day-of-year slot scaled into [0, 1]
    #[derive(Debug)]
    pub struct DayOfYearSeries;

    impl TimeSeriesPredictor for DayOfYearSeries {
        fn predict(&self, rows: &[SeriesRow]) -> Vec<f64> {
            rows.iter().map(|row| row[2] / 366.0).collect()
        }
    }

    #[derive(Debug)]
    pub struct ConstantClassifier(pub f64);

    impl PointClassifier for ConstantClassifier {
        fn predict(&self, _: &[f64; 3]) -> f64 {
            self.0
        }
    }

    /// Counts predictions into a shared counter and returns zeros
    #[derive(Debug, Default, Clone)]
    pub struct CountingModel(pub Arc<AtomicUsize>);

    impl CountingModel {
        pub fn calls(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }

        /// A registry where every disaster type is served by this counter
        pub fn registry(&self) -> RiskModelRegistry {
            RiskModelRegistry::builder()
                .with(DisasterType::Earthquake, RiskModel::TimeSeries(Box::new(self.clone())))
                .with(DisasterType::Hurricane, RiskModel::TimeSeries(Box::new(self.clone())))
                .with(DisasterType::Flood, RiskModel::Scalar(Box::new(self.clone())))
                .with(DisasterType::Wildfire, RiskModel::Scalar(Box::new(self.clone())))
                .build()
                .unwrap()
        }
    }

    impl TimeSeriesPredictor for CountingModel {
        fn predict(&self, rows: &[SeriesRow]) -> Vec<f64> {
            self.0.fetch_add(1, Ordering::SeqCst);
            vec![0.0; rows.len()]
        }
    }

    impl PointClassifier for CountingModel {
        fn predict(&self, _: &[f64; 3]) -> f64 {
            self.0.fetch_add(1, Ordering::SeqCst);
            0.0
        }
    }

    pub fn registry(series: f64, scalar: f64) -> RiskModelRegistry {
        RiskModelRegistry::builder()
            .with(DisasterType::Earthquake, RiskModel::TimeSeries(Box::new(ConstantSeries(series))))
            .with(DisasterType::Hurricane, RiskModel::TimeSeries(Box::new(ConstantSeries(series))))
            .with(DisasterType::Flood, RiskModel::Scalar(Box::new(ConstantClassifier(scalar))))
            .with(DisasterType::Wildfire, RiskModel::Scalar(Box::new(ConstantClassifier(scalar))))
            .build()
            .unwrap()
    }
}
