//! Predictive models and their on-disk artifacts
//!
//! A disaster type is predicted either by a time-series predictor (one
//! probability per day) or by a point classifier (one probability for the
//! location). `RiskModel` is the tagged union over the two capabilities.

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::features::{SERIES_FEATURE_WIDTH, SeriesRow, TERRAIN_FEATURE_WIDTH};
use crate::models::DisasterType;
use crate::{DisasterWatchError, Result};

/// Predicts one probability per input row, in input order
pub trait TimeSeriesPredictor: Send + Sync + Debug {
    fn predict(&self, rows: &[SeriesRow]) -> Vec<f64>;
}

/// Predicts the probability of the positive class for one feature vector
pub trait PointClassifier: Send + Sync + Debug {
    fn predict(&self, features: &[f64; TERRAIN_FEATURE_WIDTH]) -> f64;
}

/// A loaded model bound to one disaster type
#[derive(Debug)]
pub enum RiskModel {
    TimeSeries(Box<dyn TimeSeriesPredictor>),
    Scalar(Box<dyn PointClassifier>),
}

impl RiskModel {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RiskModel::TimeSeries(_) => "time-series",
            RiskModel::Scalar(_) => "scalar",
        }
    }

    /// Whether this model variant serves the given disaster type
    #[must_use]
    pub fn serves(&self, disaster: DisasterType) -> bool {
        matches!(self, RiskModel::TimeSeries(_)) == disaster.is_time_series()
    }

    /// Load a model artifact from a JSON file
    pub fn load<P: AsRef<Path>>(disaster: DisasterType, path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading {} model from: {:?}", disaster, path);

        let content = fs::read_to_string(path).map_err(|e| {
            DisasterWatchError::model_unavailable(
                disaster,
                format!("cannot read {}: {e}", path.display()),
            )
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&content).map_err(|e| {
            DisasterWatchError::model_unavailable(
                disaster,
                format!("invalid artifact {}: {e}", path.display()),
            )
        })?;

        artifact.into_model(disaster)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Probabilities are clamped into [0, 1]; NaN maps to 0
pub(crate) fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

fn dot(weights: &[f64], features: &[f64]) -> f64 {
    weights.iter().zip(features).map(|(w, x)| w * x).sum()
}

/// Recurrent logistic unit: `p_t = σ(bias + w·x_t + recurrence·p_{t-1})`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceLogisticModel {
    pub weights: [f64; SERIES_FEATURE_WIDTH],
    pub bias: f64,
    #[serde(default)]
    pub recurrence: f64,
}

impl TimeSeriesPredictor for SequenceLogisticModel {
    fn predict(&self, rows: &[SeriesRow]) -> Vec<f64> {
        let mut previous = 0.0;
        rows.iter()
            .map(|row| {
                let p = clamp_probability(sigmoid(
                    self.bias + dot(&self.weights, row) + self.recurrence * previous,
                ));
                previous = p;
                p
            })
            .collect()
    }
}

/// Logistic regression over terrain features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub weights: [f64; TERRAIN_FEATURE_WIDTH],
    pub bias: f64,
}

impl PointClassifier for LogisticClassifier {
    fn predict(&self, features: &[f64; TERRAIN_FEATURE_WIDTH]) -> f64 {
        clamp_probability(sigmoid(self.bias + dot(&self.weights, features)))
    }
}

/// Serialized model, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    SequenceLogistic(SequenceLogisticModel),
    LogisticClassifier(LogisticClassifier),
}

impl ModelArtifact {
    /// Turn the artifact into a model, checking it suits the disaster type
    pub fn into_model(self, disaster: DisasterType) -> Result<RiskModel> {
        let model = match self {
            ModelArtifact::SequenceLogistic(m) => RiskModel::TimeSeries(Box::new(m)),
            ModelArtifact::LogisticClassifier(m) => RiskModel::Scalar(Box::new(m)),
        };

        if !model.serves(disaster) {
            return Err(DisasterWatchError::model_unavailable(
                disaster,
                format!("artifact is a {} model", model.kind()),
            ));
        }

        Ok(model)
    }
}
