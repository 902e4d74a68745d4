//! Risk prediction request and result models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DisasterType, Location};

pub const DEFAULT_TIME_WINDOW_DAYS: u32 = 7;

fn default_time_window() -> u32 {
    DEFAULT_TIME_WINDOW_DAYS
}

/// Request for the risk of one disaster type at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub location: Location,
    /// Raw disaster tag as received; parsed by the orchestrator
    pub disaster_type: String,
    /// Number of days to forecast, starting today
    #[serde(default = "default_time_window")]
    pub time_window: u32,
}

impl PredictionRequest {
    #[must_use]
    pub fn new(location: Location, disaster_type: impl Into<String>, time_window: u32) -> Self {
        Self {
            location,
            disaster_type: disaster_type.into(),
            time_window,
        }
    }
}

/// Model output before it is tied to a disaster type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RiskAssessment {
    /// One probability per day, ascending by date
    #[serde(rename = "risks")]
    Daily(BTreeMap<NaiveDate, f64>),
    /// A single probability for the location
    #[serde(rename = "risk")]
    Scalar(f64),
}

impl RiskAssessment {
    /// All probabilities carried by this assessment
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        match self {
            RiskAssessment::Daily(risks) => risks.values().copied().collect(),
            RiskAssessment::Scalar(risk) => vec![*risk],
        }
    }
}

/// Normalized risk prediction returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub disaster: DisasterType,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub unit: &'static str,
}

impl RiskResult {
    pub const UNIT: &'static str = "probability";

    #[must_use]
    pub fn new(disaster: DisasterType, assessment: RiskAssessment) -> Self {
        Self {
            disaster,
            assessment,
            unit: Self::UNIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_time_window() {
        let request: PredictionRequest = serde_json::from_str(
            r#"{"location": {"lat": 40.0, "lon": -75.0}, "disaster_type": "earthquake"}"#,
        )
        .unwrap();
        assert_eq!(request.time_window, 7);
        assert_eq!(request.disaster_type, "earthquake");
    }

    #[test]
    fn test_daily_result_serialization() {
        let mut risks = BTreeMap::new();
        risks.insert(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 0.25);
        risks.insert(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 0.5);
        let result = RiskResult::new(DisasterType::Earthquake, RiskAssessment::Daily(risks));

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"disaster":"earthquake","risks":{"2024-03-01":0.5,"2024-03-02":0.25},"unit":"probability"}"#
        );
    }

    #[test]
    fn test_scalar_result_serialization() {
        let result = RiskResult::new(DisasterType::Flood, RiskAssessment::Scalar(0.0));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["disaster"], "flood");
        assert_eq!(json["risk"], 0.0);
        assert_eq!(json["unit"], "probability");
    }
}
