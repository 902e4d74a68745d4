//! Risk prediction workflow: validate, build features, infer, assemble

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use super::features::FeatureBuilder;
use super::registry::{RiskModelRegistry, RiskOutput};
use crate::models::{DisasterType, PredictionRequest, RiskAssessment, RiskResult};
use crate::{DisasterWatchError, Result};

pub struct RiskPredictionOrchestrator {
    registry: Arc<RiskModelRegistry>,
    features: FeatureBuilder,
    max_time_window: u32,
}

impl RiskPredictionOrchestrator {
    pub fn new(registry: Arc<RiskModelRegistry>, features: FeatureBuilder, max_time_window: u32) -> Self {
        Self {
            registry,
            features,
            max_time_window,
        }
    }

    /// Predict starting from the current UTC date
    pub fn predict(&self, request: &PredictionRequest) -> Result<RiskResult> {
        self.predict_on(request, Utc::now().date_naive())
    }

    /// Predict with an explicit first forecast day
    pub fn predict_on(&self, request: &PredictionRequest, today: NaiveDate) -> Result<RiskResult> {
        let disaster: DisasterType = request.disaster_type.parse()?;
        request.location.validate()?;
        self.validate_window(request.time_window)?;

        let dates: Vec<NaiveDate> = today
            .iter_days()
            .take(request.time_window as usize)
            .collect();

        debug!(
            "Predicting {} risk at ({}) over {} days from {}",
            disaster,
            request.location.format_coordinates(),
            dates.len(),
            today
        );

        let features = self.features.build(disaster, &request.location, &dates);
        let assessment = match self.registry.predict(disaster, &features)? {
            RiskOutput::Series(risks) => {
                RiskAssessment::Daily(dates.into_iter().zip(risks).collect::<BTreeMap<_, _>>())
            }
            RiskOutput::Scalar(risk) => RiskAssessment::Scalar(risk),
        };

        Ok(RiskResult::new(disaster, assessment))
    }

    fn validate_window(&self, days: u32) -> Result<()> {
        if days == 0 {
            return Err(DisasterWatchError::validation("time_window must be at least 1 day"));
        }
        if days > self.max_time_window {
            return Err(DisasterWatchError::validation(format!(
                "time_window {days} exceeds the maximum of {} days",
                self.max_time_window
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::features::fakes::CountingTelemetry;
    use super::super::features::{SeededTelemetry, TelemetrySource};
    use super::super::models::{LogisticClassifier, RiskModel, SequenceLogisticModel};
    use super::super::registry::fakes::{ConstantClassifier, CountingModel, DayOfYearSeries, registry};
    use super::*;
    use crate::geospatial::GeospatialIndex;
    use crate::geospatial::region::fixtures::{square_region, terrain};
    use crate::models::Location;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 28).unwrap()
    }

    fn index() -> Arc<GeospatialIndex> {
        Arc::new(GeospatialIndex::new(
            vec![square_region("delta", (-76.0, 39.0), (-74.0, 41.0), terrain(3.0))],
            vec![],
            vec![],
        ))
    }

    fn logistic_registry() -> RiskModelRegistry {
        let series = || SequenceLogisticModel {
            weights: [0.01, -0.01, 0.002, 0.3, 0.02],
            bias: -2.5,
            recurrence: 0.8,
        };
        let classifier = || LogisticClassifier {
            weights: [-0.02, -0.4, 3.0],
            bias: 0.5,
        };
        RiskModelRegistry::builder()
            .with(DisasterType::Earthquake, RiskModel::TimeSeries(Box::new(series())))
            .with(DisasterType::Hurricane, RiskModel::TimeSeries(Box::new(series())))
            .with(DisasterType::Flood, RiskModel::Scalar(Box::new(classifier())))
            .with(DisasterType::Wildfire, RiskModel::Scalar(Box::new(classifier())))
            .build()
            .unwrap()
    }

    fn orchestrator(registry: RiskModelRegistry, telemetry: Arc<dyn TelemetrySource>) -> RiskPredictionOrchestrator {
        RiskPredictionOrchestrator::new(Arc::new(registry), FeatureBuilder::new(index(), telemetry), 30)
    }

    #[rstest]
    #[case("earthquake", 40.0, -75.0)]
    #[case("hurricane", -89.9, 179.9)]
    #[case("flood", 40.0, -75.0)]
    #[case("flood", 10.0, 10.0)]
    #[case("wildfire", 39.5, -75.5)]
    #[case("wildfire", 90.0, -180.0)]
    fn test_probabilities_are_in_unit_interval(#[case] disaster: &str, #[case] lat: f64, #[case] lon: f64) {
        let orchestrator = orchestrator(logistic_registry(), Arc::new(SeededTelemetry::new(42)));
        let request = PredictionRequest::new(Location::new(lat, lon), disaster, 10);

        let result = orchestrator.predict_on(&request, today()).unwrap();
        let probabilities = result.assessment.probabilities();
        assert!(!probabilities.is_empty());
        for p in probabilities {
            assert!((0.0..=1.0).contains(&p), "{disaster}: {p}");
        }
        assert_eq!(result.unit, "probability");
    }

    #[test]
    fn test_series_covers_consecutive_days_from_today() {
        let orchestrator = orchestrator(
            RiskModelRegistry::builder()
                .with(DisasterType::Earthquake, RiskModel::TimeSeries(Box::new(DayOfYearSeries)))
                .with(DisasterType::Hurricane, RiskModel::TimeSeries(Box::new(DayOfYearSeries)))
                .with(DisasterType::Flood, RiskModel::Scalar(Box::new(ConstantClassifier(0.5))))
                .with(DisasterType::Wildfire, RiskModel::Scalar(Box::new(ConstantClassifier(0.5))))
                .build()
                .unwrap(),
            Arc::new(CountingTelemetry::default()),
        );
        let request = PredictionRequest::new(Location::new(35.0, 139.0), "Earthquake", 7);

        let result = orchestrator.predict_on(&request, today()).unwrap();
        let RiskAssessment::Daily(risks) = result.assessment else {
            panic!("expected daily risks");
        };

        let dates: Vec<NaiveDate> = risks.keys().copied().collect();
        let expected: Vec<NaiveDate> = today().iter_days().take(7).collect();
        assert_eq!(dates, expected);
        assert_eq!(dates[4], NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        // Values stay attached to their own day
        assert_eq!(risks[&today()], 363.0 / 366.0);
        assert_eq!(risks[&dates[4]], 1.0 / 366.0);
    }

    #[test]
    fn test_unsupported_disaster_fails_before_feature_work() {
        let telemetry = Arc::new(CountingTelemetry::default());
        let model = CountingModel::default();
        let orchestrator = orchestrator(model.registry(), telemetry.clone());

        // Invalid location and window too: the tag is checked first
        let request = PredictionRequest::new(Location::new(500.0, 0.0), "tsunami", 0);
        let err = orchestrator.predict_on(&request, today()).unwrap_err();

        assert!(matches!(err, DisasterWatchError::UnsupportedDisasterType { ref tag } if tag == "tsunami"));
        assert_eq!(telemetry.calls(), 0);
        assert_eq!(model.calls(), 0);

        // The same orchestrator does reach the model for a supported type
        let request = PredictionRequest::new(Location::new(35.0, 139.0), "earthquake", 3);
        orchestrator.predict_on(&request, today()).unwrap();
        assert_eq!(model.calls(), 1);
    }

    #[test]
    fn test_flood_outside_every_region_is_zero() {
        let orchestrator = orchestrator(registry(0.5, 0.9), Arc::new(SeededTelemetry::new(42)));
        let request = PredictionRequest::new(Location::new(-33.9, 18.4), "flood", 7);

        let result = orchestrator.predict_on(&request, today()).unwrap();
        assert_eq!(result.assessment, RiskAssessment::Scalar(0.0));
    }

    #[test]
    fn test_lookup_disaster_never_consults_telemetry() {
        let telemetry = Arc::new(CountingTelemetry::default());
        let orchestrator = orchestrator(registry(0.5, 0.9), telemetry.clone());
        let request = PredictionRequest::new(Location::new(40.0, -75.0), "wildfire", 7);

        let result = orchestrator.predict_on(&request, today()).unwrap();
        assert_eq!(result.assessment, RiskAssessment::Scalar(0.9));
        assert_eq!(telemetry.calls(), 0);
    }

    #[rstest]
    #[case(Location::new(91.0, 0.0), 7)]
    #[case(Location::new(0.0, -180.5), 7)]
    #[case(Location::new(f64::NAN, 0.0), 7)]
    #[case(Location::new(0.0, 0.0), 0)]
    #[case(Location::new(0.0, 0.0), 31)]
    fn test_invalid_requests_are_rejected(#[case] location: Location, #[case] window: u32) {
        let orchestrator = orchestrator(registry(0.5, 0.5), Arc::new(CountingTelemetry::default()));
        let request = PredictionRequest::new(location, "hurricane", window);

        let err = orchestrator.predict_on(&request, today()).unwrap_err();
        assert!(matches!(err, DisasterWatchError::Validation { .. }));
    }

    #[test]
    fn test_identical_requests_give_identical_results() {
        let orchestrator = orchestrator(logistic_registry(), Arc::new(SeededTelemetry::new(42)));
        let request = PredictionRequest::new(Location::new(25.76, -80.19), "hurricane", 14);

        let first = orchestrator.predict_on(&request, today()).unwrap();
        let second = orchestrator.predict_on(&request, today()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_predict_starts_today() {
        let orchestrator = orchestrator(registry(0.5, 0.5), Arc::new(CountingTelemetry::default()));
        let request = PredictionRequest::new(Location::new(0.0, 0.0), "earthquake", 1);

        let result = orchestrator.predict(&request).unwrap();
        let RiskAssessment::Daily(risks) = result.assessment else {
            panic!("expected daily risks");
        };
        let first = *risks.keys().next().unwrap();
        let now = Utc::now().date_naive();
        assert!(first == now || first.succ_opt() == Some(now));
    }
}
