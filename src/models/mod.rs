//! Data models for the DisasterWatch service
//!
//! This module contains the core domain models organized by concern:
//! - Location: WGS84 coordinates and great-circle distance
//! - Disaster: the supported disaster types
//! - Risk: prediction requests and normalized results
//! - Evacuation: shelters, evacuation requests and plans

pub mod disaster;
pub mod evacuation;
pub mod location;
pub mod risk;

// Re-export all public types for convenient access
pub use disaster::DisasterType;
pub use evacuation::{EvacuationPlan, EvacuationRequest, Shelter, ShelterCandidate};
pub use location::Location;
pub use risk::{PredictionRequest, RiskAssessment, RiskResult};
