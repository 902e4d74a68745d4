//! Shelter and evacuation plan models

use serde::{Deserialize, Serialize};

use super::{DisasterType, Location};

/// An evacuation shelter from the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelter {
    pub id: String,
    pub location: Location,
    /// Number of people the shelter can take in (always positive)
    pub capacity: u32,
}

/// Request for the nearest safe shelter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvacuationRequest {
    pub start_point: Location,
    /// Raw disaster tag as received
    pub disaster_type: String,
    /// Exclusion radius in kilometres
    pub disaster_radius: f64,
}

impl EvacuationRequest {
    #[must_use]
    pub fn new(start_point: Location, disaster_type: impl Into<String>, disaster_radius: f64) -> Self {
        Self {
            start_point,
            disaster_type: disaster_type.into(),
            disaster_radius,
        }
    }
}

/// A shelter together with its distance from the evacuation start point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShelterCandidate {
    #[serde(flatten)]
    pub shelter: Shelter,
    pub distance_km: f64,
}

/// Recommended shelter plus ordered alternates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvacuationPlan {
    pub recommended_shelter: ShelterCandidate,
    pub alternative_shelters: Vec<ShelterCandidate>,
    pub disaster_type: DisasterType,
}

impl EvacuationPlan {
    /// Recommended shelter followed by the alternates, in rank order
    pub fn shelters(&self) -> impl Iterator<Item = &ShelterCandidate> {
        std::iter::once(&self.recommended_shelter).chain(self.alternative_shelters.iter())
    }
}
