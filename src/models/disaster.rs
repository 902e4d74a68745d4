//! Supported disaster types

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DisasterWatchError;

/// The fixed set of disaster types the service can assess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisasterType {
    Earthquake,
    Flood,
    Wildfire,
    Hurricane,
}

impl DisasterType {
    pub const ALL: [DisasterType; 4] = [
        DisasterType::Earthquake,
        DisasterType::Flood,
        DisasterType::Wildfire,
        DisasterType::Hurricane,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DisasterType::Earthquake => "earthquake",
            DisasterType::Flood => "flood",
            DisasterType::Wildfire => "wildfire",
            DisasterType::Hurricane => "hurricane",
        }
    }

    /// Time-series disasters are predicted per day; the others are a
    /// single lookup against regional terrain.
    #[must_use]
    pub fn is_time_series(self) -> bool {
        matches!(self, DisasterType::Earthquake | DisasterType::Hurricane)
    }
}

impl FromStr for DisasterType {
    type Err = DisasterWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisasterType::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DisasterWatchError::unsupported(s))
    }
}

impl Display for DisasterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("earthquake", DisasterType::Earthquake)]
    #[case("flood", DisasterType::Flood)]
    #[case("Wildfire", DisasterType::Wildfire)]
    #[case(" hurricane ", DisasterType::Hurricane)]
    fn test_parse_known_types(#[case] tag: &str, #[case] expected: DisasterType) {
        assert_eq!(tag.parse::<DisasterType>().unwrap(), expected);
    }

    #[rstest]
    #[case("tsunami")]
    #[case("")]
    #[case("floods")]
    fn test_parse_unknown_types(#[case] tag: &str) {
        let err = tag.parse::<DisasterType>().unwrap_err();
        assert!(matches!(
            err,
            DisasterWatchError::UnsupportedDisasterType { tag: ref t } if t == tag
        ));
    }

    #[test]
    fn test_time_series_split() {
        assert!(DisasterType::Earthquake.is_time_series());
        assert!(DisasterType::Hurricane.is_time_series());
        assert!(!DisasterType::Flood.is_time_series());
        assert!(!DisasterType::Wildfire.is_time_series());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for disaster in DisasterType::ALL {
            assert_eq!(disaster.to_string().parse::<DisasterType>().unwrap(), disaster);
        }
    }
}
