use crate::error::{AqiError, Result};
use crate::utils::constants::{
    AQI_GOOD_MAX, AQI_MODERATE_MAX, AQI_UNHEALTHY_MAX, AQI_UNHEALTHY_SENSITIVE_MAX,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Five ordinal AQI tiers, ordered by ascending severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Moderate")]
    Moderate,
    #[serde(rename = "Unhealthy (Sensitive)")]
    UnhealthySensitive,
    #[serde(rename = "Unhealthy")]
    Unhealthy,
    #[serde(rename = "Hazardous")]
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 5] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthySensitive,
        AqiCategory::Unhealthy,
        AqiCategory::Hazardous,
    ];

    /// Map a pollutant average onto its tier. Each cutoff belongs to the
    /// less severe side, so 50.0 is `Good` and 200.0 is `Unhealthy`.
    /// NaN has no tier.
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value <= AQI_GOOD_MAX {
            Some(AqiCategory::Good)
        } else if value <= AQI_MODERATE_MAX {
            Some(AqiCategory::Moderate)
        } else if value <= AQI_UNHEALTHY_SENSITIVE_MAX {
            Some(AqiCategory::UnhealthySensitive)
        } else if value <= AQI_UNHEALTHY_MAX {
            Some(AqiCategory::Unhealthy)
        } else {
            Some(AqiCategory::Hazardous)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy (Sensitive)",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Severity rank, 0 for `Good` through 4 for `Hazardous`
    pub fn severity(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AqiCategory {
    type Err = AqiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        AqiCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AqiError::Config(format!("Unknown AQI category: '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tiers() {
        assert_eq!(AqiCategory::classify(10.0), Some(AqiCategory::Good));
        assert_eq!(AqiCategory::classify(60.0), Some(AqiCategory::Moderate));
        assert_eq!(
            AqiCategory::classify(120.0),
            Some(AqiCategory::UnhealthySensitive)
        );
        assert_eq!(AqiCategory::classify(180.0), Some(AqiCategory::Unhealthy));
        assert_eq!(AqiCategory::classify(210.0), Some(AqiCategory::Hazardous));
    }

    #[test]
    fn test_boundaries_resolve_to_lower_severity() {
        assert_eq!(AqiCategory::classify(50.0), Some(AqiCategory::Good));
        assert_eq!(AqiCategory::classify(100.0), Some(AqiCategory::Moderate));
        assert_eq!(
            AqiCategory::classify(150.0),
            Some(AqiCategory::UnhealthySensitive)
        );
        assert_eq!(AqiCategory::classify(200.0), Some(AqiCategory::Unhealthy));

        assert_eq!(AqiCategory::classify(50.0001), Some(AqiCategory::Moderate));
        assert_eq!(AqiCategory::classify(200.0001), Some(AqiCategory::Hazardous));
    }

    #[test]
    fn test_classify_nan_and_extremes() {
        assert_eq!(AqiCategory::classify(f64::NAN), None);
        assert_eq!(AqiCategory::classify(0.0), Some(AqiCategory::Good));
        assert_eq!(
            AqiCategory::classify(f64::INFINITY),
            Some(AqiCategory::Hazardous)
        );
    }

    #[test]
    fn test_ordering_follows_severity() {
        let mut sorted = AqiCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, AqiCategory::ALL);
        assert!(AqiCategory::Good < AqiCategory::Hazardous);
        assert_eq!(AqiCategory::Hazardous.severity(), 4);
    }

    #[test]
    fn test_label_round_trip() {
        for category in AqiCategory::ALL {
            assert_eq!(category.label().parse::<AqiCategory>().unwrap(), category);
        }
        assert!("Severe".parse::<AqiCategory>().is_err());
    }
}
