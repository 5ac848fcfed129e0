//! Air-quality tiering.
//!
//! US AQI is the primary scale; the six-level European AQI is the fallback
//! when the US value is missing or negative. Both map onto five tiers.

use serde::{Deserialize, Serialize};

use crate::types::CurrentConditions;

/// Air-quality tier, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBucket {
    VeryGood,
    Good,
    Moderate,
    Bad,
    VeryBad,
}

/// Chip colour when no tier can be determined
pub const UNKNOWN_COLOR: u32 = 0xFF9E_9E9E;

impl AqiBucket {
    /// Tier for a US AQI reading. Negative or absent values have no tier.
    pub fn from_us_aqi(aqi: Option<i64>) -> Option<Self> {
        match aqi? {
            i64::MIN..=-1 => None,
            0..=50 => Some(Self::VeryGood),
            51..=100 => Some(Self::Good),
            101..=150 => Some(Self::Moderate),
            151..=200 => Some(Self::Bad),
            _ => Some(Self::VeryBad),
        }
    }

    /// Tier for a European AQI level (1 = very good .. 6 = extremely poor).
    pub fn from_european_aqi(level: Option<i64>) -> Option<Self> {
        match level? {
            1 => Some(Self::VeryGood),
            2 => Some(Self::Good),
            3 => Some(Self::Moderate),
            4 => Some(Self::Bad),
            5 | 6 => Some(Self::VeryBad),
            _ => None,
        }
    }

    /// US AQI first, European AQI as fallback.
    ///
    /// Fractional readings are truncated toward zero.
    pub fn classify(us_aqi: Option<f64>, european_aqi: Option<f64>) -> Option<Self> {
        Self::from_us_aqi(us_aqi.map(truncate))
            .or_else(|| Self::from_european_aqi(european_aqi.map(truncate)))
    }

    pub fn from_conditions(current: &CurrentConditions) -> Option<Self> {
        Self::classify(current.us_aqi, current.european_aqi)
    }

    /// Chip background colour (ARGB)
    pub fn color(self) -> u32 {
        match self {
            Self::VeryBad => 0xFFD3_2F2F,
            Self::Bad => 0xFFF4_4336,
            Self::Moderate => 0xFFFF_C107,
            Self::Good => 0xFF66_BB6A,
            Self::VeryGood => 0xFF2E_7D32,
        }
    }

    /// Black text on the amber chip, white elsewhere
    pub fn text_color(self) -> u32 {
        match self {
            Self::Moderate => 0xFF00_0000,
            _ => 0xFFFF_FFFF,
        }
    }
}

fn truncate(v: f64) -> i64 {
    // `as` saturates and maps NaN to 0
    v.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_aqi_thresholds() {
        assert_eq!(AqiBucket::from_us_aqi(Some(0)), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::from_us_aqi(Some(50)), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::from_us_aqi(Some(51)), Some(AqiBucket::Good));
        assert_eq!(AqiBucket::from_us_aqi(Some(100)), Some(AqiBucket::Good));
        assert_eq!(AqiBucket::from_us_aqi(Some(101)), Some(AqiBucket::Moderate));
        assert_eq!(AqiBucket::from_us_aqi(Some(150)), Some(AqiBucket::Moderate));
        assert_eq!(AqiBucket::from_us_aqi(Some(151)), Some(AqiBucket::Bad));
        assert_eq!(AqiBucket::from_us_aqi(Some(200)), Some(AqiBucket::Bad));
        assert_eq!(AqiBucket::from_us_aqi(Some(201)), Some(AqiBucket::VeryBad));
        assert_eq!(AqiBucket::from_us_aqi(Some(500)), Some(AqiBucket::VeryBad));
    }

    #[test]
    fn test_us_aqi_negative_or_absent_is_unknown() {
        assert_eq!(AqiBucket::from_us_aqi(Some(-1)), None);
        assert_eq!(AqiBucket::from_us_aqi(None), None);
    }

    #[test]
    fn test_european_levels() {
        assert_eq!(AqiBucket::from_european_aqi(Some(1)), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::from_european_aqi(Some(2)), Some(AqiBucket::Good));
        assert_eq!(AqiBucket::from_european_aqi(Some(3)), Some(AqiBucket::Moderate));
        assert_eq!(AqiBucket::from_european_aqi(Some(4)), Some(AqiBucket::Bad));
        assert_eq!(AqiBucket::from_european_aqi(Some(5)), Some(AqiBucket::VeryBad));
        assert_eq!(AqiBucket::from_european_aqi(Some(6)), Some(AqiBucket::VeryBad));
        assert_eq!(AqiBucket::from_european_aqi(Some(0)), None);
        assert_eq!(AqiBucket::from_european_aqi(Some(7)), None);
    }

    #[test]
    fn test_classify_falls_back_to_european() {
        assert_eq!(AqiBucket::classify(None, Some(1.0)), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::classify(Some(-5.0), Some(6.0)), Some(AqiBucket::VeryBad));
        assert_eq!(AqiBucket::classify(Some(42.0), Some(6.0)), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::classify(None, None), None);
    }

    #[test]
    fn test_classify_truncates_fractions() {
        assert_eq!(AqiBucket::classify(Some(50.9), None), Some(AqiBucket::VeryGood));
        assert_eq!(AqiBucket::classify(Some(-0.5), None), Some(AqiBucket::VeryGood));
    }

    #[test]
    fn test_contrast_color() {
        assert_eq!(AqiBucket::Moderate.text_color(), 0xFF00_0000);
        assert_eq!(AqiBucket::Bad.text_color(), 0xFFFF_FFFF);
        assert_ne!(AqiBucket::Good.color(), UNKNOWN_COLOR);
    }
}
