//! Four-tier health status classification.
//!
//! Shared by soil health scores and spectral health percentages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) for `Excellent`.
pub const EXCELLENT_THRESHOLD: f64 = 80.0;
/// Lower bound (inclusive) for `Good`.
pub const GOOD_THRESHOLD: f64 = 60.0;
/// Lower bound (inclusive) for `Fair`.
pub const FAIR_THRESHOLD: f64 = 40.0;

/// Health tier derived from a 0-100 score or percentage.
///
/// Variants are declared worst-first so the derived `Ord` follows the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Poor => "poor",
            HealthStatus::Fair => "fair",
            HealthStatus::Good => "good",
            HealthStatus::Excellent => "excellent",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a score or percentage.
///
/// - >= 80: Excellent
/// - >= 60: Good
/// - >= 40: Fair
/// - otherwise (including NaN): Poor
pub fn classify_health(value: f64) -> HealthStatus {
    match value {
        v if v >= EXCELLENT_THRESHOLD => HealthStatus::Excellent,
        v if v >= GOOD_THRESHOLD => HealthStatus::Good,
        v if v >= FAIR_THRESHOLD => HealthStatus::Fair,
        _ => HealthStatus::Poor,
    }
}
