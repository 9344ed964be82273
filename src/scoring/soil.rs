//! Weighted soil health score
//!
//! healthScore = round(0.3 × phScore + 0.4 × moistureScore + 0.3 × nutrientScore)
//!
//! - phScore: 100 at pH 6.5, minus 10 points per pH unit of deviation, floored at 0
//! - moistureScore: the moisture percentage as-is
//! - nutrientScore: mean of nitrogen, phosphorus and potassium
//!
//! Inputs are expected inside their documented ranges (pH 0-14, everything else
//! 0-100). Range checks belong to the caller; out-of-range readings still produce a
//! number, it just carries no meaning (negative moisture drags the score below 0).

use crate::scoring::status::{classify_health, HealthStatus};
use serde::{Deserialize, Serialize};

/// pH at which the pH component is maximal.
pub const OPTIMAL_PH: f64 = 6.5;
/// Points lost per pH unit of deviation from `OPTIMAL_PH`.
pub const PH_PENALTY_PER_UNIT: f64 = 10.0;

pub const PH_WEIGHT: f64 = 0.3;
pub const MOISTURE_WEIGHT: f64 = 0.4;
pub const NUTRIENT_WEIGHT: f64 = 0.3;

/// The five measurements that feed the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilReading {
    pub ph_level: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl SoilReading {
    pub fn new(ph_level: f64, moisture: f64, nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self { ph_level, moisture, nitrogen, phosphorus, potassium }
    }

    /// Mean of N, P and K
    pub fn nutrient_average(&self) -> f64 {
        (self.nitrogen + self.phosphorus + self.potassium) / 3.0
    }
}

/// Component scores behind a soil health score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilScoreBreakdown {
    pub ph_score: f64,
    pub moisture_score: f64,
    pub nutrient_score: f64,
    /// Weighted total, rounded half away from zero
    pub health_score: f64,
    pub health_status: HealthStatus,
}

/// pH component: 100 − |pH − 6.5| × 10, never below 0.
pub fn ph_score(ph_level: f64) -> f64 {
    (100.0 - (ph_level - OPTIMAL_PH).abs() * PH_PENALTY_PER_UNIT).max(0.0)
}

/// Soil health score for raw inputs.
pub fn soil_health_score(ph_level: f64, moisture: f64, nitrogen: f64, phosphorus: f64, potassium: f64) -> f64 {
    score_soil(&SoilReading::new(ph_level, moisture, nitrogen, phosphorus, potassium)).health_score
}

/// Score a reading and classify the result.
pub fn score_soil(reading: &SoilReading) -> SoilScoreBreakdown {
    let ph = ph_score(reading.ph_level);
    let moisture = reading.moisture;
    let nutrients = reading.nutrient_average();

    let weighted = ph * PH_WEIGHT + moisture * MOISTURE_WEIGHT + nutrients * NUTRIENT_WEIGHT;
    let health_score = weighted.round();

    SoilScoreBreakdown {
        ph_score: ph,
        moisture_score: moisture,
        nutrient_score: nutrients,
        health_score,
        health_status: classify_health(health_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_sample() {
        // Zone A-1 fixture: ph 6.8, moisture 72, N/P/K 85/78/92
        let breakdown = score_soil(&SoilReading::new(6.8, 72.0, 85.0, 78.0, 92.0));
        assert_relative_eq!(breakdown.ph_score, 97.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.moisture_score, 72.0);
        assert_relative_eq!(breakdown.nutrient_score, 85.0, epsilon = 1e-9);
        assert_eq!(breakdown.health_score, 83.0);
        assert_eq!(breakdown.health_status, HealthStatus::Excellent);
    }

    #[test]
    fn test_optimal_ph_gets_full_component() {
        assert_eq!(ph_score(OPTIMAL_PH), 100.0);
        // 0.3 × 100 + 0.4 × 0 + 0.3 × 0
        assert_eq!(soil_health_score(6.5, 0.0, 0.0, 0.0, 0.0), 30.0);
        assert_eq!(soil_health_score(6.5, 100.0, 100.0, 100.0, 100.0), 100.0);
    }

    #[test]
    fn test_ph_component_clamps_at_zero() {
        assert_eq!(ph_score(16.5), 0.0);
        assert_eq!(ph_score(-3.5), 0.0);
        assert_eq!(ph_score(0.0), 35.0);
        assert_eq!(soil_health_score(16.5, 100.0, 100.0, 100.0, 100.0), 70.0);
    }

    #[test]
    fn test_symmetric_in_ph_distance() {
        for d in [0.3, 1.25, 2.0, 5.0, 10.0] {
            assert_eq!(
                soil_health_score(OPTIMAL_PH + d, 50.0, 50.0, 50.0, 50.0),
                soil_health_score(OPTIMAL_PH - d, 50.0, 50.0, 50.0, 50.0),
                "asymmetric at d = {}",
                d
            );
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // ph 6.5, moisture 0, nutrients all 5: 30 + 0 + 1.5 = 31.5
        assert_eq!(soil_health_score(6.5, 0.0, 5.0, 5.0, 5.0), 32.0);
    }

    #[test]
    fn test_out_of_range_is_consistent_not_fatal() {
        // ph at optimum, moisture -100: 30 - 40 + 0 = -10
        let score = soil_health_score(6.5, -100.0, 0.0, 0.0, 0.0);
        assert_eq!(score, -10.0);
        assert_eq!(classify_health(score), HealthStatus::Poor);
    }
}
