//! Two-point trend detection
//!
//! A trend compares only the first and last samples of a series ordered by
//! measurement time (oldest first). Points in between are ignored.
//!
//! Dead zones:
//! - soil pH: ±0.1
//! - soil moisture, nutrient average, health score: ±5
//! - temporal metrics: none, any nonzero change sets a direction

use crate::utils::round2;
use serde::{Deserialize, Serialize};

pub const PH_DEAD_ZONE: f64 = 0.1;
pub const SOIL_DEAD_ZONE: f64 = 5.0;
pub const TEMPORAL_DEAD_ZONE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl TrendDirection {
    /// Direction of `delta` outside a symmetric dead zone.
    pub fn from_delta(delta: f64, dead_zone: f64) -> Self {
        if delta > dead_zone {
            TrendDirection::Increasing
        } else if delta < -dead_zone {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }
}

/// Direction plus signed change (rounded to 2 decimals)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Trend {
    #[serde(rename = "trend")]
    pub direction: TrendDirection,
    #[serde(rename = "change")]
    pub magnitude: f64,
}

impl Trend {
    pub fn stable() -> Self {
        Trend { direction: TrendDirection::Stable, magnitude: 0.0 }
    }

    /// Trend from `first` to `last`.
    pub fn between(first: f64, last: f64, dead_zone: f64) -> Self {
        let delta = last - first;
        Trend {
            direction: TrendDirection::from_delta(delta, dead_zone),
            magnitude: round2(delta),
        }
    }
}

/// Trend of one metric over an oldest-first series.
pub fn series_trend<T, F>(series: &[T], metric: F, dead_zone: f64) -> Trend
where
    F: Fn(&T) -> f64,
{
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => {
            Trend::between(metric(first), metric(last), dead_zone)
        }
        _ => Trend::stable(),
    }
}

// ============================================================================
// Soil variant
// ============================================================================

/// A soil measurement that can take part in a trend.
pub trait SoilTrendPoint {
    fn ph_level(&self) -> f64;
    fn moisture(&self) -> f64;
    fn nutrient_average(&self) -> f64;
    fn health_score(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilTrends {
    pub ph_level: Trend,
    pub moisture: Trend,
    pub nutrients: Trend,
    pub health_score: Trend,
}

pub fn soil_trends<P: SoilTrendPoint>(series: &[P]) -> SoilTrends {
    SoilTrends {
        ph_level: series_trend(series, |p| p.ph_level(), PH_DEAD_ZONE),
        moisture: series_trend(series, |p| p.moisture(), SOIL_DEAD_ZONE),
        nutrients: series_trend(series, |p| p.nutrient_average(), SOIL_DEAD_ZONE),
        health_score: series_trend(series, |p| p.health_score(), SOIL_DEAD_ZONE),
    }
}

// ============================================================================
// Temporal variant
// ============================================================================

/// A temporal analysis point that can take part in a trend.
pub trait TemporalTrendPoint {
    fn vegetation_health(&self) -> f64;
    fn moisture(&self) -> f64;
    fn temperature(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalTrends {
    pub vegetation_health: Trend,
    pub moisture: Trend,
    pub temperature: Trend,
}

pub fn temporal_trends<P: TemporalTrendPoint>(series: &[P]) -> TemporalTrends {
    TemporalTrends {
        vegetation_health: series_trend(series, |p| p.vegetation_health(), TEMPORAL_DEAD_ZONE),
        moisture: series_trend(series, |p| p.moisture(), TEMPORAL_DEAD_ZONE),
        temperature: series_trend(series, |p| p.temperature(), TEMPORAL_DEAD_ZONE),
    }
}
