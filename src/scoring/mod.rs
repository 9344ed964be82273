//! Health scoring and trend classification
//!
//! Pure functions shared by the soil, spectral and temporal resources:
//! - `soil`: weighted soil health score
//! - `status`: four-tier status from a score or percentage
//! - `trend`: first-vs-last trend per metric
//!
//! Nothing here does I/O or holds state.

pub mod soil;
pub mod status;
pub mod trend;

pub use soil::{ph_score, score_soil, soil_health_score, SoilReading, SoilScoreBreakdown};
pub use status::{classify_health, HealthStatus};
pub use trend::{
    PH_DEAD_ZONE, SOIL_DEAD_ZONE, TEMPORAL_DEAD_ZONE, series_trend, soil_trends, temporal_trends, SoilTrendPoint, SoilTrends, TemporalTrendPoint,
    TemporalTrends, Trend, TrendDirection,
};
