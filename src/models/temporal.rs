use crate::scoring::{TemporalTrendPoint, TrendDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Analysis window a temporal point belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::SixMonths => f.write_str("6M"),
            Period::OneYear => f.write_str("1Y"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// mm
    pub rainfall: f64,
}

/// Direction relative to the preceding point of the same field and period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    pub vegetation_trend: TrendDirection,
    pub moisture_trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalRecord {
    pub id: Uuid,
    pub field_id: Uuid,
    pub period: Period,
    /// 0-100
    pub vegetation_health: f64,
    /// 0-100
    pub moisture: f64,
    pub environmental_conditions: EnvironmentalConditions,
    pub measurement_date: DateTime<Utc>,
    pub trend_data: TrendData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TemporalTrendPoint for TemporalRecord {
    fn vegetation_health(&self) -> f64 {
        self.vegetation_health
    }

    fn moisture(&self) -> f64 {
        self.moisture
    }

    fn temperature(&self) -> f64 {
        self.environmental_conditions.temperature
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemporalRecord {
    /// Field document id or field code
    pub field_id: Option<String>,
    pub period: Option<Period>,
    pub vegetation_health: Option<f64>,
    pub moisture: Option<f64>,
    pub environmental_conditions: Option<EnvironmentalConditions>,
    pub measurement_date: Option<DateTime<Utc>>,
}
