use crate::models::{Priority, UserId};
use crate::scoring::{HealthStatus, SoilReading, SoilTrendPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Sandy,
    Loamy,
    Silty,
    Peaty,
    Chalky,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

/// Soil measurement for one zone. `health_score` and `health_status` are
/// always derived from the five scored readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilHealthRecord {
    pub id: Uuid,
    pub field_id: Uuid,
    pub zone_id: String,
    pub ph_level: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub organic_matter: Option<f64>,
    pub soil_temperature: Option<f64>,
    pub soil_type: Option<SoilType>,
    pub health_score: f64,
    pub health_status: HealthStatus,
    pub measurement_date: DateTime<Utc>,
    pub recommendations: Vec<SoilRecommendation>,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SoilHealthRecord {
    pub fn reading(&self) -> SoilReading {
        SoilReading::new(self.ph_level, self.moisture, self.nitrogen, self.phosphorus, self.potassium)
    }
}

impl SoilTrendPoint for SoilHealthRecord {
    fn ph_level(&self) -> f64 {
        self.ph_level
    }

    fn moisture(&self) -> f64 {
        self.moisture
    }

    fn nutrient_average(&self) -> f64 {
        self.reading().nutrient_average()
    }

    fn health_score(&self) -> f64 {
        self.health_score
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSoilHealth {
    /// Field document id or field code
    pub field_id: Option<String>,
    pub zone_id: Option<String>,
    pub ph_level: Option<f64>,
    pub moisture: Option<f64>,
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub organic_matter: Option<f64>,
    pub soil_temperature: Option<f64>,
    pub soil_type: Option<SoilType>,
    #[serde(default)]
    pub recommendations: Vec<SoilRecommendation>,
    pub measurement_date: Option<DateTime<Utc>>,
}
