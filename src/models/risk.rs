use crate::models::{Coordinates, Priority, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskType {
    Drought,
    Pest,
    Disease,
    Weather,
    Nutrient,
    Equipment,
}

/// Forecast window of a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeHorizon {
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "3days")]
    ThreeDays,
    #[default]
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherFactors {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub rainfall: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilFactors {
    pub moisture: Option<f64>,
    pub ph: Option<f64>,
    pub nutrients: Option<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationFactors {
    pub ndvi: Option<f64>,
    pub health_index: Option<f64>,
}

/// Conditions the prediction was made from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub weather: Option<WeatherFactors>,
    pub soil: Option<SoilFactors>,
    pub vegetation: Option<VegetationFactors>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecommendation {
    pub action: String,
    pub priority: Option<Priority>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPrediction {
    pub id: Uuid,
    pub field_id: Uuid,
    pub zone_id: String,
    pub risk_level: RiskLevel,
    pub risk_type: RiskType,
    /// 0-100
    pub probability: f64,
    /// 0-100
    pub ai_confidence: f64,
    pub coordinates: Coordinates,
    pub prediction_date: DateTime<Utc>,
    pub time_horizon: TimeHorizon,
    pub factors: RiskFactors,
    pub recommendations: Vec<RiskRecommendation>,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRiskPrediction {
    /// Field document id or field code
    pub field_id: Option<String>,
    pub zone_id: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub risk_type: Option<RiskType>,
    pub probability: Option<f64>,
    pub ai_confidence: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub time_horizon: Option<TimeHorizon>,
    #[serde(default)]
    pub factors: RiskFactors,
    #[serde(default)]
    pub recommendations: Vec<RiskRecommendation>,
    pub prediction_date: Option<DateTime<Utc>>,
}
