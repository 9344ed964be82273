use crate::models::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_ALERT_CONFIDENCE: f64 = 85.0;
pub const DEFAULT_ALERT_PRIORITY: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Drought,
    Pest,
    Disease,
    Irrigation,
    Nutrient,
    Weather,
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Active,
    Acknowledged,
    Resolved,
    Dismissed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMetadata {
    pub sensor_data: Option<Value>,
    pub weather_conditions: Option<Value>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    /// Document id of the field
    pub field_id: Uuid,
    pub zone_id: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub status: AlertStatus,
    /// 1 (lowest) to 5
    pub priority: u8,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub ai_confidence: f64,
    pub metadata: AlertMetadata,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    /// Field document id or field code
    pub field_id: Option<String>,
    pub zone_id: Option<String>,
    pub alert_type: Option<AlertType>,
    pub severity: Option<Severity>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u8>,
    pub ai_confidence: Option<f64>,
    pub metadata: Option<AlertMetadata>,
    pub detected_at: Option<DateTime<Utc>>,
}
