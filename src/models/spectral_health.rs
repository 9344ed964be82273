use crate::models::Coordinates;
use crate::scoring::HealthStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw sensor indices behind an NDVI reading
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorIndices {
    pub vegetation_index: Option<f64>,
    pub moisture_index: Option<f64>,
    pub temperature_index: Option<f64>,
}

/// NDVI health reading for one zone. Ownership follows the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralHealthRecord {
    pub id: Uuid,
    pub field_id: Uuid,
    pub zone_id: String,
    /// 0-1
    pub ndvi_value: f64,
    /// 0-100
    pub health_percentage: f64,
    pub health_status: HealthStatus,
    pub coordinates: Coordinates,
    pub measurement_date: DateTime<Utc>,
    pub sensor_data: Option<SensorIndices>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpectralHealth {
    /// Field document id or field code
    pub field_id: Option<String>,
    pub zone_id: Option<String>,
    pub ndvi_value: Option<f64>,
    pub health_percentage: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub sensor_data: Option<SensorIndices>,
    pub measurement_date: Option<DateTime<Utc>>,
}

/// Partial update of a spectral reading
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralHealthUpdate {
    pub zone_id: Option<String>,
    pub ndvi_value: Option<f64>,
    pub health_percentage: Option<f64>,
    pub coordinates: Option<Coordinates>,
    pub sensor_data: Option<SensorIndices>,
    pub measurement_date: Option<DateTime<Utc>>,
}
