use crate::models::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: Uuid,
    /// Field code, unique per owner (e.g. "A-1")
    pub field_id: String,
    pub name: String,
    pub location: GeoLocation,
    /// Acres
    pub area: f64,
    pub crop_type: String,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: FieldStatus,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Field {
    pub fn reference(&self) -> FieldRef {
        FieldRef {
            id: self.id,
            field_id: self.field_id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Short field description embedded in alert listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    pub id: Uuid,
    pub field_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewField {
    pub field_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<GeoLocation>,
    pub area: Option<f64>,
    pub crop_type: Option<String>,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: Option<FieldStatus>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<GeoLocation>,
    pub area: Option<f64>,
    pub crop_type: Option<String>,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub status: Option<FieldStatus>,
}
