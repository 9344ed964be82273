//! Document types stored by the monitor
//!
//! Every stored record carries a UUID `id`. Telemetry records reference their
//! field by the field's document id (`fieldId` on the wire); the human field
//! code such as "A-1" lives on `Field::field_id`.
//!
//! `New*` structs are create inputs. Their required members are `Option`s so
//! that absence can be reported as a validation error instead of a parse error.

pub mod alert;
pub mod field;
pub mod risk;
pub mod soil_health;
pub mod spectral_health;
pub mod temporal;
pub mod user;

pub use alert::{Alert, AlertMetadata, AlertStatus, AlertType, NewAlert, Severity};
pub use field::{Field, FieldRef, FieldStatus, FieldUpdate, GeoLocation, NewField};
pub use risk::{
    NewRiskPrediction, RiskFactors, RiskLevel, RiskPrediction, RiskRecommendation, RiskType,
    TimeHorizon,
};
pub use soil_health::{NewSoilHealth, SoilHealthRecord, SoilRecommendation, SoilType};
pub use spectral_health::{NewSpectralHealth, SensorIndices, SpectralHealthRecord, SpectralHealthUpdate};
pub use temporal::{EnvironmentalConditions, NewTemporalRecord, Period, TemporalRecord, TrendData};
pub use user::{Credentials, NewUser, User, UserProfile};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the calling user, passed explicitly to every service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        UserId(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a caller addresses a field: by document id or by field code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Id(Uuid),
    Code(String),
}

impl FieldKey {
    /// Anything that parses as a UUID is a document id, the rest is a code.
    pub fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => FieldKey::Id(id),
            Err(_) => FieldKey::Code(raw.trim().to_string()),
        }
    }

    pub fn matches(&self, field: &Field) -> bool {
        match self {
            FieldKey::Id(id) => field.id == *id,
            FieldKey::Code(code) => field.field_id == *code,
        }
    }
}

impl From<&str> for FieldKey {
    fn from(raw: &str) -> Self {
        FieldKey::parse(raw)
    }
}

impl From<Uuid> for FieldKey {
    fn from(id: Uuid) -> Self {
        FieldKey::Id(id)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Id(id) => id.fmt(f),
            FieldKey::Code(code) => f.write_str(code),
        }
    }
}

/// Position of a zone on the field grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    /// Grouping key used by the zone maps, e.g. "10-15"
    pub fn grid_key(&self) -> String {
        format!("{}-{}", self.x, self.y)
    }
}

/// Recommendation urgency. Declared lowest-first so `Ord` ranks urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}
