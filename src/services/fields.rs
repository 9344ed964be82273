//! Field records: CRUD plus a status summary

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Field, FieldKey, FieldStatus, FieldUpdate, GeoLocation, NewField, UserId};
use crate::services::validation::{check_range, present_text, sort_newest_first};
use crate::store::Store;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_FIELD_LIMIT: usize = 10;

const REQUIRED: &[&str] = &["fieldId", "name", "location", "area", "cropType", "plantingDate"];

#[derive(Debug, Clone, Default)]
pub struct FieldQuery {
    pub status: Option<FieldStatus>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub total_fields: usize,
    pub active_fields: usize,
    pub inactive_fields: usize,
    pub maintenance_fields: usize,
}

/// A deleted field and how many attached records went with it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeletion {
    pub field: Field,
    pub removed_records: usize,
}

#[derive(Clone)]
pub struct FieldService {
    store: Arc<Store>,
}

impl FieldService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: UserId, input: NewField) -> ServiceResult<Field> {
        let (Some(code), Some(name), Some(location), Some(area), Some(crop_type), Some(planting_date)) = (
            present_text(input.field_id),
            present_text(input.name),
            input.location,
            input.area,
            present_text(input.crop_type),
            input.planting_date,
        ) else {
            return Err(ServiceError::required(REQUIRED));
        };

        check_code(&code)?;
        check_location(&location)?;
        check_area(area)?;

        let now = Utc::now();
        let field = Field {
            id: Uuid::new_v4(),
            field_id: code,
            name,
            location,
            area,
            crop_type,
            planting_date,
            expected_harvest_date: input.expected_harvest_date,
            status: input.status.unwrap_or_default(),
            owner,
            created_at: now,
            updated_at: now,
        };

        let field = self
            .store
            .fields
            .insert_unique(field, |existing, new| {
                existing.owner == new.owner && existing.field_id == new.field_id
            })
            .map_err(|_| ServiceError::Conflict("Field with this ID already exists".to_string()))?;

        tracing::info!("Field {} ({}) created for {}", field.field_id, field.id, owner);
        Ok(field)
    }

    /// Caller's fields, newest first
    pub fn list(&self, owner: UserId, query: &FieldQuery) -> Vec<Field> {
        let mut fields = self
            .store
            .fields
            .find(|f| f.owner == owner && query.status.map_or(true, |s| f.status == s));
        sort_newest_first(&mut fields, |f| f.created_at);
        fields.truncate(query.limit.unwrap_or(DEFAULT_FIELD_LIMIT));
        fields
    }

    pub fn get(&self, owner: UserId, key: &FieldKey) -> ServiceResult<Field> {
        crate::access::owned_field(&self.store, owner, key).map_err(|_| not_found())
    }

    pub fn update(&self, owner: UserId, key: &FieldKey, update: FieldUpdate) -> ServiceResult<Field> {
        let field = self.get(owner, key)?;

        let updated = self
            .store
            .fields
            .try_update(field.id, |current, all| -> ServiceResult<Field> {
                let mut next = current.clone();
                if let Some(code) = present_text(update.field_id) {
                    check_code(&code)?;
                    let taken = all
                        .values()
                        .any(|f| f.owner == owner && f.id != current.id && f.field_id == code);
                    if taken {
                        return Err(ServiceError::Conflict(
                            "Field with this ID already exists".to_string(),
                        ));
                    }
                    next.field_id = code;
                }
                if let Some(name) = present_text(update.name) {
                    next.name = name;
                }
                if let Some(location) = update.location {
                    check_location(&location)?;
                    next.location = location;
                }
                if let Some(area) = update.area {
                    check_area(area)?;
                    next.area = area;
                }
                if let Some(crop_type) = present_text(update.crop_type) {
                    next.crop_type = crop_type;
                }
                if let Some(date) = update.planting_date {
                    next.planting_date = date;
                }
                if update.expected_harvest_date.is_some() {
                    next.expected_harvest_date = update.expected_harvest_date;
                }
                if let Some(status) = update.status {
                    next.status = status;
                }
                next.updated_at = Utc::now();
                Ok(next)
            })
            .ok_or_else(not_found)??;

        tracing::debug!("Field {} updated", updated.id);
        Ok(updated)
    }

    /// Delete a field together with its telemetry, alerts and predictions.
    pub fn delete(&self, owner: UserId, key: &FieldKey) -> ServiceResult<FieldDeletion> {
        let field = self.get(owner, key)?;
        let field = self.store.fields.remove(field.id).ok_or_else(not_found)?;

        let id = field.id;
        let removed_records = self.store.soil_health.remove_where(|r| r.field_id == id)
            + self.store.spectral_health.remove_where(|r| r.field_id == id)
            + self.store.temporal.remove_where(|r| r.field_id == id)
            + self.store.alerts.remove_where(|r| r.field_id == id)
            + self.store.risk_predictions.remove_where(|r| r.field_id == id);

        tracing::info!(
            "Field {} ({}) deleted with {} attached records",
            field.field_id,
            field.id,
            removed_records
        );
        Ok(FieldDeletion { field, removed_records })
    }

    pub fn summary(&self, owner: UserId) -> FieldSummary {
        let fields = self.store.fields.find(|f| f.owner == owner);
        let total_fields = fields.len();
        let active_fields = fields.iter().filter(|f| f.status == FieldStatus::Active).count();
        let inactive_fields = fields.iter().filter(|f| f.status == FieldStatus::Inactive).count();

        FieldSummary {
            total_fields,
            active_fields,
            inactive_fields,
            maintenance_fields: total_fields - active_fields - inactive_fields,
        }
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Field not found".to_string())
}

fn check_location(location: &GeoLocation) -> ServiceResult<()> {
    check_range("location.latitude", location.latitude, -90.0, 90.0)?;
    check_range("location.longitude", location.longitude, -180.0, 180.0)
}

/// Codes share the `FieldKey` namespace with document ids, so a code must
/// never parse as one.
fn check_code(code: &str) -> ServiceResult<()> {
    if Uuid::parse_str(code).is_ok() {
        Err(ServiceError::Validation(format!("fieldId must not be formatted as a UUID (got {})", code)))
    } else {
        Ok(())
    }
}

fn check_area(area: f64) -> ServiceResult<()> {
    if area > 0.0 && area.is_finite() {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!("area must be a positive number of acres (got {})", area)))
    }
}
