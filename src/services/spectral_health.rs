//! NDVI spectral readings: zone map, history and summary

use crate::access::{field_if_owned, owned_field, owned_field_raw};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Coordinates, FieldKey, NewSpectralHealth, SpectralHealthRecord, SpectralHealthUpdate, UserId,
};
use crate::scoring::{classify_health, HealthStatus};
use crate::services::validation::{check_range, present_text, sort_newest_first};
use crate::store::Store;
use crate::utils::{count_distinct, first_per_key, mean_or_zero, tally};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_MAP_LIMIT: usize = 50;
pub const DEFAULT_SPECTRAL_HISTORY_LIMIT: usize = 10;

const REQUIRED: &[&str] = &["fieldId", "zoneId", "ndviValue", "healthPercentage", "coordinates"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralZone {
    pub zone_id: String,
    pub health_percentage: f64,
    pub health_status: HealthStatus,
    pub coordinates: Coordinates,
    pub measurement_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralMap {
    pub field_id: String,
    pub field_name: String,
    pub spectral_map: Vec<SpectralZone>,
    pub total_zones: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralZoneHistory {
    pub field_id: String,
    pub zone_id: String,
    pub data: Vec<SpectralHealthRecord>,
}

/// Averages are reported unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralSummary {
    pub field_id: String,
    pub field_name: String,
    pub total_zones: usize,
    pub average_health_percentage: f64,
    pub average_ndvi_value: f64,
    pub health_status_distribution: BTreeMap<HealthStatus, usize>,
}

#[derive(Clone)]
pub struct SpectralHealthService {
    store: Arc<Store>,
}

impl SpectralHealthService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: UserId, input: NewSpectralHealth) -> ServiceResult<SpectralHealthRecord> {
        let (Some(field_key), Some(zone_id), Some(ndvi), Some(percentage), Some(coordinates)) = (
            present_text(input.field_id),
            present_text(input.zone_id),
            input.ndvi_value,
            input.health_percentage,
            input.coordinates,
        ) else {
            return Err(ServiceError::required(REQUIRED));
        };

        check_range("ndviValue", ndvi, 0.0, 1.0)?;
        check_range("healthPercentage", percentage, 0.0, 100.0)?;

        let field = owned_field_raw(&self.store, owner, &field_key)?;

        let now = Utc::now();
        let record = self.store.spectral_health.insert(SpectralHealthRecord {
            id: Uuid::new_v4(),
            field_id: field.id,
            zone_id,
            ndvi_value: ndvi,
            health_percentage: percentage,
            health_status: classify_health(percentage),
            coordinates,
            measurement_date: input.measurement_date.unwrap_or(now),
            sensor_data: input.sensor_data,
            created_at: now,
            updated_at: now,
        });

        tracing::debug!(
            "Spectral reading {} for {}/{}: {}% ({})",
            record.id,
            field.field_id,
            record.zone_id,
            record.health_percentage,
            record.health_status
        );
        Ok(record)
    }

    /// Latest reading per zone among the newest `limit` readings
    pub fn map(&self, owner: UserId, key: &FieldKey, limit: Option<usize>) -> ServiceResult<SpectralMap> {
        let field = owned_field(&self.store, owner, key)?;

        let mut records = self.store.spectral_health.find(|r| r.field_id == field.id);
        sort_newest_first(&mut records, |r| r.measurement_date);
        records.truncate(limit.unwrap_or(DEFAULT_MAP_LIMIT));

        let spectral_map: Vec<SpectralZone> = first_per_key(records, |r| r.zone_id.clone())
            .into_iter()
            .map(|r| SpectralZone {
                zone_id: r.zone_id,
                health_percentage: r.health_percentage,
                health_status: r.health_status,
                coordinates: r.coordinates,
                measurement_date: r.measurement_date,
            })
            .collect();

        Ok(SpectralMap {
            field_id: field.field_id,
            field_name: field.name,
            total_zones: spectral_map.len(),
            spectral_map,
        })
    }

    /// Zone history, newest first. An unknown zone yields an empty history.
    pub fn by_zone(
        &self,
        owner: UserId,
        key: &FieldKey,
        zone_id: &str,
        limit: Option<usize>,
    ) -> ServiceResult<SpectralZoneHistory> {
        let field = owned_field(&self.store, owner, key)?;

        let mut data = self
            .store
            .spectral_health
            .find(|r| r.field_id == field.id && r.zone_id == zone_id);
        sort_newest_first(&mut data, |r| r.measurement_date);
        data.truncate(limit.unwrap_or(DEFAULT_SPECTRAL_HISTORY_LIMIT));

        Ok(SpectralZoneHistory {
            field_id: field.field_id,
            zone_id: zone_id.to_string(),
            data,
        })
    }

    pub fn summary(&self, owner: UserId, key: &FieldKey) -> ServiceResult<SpectralSummary> {
        let field = owned_field(&self.store, owner, key)?;
        let records = self.store.spectral_health.find(|r| r.field_id == field.id);

        Ok(SpectralSummary {
            total_zones: count_distinct(records.iter().map(|r| r.zone_id.as_str())),
            average_health_percentage: mean_or_zero(records.iter().map(|r| r.health_percentage)),
            average_ndvi_value: mean_or_zero(records.iter().map(|r| r.ndvi_value)),
            health_status_distribution: tally(records.iter().map(|r| r.health_status)),
            field_id: field.field_id,
            field_name: field.name,
        })
    }

    /// Partial update. The status follows the percentage.
    pub fn update(
        &self,
        owner: UserId,
        record_id: Uuid,
        update: SpectralHealthUpdate,
    ) -> ServiceResult<SpectralHealthRecord> {
        let record = self
            .store
            .spectral_health
            .get(record_id)
            .ok_or_else(not_found)?;
        if field_if_owned(&self.store, owner, record.field_id).is_none() {
            return Err(ServiceError::Forbidden("Access denied".to_string()));
        }

        if let Some(ndvi) = update.ndvi_value {
            check_range("ndviValue", ndvi, 0.0, 1.0)?;
        }
        if let Some(percentage) = update.health_percentage {
            check_range("healthPercentage", percentage, 0.0, 100.0)?;
        }
        let zone_id = present_text(update.zone_id);

        let updated = self
            .store
            .spectral_health
            .update(record_id, |r| {
                if let Some(zone_id) = zone_id {
                    r.zone_id = zone_id;
                }
                if let Some(ndvi) = update.ndvi_value {
                    r.ndvi_value = ndvi;
                }
                if let Some(percentage) = update.health_percentage {
                    r.health_percentage = percentage;
                    r.health_status = classify_health(percentage);
                }
                if let Some(coordinates) = update.coordinates {
                    r.coordinates = coordinates;
                }
                if update.sensor_data.is_some() {
                    r.sensor_data = update.sensor_data;
                }
                if let Some(date) = update.measurement_date {
                    r.measurement_date = date;
                }
                r.updated_at = Utc::now();
            })
            .ok_or_else(not_found)?;

        tracing::debug!("Spectral reading {} updated", updated.id);
        Ok(updated)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Spectral health data not found".to_string())
}
