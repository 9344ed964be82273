//! Soil health readings per zone
//!
//! Score and status are derived on create and never taken from input.

use crate::access::{owned_field, owned_field_raw};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{FieldKey, NewSoilHealth, SoilHealthRecord, UserId};
use crate::scoring::{score_soil, soil_trends, HealthStatus, SoilReading, SoilTrends};
use crate::services::validation::{
    check_optional_range, check_range, present_text, sort_newest_first, sort_oldest_first,
};
use crate::store::Store;
use crate::utils::{count_distinct, first_per_key, mean_or_zero, round2, tally};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_OVERVIEW_LIMIT: usize = 10;
pub const DEFAULT_ZONE_HISTORY_LIMIT: usize = 5;
pub const DEFAULT_TREND_DAYS: u32 = 30;

const REQUIRED: &[&str] = &[
    "fieldId",
    "zoneId",
    "phLevel",
    "moisture",
    "nitrogen",
    "phosphorus",
    "potassium",
];

/// Latest reading of one zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilZoneSnapshot {
    pub zone_id: String,
    pub ph_level: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub health_status: HealthStatus,
    pub health_score: f64,
    pub measurement_date: DateTime<Utc>,
}

impl From<&SoilHealthRecord> for SoilZoneSnapshot {
    fn from(record: &SoilHealthRecord) -> Self {
        SoilZoneSnapshot {
            zone_id: record.zone_id.clone(),
            ph_level: record.ph_level,
            moisture: record.moisture,
            nitrogen: record.nitrogen,
            phosphorus: record.phosphorus,
            potassium: record.potassium,
            health_status: record.health_status,
            health_score: record.health_score,
            measurement_date: record.measurement_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilOverview {
    pub field_id: String,
    pub field_name: String,
    pub soil_overview: Vec<SoilZoneSnapshot>,
    pub total_zones: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilZoneHistory {
    pub field_id: String,
    pub zone_id: String,
    pub data: Vec<SoilHealthRecord>,
}

/// Field-wide soil averages, rounded to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilSummary {
    pub field_id: String,
    pub field_name: String,
    pub total_zones: usize,
    pub average_ph_level: f64,
    pub average_moisture: f64,
    pub average_nitrogen: f64,
    pub average_phosphorus: f64,
    pub average_potassium: f64,
    pub average_health_score: f64,
    pub health_status_distribution: BTreeMap<HealthStatus, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilTrendReport {
    pub field_id: String,
    /// Requested zone, or "all"
    pub zone_id: String,
    /// e.g. "30 days"
    pub period: String,
    /// Oldest first
    pub data: Vec<SoilHealthRecord>,
    pub trends: SoilTrends,
}

#[derive(Clone)]
pub struct SoilHealthService {
    store: Arc<Store>,
}

impl SoilHealthService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: UserId, input: NewSoilHealth) -> ServiceResult<SoilHealthRecord> {
        let (Some(field_key), Some(zone_id), Some(ph), Some(moisture), Some(n), Some(p), Some(k)) = (
            present_text(input.field_id),
            present_text(input.zone_id),
            input.ph_level,
            input.moisture,
            input.nitrogen,
            input.phosphorus,
            input.potassium,
        ) else {
            return Err(ServiceError::required(REQUIRED));
        };

        check_range("phLevel", ph, 0.0, 14.0)?;
        check_range("moisture", moisture, 0.0, 100.0)?;
        check_range("nitrogen", n, 0.0, 100.0)?;
        check_range("phosphorus", p, 0.0, 100.0)?;
        check_range("potassium", k, 0.0, 100.0)?;
        check_optional_range("organicMatter", input.organic_matter, 0.0, 100.0)?;

        let field = owned_field_raw(&self.store, owner, &field_key)?;
        let score = score_soil(&SoilReading::new(ph, moisture, n, p, k));

        let now = Utc::now();
        let record = self.store.soil_health.insert(SoilHealthRecord {
            id: Uuid::new_v4(),
            field_id: field.id,
            zone_id,
            ph_level: ph,
            moisture,
            nitrogen: n,
            phosphorus: p,
            potassium: k,
            organic_matter: input.organic_matter,
            soil_temperature: input.soil_temperature,
            soil_type: input.soil_type,
            health_score: score.health_score,
            health_status: score.health_status,
            measurement_date: input.measurement_date.unwrap_or(now),
            recommendations: input.recommendations,
            owner,
            created_at: now,
            updated_at: now,
        });

        tracing::debug!(
            "Soil reading {} for {}/{}: score {} ({})",
            record.id,
            field.field_id,
            record.zone_id,
            record.health_score,
            record.health_status
        );
        Ok(record)
    }

    /// Latest reading per zone among the newest `limit` readings
    pub fn overview(&self, owner: UserId, key: &FieldKey, limit: Option<usize>) -> ServiceResult<SoilOverview> {
        let field = owned_field(&self.store, owner, key)?;

        let mut records = self.store.soil_health.find(|r| r.field_id == field.id);
        sort_newest_first(&mut records, |r| r.measurement_date);
        records.truncate(limit.unwrap_or(DEFAULT_OVERVIEW_LIMIT));

        let soil_overview: Vec<SoilZoneSnapshot> = first_per_key(records, |r| r.zone_id.clone())
            .iter()
            .map(SoilZoneSnapshot::from)
            .collect();

        Ok(SoilOverview {
            field_id: field.field_id,
            field_name: field.name,
            total_zones: soil_overview.len(),
            soil_overview,
        })
    }

    pub fn by_zone(
        &self,
        owner: UserId,
        key: &FieldKey,
        zone_id: &str,
        limit: Option<usize>,
    ) -> ServiceResult<SoilZoneHistory> {
        let field = owned_field(&self.store, owner, key)?;

        let mut data = self
            .store
            .soil_health
            .find(|r| r.field_id == field.id && r.zone_id == zone_id);
        if data.is_empty() {
            return Err(ServiceError::NotFound(
                "No soil health data found for this zone".to_string(),
            ));
        }
        sort_newest_first(&mut data, |r| r.measurement_date);
        data.truncate(limit.unwrap_or(DEFAULT_ZONE_HISTORY_LIMIT));

        Ok(SoilZoneHistory {
            field_id: field.field_id,
            zone_id: zone_id.to_string(),
            data,
        })
    }

    pub fn summary(&self, owner: UserId, key: &FieldKey) -> ServiceResult<SoilSummary> {
        let field = owned_field(&self.store, owner, key)?;
        let records = self.store.soil_health.find(|r| r.field_id == field.id);

        let avg = |metric: fn(&SoilHealthRecord) -> f64| round2(mean_or_zero(records.iter().map(metric)));

        Ok(SoilSummary {
            total_zones: count_distinct(records.iter().map(|r| r.zone_id.as_str())),
            average_ph_level: avg(|r| r.ph_level),
            average_moisture: avg(|r| r.moisture),
            average_nitrogen: avg(|r| r.nitrogen),
            average_phosphorus: avg(|r| r.phosphorus),
            average_potassium: avg(|r| r.potassium),
            average_health_score: avg(|r| r.health_score),
            health_status_distribution: tally(records.iter().map(|r| r.health_status)),
            field_id: field.field_id,
            field_name: field.name,
        })
    }

    /// Readings of the last `days` days, oldest first, with their trends.
    pub fn trends(
        &self,
        owner: UserId,
        key: &FieldKey,
        zone_id: Option<&str>,
        days: Option<u32>,
    ) -> ServiceResult<SoilTrendReport> {
        let field = owned_field(&self.store, owner, key)?;
        let days = days.unwrap_or(DEFAULT_TREND_DAYS);
        // A window reaching past the representable calendar has no lower bound
        let since = Duration::try_days(i64::from(days)).and_then(|d| Utc::now().checked_sub_signed(d));

        let mut data = self.store.soil_health.find(|r| {
            r.field_id == field.id
                && zone_id.map_or(true, |z| r.zone_id == z)
                && since.map_or(true, |since| r.measurement_date >= since)
        });
        sort_oldest_first(&mut data, |r| r.measurement_date);

        Ok(SoilTrendReport {
            field_id: field.field_id,
            zone_id: zone_id.unwrap_or("all").to_string(),
            period: format!("{} days", days),
            trends: soil_trends(&data),
            data,
        })
    }
}
