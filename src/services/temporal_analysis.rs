//! Temporal analysis: vegetation, moisture and weather over 6M / 1Y windows

use crate::access::{owned_field, owned_field_raw};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    EnvironmentalConditions, Field, FieldKey, NewTemporalRecord, Period, TemporalRecord, TrendData,
    UserId,
};
use crate::scoring::{temporal_trends, TemporalTrends, TrendDirection, TEMPORAL_DEAD_ZONE};
use crate::services::validation::{check_range, present_text, sort_newest_first, sort_oldest_first};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_TEMPORAL_LIMIT: usize = 12;

const REQUIRED: &[&str] = &[
    "fieldId",
    "period",
    "vegetationHealth",
    "moisture",
    "environmentalConditions",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalAnalysis {
    pub field_id: String,
    pub field_name: String,
    pub period: Period,
    /// Newest first
    pub data: Vec<TemporalRecord>,
    /// Computed over `data` in measurement order
    pub trends: TemporalTrends,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalTrendReport {
    pub field_id: String,
    pub field_name: String,
    pub period: Period,
    pub trends: TemporalTrends,
    pub data_points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSample {
    pub environmental_conditions: EnvironmentalConditions,
    pub measurement_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalHistory {
    pub field_id: String,
    pub field_name: String,
    pub period: Period,
    pub environmental_data: Vec<EnvironmentalSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationMoistureSample {
    pub vegetation_health: f64,
    pub moisture: f64,
    pub measurement_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VegetationMoistureHistory {
    pub field_id: String,
    pub field_name: String,
    pub period: Period,
    pub vegetation_moisture_data: Vec<VegetationMoistureSample>,
}

#[derive(Clone)]
pub struct TemporalAnalysisService {
    store: Arc<Store>,
}

impl TemporalAnalysisService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Store a point. Its trend data compares it with the closest earlier
    /// point of the same field and period.
    pub fn create(&self, owner: UserId, input: NewTemporalRecord) -> ServiceResult<TemporalRecord> {
        let (Some(field_key), Some(period), Some(vegetation_health), Some(moisture), Some(conditions)) = (
            present_text(input.field_id),
            input.period,
            input.vegetation_health,
            input.moisture,
            input.environmental_conditions,
        ) else {
            return Err(ServiceError::required(REQUIRED));
        };

        check_range("vegetationHealth", vegetation_health, 0.0, 100.0)?;
        check_range("moisture", moisture, 0.0, 100.0)?;
        check_range("environmentalConditions.humidity", conditions.humidity, 0.0, 100.0)?;
        if conditions.rainfall < 0.0 {
            return Err(ServiceError::Validation(format!(
                "environmentalConditions.rainfall must not be negative (got {})",
                conditions.rainfall
            )));
        }

        let field = owned_field_raw(&self.store, owner, &field_key)?;
        let now = Utc::now();
        let measurement_date = input.measurement_date.unwrap_or(now);

        let previous = self
            .store
            .temporal
            .find(|r| r.field_id == field.id && r.period == period && r.measurement_date < measurement_date)
            .into_iter()
            .max_by_key(|r| r.measurement_date);
        let trend_data = match previous {
            Some(prev) => TrendData {
                vegetation_trend: TrendDirection::from_delta(
                    vegetation_health - prev.vegetation_health,
                    TEMPORAL_DEAD_ZONE,
                ),
                moisture_trend: TrendDirection::from_delta(moisture - prev.moisture, TEMPORAL_DEAD_ZONE),
            },
            None => TrendData::default(),
        };

        let record = self.store.temporal.insert(TemporalRecord {
            id: Uuid::new_v4(),
            field_id: field.id,
            period,
            vegetation_health,
            moisture,
            environmental_conditions: conditions,
            measurement_date,
            trend_data,
            created_at: now,
            updated_at: now,
        });

        tracing::debug!(
            "Temporal point {} for {} ({}): vegetation {:?}, moisture {:?}",
            record.id,
            field.field_id,
            period,
            trend_data.vegetation_trend,
            trend_data.moisture_trend
        );
        Ok(record)
    }

    /// The newest `limit` points with trends over that window.
    pub fn analysis(
        &self,
        owner: UserId,
        key: &FieldKey,
        period: Option<Period>,
        limit: Option<usize>,
    ) -> ServiceResult<TemporalAnalysis> {
        let (field, period) = self.resolve(owner, key, period)?;

        let mut data = self.points(&field, period);
        sort_newest_first(&mut data, |r| r.measurement_date);
        data.truncate(limit.unwrap_or(DEFAULT_TEMPORAL_LIMIT));

        let mut window = data.clone();
        window.reverse();
        let trends = temporal_trends(&window);

        Ok(TemporalAnalysis {
            field_id: field.field_id,
            field_name: field.name,
            period,
            data,
            trends,
        })
    }

    /// Trends over every point of the period.
    pub fn trends(&self, owner: UserId, key: &FieldKey, period: Option<Period>) -> ServiceResult<TemporalTrendReport> {
        let (field, period) = self.resolve(owner, key, period)?;

        let mut data = self.points(&field, period);
        sort_oldest_first(&mut data, |r| r.measurement_date);

        Ok(TemporalTrendReport {
            field_id: field.field_id,
            field_name: field.name,
            period,
            trends: temporal_trends(&data),
            data_points: data.len(),
        })
    }

    pub fn environmental(
        &self,
        owner: UserId,
        key: &FieldKey,
        period: Option<Period>,
        limit: Option<usize>,
    ) -> ServiceResult<EnvironmentalHistory> {
        let (field, period) = self.resolve(owner, key, period)?;
        let environmental_data = self
            .latest(&field, period, limit)
            .into_iter()
            .map(|r| EnvironmentalSample {
                environmental_conditions: r.environmental_conditions,
                measurement_date: r.measurement_date,
            })
            .collect();

        Ok(EnvironmentalHistory {
            field_id: field.field_id,
            field_name: field.name,
            period,
            environmental_data,
        })
    }

    pub fn vegetation_moisture(
        &self,
        owner: UserId,
        key: &FieldKey,
        period: Option<Period>,
        limit: Option<usize>,
    ) -> ServiceResult<VegetationMoistureHistory> {
        let (field, period) = self.resolve(owner, key, period)?;
        let vegetation_moisture_data = self
            .latest(&field, period, limit)
            .into_iter()
            .map(|r| VegetationMoistureSample {
                vegetation_health: r.vegetation_health,
                moisture: r.moisture,
                measurement_date: r.measurement_date,
            })
            .collect();

        Ok(VegetationMoistureHistory {
            field_id: field.field_id,
            field_name: field.name,
            period,
            vegetation_moisture_data,
        })
    }

    fn resolve(&self, owner: UserId, key: &FieldKey, period: Option<Period>) -> ServiceResult<(Field, Period)> {
        let field = owned_field(&self.store, owner, key)?;
        Ok((field, period.unwrap_or_default()))
    }

    fn points(&self, field: &Field, period: Period) -> Vec<TemporalRecord> {
        self.store
            .temporal
            .find(|r| r.field_id == field.id && r.period == period)
    }

    fn latest(&self, field: &Field, period: Period, limit: Option<usize>) -> Vec<TemporalRecord> {
        let mut data = self.points(field, period);
        sort_newest_first(&mut data, |r| r.measurement_date);
        data.truncate(limit.unwrap_or(DEFAULT_TEMPORAL_LIMIT));
        data
    }
}
