//! Risk predictions: listing, zone map, summaries and recommendations

use crate::access::{owned_field, owned_field_raw};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Coordinates, Field, FieldKey, NewRiskPrediction, RiskLevel, RiskPrediction, RiskRecommendation,
    RiskType, TimeHorizon, UserId,
};
use crate::services::validation::{check_range, present_text, sort_newest_first};
use crate::store::Store;
use crate::utils::{first_per_key, mean_or_zero};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_RISK_LIMIT: usize = 20;
pub const DEFAULT_HIGH_RISK_LIMIT: usize = 10;
pub const MAX_RECOMMENDATIONS: usize = 20;

const REQUIRED: &[&str] = &[
    "fieldId",
    "zoneId",
    "riskLevel",
    "riskType",
    "probability",
    "aiConfidence",
    "coordinates",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskQuery {
    pub risk_level: Option<RiskLevel>,
    pub risk_type: Option<RiskType>,
    pub time_horizon: Option<TimeHorizon>,
    pub limit: Option<usize>,
}

impl RiskQuery {
    fn matches(&self, prediction: &RiskPrediction) -> bool {
        self.risk_level.map_or(true, |l| prediction.risk_level == l)
            && self.risk_type.map_or(true, |t| prediction.risk_type == t)
            && self.time_horizon.map_or(true, |h| prediction.time_horizon == h)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPredictionList {
    pub field_id: String,
    pub field_name: String,
    pub risk_predictions: Vec<RiskPrediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskZone {
    pub coordinates: Coordinates,
    pub risk_level: RiskLevel,
    pub risk_type: RiskType,
    pub probability: f64,
    pub ai_confidence: f64,
    pub zone_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskZoneMap {
    pub field_id: String,
    pub field_name: String,
    pub time_horizon: TimeHorizon,
    pub risk_zone_map: Vec<RiskZone>,
    /// Over every matching prediction, not only the mapped ones
    pub risk_distribution: RiskDistribution,
    pub total_zones: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTotals {
    pub total_predictions: usize,
    pub high_risk_zones: usize,
    pub medium_risk_zones: usize,
    pub low_risk_zones: usize,
    pub avg_probability: f64,
    pub avg_ai_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTypeStats {
    pub risk_type: RiskType,
    pub count: usize,
    pub avg_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub field_id: String,
    pub field_name: String,
    pub summary: RiskTotals,
    pub risk_types: Vec<RiskTypeStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskZones {
    pub field_id: String,
    pub field_name: String,
    pub high_risk_zones: Vec<RiskPrediction>,
}

/// A recommendation tagged with the prediction it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecommendation {
    #[serde(flatten)]
    pub recommendation: RiskRecommendation,
    pub risk_type: RiskType,
    pub risk_level: RiskLevel,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecommendations {
    pub field_id: String,
    pub field_name: String,
    pub recommendations: Vec<RankedRecommendation>,
}

#[derive(Clone)]
pub struct RiskPredictionService {
    store: Arc<Store>,
}

impl RiskPredictionService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: UserId, input: NewRiskPrediction) -> ServiceResult<RiskPrediction> {
        let (
            Some(field_key),
            Some(zone_id),
            Some(risk_level),
            Some(risk_type),
            Some(probability),
            Some(ai_confidence),
            Some(coordinates),
        ) = (
            present_text(input.field_id),
            present_text(input.zone_id),
            input.risk_level,
            input.risk_type,
            input.probability,
            input.ai_confidence,
            input.coordinates,
        )
        else {
            return Err(ServiceError::required(REQUIRED));
        };

        check_range("probability", probability, 0.0, 100.0)?;
        check_range("aiConfidence", ai_confidence, 0.0, 100.0)?;

        let field = owned_field_raw(&self.store, owner, &field_key)?;

        let now = Utc::now();
        let prediction = self.store.risk_predictions.insert(RiskPrediction {
            id: Uuid::new_v4(),
            field_id: field.id,
            zone_id,
            risk_level,
            risk_type,
            probability,
            ai_confidence,
            coordinates,
            prediction_date: input.prediction_date.unwrap_or(now),
            time_horizon: input.time_horizon.unwrap_or_default(),
            factors: input.factors,
            recommendations: input.recommendations,
            owner,
            created_at: now,
            updated_at: now,
        });

        tracing::debug!(
            "Risk prediction {} for {}/{}: {:?} {:?} at {}%",
            prediction.id,
            field.field_id,
            prediction.zone_id,
            prediction.risk_level,
            prediction.risk_type,
            prediction.probability
        );
        Ok(prediction)
    }

    /// Newest first, filtered
    pub fn list(&self, owner: UserId, key: &FieldKey, query: &RiskQuery) -> ServiceResult<RiskPredictionList> {
        let field = owned_field(&self.store, owner, key)?;

        let mut risk_predictions = self.predictions(&field, owner, |p| query.matches(p));
        sort_newest_first(&mut risk_predictions, |p| p.prediction_date);
        risk_predictions.truncate(query.limit.unwrap_or(DEFAULT_RISK_LIMIT));

        Ok(RiskPredictionList {
            field_id: field.field_id,
            field_name: field.name,
            risk_predictions,
        })
    }

    /// Newest prediction per grid position for one horizon
    pub fn zone_map(&self, owner: UserId, key: &FieldKey, time_horizon: Option<TimeHorizon>) -> ServiceResult<RiskZoneMap> {
        let field = owned_field(&self.store, owner, key)?;
        let time_horizon = time_horizon.unwrap_or_default();

        let mut predictions = self.predictions(&field, owner, |p| p.time_horizon == time_horizon);
        sort_newest_first(&mut predictions, |p| p.prediction_date);

        let level_count = |level: RiskLevel| predictions.iter().filter(|p| p.risk_level == level).count();
        let risk_distribution = RiskDistribution {
            high: level_count(RiskLevel::High),
            medium: level_count(RiskLevel::Medium),
            low: level_count(RiskLevel::Low),
        };

        let risk_zone_map: Vec<RiskZone> = first_per_key(predictions, |p| p.coordinates.grid_key())
            .into_iter()
            .map(|p| RiskZone {
                coordinates: p.coordinates,
                risk_level: p.risk_level,
                risk_type: p.risk_type,
                probability: p.probability,
                ai_confidence: p.ai_confidence,
                zone_id: p.zone_id,
            })
            .collect();

        Ok(RiskZoneMap {
            field_id: field.field_id,
            field_name: field.name,
            time_horizon,
            total_zones: risk_zone_map.len(),
            risk_zone_map,
            risk_distribution,
        })
    }

    pub fn summary(&self, owner: UserId, key: &FieldKey) -> ServiceResult<RiskSummary> {
        let field = owned_field(&self.store, owner, key)?;
        let predictions = self.predictions(&field, owner, |_| true);

        let level_count = |level: RiskLevel| predictions.iter().filter(|p| p.risk_level == level).count();
        let summary = RiskTotals {
            total_predictions: predictions.len(),
            high_risk_zones: level_count(RiskLevel::High),
            medium_risk_zones: level_count(RiskLevel::Medium),
            low_risk_zones: level_count(RiskLevel::Low),
            avg_probability: mean_or_zero(predictions.iter().map(|p| p.probability)),
            avg_ai_confidence: mean_or_zero(predictions.iter().map(|p| p.ai_confidence)),
        };

        let mut by_type: BTreeMap<RiskType, Vec<f64>> = BTreeMap::new();
        for prediction in &predictions {
            by_type.entry(prediction.risk_type).or_default().push(prediction.probability);
        }
        let risk_types = by_type
            .into_iter()
            .map(|(risk_type, probabilities)| RiskTypeStats {
                risk_type,
                count: probabilities.len(),
                avg_probability: mean_or_zero(probabilities),
            })
            .collect();

        Ok(RiskSummary {
            field_id: field.field_id,
            field_name: field.name,
            summary,
            risk_types,
        })
    }

    /// High-level predictions, most probable first, ties newest first
    pub fn high_risk(&self, owner: UserId, key: &FieldKey, limit: Option<usize>) -> ServiceResult<HighRiskZones> {
        let field = owned_field(&self.store, owner, key)?;

        let mut high_risk_zones = self.predictions(&field, owner, |p| p.risk_level == RiskLevel::High);
        high_risk_zones.sort_by(|a, b| {
            b.probability
                .total_cmp(&a.probability)
                .then_with(|| b.prediction_date.cmp(&a.prediction_date))
        });
        high_risk_zones.truncate(limit.unwrap_or(DEFAULT_HIGH_RISK_LIMIT));

        Ok(HighRiskZones {
            field_id: field.field_id,
            field_name: field.name,
            high_risk_zones,
        })
    }

    /// Every recommendation of the matching predictions, most urgent first.
    ///
    /// Predictions are walked by descending probability, then the flattened
    /// list is stably sorted by priority, so probability breaks priority ties.
    /// Recommendations without a priority rank last.
    pub fn recommendations(
        &self,
        owner: UserId,
        key: &FieldKey,
        risk_type: Option<RiskType>,
        risk_level: Option<RiskLevel>,
    ) -> ServiceResult<RiskRecommendations> {
        let field = owned_field(&self.store, owner, key)?;
        let query = RiskQuery { risk_type, risk_level, ..Default::default() };

        let mut predictions = self.predictions(&field, owner, |p| query.matches(p));
        predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        let mut recommendations: Vec<RankedRecommendation> = predictions
            .into_iter()
            .flat_map(|p| {
                let (risk_type, risk_level, probability) = (p.risk_type, p.risk_level, p.probability);
                p.recommendations.into_iter().map(move |recommendation| RankedRecommendation {
                    recommendation,
                    risk_type,
                    risk_level,
                    probability,
                })
            })
            .collect();
        recommendations.sort_by(|a, b| b.recommendation.priority.cmp(&a.recommendation.priority));
        recommendations.truncate(MAX_RECOMMENDATIONS);

        Ok(RiskRecommendations {
            field_id: field.field_id,
            field_name: field.name,
            recommendations,
        })
    }

    fn predictions<F>(&self, field: &Field, owner: UserId, filter: F) -> Vec<RiskPrediction>
    where
        F: Fn(&RiskPrediction) -> bool,
    {
        self.store
            .risk_predictions
            .find(|p| p.field_id == field.id && p.owner == owner && filter(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::services::tests::{field_with_code, monitor};
    use approx::assert_relative_eq;
    use chrono::Duration;

    fn prediction(level: RiskLevel, kind: RiskType, probability: f64, x: f64, hours_ago: i64) -> NewRiskPrediction {
        NewRiskPrediction {
            field_id: Some("A-1".to_string()),
            zone_id: Some(format!("Z-{}", x)),
            risk_level: Some(level),
            risk_type: Some(kind),
            probability: Some(probability),
            ai_confidence: Some(90.0),
            coordinates: Some(Coordinates { x, y: 5.0 }),
            prediction_date: Some(Utc::now() - Duration::hours(hours_ago)),
            ..Default::default()
        }
    }

    fn recommend(action: &str, priority: Option<Priority>) -> RiskRecommendation {
        RiskRecommendation {
            action: action.to_string(),
            priority,
            description: None,
        }
    }

    #[test]
    fn test_create_defaults_horizon() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");

        let p = m.risk.create(owner, prediction(RiskLevel::High, RiskType::Drought, 85.0, 1.0, 0)).unwrap();
        assert_eq!(p.time_horizon, TimeHorizon::OneWeek);

        let missing = NewRiskPrediction { coordinates: None, ..prediction(RiskLevel::Low, RiskType::Pest, 5.0, 1.0, 0) };
        assert_eq!(m.risk.create(owner, missing).unwrap_err().status_code(), 400);

        let bad = prediction(RiskLevel::Low, RiskType::Pest, 105.0, 1.0, 0);
        assert_eq!(m.risk.create(owner, bad).unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_list_filters() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");
        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Drought, 85.0, 1.0, 3)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::Low, RiskType::Pest, 20.0, 2.0, 2)).unwrap();
        m.risk
            .create(
                owner,
                NewRiskPrediction {
                    time_horizon: Some(TimeHorizon::OneMonth),
                    ..prediction(RiskLevel::High, RiskType::Pest, 70.0, 3.0, 1)
                },
            )
            .unwrap();

        let key = FieldKey::parse("A-1");
        let all = m.risk.list(owner, &key, &RiskQuery::default()).unwrap();
        assert_eq!(all.risk_predictions.len(), 3);
        assert_relative_eq!(all.risk_predictions[0].probability, 70.0);

        let high = m.risk.list(owner, &key, &RiskQuery { risk_level: Some(RiskLevel::High), ..Default::default() }).unwrap();
        assert_eq!(high.risk_predictions.len(), 2);

        let monthly = m
            .risk
            .list(owner, &key, &RiskQuery { time_horizon: Some(TimeHorizon::OneMonth), ..Default::default() })
            .unwrap();
        assert_eq!(monthly.risk_predictions.len(), 1);
    }

    #[test]
    fn test_zone_map_groups_by_coordinates() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");
        m.risk.create(owner, prediction(RiskLevel::Low, RiskType::Pest, 20.0, 1.0, 5)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Drought, 80.0, 1.0, 1)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::Medium, RiskType::Disease, 50.0, 2.0, 2)).unwrap();

        let map = m.risk.zone_map(owner, &FieldKey::parse("A-1"), None).unwrap();
        assert_eq!(map.time_horizon, TimeHorizon::OneWeek);
        assert_eq!(map.total_zones, 2);
        assert_eq!(map.risk_zone_map[0].risk_level, RiskLevel::High);
        assert_eq!(map.risk_distribution, RiskDistribution { high: 1, medium: 1, low: 1 });

        let empty = m.risk.zone_map(owner, &FieldKey::parse("A-1"), Some(TimeHorizon::OneDay)).unwrap();
        assert_eq!(empty.total_zones, 0);
        assert_eq!(empty.risk_distribution, RiskDistribution::default());
    }

    #[test]
    fn test_summary() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");
        let key = FieldKey::parse("A-1");

        let empty = m.risk.summary(owner, &key).unwrap();
        assert_eq!(empty.summary, RiskTotals::default());
        assert!(empty.risk_types.is_empty());

        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Drought, 80.0, 1.0, 0)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::Medium, RiskType::Pest, 40.0, 2.0, 0)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::Low, RiskType::Pest, 20.0, 3.0, 0)).unwrap();

        let summary = m.risk.summary(owner, &key).unwrap();
        assert_eq!(summary.summary.total_predictions, 3);
        assert_eq!(summary.summary.high_risk_zones, 1);
        assert_relative_eq!(summary.summary.avg_probability, 140.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(summary.summary.avg_ai_confidence, 90.0);

        let pest = summary.risk_types.iter().find(|t| t.risk_type == RiskType::Pest).unwrap();
        assert_eq!(pest.count, 2);
        assert_relative_eq!(pest.avg_probability, 30.0);
    }

    #[test]
    fn test_high_risk_ordering() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");
        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Drought, 75.0, 1.0, 1)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Pest, 90.0, 2.0, 4)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::High, RiskType::Disease, 90.0, 3.0, 2)).unwrap();
        m.risk.create(owner, prediction(RiskLevel::Medium, RiskType::Weather, 99.0, 4.0, 0)).unwrap();

        let zones = m.risk.high_risk(owner, &FieldKey::parse("A-1"), None).unwrap().high_risk_zones;
        let kinds: Vec<RiskType> = zones.iter().map(|p| p.risk_type).collect();
        assert_eq!(kinds, vec![RiskType::Disease, RiskType::Pest, RiskType::Drought]);
    }

    #[test]
    fn test_recommendations_rank_priority_then_probability() {
        let (m, owner) = monitor();
        field_with_code(&m, owner, "A-1");
        m.risk
            .create(
                owner,
                NewRiskPrediction {
                    recommendations: vec![
                        recommend("Scout edges", Some(Priority::Medium)),
                        recommend("Apply pesticide", Some(Priority::High)),
                    ],
                    ..prediction(RiskLevel::Medium, RiskType::Pest, 45.0, 1.0, 0)
                },
            )
            .unwrap();
        m.risk
            .create(
                owner,
                NewRiskPrediction {
                    recommendations: vec![
                        recommend("Increase irrigation", Some(Priority::High)),
                        recommend("Log readings", None),
                        recommend("Emergency watering", Some(Priority::Critical)),
                    ],
                    ..prediction(RiskLevel::High, RiskType::Drought, 85.0, 2.0, 0)
                },
            )
            .unwrap();

        let recs = m
            .risk
            .recommendations(owner, &FieldKey::parse("A-1"), None, None)
            .unwrap()
            .recommendations;
        let actions: Vec<&str> = recs.iter().map(|r| r.recommendation.action.as_str()).collect();
        assert_eq!(
            actions,
            vec!["Emergency watering", "Increase irrigation", "Apply pesticide", "Scout edges", "Log readings"]
        );
        assert_eq!(recs[0].risk_type, RiskType::Drought);
        assert_relative_eq!(recs[2].probability, 45.0);

        let json = serde_json::to_value(&recs[0]).unwrap();
        assert_eq!(json["action"], "Emergency watering");
        assert_eq!(json["riskLevel"], "high");

        let pest_only = m
            .risk
            .recommendations(owner, &FieldKey::parse("A-1"), Some(RiskType::Pest), None)
            .unwrap();
        assert_eq!(pest_only.recommendations.len(), 2);
    }
}
