//! Field alerts: creation, status workflow and summaries

use crate::access::owned_field_raw;
use crate::error::{ServiceError, ServiceResult};
use crate::models::alert::{DEFAULT_ALERT_CONFIDENCE, DEFAULT_ALERT_PRIORITY};
use crate::models::{
    Alert, AlertStatus, AlertType, FieldKey, FieldRef, NewAlert, Severity, UserId,
};
use crate::services::validation::{check_range, present_text, sort_newest_first};
use crate::store::Store;
use crate::utils::tally;
use chrono::Utc;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_ALERT_LIMIT: usize = 10;
pub const DEFAULT_RECENT_ALERT_LIMIT: usize = 5;

const REQUIRED: &[&str] = &["fieldId", "zoneId", "alertType", "severity", "title", "description"];

/// Alert with its field resolved for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub field: Option<FieldRef>,
}

#[derive(Debug, Clone, Default)]
pub struct ActiveAlertQuery {
    pub severity: Option<Severity>,
    pub alert_type: Option<AlertType>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAlerts {
    pub field_id: String,
    pub field_name: String,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTotals {
    pub total_alerts: usize,
    pub active_alerts: usize,
    pub resolved_alerts: usize,
    pub critical_alerts: usize,
    pub high_alerts: usize,
    pub medium_alerts: usize,
    pub low_alerts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTypeCount {
    pub alert_type: AlertType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub summary: AlertTotals,
    /// Active alerts only
    pub alert_types: Vec<AlertTypeCount>,
}

#[derive(Clone)]
pub struct AlertService {
    store: Arc<Store>,
}

impl AlertService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create(&self, owner: UserId, input: NewAlert) -> ServiceResult<Alert> {
        let (Some(field_key), Some(zone_id), Some(alert_type), Some(severity), Some(title), Some(description)) = (
            present_text(input.field_id),
            present_text(input.zone_id),
            input.alert_type,
            input.severity,
            present_text(input.title),
            present_text(input.description),
        ) else {
            return Err(ServiceError::required(REQUIRED));
        };

        let priority = input.priority.unwrap_or(DEFAULT_ALERT_PRIORITY);
        if !(1..=5).contains(&priority) {
            return Err(ServiceError::Validation(format!(
                "priority must be between 1 and 5 (got {})",
                priority
            )));
        }
        let ai_confidence = input.ai_confidence.unwrap_or(DEFAULT_ALERT_CONFIDENCE);
        check_range("aiConfidence", ai_confidence, 0.0, 100.0)?;

        let field = owned_field_raw(&self.store, owner, &field_key)?;

        let now = Utc::now();
        let alert = self.store.alerts.insert(Alert {
            id: Uuid::new_v4(),
            field_id: field.id,
            zone_id,
            alert_type,
            severity,
            title,
            description,
            status: AlertStatus::Active,
            priority,
            detected_at: input.detected_at.unwrap_or(now),
            resolved_at: None,
            ai_confidence,
            metadata: input.metadata.unwrap_or_default(),
            owner,
            created_at: now,
            updated_at: now,
        });

        tracing::info!(
            "Alert {} ({:?}/{:?}) raised on field {} zone {}",
            alert.id,
            alert.alert_type,
            alert.severity,
            field.field_id,
            alert.zone_id
        );
        Ok(alert)
    }

    /// Active alerts across all of the caller's fields, newest first
    pub fn active(&self, owner: UserId, query: &ActiveAlertQuery) -> Vec<AlertView> {
        let mut alerts = self.store.alerts.find(|a| {
            a.owner == owner
                && a.status == AlertStatus::Active
                && query.severity.map_or(true, |s| a.severity == s)
                && query.alert_type.map_or(true, |t| a.alert_type == t)
        });
        sort_newest_first(&mut alerts, |a| a.detected_at);
        alerts.truncate(query.limit.unwrap_or(DEFAULT_ALERT_LIMIT));
        self.with_fields(owner, alerts)
    }

    /// Alerts on one field in the given status (default active)
    pub fn by_field(
        &self,
        owner: UserId,
        key: &FieldKey,
        status: Option<AlertStatus>,
        limit: Option<usize>,
    ) -> ServiceResult<FieldAlerts> {
        let field = crate::access::owned_field(&self.store, owner, key)?;
        let status = status.unwrap_or_default();

        let mut alerts = self
            .store
            .alerts
            .find(|a| a.field_id == field.id && a.owner == owner && a.status == status);
        sort_newest_first(&mut alerts, |a| a.detected_at);
        alerts.truncate(limit.unwrap_or(DEFAULT_ALERT_LIMIT));

        Ok(FieldAlerts {
            field_id: field.field_id,
            field_name: field.name,
            alerts,
        })
    }

    pub fn update_status(
        &self,
        owner: UserId,
        alert_id: Uuid,
        status: Option<AlertStatus>,
    ) -> ServiceResult<Alert> {
        let Some(status) = status else {
            return Err(ServiceError::Validation(
                "Valid status required: active, acknowledged, resolved, dismissed".to_string(),
            ));
        };

        if self.store.alerts.get(alert_id).map_or(true, |a| a.owner != owner) {
            return Err(ServiceError::NotFound("Alert not found".to_string()));
        }

        let now = Utc::now();
        let alert = self
            .store
            .alerts
            .update(alert_id, |alert| {
                alert.status = status;
                if status == AlertStatus::Resolved {
                    alert.resolved_at = Some(now);
                }
                alert.updated_at = now;
            })
            .ok_or_else(|| ServiceError::NotFound("Alert not found".to_string()))?;

        tracing::info!("Alert {} moved to {:?}", alert.id, alert.status);
        Ok(alert)
    }

    pub fn summary(&self, owner: UserId) -> AlertSummary {
        let alerts = self.store.alerts.find(|a| a.owner == owner);

        let severity_count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();
        let summary = AlertTotals {
            total_alerts: alerts.len(),
            active_alerts: alerts.iter().filter(|a| a.status == AlertStatus::Active).count(),
            resolved_alerts: alerts.iter().filter(|a| a.status == AlertStatus::Resolved).count(),
            critical_alerts: severity_count(Severity::Critical),
            high_alerts: severity_count(Severity::High),
            medium_alerts: severity_count(Severity::Medium),
            low_alerts: severity_count(Severity::Low),
        };

        let alert_types = tally(
            alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .map(|a| a.alert_type),
        )
        .into_iter()
        .map(|(alert_type, count)| AlertTypeCount { alert_type, count })
        .collect();

        AlertSummary { summary, alert_types }
    }

    /// Latest alerts in any status
    pub fn recent(&self, owner: UserId, limit: Option<usize>) -> Vec<AlertView> {
        let mut alerts = self.store.alerts.find(|a| a.owner == owner);
        sort_newest_first(&mut alerts, |a| a.detected_at);
        alerts.truncate(limit.unwrap_or(DEFAULT_RECENT_ALERT_LIMIT));
        self.with_fields(owner, alerts)
    }

    fn with_fields(&self, owner: UserId, alerts: Vec<Alert>) -> Vec<AlertView> {
        let fields: FxHashMap<Uuid, FieldRef> = self
            .store
            .fields
            .find(|f| f.owner == owner)
            .iter()
            .map(|f| (f.id, f.reference()))
            .collect();

        alerts
            .into_iter()
            .map(|alert| {
                let field = fields.get(&alert.field_id).cloned();
                AlertView { alert, field }
            })
            .collect()
    }
}
