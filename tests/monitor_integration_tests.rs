// Monitor integration tests
//
// Purpose: drive the services together the way an API layer would, over one shared store
// Run with: cargo test --test monitor_integration_tests

use agri_monitor::models::{
    AlertStatus, AlertType, Coordinates, Credentials, EnvironmentalConditions, GeoLocation, NewAlert,
    NewField, NewRiskPrediction, NewSoilHealth, NewSpectralHealth, NewTemporalRecord, NewUser, Period,
    RiskLevel, RiskType, Severity, SpectralHealthUpdate,
};
use agri_monitor::services::Monitor;
use agri_monitor::{FieldKey, HealthStatus, ServiceError, TrendDirection, UserId};
use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, Utc};
use std::thread;

// Helper: monitor with one registered grower
fn setup() -> (Monitor, UserId) {
    let monitor = Monitor::in_memory().unwrap();
    let profile = monitor
        .users
        .register(NewUser {
            full_name: "Integration Grower".into(),
            username: "IntegrationGrower".into(),
            email: "grower@farm.test".into(),
            password: "correct horse".into(),
        })
        .unwrap();
    (monitor, profile.id)
}

fn new_field(code: &str) -> NewField {
    NewField {
        field_id: Some(code.into()),
        name: Some(format!("{} Field", code)),
        location: Some(GeoLocation { latitude: 40.71, longitude: -74.0 }),
        area: Some(20.0),
        crop_type: Some("Wheat".into()),
        planting_date: NaiveDate::from_ymd_opt(2024, 2, 20),
        ..Default::default()
    }
}

// ============================================================================
// Section 1: Accounts and ownership
// ============================================================================

#[test]
fn test_login_then_operate_as_user() {
    let (monitor, owner) = setup();

    let profile = monitor
        .users
        .authenticate(&Credentials {
            username: Some("integrationgrower".into()),
            email: None,
            password: "correct horse".into(),
        })
        .unwrap();
    assert_eq!(profile.id, owner);

    let field = monitor.fields.create(profile.id, new_field("W-1")).unwrap();
    assert_eq!(monitor.fields.get(owner, &FieldKey::Id(field.id)).unwrap().field_id, "W-1");
}

#[test]
fn test_other_users_cannot_see_or_write() {
    let (monitor, owner) = setup();
    let intruder = UserId::new();
    let field = monitor.fields.create(owner, new_field("W-1")).unwrap();
    let key = FieldKey::Id(field.id);

    let soil = NewSoilHealth {
        field_id: Some(field.id.to_string()),
        zone_id: Some("Z-1".into()),
        ph_level: Some(6.5),
        moisture: Some(60.0),
        nitrogen: Some(70.0),
        phosphorus: Some(70.0),
        potassium: Some(70.0),
        ..Default::default()
    };
    assert_eq!(monitor.soil_health.create(intruder, soil.clone()).unwrap_err(), ServiceError::field_not_found());
    monitor.soil_health.create(owner, soil).unwrap();

    for err in [
        monitor.soil_health.summary(intruder, &key).unwrap_err(),
        monitor.spectral_health.map(intruder, &key, None).unwrap_err(),
        monitor.temporal.trends(intruder, &key, None).unwrap_err(),
        monitor.risk.summary(intruder, &key).unwrap_err(),
        monitor.alerts.by_field(intruder, &key, None, None).unwrap_err(),
    ] {
        assert_eq!(err.status_code(), 404);
    }
    assert_eq!(monitor.alerts.summary(intruder).summary.total_alerts, 0);
}

// ============================================================================
// Section 2: Telemetry round trip
// ============================================================================

#[test]
fn test_soil_history_drives_trends() {
    let (monitor, owner) = setup();
    monitor.fields.create(owner, new_field("W-1")).unwrap();
    let now = Utc::now();

    for (days_ago, ph, moisture) in [(14, 6.1, 50.0), (7, 6.4, 58.0), (1, 6.9, 66.0)] {
        monitor
            .soil_health
            .create(
                owner,
                NewSoilHealth {
                    field_id: Some("W-1".into()),
                    zone_id: Some("Z-1".into()),
                    ph_level: Some(ph),
                    moisture: Some(moisture),
                    nitrogen: Some(70.0),
                    phosphorus: Some(70.0),
                    potassium: Some(70.0),
                    measurement_date: Some(now - Duration::days(days_ago)),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    let report = monitor.soil_health.trends(owner, &FieldKey::parse("W-1"), Some("Z-1"), None).unwrap();
    assert_eq!(report.data.len(), 3);
    assert_eq!(report.trends.ph_level.direction, TrendDirection::Increasing);
    assert_relative_eq!(report.trends.ph_level.magnitude, 0.8);
    assert_eq!(report.trends.moisture.direction, TrendDirection::Increasing);
    assert_eq!(report.trends.nutrients.direction, TrendDirection::Stable);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trends"]["phLevel"]["trend"], "increasing");
    assert_eq!(json["period"], "30 days");
    assert_eq!(json["data"][0]["healthStatus"], "good");
}

#[test]
fn test_spectral_update_keeps_status_in_step() {
    let (monitor, owner) = setup();
    monitor.fields.create(owner, new_field("W-1")).unwrap();

    let record = monitor
        .spectral_health
        .create(
            owner,
            NewSpectralHealth {
                field_id: Some("W-1".into()),
                zone_id: Some("Z-1".into()),
                ndvi_value: Some(0.78),
                health_percentage: Some(80.0),
                coordinates: Some(Coordinates { x: 10.0, y: 15.0 }),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(record.health_status, HealthStatus::Excellent);

    let updated = monitor
        .spectral_health
        .update(
            owner,
            record.id,
            SpectralHealthUpdate { health_percentage: Some(79.5), ..Default::default() },
        )
        .unwrap();
    assert_eq!(updated.health_status, HealthStatus::Good);

    let summary = monitor.spectral_health.summary(owner, &FieldKey::parse("W-1")).unwrap();
    assert_relative_eq!(summary.average_health_percentage, 79.5);
}

#[test]
fn test_temporal_periods_are_separate_series() {
    let (monitor, owner) = setup();
    monitor.fields.create(owner, new_field("W-1")).unwrap();
    let now = Utc::now();

    let point = |period, vegetation, weeks_ago| NewTemporalRecord {
        field_id: Some("W-1".into()),
        period: Some(period),
        vegetation_health: Some(vegetation),
        moisture: Some(60.0),
        environmental_conditions: Some(EnvironmentalConditions { temperature: 20.0, humidity: 60.0, rainfall: 10.0 }),
        measurement_date: Some(now - Duration::weeks(weeks_ago)),
    };
    monitor.temporal.create(owner, point(Period::SixMonths, 70.0, 3)).unwrap();
    monitor.temporal.create(owner, point(Period::OneYear, 90.0, 2)).unwrap();
    let latest = monitor.temporal.create(owner, point(Period::SixMonths, 65.0, 1)).unwrap();
    assert_eq!(latest.trend_data.vegetation_trend, TrendDirection::Decreasing);

    let six = monitor.temporal.trends(owner, &FieldKey::parse("W-1"), None).unwrap();
    assert_eq!(six.data_points, 2);
    assert_relative_eq!(six.trends.vegetation_health.magnitude, -5.0);
    let year = monitor.temporal.trends(owner, &FieldKey::parse("W-1"), Some(Period::OneYear)).unwrap();
    assert_eq!(year.data_points, 1);
}

// ============================================================================
// Section 3: Alerts, risks and deletion
// ============================================================================

#[test]
fn test_alert_and_risk_lifecycle_then_cascade() {
    let (monitor, owner) = setup();
    let field = monitor.fields.create(owner, new_field("W-1")).unwrap();

    let alert = monitor
        .alerts
        .create(
            owner,
            NewAlert {
                field_id: Some("W-1".into()),
                zone_id: Some("Z-1".into()),
                alert_type: Some(AlertType::Drought),
                severity: Some(Severity::Critical),
                title: Some("Drought".into()),
                description: Some("Soil moisture under 20%".into()),
                ..Default::default()
            },
        )
        .unwrap();
    monitor
        .risk
        .create(
            owner,
            NewRiskPrediction {
                field_id: Some("W-1".into()),
                zone_id: Some("Z-1".into()),
                risk_level: Some(RiskLevel::High),
                risk_type: Some(RiskType::Drought),
                probability: Some(88.0),
                ai_confidence: Some(91.0),
                coordinates: Some(Coordinates { x: 1.0, y: 2.0 }),
                ..Default::default()
            },
        )
        .unwrap();

    let active = monitor.alerts.active(owner, &Default::default());
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].field.as_ref().unwrap().name, "W-1 Field");

    monitor.alerts.update_status(owner, alert.id, Some(AlertStatus::Resolved)).unwrap();
    assert!(monitor.alerts.active(owner, &Default::default()).is_empty());
    assert_eq!(monitor.alerts.summary(owner).summary.resolved_alerts, 1);

    let high = monitor.risk.high_risk(owner, &FieldKey::parse("W-1"), None).unwrap();
    assert_eq!(high.high_risk_zones.len(), 1);

    let deletion = monitor.fields.delete(owner, &FieldKey::Id(field.id)).unwrap();
    assert_eq!(deletion.removed_records, 2);
    assert!(monitor.store.alerts.is_empty());
    assert!(monitor.store.risk_predictions.is_empty());
    assert_eq!(monitor.alerts.recent(owner, None).len(), 0);
}

// ============================================================================
// Section 4: Seeding and concurrency
// ============================================================================

#[test]
fn test_seeded_dataset_reads_back() {
    let (monitor, owner) = setup();
    let report = monitor.seed.seed(owner).unwrap();
    assert_eq!(report.fields, 3);

    let fields = monitor.fields.list(owner, &Default::default());
    assert_eq!(fields.len(), 3);

    let b1 = FieldKey::parse("B-1");
    let soil = monitor.soil_health.summary(owner, &b1).unwrap();
    assert_eq!(soil.total_zones, 3);
    assert_eq!(soil.health_status_distribution.values().sum::<usize>(), 3);

    let map = monitor.risk.zone_map(owner, &b1, None).unwrap();
    assert_eq!(map.total_zones, 1);
    assert_eq!(map.risk_zone_map[0].risk_type, RiskType::Drought);

    let recs = monitor.risk.recommendations(owner, &b1, None, None).unwrap().recommendations;
    assert_eq!(recs[0].recommendation.action, "Apply fungicide treatment");
    assert_eq!(recs.last().unwrap().recommendation.action, "Monitor soil moisture");

    let alerts = monitor.alerts.summary(owner);
    assert_eq!(alerts.summary.total_alerts, 9);
    assert_eq!(alerts.alert_types.len(), 3);
}

#[test]
fn test_services_are_shareable_across_threads() {
    let (monitor, owner) = setup();
    monitor.fields.create(owner, new_field("W-1")).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let soil = monitor.soil_health.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    soil.create(
                        owner,
                        NewSoilHealth {
                            field_id: Some("W-1".into()),
                            zone_id: Some(format!("Z-{}", t)),
                            ph_level: Some(6.5),
                            moisture: Some(f64::from(i)),
                            nitrogen: Some(50.0),
                            phosphorus: Some(50.0),
                            potassium: Some(50.0),
                            ..Default::default()
                        },
                    )
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let summary = monitor.soil_health.summary(owner, &FieldKey::parse("W-1")).unwrap();
    assert_eq!(summary.total_zones, 4);
    assert_eq!(monitor.store.soil_health.len(), 100);
}
