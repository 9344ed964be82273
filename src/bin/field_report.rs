// Field report
//
// Seeds an in-memory monitor for the demo user and prints a JSON report per field.
// Usage: cargo run --features report --bin field_report

use agri_monitor::models::Period;
use agri_monitor::services::{FieldQuery, Monitor};
use agri_monitor::{FieldKey, MonitorConfig, ServiceError, Store};
use anyhow::Context;
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_monitor=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = MonitorConfig::from_env();
    tracing::info!("Configuration:");
    tracing::info!("  AGRI_SEED_FIXTURES: {:?}", config.seed_fixtures);
    tracing::info!("  AGRI_DEMO_USERNAME: {}", config.demo_user.username);
    tracing::info!("  AGRI_TREND_DAYS: {}", config.trend_days);

    let fixtures = config.load_fixtures()?;
    let monitor = Monitor::new(Arc::new(Store::new()), fixtures);

    let profile = match monitor.users.register(config.demo_user.registration()) {
        Ok(profile) => profile,
        Err(ServiceError::Conflict(_)) => monitor
            .users
            .authenticate(&config.demo_user.credentials())
            .context("Demo user exists but could not log in")?,
        Err(err) => return Err(err).context("Failed to register demo user"),
    };
    let owner = profile.id;

    let seeded = monitor.seed.seed(owner).context("Failed to seed demo data")?;

    let field_query = FieldQuery { limit: Some(usize::MAX), ..Default::default() };
    let mut fields = monitor.fields.list(owner, &field_query);
    fields.sort_by(|a, b| a.field_id.cmp(&b.field_id));

    let mut reports = Vec::with_capacity(fields.len());
    for field in &fields {
        let key = FieldKey::Id(field.id);
        let context = || format!("Failed to build report for field {}", field.field_id);

        reports.push(json!({
            "field": field,
            "soilSummary": monitor.soil_health.summary(owner, &key).with_context(context)?,
            "soilTrends": monitor
                .soil_health
                .trends(owner, &key, None, Some(config.trend_days))
                .with_context(context)?
                .trends,
            "spectralSummary": monitor.spectral_health.summary(owner, &key).with_context(context)?,
            "temporalTrends": monitor
                .temporal
                .trends(owner, &key, Some(Period::SixMonths))
                .with_context(context)?,
            "riskSummary": monitor.risk.summary(owner, &key).with_context(context)?,
        }));
    }

    let report = json!({
        "user": profile,
        "seeded": seeded,
        "fieldSummary": monitor.fields.summary(owner),
        "alertSummary": monitor.alerts.summary(owner),
        "fields": reports,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    tracing::info!("Report written for {} fields", fields.len());

    Ok(())
}
