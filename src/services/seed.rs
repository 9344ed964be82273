//! Demo dataset: fixtures and per-user seeding
//!
//! Fixtures are plain create inputs without a `fieldId`; seeding attaches a
//! copy of every telemetry, alert and prediction fixture to every fixture
//! field, then pushes it through the regular create path so derived values
//! (soil score, statuses, temporal trend data) are computed, never copied.

use crate::access::owned_field_ids;
use crate::error::ServiceResult;
use crate::models::{
    NewAlert, NewField, NewRiskPrediction, NewSoilHealth, NewSpectralHealth, NewTemporalRecord,
    SoilType, UserId,
};
use crate::services::{
    AlertService, FieldService, RiskPredictionService, SoilHealthService, SpectralHealthService,
    TemporalAnalysisService,
};
use crate::store::Store;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

const EMBEDDED_FIXTURES: &str = include_str!("../../data/seed_fixtures.json");

/// Gap between consecutive temporal fixtures that carry no measurement date
const TEMPORAL_FIXTURE_SPACING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientRange {
    pub optimal: f64,
    /// [low, high]
    pub range: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherRange {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

/// Reference lists shown alongside the demo data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalogues {
    pub crop_types: Vec<String>,
    pub soil_types: Vec<SoilType>,
    pub pest_types: Vec<String>,
    pub diseases: Vec<String>,
    pub nutrients: BTreeMap<String, NutrientRange>,
    pub weather_conditions: BTreeMap<String, WeatherRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedFixtures {
    pub fields: Vec<NewField>,
    #[serde(default)]
    pub spectral_health: Vec<NewSpectralHealth>,
    #[serde(default)]
    pub soil_health: Vec<NewSoilHealth>,
    #[serde(default)]
    pub temporal_data: Vec<NewTemporalRecord>,
    #[serde(default)]
    pub alerts: Vec<NewAlert>,
    #[serde(default)]
    pub risk_predictions: Vec<NewRiskPrediction>,
    #[serde(default)]
    pub catalogues: Catalogues,
}

impl SeedFixtures {
    /// The dataset compiled into the crate
    pub fn embedded() -> Result<Self> {
        let fixtures: SeedFixtures =
            serde_json::from_str(EMBEDDED_FIXTURES).with_context(|| "Failed to parse embedded seed fixtures")?;
        fixtures.validate().with_context(|| "Embedded seed fixtures are invalid")?;
        Ok(fixtures)
    }

    /// Load fixtures from a JSON file with the embedded layout.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed fixtures: {:?}", path))?;

        let fixtures: SeedFixtures = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse seed fixtures JSON: {:?}", path))?;

        if fixtures.fields.is_empty() {
            anyhow::bail!("Seed fixtures {:?} define no fields", path);
        }
        fixtures
            .validate()
            .with_context(|| format!("Seed fixtures {:?} are invalid", path))?;

        Ok(fixtures)
    }

    /// Run every fixture through the create paths against a scratch store.
    pub fn validate(&self) -> ServiceResult<SeedReport> {
        populate(&Arc::new(Store::new()), self, UserId::new(), Utc::now())
    }
}

/// Records created by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub fields: usize,
    pub spectral_health: usize,
    pub soil_health: usize,
    pub temporal_analysis: usize,
    pub alerts: usize,
    pub risk_predictions: usize,
}

#[derive(Clone)]
pub struct SeedService {
    store: Arc<Store>,
    fixtures: Arc<SeedFixtures>,
}

impl SeedService {
    pub fn new(store: Arc<Store>, fixtures: SeedFixtures) -> Self {
        SeedService { store, fixtures: Arc::new(fixtures) }
    }

    pub fn fixtures(&self) -> &SeedFixtures {
        &self.fixtures
    }

    /// Replace the caller's data with the fixture dataset. Existing data is
    /// only removed once the whole dataset has passed a dry run.
    pub fn seed(&self, owner: UserId) -> ServiceResult<SeedReport> {
        let now = Utc::now();
        self.fixtures.validate()?;

        let cleared = self.clear(owner);
        tracing::info!("Cleared {} existing records for {}", cleared, owner);

        let report = populate(&self.store, &self.fixtures, owner, now)?;
        tracing::info!(
            "Seeded {} fields, {} spectral, {} soil, {} temporal, {} alerts, {} predictions for {}",
            report.fields,
            report.spectral_health,
            report.soil_health,
            report.temporal_analysis,
            report.alerts,
            report.risk_predictions,
            owner
        );
        Ok(report)
    }

    /// Remove the caller's fields with everything attached, plus any record
    /// the caller owns directly.
    fn clear(&self, owner: UserId) -> usize {
        let field_ids = owned_field_ids(&self.store, owner);
        let attached = |field_id: &Uuid| field_ids.contains(field_id);

        self.store.fields.remove_where(|f| f.owner == owner)
            + self.store.spectral_health.remove_where(|r| attached(&r.field_id))
            + self.store.temporal.remove_where(|r| attached(&r.field_id))
            + self
                .store
                .soil_health
                .remove_where(|r| r.owner == owner || attached(&r.field_id))
            + self
                .store
                .alerts
                .remove_where(|a| a.owner == owner || attached(&a.field_id))
            + self
                .store
                .risk_predictions
                .remove_where(|p| p.owner == owner || attached(&p.field_id))
    }
}

/// Create every fixture for every fixture field in `store`.
fn populate(
    store: &Arc<Store>,
    fixtures: &SeedFixtures,
    owner: UserId,
    now: DateTime<Utc>,
) -> ServiceResult<SeedReport> {
    let fields = FieldService::new(store.clone());
    let spectral = SpectralHealthService::new(store.clone());
    let soil = SoilHealthService::new(store.clone());
    let temporal = TemporalAnalysisService::new(store.clone());
    let alerts = AlertService::new(store.clone());
    let risk = RiskPredictionService::new(store.clone());

    let mut report = SeedReport::default();

    for fixture in &fixtures.fields {
        let field = fields.create(owner, fixture.clone())?;
        report.fields += 1;
        let field_ref = Some(field.id.to_string());

        for fixture in &fixtures.spectral_health {
            let input = NewSpectralHealth { field_id: field_ref.clone(), ..fixture.clone() };
            spectral.create(owner, input)?;
            report.spectral_health += 1;
        }

        for fixture in &fixtures.soil_health {
            let input = NewSoilHealth { field_id: field_ref.clone(), ..fixture.clone() };
            soil.create(owner, input)?;
            report.soil_health += 1;
        }

        // Undated points are laid out oldest first, ending now
        let undated = fixtures.temporal_data.len() as i64;
        for (i, fixture) in fixtures.temporal_data.iter().enumerate() {
            let offset = Duration::days(TEMPORAL_FIXTURE_SPACING_DAYS * (undated - 1 - i as i64));
            let input = NewTemporalRecord {
                field_id: field_ref.clone(),
                measurement_date: fixture.measurement_date.or(Some(now - offset)),
                ..fixture.clone()
            };
            temporal.create(owner, input)?;
            report.temporal_analysis += 1;
        }

        for fixture in &fixtures.alerts {
            let input = NewAlert { field_id: field_ref.clone(), ..fixture.clone() };
            alerts.create(owner, input)?;
            report.alerts += 1;
        }

        for fixture in &fixtures.risk_predictions {
            let input = NewRiskPrediction { field_id: field_ref.clone(), ..fixture.clone() };
            risk.create(owner, input)?;
            report.risk_predictions += 1;
        }
    }

    Ok(report)
}
