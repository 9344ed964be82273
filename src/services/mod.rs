//! Resource services
//!
//! Each service is a cheap `Clone` handle over the shared `Store`. Every
//! operation takes the caller's `UserId` and checks field ownership before
//! touching any record.

pub mod alerts;
pub mod fields;
pub mod risk_predictions;
pub mod seed;
pub mod soil_health;
pub mod spectral_health;
pub mod temporal_analysis;
pub mod users;
pub(crate) mod validation;

pub use alerts::{ActiveAlertQuery, AlertService, AlertSummary, AlertView, FieldAlerts};
pub use fields::{FieldDeletion, FieldQuery, FieldService, FieldSummary};
pub use risk_predictions::{
    HighRiskZones, RankedRecommendation, RiskPredictionList, RiskPredictionService, RiskQuery,
    RiskRecommendations, RiskSummary, RiskZoneMap,
};
pub use seed::{Catalogues, SeedFixtures, SeedReport, SeedService};
pub use soil_health::{SoilHealthService, SoilOverview, SoilSummary, SoilTrendReport, SoilZoneHistory};
pub use spectral_health::{SpectralHealthService, SpectralMap, SpectralSummary, SpectralZoneHistory};
pub use temporal_analysis::{
    EnvironmentalHistory, TemporalAnalysis, TemporalAnalysisService, TemporalTrendReport,
    VegetationMoistureHistory,
};
pub use users::UserService;

use crate::store::Store;
use std::sync::Arc;

/// Every service over one store
#[derive(Clone)]
pub struct Monitor {
    pub store: Arc<Store>,
    pub users: UserService,
    pub fields: FieldService,
    pub alerts: AlertService,
    pub soil_health: SoilHealthService,
    pub spectral_health: SpectralHealthService,
    pub temporal: TemporalAnalysisService,
    pub risk: RiskPredictionService,
    pub seed: SeedService,
}

impl Monitor {
    pub fn new(store: Arc<Store>, fixtures: SeedFixtures) -> Self {
        Monitor {
            users: UserService::new(store.clone()),
            fields: FieldService::new(store.clone()),
            alerts: AlertService::new(store.clone()),
            soil_health: SoilHealthService::new(store.clone()),
            spectral_health: SpectralHealthService::new(store.clone()),
            temporal: TemporalAnalysisService::new(store.clone()),
            risk: RiskPredictionService::new(store.clone()),
            seed: SeedService::new(store.clone(), fixtures),
            store,
        }
    }

    /// Fresh empty store with the embedded fixtures.
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(Arc::new(Store::new()), SeedFixtures::embedded()?))
    }
}
