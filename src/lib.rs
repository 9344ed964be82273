//! Agricultural field monitoring backend
//!
//! Resource services for a crop-monitoring dashboard: fields, alerts and four
//! telemetry resources (soil health, NDVI spectral health, temporal analysis,
//! risk predictions), backed by an in-memory document store.
//!
//! Layout:
//! - `scoring/`: pure soil score, status tiers and trend detection
//! - `models/`: stored documents and their create/update inputs
//! - `store`: typed in-memory collections
//! - `access`: field ownership checks
//! - `services/`: one service per resource, bundled by `Monitor`
//! - `config`: environment configuration for the binaries
//!
//! HTTP routing and sessions are left to the embedding application; every
//! service call takes the caller's `UserId` explicitly.

pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::MonitorConfig;
pub use error::{ServiceError, ServiceResult};
pub use models::{FieldKey, UserId};
pub use scoring::{classify_health, score_soil, soil_health_score, HealthStatus, Trend, TrendDirection};
pub use services::{Monitor, SeedFixtures, SeedReport};
pub use store::Store;
