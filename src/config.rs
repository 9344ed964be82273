//! Environment configuration
//!
//! | Variable              | Default            |
//! |-----------------------|--------------------|
//! | `AGRI_SEED_FIXTURES`  | embedded fixtures  |
//! | `AGRI_DEMO_USERNAME`  | `demo`             |
//! | `AGRI_DEMO_EMAIL`     | `demo@example.com` |
//! | `AGRI_DEMO_PASSWORD`  | `demo-password`    |
//! | `AGRI_TREND_DAYS`     | `30`               |

use crate::models::{Credentials, NewUser};
use crate::services::soil_health::DEFAULT_TREND_DAYS;
use crate::services::SeedFixtures;
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_DEMO_USERNAME: &str = "demo";
pub const DEFAULT_DEMO_EMAIL: &str = "demo@example.com";
pub const DEFAULT_DEMO_PASSWORD: &str = "demo-password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl DemoUser {
    pub fn registration(&self) -> NewUser {
        NewUser {
            full_name: "Demo Grower".to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: Some(self.username.clone()),
            email: None,
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub seed_fixtures: Option<PathBuf>,
    pub demo_user: DemoUser,
    /// Default soil trend window in days
    pub trend_days: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl MonitorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset; an unparsable
    /// trend window falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let trend_days = match get("AGRI_TREND_DAYS") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("AGRI_TREND_DAYS={:?} is not a day count, using {}", raw, DEFAULT_TREND_DAYS);
                DEFAULT_TREND_DAYS
            }),
            None => DEFAULT_TREND_DAYS,
        };

        MonitorConfig {
            seed_fixtures: get("AGRI_SEED_FIXTURES").map(PathBuf::from),
            demo_user: DemoUser {
                username: get("AGRI_DEMO_USERNAME").unwrap_or_else(|| DEFAULT_DEMO_USERNAME.to_string()),
                email: get("AGRI_DEMO_EMAIL").unwrap_or_else(|| DEFAULT_DEMO_EMAIL.to_string()),
                password: get("AGRI_DEMO_PASSWORD").unwrap_or_else(|| DEFAULT_DEMO_PASSWORD.to_string()),
            },
            trend_days,
        }
    }

    /// Fixtures from `seed_fixtures` when set, else the embedded set.
    pub fn load_fixtures(&self) -> Result<SeedFixtures> {
        match &self.seed_fixtures {
            Some(path) => {
                tracing::info!("Loading seed fixtures from {:?}", path);
                SeedFixtures::load(path)
            }
            None => SeedFixtures::embedded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: FxHashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.seed_fixtures, None);
        assert_eq!(config.demo_user.username, "demo");
        assert_eq!(config.demo_user.email, "demo@example.com");
        assert_eq!(config.trend_days, 30);
        assert_eq!(config.load_fixtures().unwrap().fields.len(), 3);
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("AGRI_DEMO_USERNAME", "ops"),
            ("AGRI_DEMO_EMAIL", "  "),
            ("AGRI_TREND_DAYS", "90"),
            ("AGRI_SEED_FIXTURES", "/tmp/fixtures.json"),
        ]));
        assert_eq!(config.demo_user.username, "ops");
        assert_eq!(config.demo_user.email, DEFAULT_DEMO_EMAIL);
        assert_eq!(config.trend_days, 90);
        assert_eq!(config.seed_fixtures, Some(PathBuf::from("/tmp/fixtures.json")));

        let bad = MonitorConfig::from_lookup(lookup(&[("AGRI_TREND_DAYS", "a month")]));
        assert_eq!(bad.trend_days, DEFAULT_TREND_DAYS);
    }

    #[test]
    fn test_missing_fixture_file_is_an_error() {
        let config = MonitorConfig::from_lookup(lookup(&[("AGRI_SEED_FIXTURES", "/nonexistent/x.json")]));
        assert!(config.load_fixtures().is_err());
    }

    #[test]
    fn test_demo_user_inputs() {
        let demo = MonitorConfig::default().demo_user;
        assert_eq!(demo.registration().username, "demo");
        assert_eq!(demo.credentials().password, DEFAULT_DEMO_PASSWORD);
    }
}
