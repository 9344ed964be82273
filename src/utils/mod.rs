//! Utility modules shared by the resource services
//!
//! - Aggregation: averages, distinct counts, tallies, latest-per-key
//! - Credentials: salted password hashing

pub mod aggregation;
pub mod credentials;

// Re-export commonly used helpers
pub use aggregation::{count_distinct, first_per_key, mean_or_zero, round2, tally};
pub use credentials::PasswordHash;
