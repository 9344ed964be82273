//! Password hashing
//!
//! bcrypt with a per-hash random salt; the stored string carries salt and cost.

use std::fmt;

/// Minimum bcrypt cost under unit tests
const HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(password: &str) -> Result<Self, bcrypt::BcryptError> {
        bcrypt::hash(password, HASH_COST).map(PasswordHash)
    }

    /// A malformed stored hash never verifies.
    pub fn verify(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.0).unwrap_or(false)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
