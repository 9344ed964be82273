use crate::models::UserId;
use crate::utils::PasswordHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored account. Not serializable: use `UserProfile` for output.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account data safe to hand back to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        UserProfile {
            id: user.id,
            full_name: user.full_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input: username or email, plus password
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}
