//! User accounts: registration and credential checks
//!
//! Session and token issuance belong to the outer API layer; this service only
//! answers "who is this" with a `UserProfile`.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Credentials, NewUser, User, UserId, UserProfile};
use crate::services::validation::present_text;
use crate::store::Store;
use crate::utils::PasswordHash;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    store: Arc<Store>,
}

impl UserService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn register(&self, input: NewUser) -> ServiceResult<UserProfile> {
        let (Some(full_name), Some(username), Some(email), Some(password)) = (
            present_text(Some(input.full_name)),
            present_text(Some(input.username)),
            present_text(Some(input.email)),
            present_text(Some(input.password)),
        ) else {
            return Err(ServiceError::Validation("All fields should be non empty".to_string()));
        };

        let password = PasswordHash::new(&password).map_err(|err| {
            tracing::error!("Password hashing failed: {}", err);
            ServiceError::Internal("Could not register user".to_string())
        })?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            full_name,
            username: username.to_lowercase(),
            email,
            password,
            created_at: now,
            updated_at: now,
        };

        let user = self
            .store
            .users
            .insert_unique(user, |existing, new| {
                existing.username == new.username || existing.email == new.email
            })
            .map_err(|_| {
                ServiceError::Conflict("User with the same username or email already exists".to_string())
            })?;

        tracing::info!("Registered user {} ({})", user.username, user.id);
        Ok(UserProfile::from(&user))
    }

    /// Look the user up by username or email and check the password.
    pub fn authenticate(&self, credentials: &Credentials) -> ServiceResult<UserProfile> {
        let username = present_text(credentials.username.clone()).map(|u| u.to_lowercase());
        let email = present_text(credentials.email.clone());
        if username.is_none() && email.is_none() {
            return Err(ServiceError::Validation(
                "either of username or email is required".to_string(),
            ));
        }

        let user = self
            .store
            .users
            .find_one(|u| {
                username.as_deref() == Some(u.username.as_str()) || email.as_deref() == Some(u.email.as_str())
            })
            .ok_or_else(|| ServiceError::NotFound("User does not exist".to_string()))?;

        if !user.password.verify(&credentials.password) {
            tracing::warn!("Failed login for {}", user.username);
            return Err(ServiceError::Unauthorized("Invalid user credentials".to_string()));
        }

        tracing::debug!("User {} authenticated", user.username);
        Ok(UserProfile::from(&user))
    }

    pub fn current_user(&self, owner: UserId) -> ServiceResult<UserProfile> {
        self.store
            .users
            .get(owner.0)
            .map(|user| UserProfile::from(&user))
            .ok_or_else(|| ServiceError::NotFound("User does not exist".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UserService {
        UserService::new(Arc::new(Store::new()))
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            full_name: "Dana Grower".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[test]
    fn test_register_normalizes_and_rejects_duplicates() {
        let svc = service();
        let profile = svc.register(new_user("  FarmerDana ", "dana@example.com")).unwrap();
        assert_eq!(profile.username, "farmerdana");

        let same_name = svc.register(new_user("farmerdana", "other@example.com")).unwrap_err();
        assert_eq!(same_name.status_code(), 409);
        let same_email = svc.register(new_user("someone", "dana@example.com")).unwrap_err();
        assert_eq!(same_email.status_code(), 409);

        let blank = svc.register(new_user(" ", "x@example.com")).unwrap_err();
        assert_eq!(blank, ServiceError::Validation("All fields should be non empty".into()));
    }

    #[test]
    fn test_authenticate() {
        let svc = service();
        let profile = svc.register(new_user("dana", "dana@example.com")).unwrap();

        let by_name = Credentials {
            username: Some("Dana".into()),
            email: None,
            password: "hunter22".into(),
        };
        assert_eq!(svc.authenticate(&by_name).unwrap().id, profile.id);

        let by_email = Credentials {
            username: None,
            email: Some("dana@example.com".into()),
            password: "hunter22".into(),
        };
        assert_eq!(svc.authenticate(&by_email).unwrap().id, profile.id);

        let wrong = Credentials { password: "nope".into(), ..by_name.clone() };
        assert_eq!(svc.authenticate(&wrong).unwrap_err().status_code(), 401);

        let unknown = Credentials { username: Some("ghost".into()), ..by_name.clone() };
        assert_eq!(svc.authenticate(&unknown).unwrap_err().status_code(), 404);

        let anonymous = Credentials { password: "hunter22".into(), ..Default::default() };
        assert_eq!(svc.authenticate(&anonymous).unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_current_user() {
        let svc = service();
        let profile = svc.register(new_user("dana", "dana@example.com")).unwrap();
        assert_eq!(svc.current_user(profile.id).unwrap().email, "dana@example.com");
        assert!(svc.current_user(UserId::new()).is_err());

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fullName"], "Dana Grower");
    }
}
