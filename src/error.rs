//! Service error kinds
//!
//! Each kind carries the HTTP status an outer API layer should answer with.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::Unauthorized(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::Validation(msg)
            | ServiceError::Unauthorized(msg)
            | ServiceError::Forbidden(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::Conflict(msg)
            | ServiceError::Internal(msg) => msg,
        }
    }

    /// "Required fields: a, b, c"
    pub fn required(fields: &[&str]) -> Self {
        ServiceError::Validation(format!("Required fields: {}", fields.join(", ")))
    }

    pub fn field_not_found() -> Self {
        ServiceError::NotFound("Field not found or access denied".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::required(&["fieldId"]).status_code(), 400);
        assert_eq!(ServiceError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(ServiceError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(ServiceError::field_not_found().status_code(), 404);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), 409);
        assert_eq!(ServiceError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_messages() {
        let err = ServiceError::required(&["fieldId", "zoneId"]);
        assert_eq!(err.to_string(), "Required fields: fieldId, zoneId");
        assert_eq!(err.message(), "Required fields: fieldId, zoneId");
        assert_eq!(ServiceError::field_not_found().message(), "Field not found or access denied");
    }
}
