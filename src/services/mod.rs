//! Service layer: validation, authorization and orchestration of the
//! repositories for every API operation.
//!
//! Each service takes the acting [`crate::domain::actor::Actor`] explicitly.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod clients;
pub mod dashboard;
pub mod scope;
pub mod team;
#[cfg(all(test, feature = "test-mocks"))]
mod test_support;
pub mod visits;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Access denied")]
    AccessDenied,

    /// Names of every field that failed validation.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::NotAssigned => ServiceError::AccessDenied,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_details_are_hidden() {
        let err = ServiceError::from(RepositoryError::DatabaseError("disk I/O error".into()));
        assert!(matches!(err, ServiceError::Internal));
        assert_eq!(err.to_string(), "Internal error");
    }

    #[test]
    fn domain_outcomes_are_kept() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict("taken".into())),
            ServiceError::Conflict(m) if m == "taken"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::NotAssigned),
            ServiceError::AccessDenied
        ));
    }
}
