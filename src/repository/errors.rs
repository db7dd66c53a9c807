//! Storage failures surfaced by the repository traits.

use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The client or team member row does not exist.
    #[error("record not found")]
    NotFound,

    /// The client is assigned to someone other than the expected agent at
    /// the time the write lock was taken.
    #[error("client is not assigned to the acting agent")]
    NotAssigned,

    #[error("database error: {0}")]
    DatabaseError(String),

    /// A stored value failed to convert into its domain type.
    #[error("invalid stored value: {0}")]
    ValidationError(String),

    #[error("no database connection: {0}")]
    ConnectionError(String),

    /// Unique email, foreign key or similar integrity rule.
    #[error("integrity rule violated: {0}")]
    ConstraintViolation(String),

    /// A concurrent writer claimed the same ledger slot first.
    #[error("ledger conflict: {0}")]
    Conflict(String),

    #[error("unexpected storage failure: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

fn integrity_rule(kind: &DatabaseErrorKind) -> Option<&'static str> {
    match kind {
        DatabaseErrorKind::UniqueViolation => Some("unique"),
        DatabaseErrorKind::ForeignKeyViolation => Some("foreign key"),
        DatabaseErrorKind::NotNullViolation => Some("not null"),
        DatabaseErrorKind::CheckViolation => Some("check"),
        _ => None,
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match integrity_rule(&kind) {
                Some(rule) => Self::ConstraintViolation(format!("{rule}: {}", info.message())),
                None => Self::DatabaseError(info.message().to_string()),
            },
            DieselError::SerializationError(e) | DieselError::DeserializationError(e) => {
                Self::ValidationError(e.to_string())
            }
            DieselError::RollbackTransaction
            | DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::BrokenTransactionManager => Self::DatabaseError(err.to_string()),
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_errors_map_to_repository_errors() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from(DieselError::RollbackTransaction),
            RepositoryError::DatabaseError(_)
        ));
        assert!(matches!(
            RepositoryError::from(DieselError::DeserializationError("bad status".into())),
            RepositoryError::ValidationError(message) if message == "bad status"
        ));
    }

    #[test]
    fn integrity_rules_are_named() {
        assert_eq!(
            integrity_rule(&DatabaseErrorKind::UniqueViolation),
            Some("unique")
        );
        assert_eq!(
            integrity_rule(&DatabaseErrorKind::ForeignKeyViolation),
            Some("foreign key")
        );
        assert_eq!(integrity_rule(&DatabaseErrorKind::ClosedConnection), None);
    }
}
