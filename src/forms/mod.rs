//! Request bodies accepted by the JSON API and their conversion into
//! validated domain payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;
use validator::ValidationErrors;

pub mod client;
pub mod team;
pub mod visit;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),
}

impl FormError {
    /// Names of every field that failed validation, sorted.
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = match self {
            FormError::Validation(errors) => {
                errors.errors().keys().map(|key| key.to_string()).collect()
            }
            FormError::InvalidFields(fields) => fields.clone(),
        };
        fields.sort_unstable();
        fields.dedup();
        fields
    }
}

/// Accumulates invalid field names so a form reports all of them at once.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<String>);

impl FieldErrors {
    /// Starts from the outcome of the derived `validator` checks.
    pub(crate) fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::default(),
            Err(errors) => Self(errors.errors().keys().map(|k| k.to_string()).collect()),
        }
    }

    pub(crate) fn push(&mut self, field: &str) {
        if !self.0.iter().any(|f| f == field) {
            self.0.push(field.to_string());
        }
    }

    /// Keeps the value, or records `field` as invalid.
    pub(crate) fn check<T, E>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(_) => {
                self.push(field);
                None
            }
        }
    }

    /// Like [`FieldErrors::check`] for a field that must be present.
    pub(crate) fn require<T, E>(
        &mut self,
        field: &str,
        value: Option<Result<T, E>>,
    ) -> Option<T> {
        match value {
            Some(result) => self.check(field, result),
            None => {
                self.push(field);
                None
            }
        }
    }

    pub(crate) fn finish(mut self) -> Result<(), FormError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            self.0.sort_unstable();
            Err(FormError::InvalidFields(self.0))
        }
    }
}

/// Treats blank strings the same as an absent value.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses an API timestamp into naive UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS[.fff]`
/// and a bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc).naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
