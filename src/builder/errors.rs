//! Builder error types

use thiserror::Error;

use crate::dates::DateError;

/// Result type for builder operations
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors raised while mutating a record.
///
/// Schema violations are not builder errors; they surface only from
/// `validate_record`.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("field '{field}' holds {found}, expected a list")]
    NotAList { field: String, found: &'static str },

    #[error("invalid record reference: {reason}")]
    InvalidReference { reason: String },

    #[error("date normalization failed: {0}")]
    Date(#[from] DateError),

    #[error("entry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("entry for '{field}' did not serialize to an object")]
    NotAnObject { field: String },
}

impl BuilderError {
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_field() {
        let err = BuilderError::NotAList {
            field: "titles".into(),
            found: "string",
        };
        assert_eq!(err.to_string(), "field 'titles' holds string, expected a list");
    }

    #[test]
    fn test_date_errors_convert() {
        let err: BuilderError = DateError::Unparseable("soon".into()).into();
        assert!(matches!(err, BuilderError::Date(_)));
        assert!(err.to_string().contains("soon"));
    }
}
