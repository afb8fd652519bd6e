//! Schema error types
//!
//! Error codes:
//! - CONF_UNKNOWN_SCHEMA
//! - CONF_UNKNOWN_SCHEMA_VERSION
//! - CONF_SCHEMA_VALIDATION_FAILED
//! - CONF_SCHEMA_IMMUTABLE
//! - CONF_SCHEMA_MALFORMED

use std::fmt;

use thiserror::Error;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema ID not found
    UnknownSchema,
    /// Schema version not found
    UnknownSchemaVersion,
    /// Record violates schema
    ValidationFailed,
    /// Attempt to register a schema version twice
    SchemaImmutable,
    /// Schema file or definition is unusable
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownSchema => "CONF_UNKNOWN_SCHEMA",
            SchemaErrorCode::UnknownSchemaVersion => "CONF_UNKNOWN_SCHEMA_VERSION",
            SchemaErrorCode::ValidationFailed => "CONF_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::SchemaImmutable => "CONF_SCHEMA_IMMUTABLE",
            SchemaErrorCode::MalformedSchema => "CONF_SCHEMA_MALFORMED",
        }
    }

    /// Whether the error is about the record rather than the schema registry
    pub fn is_record_error(&self) -> bool {
        matches!(self, SchemaErrorCode::ValidationFailed)
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "titles[0].title")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn duplicate_item(field: impl Into<String>) -> Self {
        Self::new(field, "unique items", "duplicate item")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error type with full context
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    schema_id: Option<String>,
    schema_version: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    /// Create an unknown schema error
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        let id = schema_id.into();
        Self {
            code: SchemaErrorCode::UnknownSchema,
            message: format!("Schema '{}' not found", id),
            schema_id: Some(id),
            schema_version: None,
            details: None,
        }
    }

    /// Create an unknown schema version error
    pub fn unknown_version(schema_id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = schema_id.into();
        let ver = version.into();
        Self {
            code: SchemaErrorCode::UnknownSchemaVersion,
            message: format!("Schema '{}' version '{}' not found", id, ver),
            schema_id: Some(id),
            schema_version: Some(ver),
            details: None,
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        details: ValidationDetails,
    ) -> Self {
        Self {
            code: SchemaErrorCode::ValidationFailed,
            message: format!("Record validation failed: {}", details),
            schema_id: Some(schema_id.into()),
            schema_version: Some(schema_version.into()),
            details: Some(details),
        }
    }

    /// Create a schema immutable error
    pub fn schema_immutable(schema_id: impl Into<String>, version: impl Into<String>) -> Self {
        let id = schema_id.into();
        let ver = version.into();
        Self {
            code: SchemaErrorCode::SchemaImmutable,
            message: format!("Schema '{}' version '{}' is immutable", id, ver),
            schema_id: Some(id),
            schema_version: Some(ver),
            details: None,
        }
    }

    /// Create an error for a malformed schema file or definition
    pub fn malformed_schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", path.into(), reason.into()),
            schema_id: None,
            schema_version: None,
            details: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema ID if applicable
    pub fn schema_id(&self) -> Option<&str> {
        self.schema_id.as_deref()
    }

    /// Returns the schema version if applicable
    pub fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(SchemaErrorCode::UnknownSchema.code(), "CONF_UNKNOWN_SCHEMA");
        assert_eq!(SchemaErrorCode::UnknownSchemaVersion.code(), "CONF_UNKNOWN_SCHEMA_VERSION");
        assert_eq!(SchemaErrorCode::ValidationFailed.code(), "CONF_SCHEMA_VALIDATION_FAILED");
        assert_eq!(SchemaErrorCode::SchemaImmutable.code(), "CONF_SCHEMA_IMMUTABLE");
        assert_eq!(SchemaErrorCode::MalformedSchema.code(), "CONF_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_only_validation_failures_are_record_errors() {
        assert!(SchemaErrorCode::ValidationFailed.is_record_error());
        assert!(!SchemaErrorCode::UnknownSchema.is_record_error());
        assert!(!SchemaErrorCode::MalformedSchema.is_record_error());
    }

    #[test]
    fn test_validation_details_display() {
        let details = ValidationDetails::type_mismatch("core", "bool", "string");
        let display = format!("{}", details);
        assert!(display.contains("core"));
        assert!(display.contains("bool"));
        assert!(display.contains("string"));
    }

    #[test]
    fn test_error_display_includes_code_and_path() {
        let err = SchemaError::validation_failed(
            "conferences",
            "1",
            ValidationDetails::missing_field("titles"),
        );
        let display = format!("{}", err);
        assert!(display.starts_with("CONF_SCHEMA_VALIDATION_FAILED"));
        assert!(display.contains("titles"));
        assert_eq!(err.schema_id(), Some("conferences"));
        assert_eq!(err.schema_version(), Some("1"));
    }
}
