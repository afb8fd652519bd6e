//! Schema subsystem
//!
//! Records are plain JSON objects. A schema describes which fields a record
//! may carry, which are required, and the shape of each value.
//!
//! # Design Principles
//!
//! - Validation is an explicit step, never implied by building a record
//! - Registered schema versions are immutable
//! - No nulls, defaults, or coercion
//! - Deterministic validation: the same record always reports the same violation

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use loader::{SchemaLoader, CONFERENCES_SCHEMA};
pub use types::{FieldDef, FieldType, Schema};
pub use validator::SchemaValidator;

use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

static BUILTIN: OnceLock<SchemaLoader> = OnceLock::new();

/// Registry of the built-in schemas, parsed once per process.
fn builtin_loader() -> SchemaResult<&'static SchemaLoader> {
    if let Some(loader) = BUILTIN.get() {
        return Ok(loader);
    }
    let loader = SchemaLoader::builtin()?;
    Ok(BUILTIN.get_or_init(|| loader))
}

/// Validates `record` against the latest built-in version of `schema_name`.
pub fn validate(record: &Value, schema_name: &str) -> SchemaResult<()> {
    let loader = builtin_loader()?;
    let result = SchemaValidator::new(loader).validate_latest(schema_name, record);

    match &result {
        Ok(()) => debug!(schema = schema_name, "record valid"),
        Err(e) => warn!(schema = schema_name, code = %e.code(), "record invalid: {}", e.message()),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_minimal_conference() {
        let record = json!({
            "_collections": ["Conferences"],
            "titles": [{"title": "Lattice 2018"}]
        });
        assert!(validate(&record, CONFERENCES_SCHEMA).is_ok());
    }

    #[test]
    fn test_validate_requires_titles() {
        let record = json!({ "_collections": ["Conferences"] });
        let err = validate(&record, CONFERENCES_SCHEMA).unwrap_err();
        assert_eq!(err.details().unwrap().field, "titles");
    }

    #[test]
    fn test_builtin_registry_is_built_once() {
        let first = builtin_loader().unwrap();
        let second = builtin_loader().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_validate_unknown_schema() {
        let err = validate(&json!({}), "hep").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnknownSchema);
    }
}
