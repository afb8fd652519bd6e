//! Schema validator for records
//!
//! Validation semantics:
//! - All required fields are present
//! - No undeclared fields exist
//! - Field types exactly match schema types
//! - String patterns, enum vocabularies and date formats hold
//! - Arrays declared with unique items hold no duplicates
//!
//! Forbidden:
//! - Null values
//! - Implicit type coercion (except int where float is expected)
//!
//! The first violation found aborts validation. Fields are checked in key
//! order so the reported violation is deterministic.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::loader::SchemaLoader;
use super::types::{FieldDef, FieldType};
use crate::dates::PartialDate;

/// Schema validator that enforces schema rules on records.
///
/// The validator never mutates the record.
pub struct SchemaValidator<'a> {
    loader: &'a SchemaLoader,
}

/// Schema coordinates threaded through the recursive checks
struct Ctx<'s> {
    schema_id: &'s str,
    schema_version: &'s str,
}

impl Ctx<'_> {
    fn fail(&self, details: ValidationDetails) -> SchemaError {
        SchemaError::validation_failed(self.schema_id, self.schema_version, details)
    }

    fn type_error(&self, field_path: &str, expected: &str, actual: &Value) -> SchemaError {
        self.fail(ValidationDetails::type_mismatch(
            field_path,
            expected,
            json_type_name(actual),
        ))
    }
}

impl<'a> SchemaValidator<'a> {
    /// Creates a new validator backed by the given schema loader.
    pub fn new(loader: &'a SchemaLoader) -> Self {
        Self { loader }
    }

    /// Validates a record against a specific schema version.
    ///
    /// # Errors
    ///
    /// - `CONF_UNKNOWN_SCHEMA` if the schema id is not registered
    /// - `CONF_UNKNOWN_SCHEMA_VERSION` if the version is not registered
    /// - `CONF_SCHEMA_VALIDATION_FAILED` with details on the first violation
    pub fn validate_document(
        &self,
        schema_id: &str,
        schema_version: &str,
        document: &Value,
    ) -> SchemaResult<()> {
        if !self.loader.schema_id_exists(schema_id) {
            return Err(SchemaError::unknown_schema(schema_id));
        }

        let schema = self
            .loader
            .get(schema_id, schema_version)
            .ok_or_else(|| SchemaError::unknown_version(schema_id, schema_version))?;

        let ctx = Ctx {
            schema_id,
            schema_version,
        };

        let doc_obj = document
            .as_object()
            .ok_or_else(|| ctx.type_error("$root", "object", document))?;

        validate_object(&ctx, doc_obj, &schema.fields, "")
    }

    /// Validates a record against the latest version of a schema.
    pub fn validate_latest(&self, schema_id: &str, document: &Value) -> SchemaResult<()> {
        let schema = self
            .loader
            .latest(schema_id)
            .ok_or_else(|| SchemaError::unknown_schema(schema_id))?;
        self.validate_document(schema_id, &schema.schema_version, document)
    }
}

fn validate_object(
    ctx: &Ctx<'_>,
    obj: &Map<String, Value>,
    fields: &BTreeMap<String, FieldDef>,
    path_prefix: &str,
) -> SchemaResult<()> {
    let mut keys: Vec<&String> = obj.keys().collect();
    keys.sort();
    for key in keys {
        if !fields.contains_key(key) {
            return Err(ctx.fail(ValidationDetails::extra_field(make_path(path_prefix, key))));
        }
    }

    for (field_name, field_def) in fields {
        let field_path = make_path(path_prefix, field_name);

        match obj.get(field_name) {
            Some(Value::Null) => {
                return Err(ctx.fail(ValidationDetails::null_value(&field_path)));
            }
            Some(value) => {
                validate_value(ctx, value, &field_def.field_type, &field_path)?;
                if let Some(pattern) = &field_def.pattern {
                    validate_pattern(ctx, value, pattern, &field_path)?;
                }
            }
            None if field_def.required => {
                return Err(ctx.fail(ValidationDetails::missing_field(field_path)));
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_value(
    ctx: &Ctx<'_>,
    value: &Value,
    expected_type: &FieldType,
    field_path: &str,
) -> SchemaResult<()> {
    match expected_type {
        FieldType::String => {
            if !value.is_string() {
                return Err(ctx.type_error(field_path, "string", value));
            }
        }
        FieldType::Int => {
            if !value.is_i64() && !value.is_u64() {
                return Err(ctx.type_error(field_path, "int", value));
            }
        }
        FieldType::Bool => {
            if !value.is_boolean() {
                return Err(ctx.type_error(field_path, "bool", value));
            }
        }
        FieldType::Float => {
            // Integers are acceptable floats
            if !value.is_number() {
                return Err(ctx.type_error(field_path, "float", value));
            }
        }
        FieldType::Date => {
            let text = value
                .as_str()
                .ok_or_else(|| ctx.type_error(field_path, "date", value))?;
            if PartialDate::parse_canonical(text).is_err() {
                return Err(ctx.fail(ValidationDetails::new(
                    field_path,
                    "date as YYYY, YYYY-MM or YYYY-MM-DD",
                    format!("'{}'", text),
                )));
            }
        }
        FieldType::Enum { values } => {
            let text = value
                .as_str()
                .ok_or_else(|| ctx.type_error(field_path, "enum", value))?;
            if !values.iter().any(|v| v == text) {
                return Err(ctx.fail(ValidationDetails::new(
                    field_path,
                    format!("one of {:?}", values),
                    format!("'{}'", text),
                )));
            }
        }
        FieldType::Object { fields } => {
            let obj = value
                .as_object()
                .ok_or_else(|| ctx.type_error(field_path, "object", value))?;
            validate_object(ctx, obj, fields, field_path)?;
        }
        FieldType::Array {
            element_type,
            unique_items,
        } => {
            let arr = value
                .as_array()
                .ok_or_else(|| ctx.type_error(field_path, "array", value))?;

            for (i, elem) in arr.iter().enumerate() {
                let elem_path = format!("{}[{}]", field_path, i);

                if elem.is_null() {
                    return Err(ctx.fail(ValidationDetails::null_value(&elem_path)));
                }

                if *unique_items && arr[..i].contains(elem) {
                    return Err(ctx.fail(ValidationDetails::duplicate_item(&elem_path)));
                }

                validate_value(ctx, elem, element_type, &elem_path)?;
            }
        }
    }

    Ok(())
}

fn validate_pattern(ctx: &Ctx<'_>, value: &Value, pattern: &str, field_path: &str) -> SchemaResult<()> {
    // Patterns are checked when the schema is registered
    let re = Regex::new(pattern).map_err(|e| {
        SchemaError::malformed_schema(ctx.schema_id, format!("pattern for '{}': {}", field_path, e))
    })?;

    if let Some(text) = value.as_str() {
        if !re.is_match(text) {
            return Err(ctx.fail(ValidationDetails::new(
                field_path,
                format!("match for /{}/", pattern),
                format!("'{}'", text),
            )));
        }
    }
    Ok(())
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
