//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string, optionally constrained by a regex pattern
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: 64-bit floating point
//! - date: canonical partial date (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
//! - enum: string drawn from a closed set of values
//! - object: Nested object with field schema
//! - array: Array with element type, optionally with unique items

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// 64-bit floating point
    Float,
    /// Partial date string in canonical form
    Date,
    /// String restricted to a closed vocabulary
    Enum {
        /// Allowed values
        values: Vec<String>,
    },
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions
        fields: BTreeMap<String, FieldDef>,
    },
    /// Array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
        /// Reject structurally equal elements
        #[serde(default, skip_serializing_if = "is_false")]
        unique_items: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Enum { .. } => "enum",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }

    /// Array of `element_type`
    pub fn array_of(element_type: FieldType) -> Self {
        FieldType::Array {
            element_type: Box::new(element_type),
            unique_items: false,
        }
    }

    /// Array of `element_type` rejecting duplicates
    pub fn unique_array_of(element_type: FieldType) -> Self {
        FieldType::Array {
            element_type: Box::new(element_type),
            unique_items: true,
        }
    }

    /// Object with the given fields
    pub fn object(fields: BTreeMap<String, FieldDef>) -> Self {
        FieldType::Object { fields }
    }

    fn check_structure(&self, path: &str) -> Result<(), String> {
        match self {
            FieldType::Enum { values } if values.is_empty() => {
                Err(format!("enum at '{}' declares no values", path))
            }
            FieldType::Object { fields } => check_fields(fields, path),
            FieldType::Array { element_type, .. } => element_type.check_structure(&format!("{}[]", path)),
            _ => Ok(()),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    #[serde(default)]
    pub required: bool,
    /// Regex the value must match (string fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldDef {
    pub fn new(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
            pattern: None,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::new(FieldType::String, true)
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::new(FieldType::String, false)
    }

    /// Create an optional int field
    pub fn optional_int() -> Self {
        Self::new(FieldType::Int, false)
    }

    /// Create an optional bool field
    pub fn optional_bool() -> Self {
        Self::new(FieldType::Bool, false)
    }

    /// Create an optional date field
    pub fn optional_date() -> Self {
        Self::new(FieldType::Date, false)
    }

    /// Create a required array field
    pub fn required_array(element_type: FieldType) -> Self {
        Self::new(FieldType::array_of(element_type), true)
    }

    /// Create an optional array field
    pub fn optional_array(element_type: FieldType) -> Self {
        Self::new(FieldType::array_of(element_type), false)
    }

    /// Attach a regex pattern to this field
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

fn check_fields(fields: &BTreeMap<String, FieldDef>, prefix: &str) -> Result<(), String> {
    for (name, def) in fields {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        if let Some(pattern) = &def.pattern {
            if def.field_type != FieldType::String {
                return Err(format!("pattern on non-string field '{}'", path));
            }
            Regex::new(pattern).map_err(|e| format!("invalid pattern for '{}': {}", path, e))?;
        }

        def.field_type.check_structure(&path)?;
    }
    Ok(())
}

/// Complete schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level field definitions
    pub fields: BTreeMap<String, FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: BTreeMap<String, FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        }
    }

    /// Returns the unique key for this schema (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Validates the schema structure itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("Schema must define at least one field".into());
        }
        check_fields(&self.fields, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        let mut fields = BTreeMap::new();
        fields.insert("cnum".into(), FieldDef::optional_string().with_pattern(r"^C\d\d$"));
        fields.insert("core".into(), FieldDef::optional_bool());
        fields.insert("acronyms".into(), FieldDef::optional_array(FieldType::String));
        Schema::new("conferences", "1", fields)
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_empty_schema_rejected() {
        let schema = Schema::new("conferences", "1", BTreeMap::new());
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut fields = BTreeMap::new();
        fields.insert("cnum".into(), FieldDef::optional_string().with_pattern("(unclosed"));
        let result = Schema::new("conferences", "1", fields).validate_structure();
        assert!(result.unwrap_err().contains("cnum"));
    }

    #[test]
    fn test_pattern_on_non_string_rejected() {
        let mut fields = BTreeMap::new();
        fields.insert("core".into(), FieldDef::optional_bool().with_pattern("x"));
        assert!(Schema::new("c", "1", fields).validate_structure().is_err());
    }

    #[test]
    fn test_empty_enum_in_nested_array_rejected() {
        let mut entry = BTreeMap::new();
        entry.insert(
            "term".into(),
            FieldDef::new(FieldType::Enum { values: vec![] }, true),
        );
        let mut fields = BTreeMap::new();
        fields.insert(
            "inspire_categories".into(),
            FieldDef::optional_array(FieldType::object(entry)),
        );

        let err = Schema::new("c", "1", fields).validate_structure().unwrap_err();
        assert!(err.contains("inspire_categories[].term"));
    }

    #[test]
    fn test_field_def_json_shape() {
        let def: FieldDef = serde_json::from_str(
            r#"{"type": "array", "element_type": {"type": "string"}, "unique_items": true, "required": true}"#,
        )
        .unwrap();
        assert!(def.required);
        assert_eq!(def.field_type, FieldType::unique_array_of(FieldType::String));

        let def: FieldDef = serde_json::from_str(r#"{"type": "date"}"#).unwrap();
        assert!(!def.required);
        assert_eq!(def.field_type.type_name(), "date");
    }
}
