//! Entry shapes stored in repeatable and sourced record fields.
//!
//! Entries carry only their payload. Provenance is attached by the builder
//! when the entry is written, see [`ConferenceBuilder::sourced_dict`].
//!
//! [`ConferenceBuilder::sourced_dict`]: super::ConferenceBuilder::sourced_dict

use serde::Serialize;
use serde_json::{Map, Value};

/// A conference title, used for both `titles` and `alternative_titles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Title {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// A conference venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Address {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub postal_address: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Pointer to another record.
///
/// Either a raw identifier such as `"https://host/api/authors/42"`, which is
/// stored as `{"$ref": "<identifier>"}`, or a reference already in that shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordRef {
    Raw(String),
    Structured(Map<String, Value>),
}

impl RecordRef {
    /// The reference in its stored `{"$ref": ...}` shape.
    pub fn to_reference(&self) -> Map<String, Value> {
        match self {
            RecordRef::Raw(id) => reference(id),
            RecordRef::Structured(map) => map.clone(),
        }
    }
}

impl From<&str> for RecordRef {
    fn from(id: &str) -> Self {
        RecordRef::Raw(id.to_string())
    }
}

impl From<String> for RecordRef {
    fn from(id: String) -> Self {
        RecordRef::Raw(id)
    }
}

impl From<Map<String, Value>> for RecordRef {
    fn from(map: Map<String, Value>) -> Self {
        RecordRef::Structured(map)
    }
}

/// Builds the `{"$ref": id}` reference shape.
pub fn reference(id: &str) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("$ref".to_string(), Value::String(id.to_string()));
    map
}

/// A person to contact about the conference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curated_relation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Public or private free-text note, also the short description payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub value: String,
}

/// Membership of a conference series; `number` is the edition in the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Url {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalSystemIdentifier {
    pub schema: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspireCategory {
    pub term: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_parts_are_omitted() {
        let title = Title {
            title: "Lattice 2018".into(),
            subtitle: None,
        };
        assert_eq!(serde_json::to_value(&title).unwrap(), json!({"title": "Lattice 2018"}));

        let address = Address {
            cities: vec!["East Lansing".into()],
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&address).unwrap(), json!({"cities": ["East Lansing"]}));
    }

    #[test]
    fn test_record_ref_shapes() {
        let raw = RecordRef::from("/records/42");
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!("/records/42"));
        assert_eq!(Value::Object(raw.to_reference()), json!({"$ref": "/records/42"}));

        let structured = RecordRef::from(reference("/records/7"));
        assert_eq!(serde_json::to_value(&structured).unwrap(), json!({"$ref": "/records/7"}));
    }
}
