//! Conference record builder.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::entries::{
    reference, Address, Contact, ExternalSystemIdentifier, InspireCategory, Keyword, Note,
    RecordRef, Series, Title, Url,
};
use super::errors::{BuilderError, BuilderResult};
use super::fields::{ensure_list_field, is_empty_value, json_kind, strip_empties};
use crate::dates::normalize_date;
use crate::schema::{self, SchemaResult, CONFERENCES_SCHEMA};

/// Collection marker carried by every conference record
pub const CONFERENCES_COLLECTION: &str = "Conferences";

/// Where an entry's `source` comes from.
#[derive(Debug, Clone, Copy)]
enum Provenance<'s> {
    /// Call-site source, falling back to the builder default
    Sourced(Option<&'s str>),
    /// Call-site source only
    Explicit(Option<&'s str>),
    /// No `source` key
    Unsourced,
}

/// Incrementally builds a conference record.
///
/// Operations never validate; a record may be invalid between calls. Call
/// [`validate_record`](Self::validate_record) once the record is complete.
///
/// Every `add_*` operation is a no-op when all of its payload is empty (see
/// [`is_empty_value`]) or when its required part (a title, value or name) is
/// empty; optional parts or a source on their own never create an entry.
#[derive(Debug, Clone)]
pub struct ConferenceBuilder {
    record: Map<String, Value>,
    source: Option<String>,
}

impl Default for ConferenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConferenceBuilder {
    /// Builder over a fresh record holding only the collection marker.
    pub fn new() -> Self {
        let mut record = Map::new();
        record.insert(
            "_collections".to_string(),
            Value::Array(vec![Value::String(CONFERENCES_COLLECTION.to_string())]),
        );
        Self {
            record,
            source: None,
        }
    }

    /// Fresh builder whose entries default to `source`.
    pub fn with_source(source: impl Into<String>) -> Self {
        let mut builder = Self::new();
        builder.source = Some(source.into());
        builder
    }

    /// Builder continuing to edit an existing record.
    pub fn from_record(record: Map<String, Value>, source: Option<String>) -> Self {
        Self { record, source }
    }

    pub fn record(&self) -> &Map<String, Value> {
        &self.record
    }

    pub fn into_record(self) -> Map<String, Value> {
        self.record
    }

    /// The default source applied to sourced entries.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Validates the record against the conferences schema.
    pub fn validate_record(&self) -> SchemaResult<()> {
        schema::validate(&Value::Object(self.record.clone()), CONFERENCES_SCHEMA)
    }

    /// Adds `source` to `payload`.
    ///
    /// A non-empty `source` wins over the builder default; with neither, the
    /// payload is returned unchanged.
    pub fn sourced_dict(&self, source: Option<&str>, mut payload: Map<String, Value>) -> Map<String, Value> {
        let chosen = source
            .filter(|s| !s.is_empty())
            .or_else(|| self.source().filter(|s| !s.is_empty()));
        if let Some(source) = chosen {
            payload.insert("source".to_string(), Value::String(source.to_string()));
        }
        payload
    }

    /// Appends `element` to the list in `field`, creating the list if needed.
    ///
    /// Empty elements and elements already present (by structural equality)
    /// are skipped. Returns whether the list changed.
    pub fn append_to(&mut self, field: &str, element: Value) -> BuilderResult<bool> {
        if is_empty_value(&element) {
            debug!(field, "empty element skipped");
            return Ok(false);
        }
        self.push_unique(field, element)
    }

    /// Appends an object built from `fields` to the list in `field`.
    ///
    /// Empty values are dropped first and nothing is written if none remain.
    /// A `record` key holding a plain string becomes `{"$ref": <string>}`.
    pub fn append_fields(&mut self, field: &str, fields: Map<String, Value>) -> BuilderResult<bool> {
        let mut fields = strip_empties(fields);
        if fields.is_empty() {
            debug!(field, "empty entry skipped");
            return Ok(false);
        }

        if let Some(Value::String(id)) = fields.get("record") {
            let normalized = reference(id);
            fields.insert("record".to_string(), Value::Object(normalized));
        }

        self.push_unique(field, Value::Object(fields))
    }

    fn push_unique(&mut self, field: &str, element: Value) -> BuilderResult<bool> {
        ensure_list_field(&mut self.record, field);
        let list = match self.record.get_mut(field) {
            Some(Value::Array(list)) => list,
            other => {
                return Err(BuilderError::NotAList {
                    field: field.to_string(),
                    found: other.map_or("nothing", |v| json_kind(v)),
                })
            }
        };

        if list.contains(&element) {
            debug!(field, "duplicate entry skipped");
            return Ok(false);
        }
        list.push(element);
        debug!(field, len = list.len(), "entry appended");
        Ok(true)
    }

    /// Serializes `entry`, attaches provenance and appends it to `field`.
    ///
    /// Payload emptiness is judged before provenance is attached.
    fn add_entry<T: Serialize>(&mut self, field: &str, entry: &T, provenance: Provenance<'_>) -> BuilderResult<bool> {
        let payload = match serde_json::to_value(entry)? {
            Value::Object(map) => strip_empties(map),
            _ => {
                return Err(BuilderError::NotAnObject {
                    field: field.to_string(),
                })
            }
        };
        if payload.is_empty() {
            debug!(field, "entry without payload skipped");
            return Ok(false);
        }

        let payload = match provenance {
            Provenance::Sourced(source) => self.sourced_dict(source, payload),
            Provenance::Explicit(Some(source)) if !source.is_empty() => {
                let mut payload = payload;
                payload.insert("source".to_string(), Value::String(source.to_string()));
                payload
            }
            Provenance::Explicit(_) | Provenance::Unsourced => payload,
        };
        self.append_fields(field, payload)
    }

    /// Adds an acronym, e.g. `SUSY 2018`.
    pub fn add_acronym(&mut self, acronym: &str) -> BuilderResult<()> {
        self.append_to("acronyms", Value::String(acronym.to_string()))?;
        Ok(())
    }

    pub fn add_address(&mut self, address: &Address) -> BuilderResult<()> {
        self.add_entry("addresses", address, Provenance::Unsourced)?;
        Ok(())
    }

    pub fn add_alternative_title(&mut self, title: &str, subtitle: Option<&str>, source: Option<&str>) -> BuilderResult<()> {
        if !has_required("alternative_titles", &[title]) {
            return Ok(());
        }
        let entry = Title {
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
        };
        self.add_entry("alternative_titles", &entry, Provenance::Sourced(source))?;
        Ok(())
    }

    /// Adds a contact to `contact_details`.
    ///
    /// A structured record reference must carry a string `$ref`.
    pub fn add_contact(&mut self, contact: &Contact) -> BuilderResult<()> {
        if let Some(RecordRef::Structured(map)) = &contact.record {
            if !map.is_empty() && !map.get("$ref").is_some_and(Value::is_string) {
                return Err(BuilderError::invalid_reference(format!(
                    "expected {{\"$ref\": <string>}}, got {}",
                    Value::Object(map.clone())
                )));
            }
        }
        self.add_entry("contact_details", contact, Provenance::Unsourced)?;
        Ok(())
    }

    pub fn add_external_system_identifier(&mut self, value: &str, schema: &str) -> BuilderResult<()> {
        if !has_required("external_system_identifiers", &[value, schema]) {
            return Ok(());
        }
        let entry = ExternalSystemIdentifier {
            schema: schema.to_string(),
            value: value.to_string(),
        };
        self.add_entry("external_system_identifiers", &entry, Provenance::Unsourced)?;
        Ok(())
    }

    /// Adds one `inspire_categories` entry per term, all with the same source.
    pub fn add_inspire_categories<I, S>(&mut self, subject_terms: I, source: Option<&str>) -> BuilderResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for term in subject_terms {
            let entry = InspireCategory {
                term: term.as_ref().to_string(),
            };
            self.add_entry("inspire_categories", &entry, Provenance::Sourced(source))?;
        }
        Ok(())
    }

    pub fn add_keyword(&mut self, value: &str, schema: Option<&str>, source: Option<&str>) -> BuilderResult<()> {
        if !has_required("keywords", &[value]) {
            return Ok(());
        }
        let entry = Keyword {
            value: value.to_string(),
            schema: schema.map(str::to_string),
        };
        self.add_entry("keywords", &entry, Provenance::Sourced(source))?;
        Ok(())
    }

    pub fn add_public_note(&mut self, value: &str, source: Option<&str>) -> BuilderResult<()> {
        if !has_required("public_notes", &[value]) {
            return Ok(());
        }
        let entry = Note {
            value: value.to_string(),
        };
        self.add_entry("public_notes", &entry, Provenance::Sourced(source))?;
        Ok(())
    }

    /// Adds a note to `_private_notes`.
    ///
    /// Only a call-site source is recorded; the builder default is not applied.
    pub fn add_private_note(&mut self, value: &str, source: Option<&str>) -> BuilderResult<()> {
        if !has_required("_private_notes", &[value]) {
            return Ok(());
        }
        let entry = Note {
            value: value.to_string(),
        };
        self.add_entry("_private_notes", &entry, Provenance::Explicit(source))?;
        Ok(())
    }

    /// Adds a conference series. A zero `number` is treated as absent.
    pub fn add_series(&mut self, name: &str, number: Option<u32>) -> BuilderResult<()> {
        if !has_required("series", &[name]) {
            return Ok(());
        }
        let entry = Series {
            name: name.to_string(),
            number: number.filter(|n| *n != 0),
        };
        self.add_entry("series", &entry, Provenance::Sourced(None))?;
        Ok(())
    }

    pub fn add_title(&mut self, title: &str, subtitle: Option<&str>, source: Option<&str>) -> BuilderResult<()> {
        if !has_required("titles", &[title]) {
            return Ok(());
        }
        let entry = Title {
            title: title.to_string(),
            subtitle: subtitle.map(str::to_string),
        };
        self.add_entry("titles", &entry, Provenance::Sourced(source))?;
        Ok(())
    }

    pub fn add_url(&mut self, value: &str, description: Option<&str>) -> BuilderResult<()> {
        if !has_required("urls", &[value]) {
            return Ok(());
        }
        let entry = Url {
            value: value.to_string(),
            description: description.map(str::to_string),
        };
        self.add_entry("urls", &entry, Provenance::Unsourced)?;
        Ok(())
    }

    /// Sets the CNUM identifier; `None` leaves the record untouched.
    pub fn set_cnum(&mut self, cnum: Option<&str>) {
        if let Some(cnum) = cnum {
            self.set_scalar("cnum", Value::String(cnum.to_string()));
        }
    }

    /// Sets the core flag; `None` means `true`.
    pub fn set_core(&mut self, core: impl Into<Option<bool>>) {
        let core = core.into().unwrap_or(true);
        self.set_scalar("core", Value::Bool(core));
    }

    /// Sets the opening date after normalizing it; `None` leaves the record untouched.
    pub fn set_opening_date(&mut self, date: Option<&str>) -> BuilderResult<()> {
        self.set_date("opening_date", date)
    }

    /// Sets the closing date after normalizing it; `None` leaves the record untouched.
    pub fn set_closing_date(&mut self, date: Option<&str>) -> BuilderResult<()> {
        self.set_date("closing_date", date)
    }

    pub fn set_short_description(&mut self, value: &str, source: Option<&str>) {
        let mut payload = Map::new();
        payload.insert("value".to_string(), Value::String(value.to_string()));
        let description = self.sourced_dict(source, payload);
        self.set_scalar("short_description", Value::Object(description));
    }

    fn set_date(&mut self, field: &str, date: Option<&str>) -> BuilderResult<()> {
        if let Some(date) = date {
            let normalized = normalize_date(date)?;
            self.set_scalar(field, Value::String(normalized));
        }
        Ok(())
    }

    fn set_scalar(&mut self, field: &str, value: Value) {
        debug!(field, "scalar set");
        self.record.insert(field.to_string(), value);
    }
}

/// Whether every required payload part is non-empty.
///
/// An entry missing its required payload is skipped whole, whatever optional
/// parts were given.
fn has_required(field: &str, parts: &[&str]) -> bool {
    if parts.iter().any(|p| p.is_empty()) {
        debug!(field, "entry without required payload skipped");
        return false;
    }
    true
}
