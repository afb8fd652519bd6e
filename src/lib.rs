//! confbuilder - incremental builder and validator for conference records
//!
//! A conference record is a JSON object. [`builder::ConferenceBuilder`]
//! accumulates fields into it with deduplication and provenance tracking;
//! [`schema`] validates the finished record against the conferences schema.

pub mod builder;
pub mod dates;
pub mod schema;
