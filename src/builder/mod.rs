//! Record builder subsystem
//!
//! Builds conference records one field at a time. Three field shapes exist:
//!
//! - scalar fields (`cnum`, `core`, dates, `short_description`) are
//!   overwritten on each call
//! - repeatable fields hold ordered lists; an entry structurally equal to one
//!   already present is never appended again
//! - sourced entries carry a `source` provenance key: the call-site source,
//!   else the builder default, else none
//!
//! # Usage
//!
//! ```ignore
//! use confbuilder::builder::ConferenceBuilder;
//!
//! let mut builder = ConferenceBuilder::with_source("submitter");
//! builder.add_title("Lattice 2018", None, None)?;
//! builder.set_cnum(Some("C18-07-22"));
//! builder.set_opening_date(Some("July 22, 2018"))?;
//! builder.validate_record()?;
//! let record = builder.into_record();
//! ```

mod conference;
mod entries;
mod errors;
mod fields;

pub use conference::{ConferenceBuilder, CONFERENCES_COLLECTION};
pub use entries::{
    reference, Address, Contact, ExternalSystemIdentifier, InspireCategory, Keyword, Note,
    RecordRef, Series, Title, Url,
};
pub use errors::{BuilderError, BuilderResult};
pub use fields::{ensure_dict_field, ensure_field, ensure_list_field, is_empty_value, strip_empties};
