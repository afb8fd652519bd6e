//! Date normalization for conference records
//!
//! Records store dates as canonical partial dates: `YYYY`, `YYYY-MM` or
//! `YYYY-MM-DD`. Input may come in a number of looser formats, see
//! [`PartialDate::parse`].

mod partial;

pub use partial::PartialDate;

use thiserror::Error;

/// Date parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unparseable date: {0:?}")]
    Unparseable(String),

    #[error("date out of range: {0:?}")]
    OutOfRange(String),
}

/// Result type for date operations
pub type DateResult<T> = Result<T, DateError>;

/// Normalize a date string into its canonical partial-date form.
///
/// ```ignore
/// assert_eq!(normalize_date("May 1, 2018")?, "2018-05-01");
/// assert_eq!(normalize_date("2018/05")?, "2018-05");
/// ```
pub fn normalize_date(date: &str) -> DateResult<String> {
    PartialDate::parse(date).map(|d| d.to_string())
}
