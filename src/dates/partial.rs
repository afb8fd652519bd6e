//! Partial dates: a year, optionally refined by month and day.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Month, NaiveDate, NaiveDateTime};
use regex::Regex;

use super::{DateError, DateResult};

/// A date known to year, month or day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartialDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

struct Patterns {
    numeric: Regex,
    month_first: Regex,
    day_name_year: Regex,
    name_day_year: Regex,
    name_year: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // 2018, 2018-05, 2018/5/1
        numeric: Regex::new(r"^(\d{4})(?:[-/.](\d{1,2})(?:[-/.](\d{1,2}))?)?$").expect("static date pattern"),
        // 05/01/2018 (month first unless the first number cannot be a month)
        month_first: Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})$").expect("static date pattern"),
        // 1 May 2018, 1 May, 2018
        day_name_year: Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{4})$").expect("static date pattern"),
        // May 1, 2018
        name_day_year: Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$").expect("static date pattern"),
        // May 2018
        name_year: Regex::new(r"^([A-Za-z]+)\.?,?\s+(\d{4})$").expect("static date pattern"),
    })
}

impl PartialDate {
    /// Build a partial date, checking it against the calendar.
    ///
    /// A day without a month is rejected.
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> DateResult<Self> {
        let out_of_range = || {
            let rendered = match (month, day) {
                (Some(m), Some(d)) => format!("{}-{}-{}", year, m, d),
                (Some(m), None) => format!("{}-{}", year, m),
                (None, Some(d)) => format!("{}-?-{}", year, d),
                (None, None) => year.to_string(),
            };
            DateError::OutOfRange(rendered)
        };

        if day.is_some() && month.is_none() {
            return Err(out_of_range());
        }
        NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)).ok_or_else(out_of_range)?;

        Ok(Self { year, month, day })
    }

    /// Parse a date written in any of the accepted input formats.
    ///
    /// Accepted: `YYYY`, `YYYY-MM`, `YYYY-MM-DD` (also with `/` or `.`),
    /// ISO datetimes, `MM/DD/YYYY` (read as `DD/MM/YYYY` when the first number
    /// is above 12 and the second is not), `1 May 2018`, `May 1, 2018`, `May 2018`.
    /// Month names may be full or abbreviated.
    pub fn parse(input: &str) -> DateResult<Self> {
        let text = input.trim();
        let unparseable = || DateError::Unparseable(input.to_string());

        if text.is_empty() {
            return Err(unparseable());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self::from(dt.date_naive()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Self::from(dt.date()));
            }
        }

        let p = patterns();

        if let Some(caps) = p.numeric.captures(text) {
            let year = parse_number(&caps[1]).ok_or_else(unparseable)?;
            let month = caps.get(2).and_then(|m| parse_number(m.as_str()));
            let day = caps.get(3).and_then(|d| parse_number(d.as_str()));
            return Self::new(year, month, day);
        }

        if let Some(caps) = p.month_first.captures(text) {
            let first = parse_number(&caps[1]).ok_or_else(unparseable)?;
            let second = parse_number(&caps[2]).ok_or_else(unparseable)?;
            let year = parse_number(&caps[3]).ok_or_else(unparseable)?;
            let (month, day) = if first > 12 && second <= 12 {
                (second, first)
            } else {
                (first, second)
            };
            return Self::new(year, Some(month), Some(day));
        }

        if let Some(caps) = p.day_name_year.captures(text) {
            let day = parse_number(&caps[1]).ok_or_else(unparseable)?;
            let month = month_number(&caps[2]).ok_or_else(unparseable)?;
            let year = parse_number(&caps[3]).ok_or_else(unparseable)?;
            return Self::new(year, Some(month), Some(day));
        }

        if let Some(caps) = p.name_day_year.captures(text) {
            let month = month_number(&caps[1]).ok_or_else(unparseable)?;
            let day = parse_number(&caps[2]).ok_or_else(unparseable)?;
            let year = parse_number(&caps[3]).ok_or_else(unparseable)?;
            return Self::new(year, Some(month), Some(day));
        }

        if let Some(caps) = p.name_year.captures(text) {
            let month = month_number(&caps[1]).ok_or_else(unparseable)?;
            let year = parse_number(&caps[2]).ok_or_else(unparseable)?;
            return Self::new(year, Some(month), None);
        }

        Err(unparseable())
    }

    /// Parse only the canonical form produced by `Display`.
    pub fn parse_canonical(input: &str) -> DateResult<Self> {
        let parsed = Self::parse(input)?;
        if parsed.to_string() == input {
            Ok(parsed)
        } else {
            Err(DateError::Unparseable(input.to_string()))
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// Whether the date is known to the day
    pub fn is_complete(&self) -> bool {
        self.day.is_some()
    }
}

fn parse_number<T: FromStr>(digits: &str) -> Option<T> {
    digits.parse().ok()
}

fn month_number(name: &str) -> Option<u32> {
    name.parse::<Month>().ok().map(|m| m.number_from_month())
}

impl From<NaiveDate> for PartialDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

impl FromStr for PartialDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names_full_and_abbreviated() {
        assert_eq!(PartialDate::parse("1 May 2018").unwrap().to_string(), "2018-05-01");
        assert_eq!(PartialDate::parse("Sep. 30, 2019").unwrap().to_string(), "2019-09-30");
        assert_eq!(PartialDate::parse("september 2019").unwrap().to_string(), "2019-09");
        assert_eq!(PartialDate::parse("12 Dec, 2020").unwrap().to_string(), "2020-12-12");
    }

    #[test]
    fn test_slash_dates_are_month_first() {
        let date = PartialDate::parse("03/04/2018").unwrap();
        assert_eq!(date.month(), Some(3));
        assert_eq!(date.day(), Some(4));
    }

    #[test]
    fn test_slash_dates_fall_back_to_day_first() {
        let date = PartialDate::parse("13/05/2018").unwrap();
        assert_eq!(date.month(), Some(5));
        assert_eq!(date.day(), Some(13));

        // neither reading is a month
        assert!(matches!(PartialDate::parse("13/14/2018"), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_rfc3339_keeps_local_date() {
        let date = PartialDate::parse("2018-05-01T23:30:00+02:00").unwrap();
        assert_eq!(date.to_string(), "2018-05-01");
    }

    #[test]
    fn test_unknown_month_name() {
        assert!(matches!(PartialDate::parse("Smarch 2018"), Err(DateError::Unparseable(_))));
    }

    #[test]
    fn test_leap_day() {
        assert!(PartialDate::parse("2020-02-29").is_ok());
        assert!(matches!(PartialDate::parse("2019-02-29"), Err(DateError::OutOfRange(_))));
    }

    #[test]
    fn test_canonical_only() {
        assert!(PartialDate::parse_canonical("2018-05-01").is_ok());
        assert!(PartialDate::parse_canonical("2018-05").is_ok());
        assert!(PartialDate::parse_canonical("2018-5-1").is_err());
        assert!(PartialDate::parse_canonical("May 2018").is_err());
    }

    #[test]
    fn test_precision_and_ordering() {
        let year = PartialDate::new(2018, None, None).unwrap();
        let day = PartialDate::new(2018, Some(5), Some(1)).unwrap();
        assert!(!year.is_complete());
        assert!(day.is_complete());
        assert!(year < day);
        assert!(PartialDate::new(2018, None, Some(3)).is_err());
    }
}
