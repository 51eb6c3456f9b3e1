//! Calendar date keys for the attendance map.
//!
//! # Invariants
//! - A `DateKey` always holds a valid `YYYY-MM-DD` calendar date.
//! - Ordering of keys equals chronological ordering.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Error returned when text is not usable as a date key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateKeyError {
    /// Input was blank after trimming.
    Empty,
    /// Input is not a valid `YYYY-MM-DD` calendar date.
    Invalid(String),
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "date is required"),
            Self::Invalid(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
        }
    }
}

impl Error for DateKeyError {}

/// ISO 8601 calendar date used as the outer attendance key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(String);

impl DateKey {
    /// Parses trimmed `YYYY-MM-DD` text.
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DateKeyError::Empty);
        }
        if !ISO_DATE_RE.is_match(trimmed)
            || NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT).is_err()
        {
            return Err(DateKeyError::Invalid(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Today's UTC calendar date.
    pub fn today() -> Self {
        Self::from(Utc::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(value: NaiveDate) -> Self {
        Self(value.format(ISO_DATE_FORMAT).to_string())
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
