//! Data models for Shelf
//!
//! Defines the book record and its typed fields. The serialized form uses
//! the camelCase field names of the persisted blob (`bookId`, `authorName`,
//! `bookName`, `pageNumber`, `haveRead`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Identifier of a book record
///
/// Records created by Shelf carry a millisecond timestamp. Older blobs (and
/// hand-written ones) may use arbitrary strings, so both are accepted and
/// written back in the same shape they were read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
    /// Free-form identifier
    Text(String),
}

impl BookId {
    /// The creation time encoded in a timestamp id
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            BookId::Timestamp(ms) => Utc.timestamp_millis_opt(*ms).single(),
            BookId::Text(_) => None,
        }
    }

    /// Anchor used by the aside panel to link to a row
    ///
    /// Text ids carry a `t:` prefix so they never collide with a numeric id
    /// of the same digits.
    pub fn anchor(&self) -> String {
        match self {
            BookId::Timestamp(ms) => format!("#{}", ms),
            BookId::Text(s) => format!("#t:{}", s),
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Timestamp(ms) => write!(f, "{}", ms),
            BookId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    /// Numeric input becomes a timestamp id, anything else is kept as text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(ms) => BookId::Timestamp(ms),
            Err(_) => BookId::Text(s.to_string()),
        })
    }
}

impl From<i64> for BookId {
    fn from(ms: i64) -> Self {
        BookId::Timestamp(ms)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId::Text(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        BookId::Text(s)
    }
}

/// Two-valued read status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadStatus {
    #[default]
    Yes,
    No,
}

impl ReadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::Yes => "Yes",
            ReadStatus::No => "No",
        }
    }

    /// The other value
    pub fn toggled(self) -> Self {
        match self {
            ReadStatus::Yes => ReadStatus::No,
            ReadStatus::No => ReadStatus::Yes,
        }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, ReadStatus::Yes)
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadStatus {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match capitalize(s.trim()).as_str() {
            "Yes" => Ok(ReadStatus::Yes),
            "No" => Ok(ReadStatus::No),
            _ => Err(ValidationError::InvalidReadStatus(s.to_string())),
        }
    }
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Page count of a book
///
/// Stored as any finite number. Whole values serialize as JSON integers.
/// Loading accepts numbers and numeric strings, including fractions,
/// negatives and exponents, since older blobs hold form values verbatim.
/// Parsing user input with [`FromStr`] only accepts non-negative whole
/// numbers.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PageCount(f64);

/// Largest integer an `f64` holds exactly
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

impl PageCount {
    pub fn get(&self) -> f64 {
        self.0
    }

    /// Lenient parse used for persisted values
    ///
    /// Any string that reads as a finite number is accepted.
    pub fn from_stored(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if !trimmed.is_empty() && n.is_finite() => Ok(PageCount(n)),
            _ => Err(ValidationError::InvalidPageNumber(s.to_string())),
        }
    }

    fn is_whole(&self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() <= MAX_EXACT
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_whole() {
            format!("{}", self.0 as i64)
        } else {
            format!("{}", self.0)
        };
        f.pad(&text)
    }
}

impl FromStr for PageCount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidPageNumber(s.to_string()));
        }
        trimmed
            .parse::<u32>()
            .map(PageCount::from)
            .map_err(|_| ValidationError::InvalidPageNumber(s.to_string()))
    }
}

impl From<u32> for PageCount {
    fn from(n: u32) -> Self {
        PageCount(f64::from(n))
    }
}

impl Serialize for PageCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for PageCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n.is_finite() => Ok(PageCount(n)),
            Raw::Number(n) => Err(serde::de::Error::custom(format!(
                "page number {} is not finite",
                n
            ))),
            Raw::Text(s) => PageCount::from_stored(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// A tracked book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier within the collection
    #[serde(alias = "id")]
    pub book_id: BookId,
    pub author_name: String,
    pub book_name: String,
    pub page_number: PageCount,
    pub have_read: ReadStatus,
}

impl Book {
    pub fn new(
        book_id: BookId,
        author_name: impl Into<String>,
        book_name: impl Into<String>,
        page_number: u32,
        have_read: ReadStatus,
    ) -> Self {
        Self {
            book_id,
            author_name: author_name.into(),
            book_name: book_name.into(),
            page_number: PageCount::from(page_number),
            have_read,
        }
    }

    /// Parse `value` for `field` and apply it
    ///
    /// The record is left untouched when parsing fails.
    pub fn apply(&mut self, field: BookField, value: &str) -> Result<(), ValidationError> {
        match field {
            BookField::AuthorName => self.author_name = non_empty(value)?,
            BookField::BookName => self.book_name = non_empty(value)?,
            BookField::PageNumber => self.page_number = value.parse()?,
            BookField::HaveRead => self.have_read = value.parse()?,
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::EmptyField)
    } else {
        Ok(value.to_string())
    }
}

/// Editable fields of a book record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    AuthorName,
    BookName,
    PageNumber,
    HaveRead,
}
