//! Presentation flavors
//!
//! The tracker ships in two wordings. `Tracker` edits the read status with
//! a fixed Yes/No selector, `Library` with free text that is validated on
//! commit. Everything else (storage, state, rendering) is shared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ReadStatus;

/// How the read status is edited in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStyle {
    /// Fixed Yes/No selector
    Dropdown,
    /// Free text, validated as yes/no on commit
    FreeText,
}

/// Wording and edit style of the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    #[default]
    Tracker,
    Library,
}

impl Flavor {
    pub fn heading(&self) -> &'static str {
        match self {
            Flavor::Tracker => "Track Your Books & Reading Progress",
            Flavor::Library => "Your library",
        }
    }

    pub fn edit_style(&self) -> EditStyle {
        match self {
            Flavor::Tracker => EditStyle::Dropdown,
            Flavor::Library => EditStyle::FreeText,
        }
    }

    /// Default lifetime of a notice in milliseconds
    pub fn default_notice_timeout_ms(&self) -> u64 {
        match self {
            Flavor::Tracker => 4000,
            Flavor::Library => 6000,
        }
    }

    pub fn added_message(&self) -> String {
        "Book added successfully".to_string()
    }

    pub fn deleted_message(&self, book_name: &str) -> String {
        match self {
            Flavor::Tracker => {
                format!("\"{}\" book been successfully removed from Tracker", book_name)
            }
            Flavor::Library => {
                format!("\"{}\" book's been successfully removed from library", book_name)
            }
        }
    }

    pub fn already_empty_message(&self) -> &'static str {
        match self {
            Flavor::Tracker => "Your Book Tracker is already empty",
            Flavor::Library => "No books to be removed from library",
        }
    }

    pub fn cleared_message(&self) -> &'static str {
        match self {
            Flavor::Tracker => "Your Book Tracker is now empty",
            Flavor::Library => "All books have been removed from library",
        }
    }

    pub fn not_found_message(&self) -> &'static str {
        "No book found"
    }

    /// Message shown after the read status of `book_name` was changed
    pub fn edited_message(&self, status: ReadStatus, book_name: &str) -> String {
        match status {
            ReadStatus::Yes => format!(
                "Edited to Yes. \"{}\" added in '{}'",
                book_name,
                DONE_READING
            ),
            ReadStatus::No => format!(
                "Edited to No. \"{}\" added in '{}'",
                book_name,
                YET_TO_READ
            ),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Tracker => "tracker",
            Flavor::Library => "library",
        }
    }
}

/// Heading of the aside list of finished books
pub const DONE_READING: &str = "Done reading";

/// Heading of the aside list of unread books
pub const YET_TO_READ: &str = "Yet to read";

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tracker" => Ok(Flavor::Tracker),
            "library" => Ok(Flavor::Library),
            other => Err(format!(
                "Unknown flavor '{}'. Valid flavors: tracker, library",
                other
            )),
        }
    }
}
