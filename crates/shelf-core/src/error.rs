//! Error types for Shelf operations

use thiserror::Error;

use crate::models::BookId;
use crate::storage::StorageError;

/// Rejected user input
///
/// The display strings are the messages shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Book name or author name left empty
    #[error("Book name, Author name or page number cannot be empty")]
    EmptyField,

    /// Page number missing or not a non-negative whole number
    #[error("page number's value must be number")]
    InvalidPageNumber(String),

    /// Read status other than yes/no
    #[error("Please enter 'Yes' or 'No'")]
    InvalidReadStatus(String),
}

/// Errors returned by the store and the tracker
#[derive(Error, Debug)]
pub enum ShelfError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record with this id
    #[error("No book found with id {0}")]
    NotFound(BookId),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize books: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for Shelf operations
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::EmptyField.to_string(),
            "Book name, Author name or page number cannot be empty"
        );
        assert_eq!(
            ValidationError::InvalidPageNumber("x".into()).to_string(),
            "page number's value must be number"
        );
        assert_eq!(
            ValidationError::InvalidReadStatus("maybe".into()).to_string(),
            "Please enter 'Yes' or 'No'"
        );
    }
}
