//! Storage error handling
//!
//! One variant per key-value operation that can fail, each carrying the
//! file involved. [`StorageError::recovery_suggestion`] turns the underlying
//! I/O failure into a hint for the user.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`KeyValueStorage`](super::KeyValueStorage) backend
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that cannot be mapped to a file name
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the temp file or renaming it over the key file failed
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    fn io_source(&self) -> Option<&io::Error> {
        match self {
            StorageError::InvalidKey(_) => None,
            StorageError::CreateDirectory { source, .. }
            | StorageError::Read { source, .. }
            | StorageError::Write { source, .. }
            | StorageError::Remove { source, .. } => Some(source),
        }
    }

    /// What the user can do about this error, if anything
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        if let StorageError::InvalidKey(_) = self {
            return Some("Storage keys may only contain letters, digits, '-' and '_'.");
        }
        let source = self.io_source()?;
        if source.kind() == io::ErrorKind::PermissionDenied {
            Some("Check the permissions of the data directory, or point data_dir somewhere writable.")
        } else if is_out_of_space(source) {
            Some("Free up disk space and try again.")
        } else if let StorageError::CreateDirectory { .. } = self {
            Some("Check that the parent directory exists and is writable.")
        } else {
            None
        }
    }
}

fn is_out_of_space(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left") || msg.contains("quota exceeded")
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
