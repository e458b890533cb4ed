//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a local book
//! tracker: a collection of books with a read/unread status, persisted as
//! one JSON blob in a key-value store.
//!
//! # Architecture
//!
//! - **Store**: in-memory collection, source of truth while running
//! - **KeyValueStorage**: injected persistence backend (file or memory)
//! - **Tracker**: user-facing operations, persists after each one
//! - **ShelfView**: declarative snapshot rebuilt after each mutation
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut tracker = Tracker::open(FileStorage::from_config(&config))?;
//!
//! // Add a book from the entry form
//! tracker.submit(&BookForm::new("1984", "George Orwell", "328", "Yes"))?;
//!
//! // Render
//! let view = ShelfView::build(tracker.books(), config.flavor, None);
//! ```
//!
//! # Modules
//!
//! - `tracker`: operations on the collection (main entry point)
//! - `store`: collection repository and persistence
//! - `models`: book record and field types
//! - `form`: entry form validation
//! - `view`: view model, aside panel and edit sessions
//! - `notify`: transient notices
//! - `flavor`: Tracker / Library presentation variants
//! - `storage`: key-value backends
//! - `config`: application configuration

pub mod config;
pub mod error;
pub mod flavor;
pub mod form;
pub mod models;
pub mod notify;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod view;

pub use config::Config;
pub use error::{Result, ShelfError, ValidationError};
pub use flavor::{EditStyle, Flavor};
pub use form::{BookForm, NewBook};
pub use models::{Book, BookField, BookId, PageCount, ReadStatus};
pub use notify::{Notice, NoticeKind, Notifications};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{Store, STORAGE_KEY};
pub use tracker::{ClearOutcome, Tracker};
pub use view::{AsideLink, AsidePanel, BookRow, EditControl, EditSession, ShelfView};
