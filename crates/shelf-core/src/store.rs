//! Book repository
//!
//! The `Store` owns the in-memory collection and mirrors it to a
//! [`KeyValueStorage`] backend as one JSON array under [`STORAGE_KEY`].
//!
//! Mutations (`add`, `remove`, `update`) only touch memory; callers decide
//! when to `persist()`. The [`Tracker`](crate::tracker::Tracker) persists
//! after every operation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open(FileStorage::from_config(&config))?;
//!
//! let id = store.next_id();
//! store.add(Book::new(id, "George Orwell", "1984", 328, ReadStatus::Yes));
//! store.persist()?;
//! ```

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Result, ShelfError};
use crate::models::{Book, BookField, BookId};
use crate::storage::KeyValueStorage;

/// Storage key holding the serialized collection
pub const STORAGE_KEY: &str = "savedLocalBooks";

/// Owned book collection backed by a key-value store
pub struct Store<S: KeyValueStorage> {
    books: Vec<Book>,
    storage: S,
    /// Last id handed out by `next_id`
    last_id: i64,
}

impl<S: KeyValueStorage> Store<S> {
    /// Open the store and load any persisted collection
    pub fn open(storage: S) -> Result<Self> {
        let mut store = Self {
            books: Vec::new(),
            storage,
            last_id: 0,
        };
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory collection with the persisted one
    ///
    /// An absent key yields an empty collection. So does a blob that is not
    /// a JSON array: it is logged and left in place until the next persist
    /// overwrites it. Inside an array each record is decoded on its own, and
    /// records that fail are logged and skipped.
    pub fn load(&mut self) -> Result<()> {
        self.books = match self.storage.get(STORAGE_KEY)? {
            None => Vec::new(),
            Some(blob) => match serde_json::from_str::<Vec<serde_json::Value>>(&blob) {
                Ok(records) => decode_records(records),
                Err(e) => {
                    warn!("Ignoring malformed book collection: {}", e);
                    Vec::new()
                }
            },
        };
        self.last_id = self
            .books
            .iter()
            .filter_map(|b| match b.book_id {
                BookId::Timestamp(ms) => Some(ms),
                BookId::Text(_) => None,
            })
            .fold(self.last_id, i64::max);
        debug!("Loaded {} books", self.books.len());
        Ok(())
    }

    /// Serialize the whole collection under the storage key
    pub fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.books)?;
        self.storage.set(STORAGE_KEY, &blob)?;
        debug!("Persisted {} books", self.books.len());
        Ok(())
    }

    /// All books in insertion order
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Find a book by id
    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.book_id == id)
    }

    /// Append a book
    ///
    /// Ids are not checked for duplicates.
    pub fn add(&mut self, book: Book) {
        if let BookId::Timestamp(ms) = book.book_id {
            self.last_id = self.last_id.max(ms);
        }
        self.books.push(book);
    }

    /// Remove every book with `id`, returning them in collection order
    pub fn take(&mut self, id: &BookId) -> Vec<Book> {
        let (taken, kept) = std::mem::take(&mut self.books)
            .into_iter()
            .partition(|b| &b.book_id == id);
        self.books = kept;
        taken
    }

    /// Parse `value` and set it on `field` of the book with `id`
    ///
    /// Validation errors leave the record untouched.
    pub fn update(&mut self, id: &BookId, field: BookField, value: &str) -> Result<()> {
        let book = self
            .books
            .iter_mut()
            .find(|b| &b.book_id == id)
            .ok_or_else(|| ShelfError::NotFound(id.clone()))?;
        book.apply(field, value)?;
        Ok(())
    }

    /// Empty the collection and delete the persisted key
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(STORAGE_KEY)?;
        self.books.clear();
        debug!("Cleared book collection");
        Ok(())
    }

    /// Generate a fresh timestamp id
    ///
    /// Returns the current time in milliseconds, bumped past any id already
    /// handed out or present in the collection.
    pub fn next_id(&mut self) -> BookId {
        let mut candidate = Utc::now()
            .timestamp_millis()
            .max(self.last_id.saturating_add(1));
        while self.get(&BookId::Timestamp(candidate)).is_some() {
            candidate += 1;
        }
        self.last_id = candidate;
        BookId::Timestamp(candidate)
    }

    /// Access the storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn decode_records(records: Vec<serde_json::Value>) -> Vec<Book> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Book>(record) {
            Ok(book) => Some(book),
            Err(e) => {
                warn!("Skipping unreadable book record at index {}: {}", index, e);
                None
            }
        })
        .collect()
}
