//! Tracker state management
//!
//! Wraps a [`Store`] with the user-facing operations. Every mutation is
//! followed by a full persist of the collection.

use tracing::{debug, info};

use crate::error::{Result, ShelfError};
use crate::form::BookForm;
use crate::models::{Book, BookField, BookId, PageCount, ReadStatus};
use crate::storage::KeyValueStorage;
use crate::store::Store;

/// Result of a "delete all" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Nothing to delete, storage untouched
    AlreadyEmpty,
    /// This many books were removed
    Cleared(usize),
}

/// State manager for the book collection
pub struct Tracker<S: KeyValueStorage> {
    store: Store<S>,
    /// Books removed by the last `delete_book`, for undo
    deleted: Vec<Book>,
}

impl<S: KeyValueStorage> Tracker<S> {
    pub fn new(store: Store<S>) -> Self {
        Self {
            store,
            deleted: Vec::new(),
        }
    }

    /// Open a tracker over `storage`, loading the persisted collection
    pub fn open(storage: S) -> Result<Self> {
        Ok(Self::new(Store::open(storage)?))
    }

    pub fn books(&self) -> &[Book] {
        self.store.list()
    }

    pub fn find(&self, id: &BookId) -> Option<&Book> {
        self.store.get(id)
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Build a record, append it and persist
    ///
    /// The id is not checked for duplicates.
    pub fn store_book(
        &mut self,
        book_id: BookId,
        author_name: impl Into<String>,
        book_name: impl Into<String>,
        page_number: PageCount,
        have_read: ReadStatus,
    ) -> Result<&Book> {
        let book = Book {
            book_id,
            author_name: author_name.into(),
            book_name: book_name.into(),
            page_number,
            have_read,
        };
        info!("Adding book {} ({})", book.book_id, book.book_name);
        self.store.add(book);
        self.store.persist()?;
        // `add` just pushed, so the collection is non-empty
        Ok(&self.store.list()[self.store.len() - 1])
    }

    /// Validate a form submission and store it under a fresh id
    pub fn submit(&mut self, form: &BookForm) -> Result<Book> {
        let new_book = form.validate()?;
        let id = self.store.next_id();
        let book = new_book.into_book(id);
        let stored = self.store_book(
            book.book_id,
            book.author_name,
            book.book_name,
            book.page_number,
            book.have_read,
        )?;
        Ok(stored.clone())
    }

    /// Remove every book with `id` and persist
    ///
    /// Persists even when nothing matched. Returns the number removed.
    pub fn delete_book(&mut self, id: &BookId) -> Result<usize> {
        let removed = self.store.take(id);
        self.store.persist()?;

        let count = removed.len();
        if count > 0 {
            info!("Deleted {} book(s) with id {}", count, id);
            self.deleted = removed;
        } else {
            debug!("Delete of unknown book {} was a no-op", id);
        }
        Ok(count)
    }

    /// Set the read status of the book with `id` and persist
    pub fn edit_read(&mut self, have_read: ReadStatus, id: &BookId) -> Result<()> {
        if self.store.get(id).is_none() {
            return Err(ShelfError::NotFound(id.clone()));
        }
        self.store.update(id, BookField::HaveRead, have_read.as_str())?;
        self.store.persist()?;
        info!("Book {} read status set to {}", id, have_read);
        Ok(())
    }

    /// Parse a typed read status, then call [`edit_read`](Self::edit_read)
    ///
    /// Values other than yes/no (case-insensitive) are rejected before the
    /// record is looked up.
    pub fn edit_read_str(&mut self, value: &str, id: &BookId) -> Result<ReadStatus> {
        let have_read: ReadStatus = value.parse()?;
        self.edit_read(have_read, id)?;
        Ok(have_read)
    }

    /// Delete every book and the persisted key
    pub fn delete_all(&mut self) -> Result<ClearOutcome> {
        if self.store.is_empty() {
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        let count = self.store.len();
        self.store.clear()?;
        self.deleted.clear();
        info!("Deleted all {} books", count);
        Ok(ClearOutcome::Cleared(count))
    }

    /// Restore every book removed by the last delete
    ///
    /// Restored books are appended in their original relative order. An
    /// empty result means there was nothing to undo.
    pub fn undo_delete(&mut self) -> Result<Vec<Book>> {
        let restored = std::mem::take(&mut self.deleted);
        if restored.is_empty() {
            return Ok(restored);
        }
        for book in &restored {
            self.store.add(book.clone());
        }
        self.store.persist()?;
        info!("Restored {} book(s)", restored.len());
        Ok(restored)
    }
}
