//! Book entry form
//!
//! Holds the raw text of the four form fields and turns them into a
//! validated record.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{Book, BookId, PageCount, ReadStatus};

/// Raw values of the entry form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForm {
    pub book_name: String,
    pub author_name: String,
    pub page_number: String,
    pub have_read: String,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            book_name: String::new(),
            author_name: String::new(),
            page_number: String::new(),
            have_read: ReadStatus::Yes.to_string(),
        }
    }
}

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub author_name: String,
    pub book_name: String,
    pub page_number: PageCount,
    pub have_read: ReadStatus,
}

impl NewBook {
    pub fn into_book(self, book_id: BookId) -> Book {
        Book {
            book_id,
            author_name: self.author_name,
            book_name: self.book_name,
            page_number: self.page_number,
            have_read: self.have_read,
        }
    }
}

impl BookForm {
    pub fn new(
        book_name: impl Into<String>,
        author_name: impl Into<String>,
        page_number: impl Into<String>,
        have_read: impl Into<String>,
    ) -> Self {
        Self {
            book_name: book_name.into(),
            author_name: author_name.into(),
            page_number: page_number.into(),
            have_read: have_read.into(),
        }
    }

    /// Trim and check every field
    ///
    /// Names are checked before the page number, the page number before
    /// the read status.
    pub fn validate(&self) -> Result<NewBook, ValidationError> {
        let book_name = self.book_name.trim();
        let author_name = self.author_name.trim();

        if book_name.is_empty() || author_name.is_empty() {
            return Err(ValidationError::EmptyField);
        }

        let page_number: PageCount = self.page_number.parse()?;
        let have_read: ReadStatus = self.have_read.parse()?;

        Ok(NewBook {
            author_name: author_name.to_string(),
            book_name: book_name.to_string(),
            page_number,
            have_read,
        })
    }

    /// Restore the empty form
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let form = BookForm::new(" 1984 ", "George Orwell", "328", "yes");
        let book = form.validate().unwrap();

        assert_eq!(book.book_name, "1984");
        assert_eq!(book.author_name, "George Orwell");
        assert_eq!(book.page_number, PageCount::from(328));
        assert_eq!(book.have_read, ReadStatus::Yes);
    }

    #[test]
    fn test_empty_names_rejected() {
        let form = BookForm::new("", "Author", "10", "Yes");
        assert_eq!(form.validate(), Err(ValidationError::EmptyField));

        let form = BookForm::new("Title", "   ", "10", "Yes");
        assert_eq!(form.validate(), Err(ValidationError::EmptyField));
    }

    #[test]
    fn test_names_checked_before_pages() {
        let form = BookForm::new("", "", "abc", "maybe");
        assert_eq!(form.validate(), Err(ValidationError::EmptyField));
    }

    #[test]
    fn test_page_number_must_be_numeric() {
        for pages in ["", "abc", "12 pages", "-3", "12.5", "1e3"] {
            let form = BookForm::new("Title", "Author", pages, "No");
            assert!(matches!(
                form.validate(),
                Err(ValidationError::InvalidPageNumber(_))
            ));
        }
    }

    #[test]
    fn test_read_status_must_be_yes_or_no() {
        let form = BookForm::new("Title", "Author", "10", "unsure");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidReadStatus(_))
        ));
    }

    #[test]
    fn test_reset_restores_default() {
        let mut form = BookForm::new("Title", "Author", "10", "No");
        form.reset();
        assert_eq!(form, BookForm::default());
        assert_eq!(form.have_read, "Yes");
    }
}
