//! Declarative view model
//!
//! A [`ShelfView`] is rebuilt from the current collection after every
//! mutation; front ends render it without keeping any state of their own
//! apart from the in-progress [`EditSession`].

use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::flavor::{EditStyle, Flavor};
use crate::models::{Book, BookId, PageCount, ReadStatus};
use crate::storage::KeyValueStorage;
use crate::tracker::Tracker;

/// Entry of an aside list, pointing at a row of the main list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsideLink {
    pub anchor: String,
    pub book_id: BookId,
    pub title: String,
}

/// "Done reading" / "Yet to read" side lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AsidePanel {
    pub done: Vec<AsideLink>,
    pub yet_to_read: Vec<AsideLink>,
}

impl AsidePanel {
    /// Split books by read status, keeping collection order within each list
    pub fn from_books(books: &[Book]) -> Self {
        let mut panel = Self::default();
        for book in books {
            let link = AsideLink {
                anchor: book.book_id.anchor(),
                book_id: book.book_id.clone(),
                title: book.book_name.clone(),
            };
            match book.have_read {
                ReadStatus::Yes => panel.done.push(link),
                ReadStatus::No => panel.yet_to_read.push(link),
            }
        }
        panel
    }

    /// Both lists concatenated, done first
    pub fn links(&self) -> impl Iterator<Item = &AsideLink> {
        self.done.iter().chain(self.yet_to_read.iter())
    }

    pub fn len(&self) -> usize {
        self.done.len() + self.yet_to_read.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Editable read-status control of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditControl {
    /// Fixed Yes/No selector with the current choice
    Dropdown(ReadStatus),
    /// Free text typed by the user
    FreeText(String),
}

/// In-progress edit of one row's read status
///
/// First phase: [`begin`](Self::begin) turns the read label into a
/// control. Second phase: [`commit`](Self::commit) validates the control's
/// value and writes it through the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub book_id: BookId,
    pub control: EditControl,
}

impl EditSession {
    pub fn begin(book: &Book, style: EditStyle) -> Self {
        let control = match style {
            EditStyle::Dropdown => EditControl::Dropdown(book.have_read),
            EditStyle::FreeText => EditControl::FreeText(book.have_read.to_string()),
        };
        Self {
            book_id: book.book_id.clone(),
            control,
        }
    }

    /// Flip the dropdown choice (no-op for free text)
    pub fn toggle(&mut self) {
        if let EditControl::Dropdown(status) = &mut self.control {
            *status = status.toggled();
        }
    }

    /// Choose a value directly
    pub fn select(&mut self, status: ReadStatus) {
        self.control = match &self.control {
            EditControl::Dropdown(_) => EditControl::Dropdown(status),
            EditControl::FreeText(_) => EditControl::FreeText(status.to_string()),
        };
    }

    pub fn insert_char(&mut self, c: char) {
        if let EditControl::FreeText(text) = &mut self.control {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let EditControl::FreeText(text) = &mut self.control {
            text.pop();
        }
    }

    /// Text shown in place of the read label
    pub fn display_value(&self) -> String {
        match &self.control {
            EditControl::Dropdown(status) => status.to_string(),
            EditControl::FreeText(text) => text.clone(),
        }
    }

    /// Validated value of the control
    pub fn value(&self) -> std::result::Result<ReadStatus, ValidationError> {
        match &self.control {
            EditControl::Dropdown(status) => Ok(*status),
            EditControl::FreeText(text) => text.parse(),
        }
    }

    /// Write the control's value through the tracker
    ///
    /// Returns the confirmation message. On error nothing is written and
    /// the session can be corrected and committed again.
    pub fn commit<S: KeyValueStorage>(
        &self,
        tracker: &mut Tracker<S>,
        flavor: Flavor,
    ) -> Result<String> {
        let status = self.value()?;
        tracker.edit_read(status, &self.book_id)?;
        let name = tracker
            .find(&self.book_id)
            .map(|b| b.book_name.clone())
            .unwrap_or_default();
        Ok(flavor.edited_message(status, &name))
    }
}

/// One rendered row of the main list
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub book_id: BookId,
    pub book_name: String,
    pub author_name: String,
    pub pages: PageCount,
    pub have_read: ReadStatus,
    /// Present while the row's read status is being edited
    pub editing: Option<EditControl>,
}

impl BookRow {
    /// Read label, or the control's current value while editing
    pub fn read_label(&self) -> String {
        match &self.editing {
            Some(EditControl::Dropdown(status)) => format!("[{} ▾]", status),
            Some(EditControl::FreeText(text)) => format!("[{}_]", text),
            None => self.have_read.to_string(),
        }
    }
}

/// Snapshot of everything the UI shows
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfView {
    pub heading: &'static str,
    pub rows: Vec<BookRow>,
    pub aside: AsidePanel,
}

impl ShelfView {
    /// Build the view from the collection, in collection order
    pub fn build(books: &[Book], flavor: Flavor, editing: Option<&EditSession>) -> Self {
        let rows = books
            .iter()
            .map(|book| BookRow {
                book_id: book.book_id.clone(),
                book_name: book.book_name.clone(),
                author_name: book.author_name.clone(),
                pages: book.page_number,
                have_read: book.have_read,
                editing: editing
                    .filter(|session| session.book_id == book.book_id)
                    .map(|session| session.control.clone()),
            })
            .collect();

        Self {
            heading: flavor.heading(),
            rows,
            aside: AsidePanel::from_books(books),
        }
    }

    /// Row index of the book an aside anchor points at
    pub fn row_for_anchor(&self, anchor: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.book_id.anchor() == anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn book(id: i64, name: &str, read: ReadStatus) -> Book {
        Book::new(BookId::Timestamp(id), "Author", name, 100, read)
    }

    fn tracker_with(books: &[Book]) -> Tracker<MemoryStorage> {
        let mut tracker = Tracker::open(MemoryStorage::new()).unwrap();
        for b in books {
            tracker
                .store_book(
                    b.book_id.clone(),
                    b.author_name.clone(),
                    b.book_name.clone(),
                    b.page_number,
                    b.have_read,
                )
                .unwrap();
        }
        tracker
    }

    #[test]
    fn test_aside_splits_by_status() {
        let books = vec![
            book(1, "Read One", ReadStatus::Yes),
            book(2, "Unread One", ReadStatus::No),
        ];
        let panel = AsidePanel::from_books(&books);

        assert_eq!(panel.done.len(), 1);
        assert_eq!(panel.done[0].title, "Read One");
        assert_eq!(panel.done[0].anchor, "#1");
        assert_eq!(panel.yet_to_read.len(), 1);
        assert_eq!(panel.yet_to_read[0].title, "Unread One");
        assert_eq!(panel.yet_to_read[0].anchor, "#2");
    }

    #[test]
    fn test_rows_in_collection_order() {
        let books = vec![
            book(3, "C", ReadStatus::No),
            book(1, "A", ReadStatus::Yes),
            book(2, "B", ReadStatus::No),
        ];
        let view = ShelfView::build(&books, Flavor::Tracker, None);
        let names: Vec<&str> = view.rows.iter().map(|r| r.book_name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(view.heading, "Track Your Books & Reading Progress");
    }

    #[test]
    fn test_orwell_row() {
        let mut tracker = Tracker::open(MemoryStorage::new()).unwrap();
        tracker
            .submit(&crate::form::BookForm::new("1984", "George Orwell", "328", "Yes"))
            .unwrap();

        let view = ShelfView::build(tracker.books(), Flavor::Tracker, None);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].book_name, "1984");
        assert_eq!(view.rows[0].author_name, "George Orwell");
        assert_eq!(view.rows[0].pages, PageCount::from(328));
        assert_eq!(view.aside.done.len(), 1);
    }

    #[test]
    fn test_editing_row_marked() {
        let books = vec![book(1, "A", ReadStatus::No), book(2, "B", ReadStatus::No)];
        let session = EditSession::begin(&books[1], EditStyle::Dropdown);
        let view = ShelfView::build(&books, Flavor::Tracker, Some(&session));

        assert!(view.rows[0].editing.is_none());
        assert_eq!(
            view.rows[1].editing,
            Some(EditControl::Dropdown(ReadStatus::No))
        );
        assert_eq!(view.rows[1].read_label(), "[No ▾]");
    }

    #[test]
    fn test_dropdown_commit() {
        let books = vec![book(1, "Dune", ReadStatus::No)];
        let mut tracker = tracker_with(&books);

        let mut session = EditSession::begin(&books[0], EditStyle::Dropdown);
        session.toggle();
        let msg = session.commit(&mut tracker, Flavor::Tracker).unwrap();

        assert_eq!(msg, "Edited to Yes. \"Dune\" added in 'Done reading'");
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);
    }

    #[test]
    fn test_free_text_commit_normalizes_case() {
        let books = vec![book(1, "Dune", ReadStatus::Yes)];
        let mut tracker = tracker_with(&books);

        let mut session = EditSession::begin(&books[0], EditStyle::FreeText);
        assert_eq!(session.display_value(), "Yes");
        for _ in 0..3 {
            session.delete_char();
        }
        for c in "nO".chars() {
            session.insert_char(c);
        }
        let msg = session.commit(&mut tracker, Flavor::Library).unwrap();

        assert_eq!(msg, "Edited to No. \"Dune\" added in 'Yet to read'");
        assert_eq!(tracker.books()[0].have_read, ReadStatus::No);
    }

    #[test]
    fn test_free_text_invalid_leaves_record() {
        let books = vec![book(1, "Dune", ReadStatus::Yes)];
        let mut tracker = tracker_with(&books);
        let writes = tracker.store().storage().writes();

        let mut session = EditSession::begin(&books[0], EditStyle::FreeText);
        session.insert_char('!');
        let err = session.commit(&mut tracker, Flavor::Library).unwrap_err();

        assert!(matches!(
            err,
            crate::error::ShelfError::Validation(ValidationError::InvalidReadStatus(_))
        ));
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);
        assert_eq!(tracker.books()[0].page_number, PageCount::from(100));
        assert_eq!(tracker.store().storage().writes(), writes);
    }

    #[test]
    fn test_row_for_anchor() {
        let books = vec![book(10, "A", ReadStatus::Yes), book(20, "B", ReadStatus::No)];
        let view = ShelfView::build(&books, Flavor::Tracker, None);
        assert_eq!(view.row_for_anchor("#20"), Some(1));
        assert_eq!(view.row_for_anchor("#99"), None);
    }

    #[test]
    fn test_text_id_anchor_does_not_shadow_numeric_id() {
        let books = vec![
            Book::new(BookId::from("42"), "Author", "Text id", 10, ReadStatus::Yes),
            Book::new(BookId::Timestamp(42), "Author", "Numeric id", 10, ReadStatus::Yes),
        ];
        let view = ShelfView::build(&books, Flavor::Tracker, None);

        assert_eq!(view.row_for_anchor("#42"), Some(1));
        assert_eq!(view.row_for_anchor("#t:42"), Some(0));
        let anchors: Vec<&str> = view.aside.done.iter().map(|l| l.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["#t:42", "#42"]);
    }
}
