//! Application state and logic

use std::time::{Duration, Instant};

use shelf_core::{
    AsideLink, BookForm, BookId, ClearOutcome, Config, EditControl, EditSession, Flavor,
    KeyValueStorage, Notifications, ReadStatus, ShelfError, ShelfView, Tracker,
};

/// How long a first `D` press waits for the confirming second press
const CLEAR_CONFIRM_WINDOW: Duration = Duration::from_secs(3);

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Entry form popup is open
    Form,
    /// Read status of the selected row is being edited
    Edit,
}

/// Which pane has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Books,
    Aside,
}

impl ActivePane {
    /// Move to the other pane (wrapping)
    pub fn next(self) -> Self {
        match self {
            ActivePane::Books => ActivePane::Aside,
            ActivePane::Aside => ActivePane::Books,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

/// Fields of the entry form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    BookName,
    AuthorName,
    PageNumber,
    HaveRead,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::BookName,
        FormField::AuthorName,
        FormField::PageNumber,
        FormField::HaveRead,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::BookName => "Book name",
            FormField::AuthorName => "Author name",
            FormField::PageNumber => "Pages",
            FormField::HaveRead => "Read (Yes/No)",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::BookName => FormField::AuthorName,
            FormField::AuthorName => FormField::PageNumber,
            FormField::PageNumber => FormField::HaveRead,
            FormField::HaveRead => FormField::BookName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::BookName => FormField::HaveRead,
            FormField::AuthorName => FormField::BookName,
            FormField::PageNumber => FormField::AuthorName,
            FormField::HaveRead => FormField::PageNumber,
        }
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Which pane has focus
    pub active_pane: ActivePane,
    /// Wording and edit style
    pub flavor: Flavor,
    /// Snapshot of the collection, rebuilt after every mutation
    pub view: ShelfView,
    /// Currently selected row of the book list
    pub book_index: usize,
    /// Currently selected link of the aside panel
    pub aside_index: usize,
    /// Whether the aside panel is open
    pub show_aside: bool,
    /// Entry form contents
    pub form: BookForm,
    /// Focused form field
    pub form_field: FormField,
    /// In-progress read status edit
    pub edit: Option<EditSession>,
    /// Stacked transient notices
    pub notices: Notifications,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Error shown in a modal until any key is pressed
    pub error_message: Option<String>,
    /// Pending first `D` press of a delete-all (with timestamp)
    pub pending_clear: Option<Instant>,
}

impl App {
    /// Create a new app showing the tracker's collection
    pub fn new<S: KeyValueStorage>(tracker: &Tracker<S>, config: &Config) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            active_pane: ActivePane::Books,
            flavor: config.flavor,
            view: ShelfView::build(tracker.books(), config.flavor, None),
            book_index: 0,
            aside_index: 0,
            show_aside: true,
            form: BookForm::default(),
            form_field: FormField::BookName,
            edit: None,
            notices: Notifications::new(config.notice_timeout()),
            show_help: false,
            error_message: None,
            pending_clear: None,
        }
    }

    /// Rebuild the view from the tracker and clamp selections
    pub fn refresh<S: KeyValueStorage>(&mut self, tracker: &Tracker<S>) {
        self.view = ShelfView::build(tracker.books(), self.flavor, self.edit.as_ref());
        self.book_index = self.book_index.min(self.view.rows.len().saturating_sub(1));
        self.aside_index = self.aside_index.min(self.view.aside.len().saturating_sub(1));
    }

    /// Expire notices and stale confirmations
    pub fn tick(&mut self, now: Instant) {
        self.notices.expire(now);
        if let Some(time) = self.pending_clear {
            if now.duration_since(time) > CLEAR_CONFIRM_WINDOW {
                self.pending_clear = None;
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notices.push(message);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notices.push_error(message);
    }

    /// Close the most recent notice by hand
    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss_latest();
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Open or close the aside panel
    pub fn toggle_aside(&mut self) {
        self.show_aside = !self.show_aside;
        if !self.show_aside {
            self.active_pane = ActivePane::Books;
        }
    }

    /// Id of the selected book
    pub fn selected_book_id(&self) -> Option<&BookId> {
        self.view.rows.get(self.book_index).map(|r| &r.book_id)
    }

    /// Selected aside link, flattened over both lists
    pub fn selected_aside_link(&self) -> Option<&AsideLink> {
        self.view.aside.links().nth(self.aside_index)
    }

    /// Move selection up in the current pane
    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Books => self.book_index = self.book_index.saturating_sub(1),
            ActivePane::Aside => self.aside_index = self.aside_index.saturating_sub(1),
        }
    }

    /// Move selection down in the current pane
    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Books => {
                if self.book_index < self.view.rows.len().saturating_sub(1) {
                    self.book_index += 1;
                }
            }
            ActivePane::Aside => {
                if self.aside_index < self.view.aside.len().saturating_sub(1) {
                    self.aside_index += 1;
                }
            }
        }
    }

    /// Move focus to the next pane
    pub fn next_pane(&mut self) {
        if self.show_aside {
            self.active_pane = self.active_pane.next();
        }
    }

    /// Move focus to the previous pane
    pub fn prev_pane(&mut self) {
        if self.show_aside {
            self.active_pane = self.active_pane.prev();
        }
    }

    /// Jump the book list to the row the selected aside link points at
    pub fn follow_aside_link(&mut self) {
        let Some(anchor) = self.selected_aside_link().map(|l| l.anchor.clone()) else {
            return;
        };
        match self.view.row_for_anchor(&anchor) {
            Some(row) => {
                self.book_index = row;
                self.active_pane = ActivePane::Books;
            }
            None => {
                let message = self.flavor.not_found_message();
                self.notify_error(message);
            }
        }
    }

    /// Open the entry form
    pub fn open_form(&mut self) {
        self.form.reset();
        self.form_field = FormField::BookName;
        self.input_mode = InputMode::Form;
    }

    /// Close the form without submitting
    pub fn cancel_form(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn prev_field(&mut self) {
        self.form_field = self.form_field.prev();
    }

    /// Text of a form field
    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::BookName => &self.form.book_name,
            FormField::AuthorName => &self.form.author_name,
            FormField::PageNumber => &self.form.page_number,
            FormField::HaveRead => &self.form.have_read,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.form_field {
            FormField::BookName => &mut self.form.book_name,
            FormField::AuthorName => &mut self.form.author_name,
            FormField::PageNumber => &mut self.form.page_number,
            FormField::HaveRead => &mut self.form.have_read,
        }
    }

    pub fn form_insert_char(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn form_delete_char(&mut self) {
        self.field_mut().pop();
    }

    /// Validate and store the form
    ///
    /// Validation failures are shown as a notice and keep the form open.
    pub fn submit_form<S: KeyValueStorage>(
        &mut self,
        tracker: &mut Tracker<S>,
    ) -> anyhow::Result<()> {
        match tracker.submit(&self.form) {
            Ok(_) => {
                self.form.reset();
                self.input_mode = InputMode::Normal;
                self.refresh(tracker);
                self.book_index = self.view.rows.len().saturating_sub(1);
                let message = self.flavor.added_message();
                self.notify(message);
                Ok(())
            }
            Err(ShelfError::Validation(e)) => {
                self.notify_error(e.to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Turn the selected row's read label into an editable control
    pub fn begin_edit<S: KeyValueStorage>(&mut self, tracker: &Tracker<S>) {
        let Some(book) = self.selected_book_id().and_then(|id| tracker.find(id)) else {
            let message = self.flavor.not_found_message();
            self.notify_error(message);
            return;
        };
        self.edit = Some(EditSession::begin(book, self.flavor.edit_style()));
        self.input_mode = InputMode::Edit;
        self.refresh(tracker);
    }

    /// Write the edit through the tracker
    ///
    /// An invalid value keeps the session open for correction.
    pub fn commit_edit<S: KeyValueStorage>(
        &mut self,
        tracker: &mut Tracker<S>,
    ) -> anyhow::Result<()> {
        let Some(session) = self.edit.clone() else {
            self.input_mode = InputMode::Normal;
            return Ok(());
        };

        match session.commit(tracker, self.flavor) {
            Ok(message) => {
                self.finish_edit(tracker);
                self.notify(message);
                Ok(())
            }
            Err(ShelfError::Validation(e)) => {
                self.notify_error(e.to_string());
                Ok(())
            }
            Err(ShelfError::NotFound(_)) => {
                self.finish_edit(tracker);
                let message = self.flavor.not_found_message();
                self.notify_error(message);
                Ok(())
            }
            Err(e) => {
                self.finish_edit(tracker);
                Err(e.into())
            }
        }
    }

    /// Leave edit mode without writing
    pub fn finish_edit<S: KeyValueStorage>(&mut self, tracker: &Tracker<S>) {
        self.edit = None;
        self.input_mode = InputMode::Normal;
        self.refresh(tracker);
    }

    /// Whether the edit control is a fixed Yes/No selector
    pub fn is_dropdown_edit(&self) -> bool {
        matches!(
            self.edit.as_ref().map(|s| &s.control),
            Some(EditControl::Dropdown(_))
        )
    }

    pub fn edit_toggle(&mut self) {
        if let Some(session) = self.edit.as_mut() {
            session.toggle();
        }
        self.sync_edit_row();
    }

    pub fn edit_select(&mut self, status: ReadStatus) {
        if let Some(session) = self.edit.as_mut() {
            session.select(status);
        }
        self.sync_edit_row();
    }

    pub fn edit_insert_char(&mut self, c: char) {
        if let Some(session) = self.edit.as_mut() {
            session.insert_char(c);
        }
        self.sync_edit_row();
    }

    pub fn edit_delete_char(&mut self) {
        if let Some(session) = self.edit.as_mut() {
            session.delete_char();
        }
        self.sync_edit_row();
    }

    /// Mirror the session's control onto its row without a full rebuild
    fn sync_edit_row(&mut self) {
        let Some(session) = self.edit.as_ref() else {
            return;
        };
        for row in &mut self.view.rows {
            if row.book_id == session.book_id {
                row.editing = Some(session.control.clone());
            }
        }
    }

    /// Delete the selected book
    pub fn delete_selected<S: KeyValueStorage>(
        &mut self,
        tracker: &mut Tracker<S>,
    ) -> anyhow::Result<()> {
        let Some(book) = self
            .selected_book_id()
            .and_then(|id| tracker.find(id))
            .cloned()
        else {
            let message = self.flavor.not_found_message();
            self.notify_error(message);
            return Ok(());
        };

        tracker.delete_book(&book.book_id)?;
        self.refresh(tracker);
        let message = self.flavor.deleted_message(&book.book_name);
        self.notify(message);
        Ok(())
    }

    /// Restore the books removed by the last delete
    pub fn undo_delete<S: KeyValueStorage>(
        &mut self,
        tracker: &mut Tracker<S>,
    ) -> anyhow::Result<()> {
        let restored = tracker.undo_delete()?;
        match restored.as_slice() {
            [] => self.notify("Nothing to undo"),
            [book] => {
                self.refresh(tracker);
                self.book_index = self.view.rows.len().saturating_sub(1);
                self.notify(format!("Restored \"{}\"", book.book_name));
            }
            books => {
                self.refresh(tracker);
                self.book_index = self.view.rows.len().saturating_sub(1);
                self.notify(format!("Restored {} books", books.len()));
            }
        }
        Ok(())
    }

    /// Delete every book, after a confirming second press
    pub fn request_delete_all<S: KeyValueStorage>(
        &mut self,
        tracker: &mut Tracker<S>,
    ) -> anyhow::Result<()> {
        if tracker.books().is_empty() {
            self.pending_clear = None;
            let message = self.flavor.already_empty_message();
            self.notify(message);
            return Ok(());
        }

        if self.pending_clear.take().is_none() {
            self.pending_clear = Some(Instant::now());
            self.notify(format!(
                "Press D again to delete all {} book(s)",
                tracker.books().len()
            ));
            return Ok(());
        }

        let message = match tracker.delete_all()? {
            ClearOutcome::AlreadyEmpty => self.flavor.already_empty_message(),
            ClearOutcome::Cleared(_) => self.flavor.cleared_message(),
        };
        self.refresh(tracker);
        self.notify(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{MemoryStorage, PageCount};

    fn setup(flavor: Flavor) -> (Tracker<MemoryStorage>, App) {
        let tracker = Tracker::open(MemoryStorage::new()).unwrap();
        let config = Config {
            flavor,
            ..Config::default()
        };
        let app = App::new(&tracker, &config);
        (tracker, app)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.form_insert_char(c);
        }
    }

    fn add_via_form(app: &mut App, tracker: &mut Tracker<MemoryStorage>, name: &str, read: &str) {
        app.open_form();
        type_str(app, name);
        app.next_field();
        type_str(app, "Author");
        app.next_field();
        type_str(app, "200");
        app.next_field();
        for _ in 0..3 {
            app.form_delete_char();
        }
        type_str(app, read);
        app.submit_form(tracker).unwrap();
    }

    fn notice_messages(app: &App) -> Vec<String> {
        app.notices
            .active()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    #[test]
    fn test_active_pane_next() {
        assert_eq!(ActivePane::Books.next(), ActivePane::Aside);
        assert_eq!(ActivePane::Aside.next(), ActivePane::Books);
    }

    #[test]
    fn test_form_field_cycle() {
        let mut field = FormField::BookName;
        for _ in 0..FormField::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, FormField::BookName);
        assert_eq!(FormField::BookName.prev(), FormField::HaveRead);
    }

    #[test]
    fn test_submit_form_adds_row() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        add_via_form(&mut app, &mut tracker, "1984", "Yes");

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.view.rows.len(), 1);
        assert_eq!(app.view.rows[0].book_name, "1984");
        assert_eq!(notice_messages(&app), vec!["Book added successfully"]);
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        app.open_form();
        type_str(&mut app, "1984");
        app.submit_form(&mut tracker).unwrap();

        assert_eq!(app.input_mode, InputMode::Form);
        assert!(tracker.books().is_empty());
        assert_eq!(
            notice_messages(&app),
            vec!["Book name, Author name or page number cannot be empty"]
        );
    }

    #[test]
    fn test_dropdown_edit_flow() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        add_via_form(&mut app, &mut tracker, "Dune", "No");

        app.begin_edit(&tracker);
        assert_eq!(app.input_mode, InputMode::Edit);
        assert!(app.is_dropdown_edit());
        app.edit_toggle();
        assert_eq!(
            app.view.rows[0].editing,
            Some(EditControl::Dropdown(ReadStatus::Yes))
        );

        app.commit_edit(&mut tracker).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.edit.is_none());
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);
        assert_eq!(app.view.aside.done.len(), 1);
    }

    #[test]
    fn test_free_text_edit_rejects_then_accepts() {
        let (mut tracker, mut app) = setup(Flavor::Library);
        add_via_form(&mut app, &mut tracker, "Dune", "Yes");

        app.begin_edit(&tracker);
        assert!(!app.is_dropdown_edit());
        app.edit_insert_char('?');
        app.commit_edit(&mut tracker).unwrap();

        // Session stays open after a bad value
        assert_eq!(app.input_mode, InputMode::Edit);
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);

        for _ in 0..4 {
            app.edit_delete_char();
        }
        for c in "no".chars() {
            app.edit_insert_char(c);
        }
        app.commit_edit(&mut tracker).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(tracker.books()[0].have_read, ReadStatus::No);
    }

    #[test]
    fn test_delete_and_undo() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        add_via_form(&mut app, &mut tracker, "Dune", "Yes");

        app.delete_selected(&mut tracker).unwrap();
        assert!(app.view.rows.is_empty());
        assert!(notice_messages(&app)
            .contains(&"\"Dune\" book been successfully removed from Tracker".to_string()));

        app.undo_delete(&mut tracker).unwrap();
        assert_eq!(app.view.rows.len(), 1);
    }

    #[test]
    fn test_undo_restores_books_sharing_an_id() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        for name in ["First", "Second"] {
            tracker
                .store_book(
                    BookId::from("dup"),
                    "Author",
                    name,
                    PageCount::from(10),
                    ReadStatus::No,
                )
                .unwrap();
        }
        app.refresh(&tracker);

        app.delete_selected(&mut tracker).unwrap();
        assert!(app.view.rows.is_empty());

        app.undo_delete(&mut tracker).unwrap();
        assert_eq!(app.view.rows.len(), 2);
        assert!(notice_messages(&app).contains(&"Restored 2 books".to_string()));
    }

    #[test]
    fn test_delete_with_nothing_selected() {
        let (mut tracker, mut app) = setup(Flavor::Library);
        app.delete_selected(&mut tracker).unwrap();
        assert_eq!(notice_messages(&app), vec!["No book found"]);
    }

    #[test]
    fn test_delete_all_needs_second_press() {
        let (mut tracker, mut app) = setup(Flavor::Library);
        add_via_form(&mut app, &mut tracker, "A", "Yes");
        add_via_form(&mut app, &mut tracker, "B", "No");

        app.request_delete_all(&mut tracker).unwrap();
        assert_eq!(tracker.books().len(), 2);

        app.request_delete_all(&mut tracker).unwrap();
        assert!(tracker.books().is_empty());
        assert!(app.view.rows.is_empty());
        assert!(notice_messages(&app)
            .contains(&"All books have been removed from library".to_string()));
    }

    #[test]
    fn test_delete_all_when_empty() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        app.request_delete_all(&mut tracker).unwrap();
        assert_eq!(
            notice_messages(&app),
            vec!["Your Book Tracker is already empty"]
        );
        assert!(app.pending_clear.is_none());
    }

    #[test]
    fn test_follow_aside_link() {
        let (mut tracker, mut app) = setup(Flavor::Tracker);
        add_via_form(&mut app, &mut tracker, "Read", "Yes");
        add_via_form(&mut app, &mut tracker, "Unread", "No");
        app.book_index = 0;

        app.next_pane();
        assert_eq!(app.active_pane, ActivePane::Aside);
        app.move_down();
        assert_eq!(app.selected_aside_link().unwrap().title, "Unread");

        app.follow_aside_link();
        assert_eq!(app.active_pane, ActivePane::Books);
        assert_eq!(app.book_index, 1);
    }

    #[test]
    fn test_hidden_aside_keeps_focus_on_books() {
        let (_tracker, mut app) = setup(Flavor::Tracker);
        app.toggle_aside();
        app.next_pane();
        assert_eq!(app.active_pane, ActivePane::Books);
    }

    #[test]
    fn test_notices_expire_on_tick() {
        let (_tracker, mut app) = setup(Flavor::Tracker);
        app.notify("hello");
        app.tick(Instant::now() + Duration::from_secs(60));
        assert!(app.notices.is_empty());
    }
}
