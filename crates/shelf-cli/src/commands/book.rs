//! Book command handlers

use anyhow::{bail, Context, Result};

use shelf_core::{
    AsidePanel, BookForm, BookId, ClearOutcome, Config, FileStorage, ReadStatus, Tracker,
};

use crate::output::Output;
use crate::prompt::confirm;

/// Add a book from the command-line fields
pub fn add(
    tracker: &mut Tracker<FileStorage>,
    config: &Config,
    name: String,
    author: String,
    pages: String,
    read: String,
    output: &Output,
) -> Result<()> {
    let form = BookForm::new(name, author, pages, read);
    let book = tracker.submit(&form)?;

    output.success(&config.flavor.added_message());
    output.print_book(&book);

    Ok(())
}

/// List all books, optionally filtered by read status
pub fn list(
    tracker: &Tracker<FileStorage>,
    read: Option<ReadStatus>,
    output: &Output,
) -> Result<()> {
    let books: Vec<_> = tracker
        .books()
        .iter()
        .filter(|b| read.map_or(true, |status| b.have_read == status))
        .collect();

    output.print_books(&books);
    Ok(())
}

/// Change the read status of a book
pub fn edit(
    tracker: &mut Tracker<FileStorage>,
    config: &Config,
    id: String,
    status: String,
    output: &Output,
) -> Result<()> {
    let book_id = resolve_id(tracker, config, &id)?;
    let status = tracker.edit_read_str(&status, &book_id)?;

    let name = tracker
        .find(&book_id)
        .map(|b| b.book_name.clone())
        .unwrap_or_default();
    output.success(&config.flavor.edited_message(status, &name));

    Ok(())
}

/// Delete a book
pub fn delete(
    tracker: &mut Tracker<FileStorage>,
    config: &Config,
    id: String,
    output: &Output,
) -> Result<()> {
    let book_id = resolve_id(tracker, config, &id)?;
    let name = tracker
        .find(&book_id)
        .map(|b| b.book_name.clone())
        .unwrap_or_default();

    tracker
        .delete_book(&book_id)
        .context("Failed to delete book")?;

    output.success(&config.flavor.deleted_message(&name));
    Ok(())
}

/// Delete every book
pub fn clear(
    tracker: &mut Tracker<FileStorage>,
    config: &Config,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if !yes && output.should_prompt() && !tracker.books().is_empty() {
        let prompt = format!("Delete all {} book(s)?", tracker.books().len());
        if !confirm(&prompt)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match tracker.delete_all().context("Failed to delete books")? {
        ClearOutcome::AlreadyEmpty => output.message(config.flavor.already_empty_message()),
        ClearOutcome::Cleared(_) => output.success(config.flavor.cleared_message()),
    }

    Ok(())
}

/// Show the done / yet-to-read lists
pub fn aside(tracker: &Tracker<FileStorage>, output: &Output) -> Result<()> {
    output.print_aside(&AsidePanel::from_books(tracker.books()));
    Ok(())
}

/// Find the book whose id prints as `id`
///
/// Timestamp and text ids are matched by their printed form, so `shelf rm
/// 1700000000000` finds a numeric id and `shelf rm book-1` a text one.
fn resolve_id(tracker: &Tracker<FileStorage>, config: &Config, id: &str) -> Result<BookId> {
    let id = id.trim();
    match tracker.books().iter().find(|b| b.book_id.to_string() == id) {
        Some(book) => Ok(book.book_id.clone()),
        None => bail!("{}: {}", config.flavor.not_found_message(), id),
    }
}
