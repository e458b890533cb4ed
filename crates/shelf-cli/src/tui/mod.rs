//! Shelf TUI
//!
//! Terminal user interface for Shelf.
//!
//! ## Layout
//!
//! - Top: heading
//! - Left: book list
//! - Right: aside panel ("Done reading" / "Yet to read"), collapsible
//! - Bottom: stacked notices and status bar
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Switch focus between panes
//! - Tab: Cycle through panes
//! - Enter: Jump to the book an aside link points at
//! - b: Open/close the aside panel
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add book
//! - e: Edit read status (Enter commits, Esc cancels; in the dropdown
//!   style e also commits)
//! - d: Delete book
//! - u: Undo delete
//! - D: Delete all books (press twice)
//! - x: Dismiss latest notice

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use shelf_core::{Config, FileStorage, KeyValueStorage, ReadStatus, ShelfError, Tracker};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{ActivePane, App, InputMode};

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if SHELF_LOG is set)
    init_tui_logging(&config);

    let mut tracker = Tracker::open(FileStorage::from_config(&config))
        .with_context(|| format!("Failed to open book store in {:?}", config.data_dir))?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&tracker, &config);

    let result = run_app(&mut terminal, &mut app, &mut tracker).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend, S: KeyValueStorage>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tracker: &mut Tracker<S>,
) -> Result<()> {
    loop {
        // Expire notices before drawing
        app.tick(Instant::now());

        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::time::sleep(Duration::from_millis(50)).await;

        // Check for terminal events (non-blocking)
        if !event::poll(Duration::from_millis(0))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // If error modal is showing, any key dismisses it
        if app.has_error() {
            app.clear_error();
            continue;
        }

        // If help is showing, any key dismisses it
        if app.show_help {
            app.show_help = false;
            continue;
        }

        let handled = match app.input_mode {
            InputMode::Normal => handle_normal_mode(app, tracker, key.code, key.modifiers),
            InputMode::Form => handle_form_mode(app, tracker, key.code),
            InputMode::Edit => handle_edit_mode(app, tracker, key.code),
        };
        if let Err(e) = handled {
            app.set_error(describe_error(&e));
        }

        if app.should_quit {
            info!("Quitting TUI");
            break;
        }
    }

    Ok(())
}

/// Handle key events in normal mode
fn handle_normal_mode<S: KeyValueStorage>(
    app: &mut App,
    tracker: &mut Tracker<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    // Any key other than a second D cancels a pending delete-all
    if code != KeyCode::Char('D') {
        app.pending_clear = None;
    }

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Navigation
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => app.prev_pane(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => app.next_pane(),

        // Enter: follow aside link
        KeyCode::Enter => {
            if app.active_pane == ActivePane::Aside {
                app.follow_aside_link();
            }
        }

        // Commands
        KeyCode::Char('a') => app.open_form(),
        KeyCode::Char('e') => app.begin_edit(tracker),
        KeyCode::Char('d') => app.delete_selected(tracker)?,
        KeyCode::Char('u') => app.undo_delete(tracker)?,
        KeyCode::Char('D') => app.request_delete_all(tracker)?,
        KeyCode::Char('b') => app.toggle_aside(),
        KeyCode::Char('x') | KeyCode::Esc => app.dismiss_notice(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }

    Ok(())
}

/// Handle key events while the entry form is open
fn handle_form_mode<S: KeyValueStorage>(
    app: &mut App,
    tracker: &mut Tracker<S>,
    code: KeyCode,
) -> Result<()> {
    match code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(tracker)?,
        KeyCode::Tab | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Char(c) => app.form_insert_char(c),
        KeyCode::Backspace => app.form_delete_char(),
        _ => {}
    }
    Ok(())
}

/// Handle key events while a read status is being edited
fn handle_edit_mode<S: KeyValueStorage>(
    app: &mut App,
    tracker: &mut Tracker<S>,
    code: KeyCode,
) -> Result<()> {
    match code {
        KeyCode::Esc => app.finish_edit(tracker),
        KeyCode::Enter => app.commit_edit(tracker)?,
        _ if app.is_dropdown_edit() => match code {
            KeyCode::Char('e') => app.commit_edit(tracker)?,
            KeyCode::Char('j')
            | KeyCode::Char('k')
            | KeyCode::Char(' ')
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right => app.edit_toggle(),
            KeyCode::Char('y') | KeyCode::Char('Y') => app.edit_select(ReadStatus::Yes),
            KeyCode::Char('n') | KeyCode::Char('N') => app.edit_select(ReadStatus::No),
            _ => {}
        },
        KeyCode::Char(c) => app.edit_insert_char(c),
        KeyCode::Backspace => app.edit_delete_char(),
        _ => {}
    }
    Ok(())
}

/// Error modal text, with a recovery hint for storage failures
fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ShelfError>() {
        Some(ShelfError::Storage(storage)) => match storage.recovery_suggestion() {
            Some(hint) => format!("{} {}", storage, hint),
            None => storage.to_string(),
        },
        _ => format!("Action failed: {:#}", error),
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if SHELF_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf={}", log_level, log_level));

    // Initialize file-based logging (ignore error if already initialized)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::MemoryStorage;

    fn setup() -> (Tracker<MemoryStorage>, App) {
        let tracker = Tracker::open(MemoryStorage::new()).unwrap();
        let app = App::new(&tracker, &Config::default());
        (tracker, app)
    }

    fn press(app: &mut App, tracker: &mut Tracker<MemoryStorage>, code: KeyCode) {
        let result = match app.input_mode {
            InputMode::Normal => handle_normal_mode(app, tracker, code, KeyModifiers::NONE),
            InputMode::Form => handle_form_mode(app, tracker, code),
            InputMode::Edit => handle_edit_mode(app, tracker, code),
        };
        result.unwrap();
    }

    fn type_str(app: &mut App, tracker: &mut Tracker<MemoryStorage>, s: &str) {
        for c in s.chars() {
            press(app, tracker, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_book_with_keys() {
        let (mut tracker, mut app) = setup();

        press(&mut app, &mut tracker, KeyCode::Char('a'));
        type_str(&mut app, &mut tracker, "1984");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "George Orwell");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "328");
        press(&mut app, &mut tracker, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(tracker.books().len(), 1);
        assert_eq!(tracker.books()[0].author_name, "George Orwell");
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);
    }

    #[test]
    fn test_dropdown_edit_with_keys() {
        let (mut tracker, mut app) = setup();
        press(&mut app, &mut tracker, KeyCode::Char('a'));
        type_str(&mut app, &mut tracker, "Dune");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "Frank Herbert");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "412");
        press(&mut app, &mut tracker, KeyCode::Enter);

        press(&mut app, &mut tracker, KeyCode::Char('e'));
        press(&mut app, &mut tracker, KeyCode::Char('n'));
        press(&mut app, &mut tracker, KeyCode::Char('e'));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(tracker.books()[0].have_read, ReadStatus::No);
    }

    #[test]
    fn test_free_text_edit_types_e_and_commits_on_enter() {
        let mut tracker = Tracker::open(MemoryStorage::new()).unwrap();
        let config = Config {
            flavor: shelf_core::Flavor::Library,
            ..Config::default()
        };
        let mut app = App::new(&tracker, &config);
        press(&mut app, &mut tracker, KeyCode::Char('a'));
        type_str(&mut app, &mut tracker, "Emma");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "Jane Austen");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "474");
        press(&mut app, &mut tracker, KeyCode::Enter);

        press(&mut app, &mut tracker, KeyCode::Char('e'));
        for _ in 0..3 {
            press(&mut app, &mut tracker, KeyCode::Backspace);
        }
        press(&mut app, &mut tracker, KeyCode::Char('e'));
        assert_eq!(app.input_mode, InputMode::Edit);
        assert_eq!(tracker.books()[0].have_read, ReadStatus::Yes);

        press(&mut app, &mut tracker, KeyCode::Backspace);
        type_str(&mut app, &mut tracker, "no");
        press(&mut app, &mut tracker, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(tracker.books()[0].have_read, ReadStatus::No);
    }

    #[test]
    fn test_other_key_cancels_pending_clear() {
        let (mut tracker, mut app) = setup();
        press(&mut app, &mut tracker, KeyCode::Char('a'));
        type_str(&mut app, &mut tracker, "A");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "B");
        press(&mut app, &mut tracker, KeyCode::Tab);
        type_str(&mut app, &mut tracker, "1");
        press(&mut app, &mut tracker, KeyCode::Enter);

        press(&mut app, &mut tracker, KeyCode::Char('D'));
        press(&mut app, &mut tracker, KeyCode::Char('j'));
        press(&mut app, &mut tracker, KeyCode::Char('D'));
        assert_eq!(tracker.books().len(), 1);

        press(&mut app, &mut tracker, KeyCode::Char('D'));
        assert!(tracker.books().is_empty());
    }

    #[test]
    fn test_describe_storage_error() {
        let error: anyhow::Error =
            ShelfError::Storage(shelf_core::StorageError::Write {
                path: std::path::PathBuf::from("/data/savedLocalBooks.json"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
            .into();
        let text = describe_error(&error);
        assert!(text.starts_with("Failed to write '/data/savedLocalBooks.json'"));
        assert!(text.ends_with("point data_dir somewhere writable."));

        let error = anyhow::anyhow!("boom");
        assert_eq!(describe_error(&error), "Action failed: boom");
    }

    #[test]
    fn test_quit() {
        let (mut tracker, mut app) = setup();
        press(&mut app, &mut tracker, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
