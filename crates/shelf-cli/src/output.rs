//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use shelf_core::flavor::{DONE_READING, YET_TO_READ};
use shelf_core::{AsideLink, AsidePanel, Book};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", book.book_id);
                println!("Title:   {}", book.book_name);
                println!("Author:  {}", book.author_name);
                println!("Pages:   {}", book.page_number);
                println!("Read:    {}", book.have_read);
                if let Some(created) = book.book_id.created_at() {
                    println!("Added:   {}", created.format("%Y-%m-%d %H:%M"));
                }
            }
            OutputFormat::Json => print_json(book),
            OutputFormat::Quiet => {
                println!("{}", book.book_id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[&Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!(
                        "{:<13} | {:<30} | {:<22} | {:>5} | {}",
                        book.book_id.to_string(),
                        truncate(&book.book_name, 30),
                        truncate(&book.author_name, 22),
                        book.page_number,
                        book.have_read
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(&books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.book_id);
                }
            }
        }
    }

    /// Print the done / yet-to-read lists
    pub fn print_aside(&self, aside: &AsidePanel) {
        match self.format {
            OutputFormat::Human => {
                print_aside_section(DONE_READING, &aside.done);
                println!();
                print_aside_section(YET_TO_READ, &aside.yet_to_read);
            }
            OutputFormat::Json => print_json(aside),
            OutputFormat::Quiet => {
                for link in aside.links() {
                    println!("{}", link.anchor);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_aside_section(heading: &str, links: &[AsideLink]) {
    println!("── {} ({}) ──", heading, links.len());
    for link in links {
        println!("  {:<14} {}", link.anchor, link.title);
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
