//! Status command handler

use anyhow::{Context, Result};

use shelf_core::{Config, FileStorage, Tracker, STORAGE_KEY};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(tracker: &Tracker<FileStorage>, config: &Config, output: &Output) -> Result<()> {
    let storage = tracker.store().storage();
    let size = storage
        .key_size(STORAGE_KEY)
        .context("Failed to read storage size")?;

    let total = tracker.books().len();
    let done = tracker
        .books()
        .iter()
        .filter(|b| b.have_read.is_read())
        .count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "flavor": config.flavor.as_str(),
                    "storage": {
                        "location": storage.data_dir(),
                        "file_exists": size.is_some(),
                        "size": size.unwrap_or(0)
                    },
                    "counts": {
                        "books": total,
                        "done_reading": done,
                        "yet_to_read": total - done
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", total);
        }
        OutputFormat::Human => {
            println!("Shelf Status");
            println!("============");
            println!();
            println!("Flavor: {}", config.flavor);
            println!();
            println!("Storage:");
            println!("  Location: {}", storage.data_dir().display());
            println!(
                "  Size:     {}",
                size.map(human_size)
                    .unwrap_or_else(|| "(nothing saved yet)".to_string())
            );
            println!();
            println!("Contents:");
            println!("  Books:        {}", total);
            println!("  Done reading: {}", done);
            println!("  Yet to read:  {}", total - done);
        }
    }

    Ok(())
}

/// Format a byte count for display
fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
