//! Shared CLI helpers: path expansion, progress rendering, key masking.

use std::path::PathBuf;

use colored::Colorize;

use fmmaker_batch::ProgressEvent;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print one progress event as a log line, with a `[i/n]` counter for file starts.
pub fn print_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::Started { .. } => println!("{}", event.message().cyan().bold()),
        ProgressEvent::FileStarted { index, total, .. } => {
            println!("{} {}", format!("[{index}/{total}]").dimmed(), event.message());
        }
        ProgressEvent::FileWritten { .. } => println!("  {} {}", "✓".green(), event.message()),
        ProgressEvent::FileSkipped { .. } => println!("  {} {}", "·".yellow(), event.message()),
        ProgressEvent::Finished { .. } => println!("{}", event.message().green().bold()),
        ProgressEvent::ValidationFailed { .. } | ProgressEvent::Failed { .. } => {
            eprintln!("{}", event.message().red().bold());
        }
    }
}

/// Show only the first few characters of a secret.
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key.chars().take(6).collect();
    format!("{visible}… (set)")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
