//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the AI-Attorney CLI.

use crate::guard::RouteDecision;
use crate::imaging::ImageState;
use crate::types::{Notification, Severity};
use owo_colors::OwoColorize;

/// Longest image URL printed verbatim; data URIs are abbreviated.
const MAX_URL_DISPLAY: usize = 96;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a toast raised by the session layer
    pub fn notification(&self, notification: &Notification) {
        let text = format!("{}: {}", notification.title, notification.message);
        match notification.severity {
            Severity::Info => self.success(&text),
            Severity::Destructive => self.error(&text),
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a block of prose, indented
    pub fn paragraph(&self, text: &str) {
        for line in text.lines() {
            println!("    {}", line);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header = table_line(columns);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * (COLUMN_WIDTH + 1)).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * (COLUMN_WIDTH + 1)));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", table_line(values));
    }

    /// Print one route guard evaluation
    pub fn decision(&self, path: &str, decision: RouteDecision) {
        let label = format!("{:?}", decision);
        if self.colored {
            let label = match decision {
                RouteDecision::ShowProtectedContent | RouteDecision::ShowPublicContent => {
                    label.green().to_string()
                }
                RouteDecision::ShowLoader => label.dimmed().to_string(),
                _ => label.yellow().to_string(),
            };
            println!("    {} {} {}", path.bright_white(), "→".dimmed(), label);
        } else {
            println!("    {} -> {}", path, label);
        }
    }

    /// Print the outcome of an image acquisition
    pub fn image(&self, label: &str, state: &ImageState) {
        let url = state.url().map(abbreviate_url).unwrap_or_default();
        match state {
            ImageState::Resolved(_) => self.kv(label, &url),
            ImageState::Fallback { error: None, .. } => self.kv(label, &url),
            ImageState::Fallback {
                error: Some(error), ..
            } => {
                self.kv(label, &url);
                self.warning(&format!("AI Image Error: {}", error));
            }
            ImageState::Idle | ImageState::Loading => self.kv(label, "(pending)"),
        }
    }
}

const COLUMN_WIDTH: usize = 22;

fn table_line(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| format!("{:<width$}", c, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shorten long URLs (data URIs are megabytes) for terminal display.
pub fn abbreviate_url(url: &str) -> String {
    if url.chars().count() <= MAX_URL_DISPLAY {
        return url.to_string();
    }
    let head: String = url.chars().take(MAX_URL_DISPLAY).collect();
    format!("{}… ({} bytes)", head, url.len())
}
