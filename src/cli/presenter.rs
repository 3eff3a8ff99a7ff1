//! CLI presenter for output formatting

use colored::*;

use crate::domain::{Posture, Selection};

/// Presenter for CLI output formatting
///
/// Status lines go to stderr; data the user might pipe goes to stdout.
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config output)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the posture and selection after an evaluation
    pub fn selection(&self, posture: Posture, selection: &Selection) {
        eprintln!(
            "{} {} | {}",
            "●".cyan(),
            posture.to_string().bold(),
            selection.summary()
        );
    }

    /// Print a default-slot switch
    pub fn switched(&self, slot: &str, name: &str) {
        eprintln!("{} {} → {}", "✓".green(), slot, name);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
