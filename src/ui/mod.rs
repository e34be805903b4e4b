//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and terminal state

use std::io::{self, Write};

use console::Term;

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    commit_message, display_error, display_failure, display_manual_push_instruction,
    display_skip, display_status, display_success, display_tag_header,
};

/// Source of yes/no answers for the workflow
pub trait Prompter {
    /// Ask `prompt`; `true` only on an explicit yes
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Reads answers from stdin
///
/// When nobody is attached to the terminal every question is answered "no",
/// so an unattended run never deletes or pushes anything.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !console::user_attended() {
            tracing::info!(prompt, "not attended, answering no");
            return Ok(false);
        }
        confirm_action(prompt)
    }
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Displays the given prompt and accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
///
/// # Returns
/// * `Ok(true)` - If user entered "y" or "yes"
/// * `Ok(false)` - Otherwise (including Enter, or "n"/"no")
/// * `Err` - If input error occurs
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
    let response = input.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Makes the terminal cursor visible again when dropped.
pub struct CursorGuard {
    term: Term,
}

impl CursorGuard {
    pub fn new() -> Self {
        CursorGuard {
            term: Term::stdout(),
        }
    }
}

impl Default for CursorGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        if self.term.is_term() {
            let _ = self.term.show_cursor();
        }
    }
}
