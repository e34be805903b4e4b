//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use crate::boundary::SkipReason;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a failed step with a red cross.
pub fn display_failure(message: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a skipped tag with a yellow warning icon.
pub fn display_skip(reason: &SkipReason) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", reason);
}

/// Heading printed once per processed tag.
pub fn display_tag_header(tag: &str) {
    println!("\n\x1b[1mProcessing {}\x1b[0m", tag);
}

/// Display manual push instruction for the work branch.
///
/// # Arguments
/// * `branch` - The branch holding the changelog commit
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(branch: &str, remote: &str) {
    println!(
        "\n\x1b[33m→\x1b[0m To push this branch later, run:\n  \x1b[36mgit push {} {}\x1b[0m",
        remote, branch
    );
}

/// Format the commit message recording which tags were refreshed.
pub fn commit_message(tags: &[String]) -> String {
    format!("Update CHANGELOG for {}", tags.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_functions() {
        // Visual verification test - output goes to stdout/stderr
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_skip(&SkipReason::MajorMilestone {
            tag: "v2.0.0".to_string(),
        });
    }

    #[test]
    fn test_commit_message_lists_tags() {
        let message = commit_message(&["v1.4.2".to_string(), "v1.3.9".to_string()]);
        assert_eq!(message, "Update CHANGELOG for v1.4.2 v1.3.9");
    }
}
