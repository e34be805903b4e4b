use std::fs;
use std::path::Path;

use crate::changelog::document::changes_since_tag;
use crate::error::Result;

/// Blank lines closing every spliced fragment.
pub const FRAGMENT_SPACING: usize = 2;

/// Freshly generated release notes, normalised for splicing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<String>,
}

impl Fragment {
    /// Normalise generator output for the range `previous_tag..`.
    ///
    /// Drops the generator's own "changes since `previous_tag`" heading (the
    /// changelog keeps its own), strips trailing blank lines and closes the
    /// fragment with exactly [`FRAGMENT_SPACING`] blank lines.
    pub fn from_markdown(markdown: &str, previous_tag: &str) -> Self {
        let mut lines: Vec<String> = markdown
            .lines()
            .filter(|line| changes_since_tag(line).as_deref() != Some(previous_tag))
            .map(str::to_string)
            .collect();

        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        lines.extend(std::iter::repeat(String::new()).take(FRAGMENT_SPACING));

        Fragment { lines }
    }

    pub fn read(path: &Path, previous_tag: &str) -> Result<Self> {
        Ok(Self::from_markdown(&fs::read_to_string(path)?, previous_tag))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when the generator produced nothing but its heading
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}
