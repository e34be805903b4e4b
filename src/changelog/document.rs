use std::fs;
use std::path::Path;

use tracing::debug;

use crate::changelog::Fragment;
use crate::error::{ChangelogError, Result};

/// Lines starting a tag section (`# v1.4.2`).
const SECTION_PREFIX: &str = "# v";

/// `## Changes since v1.4.1`, `### Changelog since **v1.4.1**` and friends.
const CHANGES_SINCE_PATTERN: &str = r"^#+\s+Change(?:s|log) since\s+[*`]*([^\s*`]+)[*`]*\s*$";

/// Returns the tag referenced by a "changes since" heading line.
pub(crate) fn changes_since_tag(line: &str) -> Option<String> {
    let re = regex::Regex::new(CHANGES_SINCE_PATTERN).ok()?;
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// One `# <tag>` block of a changelog, heading line included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    tag: String,
    lines: Vec<String>,
}

impl Section {
    /// The tag named by the section heading
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index and referenced tag of the first "changes since" heading.
    fn changes_since(&self) -> Option<(usize, String)> {
        self.lines
            .iter()
            .enumerate()
            .skip(1)
            .find_map(|(idx, line)| changes_since_tag(line).map(|prev| (idx, prev)))
    }

    /// The previous tag referenced by this section's "changes since" heading
    pub fn previous_tag(&self) -> Option<String> {
        self.changes_since().map(|(_, prev)| prev)
    }

    /// Replace everything after the "changes since" heading with `body`.
    ///
    /// The heading itself is kept. Returns `false` when the section has no
    /// such heading, leaving it untouched.
    pub fn replace_changes(&mut self, body: &[String]) -> bool {
        let Some((idx, _)) = self.changes_since() else {
            return false;
        };
        self.lines.truncate(idx + 1);
        self.lines.extend(body.iter().cloned());
        true
    }
}

/// A changelog file parsed into its preamble (title, table of contents)
/// and an ordered list of tag sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    preamble: Vec<String>,
    sections: Vec<Section>,
    trailing_newline: bool,
}

impl Changelog {
    /// Parse markdown text. Every line starting with `# v` opens a new section.
    pub fn parse(content: &str) -> Self {
        let trailing_newline = content.ends_with('\n');
        let body = content.strip_suffix('\n').unwrap_or(content);

        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        if !content.is_empty() {
            for line in body.split('\n') {
                if line.starts_with(SECTION_PREFIX) {
                    sections.push(Section {
                        tag: line[2..].trim_end_matches('\r').to_string(),
                        lines: vec![line.to_string()],
                    });
                } else if let Some(section) = sections.last_mut() {
                    section.lines.push(line.to_string());
                } else {
                    preamble.push(line.to_string());
                }
            }
        }

        Changelog {
            preamble,
            sections,
            trailing_newline,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    /// Render back to markdown; an unmodified document renders to its input.
    pub fn render(&self) -> String {
        let lines: Vec<&str> = self
            .preamble
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.lines.iter()))
            .map(String::as_str)
            .collect();

        let mut out = lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section whose heading is exactly `# <tag>`
    pub fn section(&self, tag: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.tag == tag)
    }

    fn section_mut(&mut self, tag: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.tag == tag)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.section(tag).is_some()
    }

    /// Previous tag for `tag`, read from its "changes since" heading.
    ///
    /// `file` only labels the error.
    pub fn previous_tag(&self, tag: &str, file: &str) -> Result<String> {
        self.section(tag)
            .and_then(Section::previous_tag)
            .ok_or_else(|| ChangelogError::MissingPreviousTag {
                tag: tag.to_string(),
                file: file.to_string(),
            })
    }

    /// Replace the body of `tag`'s "changes since" section with `fragment`.
    pub fn splice(&mut self, tag: &str, fragment: &Fragment, file: &str) -> Result<()> {
        let section = self
            .section_mut(tag)
            .ok_or_else(|| ChangelogError::MissingPreviousTag {
                tag: tag.to_string(),
                file: file.to_string(),
            })?;

        let replaced_lines = section.lines.len();
        if !section.replace_changes(fragment.lines()) {
            return Err(ChangelogError::MissingPreviousTag {
                tag: tag.to_string(),
                file: file.to_string(),
            });
        }

        debug!(
            tag,
            file,
            before = replaced_lines,
            after = section.lines.len(),
            "spliced section"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
<!-- BEGIN MUNGE: GENERATED_TOC -->
- [v1.4.2](#v142)
<!-- END MUNGE: GENERATED_TOC -->

# v1.4.2

[Documentation](https://docs.k8s.io)

## Changelog since v1.4.1

* old entry one
* old entry two


# v1.4.1

## Changelog since v1.4.0

* first patch
";

    #[test]
    fn test_parse_render_is_lossless() {
        let doc = Changelog::parse(SAMPLE);
        assert_eq!(doc.render(), SAMPLE);
        assert_eq!(doc.sections().len(), 2);
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let doc = Changelog::parse("# v1.0.1\ntext");
        assert_eq!(doc.render(), "# v1.0.1\ntext");
    }

    #[test]
    fn test_section_lookup_is_exact() {
        let doc = Changelog::parse("# v1.4.20\n\n## Changes since v1.4.19\n");
        assert!(doc.contains_tag("v1.4.20"));
        assert!(!doc.contains_tag("v1.4.2"));
    }

    #[test]
    fn test_section_heading_with_trailing_space_does_not_match() {
        let doc = Changelog::parse("# v1.4.2 \n\n## Changes since v1.4.1\n");
        assert!(!doc.contains_tag("v1.4.2"));

        let crlf = Changelog::parse("# v1.4.2\r\n\r\n## Changes since v1.4.1\r\n");
        assert!(crlf.contains_tag("v1.4.2"));
    }

    #[test]
    fn test_previous_tag_scoped_to_section() {
        let doc = Changelog::parse(SAMPLE);
        assert_eq!(doc.previous_tag("v1.4.2", "CHANGELOG-1.4.md").unwrap(), "v1.4.1");
        assert_eq!(doc.previous_tag("v1.4.1", "CHANGELOG-1.4.md").unwrap(), "v1.4.0");
    }

    #[test]
    fn test_previous_tag_missing_heading_is_error() {
        let doc = Changelog::parse("# v1.4.2\n\n* entry\n\n# v1.4.1\n\n## Changes since v1.4.0\n");
        let err = doc.previous_tag("v1.4.2", "CHANGELOG-1.4.md").unwrap_err();
        assert!(matches!(err, ChangelogError::MissingPreviousTag { .. }));
    }

    #[test]
    fn test_changes_since_heading_variants() {
        assert_eq!(changes_since_tag("## Changes since v1.4.1").as_deref(), Some("v1.4.1"));
        assert_eq!(changes_since_tag("### Changelog since v1.4.1").as_deref(), Some("v1.4.1"));
        assert_eq!(
            changes_since_tag("## Changes since **v1.4.1**").as_deref(),
            Some("v1.4.1")
        );
        assert_eq!(changes_since_tag("## Changes since `v1.4.1`").as_deref(), Some("v1.4.1"));
        assert_eq!(changes_since_tag("Changes since v1.4.1"), None);
        assert_eq!(changes_since_tag("## Other notable changes"), None);
    }

    #[test]
    fn test_replace_changes_without_heading_leaves_section() {
        let mut doc = Changelog::parse("# v1.0.1\n\n* entry\n");
        let before = doc.render();
        let section = doc.section_mut("v1.0.1").unwrap();
        assert!(!section.replace_changes(&["* new".to_string()]));
        assert_eq!(doc.render(), before);
    }
}
