use std::fmt;

use crate::error::{ChangelogError, Result};

/// `vX.Y.0` exactly: the first release of a minor line.
const DOTZERO_PATTERN: &str = r"^v(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.0$";

/// `vX.Y.Z` with an optional `-<label>.<n>` pre-release suffix.
const RELEASE_PATTERN: &str =
    r"^v(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(-([a-zA-Z0-9]+)\.*(0|[1-9][0-9]*))?$";

/// Represents a release tag supplied on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

/// How a tag is handled by the update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// `vX.Y.0`; these have no "changes since" section to regenerate
    MajorMilestone,
    /// A patch or pre-release tag whose notes live in `CHANGELOG-X.Y.md`
    Release(semver::Version),
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Classify the tag against the dot-zero and release patterns.
    ///
    /// The dot-zero check runs first so `v1.4.0` is never treated as a release.
    /// A tag matching neither pattern is an error.
    pub fn classify(&self) -> Result<TagKind> {
        if matches_pattern(DOTZERO_PATTERN, &self.name) {
            return Ok(TagKind::MajorMilestone);
        }

        if !matches_pattern(RELEASE_PATTERN, &self.name) {
            return Err(ChangelogError::UnrecognizedTag(self.name.clone()));
        }

        let version = semver::Version::parse(self.version_part())
            .map_err(|_| ChangelogError::UnrecognizedTag(self.name.clone()))?;
        Ok(TagKind::Release(version))
    }

    /// Extract version number from tag (e.g., "v1.2.3" -> "1.2.3")
    pub fn version_part(&self) -> &str {
        self.name.trim_start_matches('v')
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TagKind {
    /// Name of the changelog file holding this release line's notes.
    pub fn changelog_file_name(&self) -> Option<String> {
        match self {
            TagKind::MajorMilestone => None,
            TagKind::Release(version) => Some(format!(
                "CHANGELOG-{}.{}.md",
                version.major, version.minor
            )),
        }
    }
}

fn matches_pattern(pattern: &str, tag: &str) -> bool {
    if let Ok(re) = regex::Regex::new(pattern) {
        re.is_match(tag)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_version_part() {
        let tag = Tag::new("v1.2.3");
        assert_eq!(tag.version_part(), "1.2.3");
    }

    #[test]
    fn test_dotzero_is_major_milestone() {
        assert_eq!(
            Tag::new("v2.0.0").classify().unwrap(),
            TagKind::MajorMilestone
        );
        assert_eq!(
            Tag::new("v1.4.0").classify().unwrap(),
            TagKind::MajorMilestone
        );
    }

    #[test]
    fn test_patch_release_names_changelog_file() {
        let kind = Tag::new("v1.4.2").classify().unwrap();
        assert_eq!(kind.changelog_file_name().as_deref(), Some("CHANGELOG-1.4.md"));
    }

    #[test]
    fn test_prerelease_of_dotzero_is_a_release() {
        let kind = Tag::new("v1.5.0-beta.1").classify().unwrap();
        match &kind {
            TagKind::Release(version) => {
                assert_eq!(version.major, 1);
                assert_eq!(version.minor, 5);
                assert_eq!(version.pre.as_str(), "beta.1");
            }
            other => panic!("expected release, got {:?}", other),
        }
        assert_eq!(kind.changelog_file_name().as_deref(), Some("CHANGELOG-1.5.md"));
    }

    #[test]
    fn test_multi_digit_components() {
        let kind = Tag::new("v1.10.12").classify().unwrap();
        assert_eq!(kind.changelog_file_name().as_deref(), Some("CHANGELOG-1.10.md"));
    }

    #[test]
    fn test_unrecognized_tags_fail() {
        for name in ["1.4.2", "release-1.4.2", "v1.4", "v01.4.2", "v1.4.2-"] {
            let result = Tag::new(name).classify();
            assert!(
                matches!(result, Err(ChangelogError::UnrecognizedTag(_))),
                "{} should not classify, got {:?}",
                name,
                result
            );
        }
    }

    #[test]
    fn test_major_milestone_has_no_file() {
        assert_eq!(TagKind::MajorMilestone.changelog_file_name(), None);
    }
}
