use std::fmt;

/// Reasons a tag is passed over without failing the run.
/// These are non-fatal and reported to the user as warnings.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// `vX.Y.0` tags have no "changes since" section to regenerate
    MajorMilestone { tag: String },
    /// The changelog file for the tag's release line doesn't exist
    ChangelogMissing { tag: String, file: String },
    /// The changelog exists but has no `# <tag>` heading
    TagNotFound { tag: String, file: String },
}

impl SkipReason {
    pub fn tag(&self) -> &str {
        match self {
            SkipReason::MajorMilestone { tag }
            | SkipReason::ChangelogMissing { tag, .. }
            | SkipReason::TagNotFound { tag, .. } => tag,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MajorMilestone { tag } => {
                write!(f, "Skipping Major milestone release {}...", tag)
            }
            SkipReason::ChangelogMissing { tag, file } => {
                write!(f, "{} does not exist for {}. Skipping...", file, tag)
            }
            SkipReason::TagNotFound { tag, file } => {
                write!(f, "{} not found in {}. Skipping...", tag, file)
            }
        }
    }
}
