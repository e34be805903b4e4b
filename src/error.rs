use thiserror::Error;

/// Unified error type for changelog-update operations
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Unable to set CHANGELOG file for tag '{0}'")]
    UnrecognizedTag(String),

    #[error("No 'Changes since' heading found for {tag} in {file}")]
    MissingPreviousTag { tag: String, file: String },

    #[error("External tool failed: {0}")]
    Tool(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in changelog-update
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangelogError::Config(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        ChangelogError::Precondition(msg.into())
    }

    /// Create an external tool error with context
    pub fn tool(msg: impl Into<String>) -> Self {
        ChangelogError::Tool(msg.into())
    }

    /// Create a cancellation error with context
    pub fn cancelled(msg: impl Into<String>) -> Self {
        ChangelogError::Cancelled(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChangelogError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChangelogError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_unrecognized_tag_message() {
        let err = ChangelogError::UnrecognizedTag("release-7".to_string());
        assert!(err.to_string().contains("Unable to set CHANGELOG file"));
        assert!(err.to_string().contains("release-7"));
    }

    #[test]
    fn test_missing_previous_tag_message() {
        let err = ChangelogError::MissingPreviousTag {
            tag: "v1.4.2".to_string(),
            file: "CHANGELOG-1.4.md".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v1.4.2"));
        assert!(msg.contains("CHANGELOG-1.4.md"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ChangelogError::config("x"), "Configuration error"),
            (ChangelogError::precondition("x"), "Precondition failed"),
            (ChangelogError::tool("x"), "External tool failed"),
            (ChangelogError::cancelled("x"), "Cancelled"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
