//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the Git operations
//! an update run performs, allowing for a real implementation and a mock
//! implementation for testing.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation over a plain directory
//!
//! The workflow in [crate::cli::orchestration] depends only on the
//! [Repository] trait.
//!
//! ```rust
//! # use changelog_update::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> changelog_update::Result<()> {
//! if !repo.is_clean()? {
//!     println!("commit or stash your changes first");
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` through [crate::error::ChangelogError::Git] and report
/// failed checkouts as precondition failures.
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> Result<PathBuf>;

    /// URL configured for `remote`
    ///
    /// # Returns
    /// * `Ok(String)` - The fetch URL of the remote
    /// * `Err` - If the remote doesn't exist or has no URL
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// True when no tracked file is modified, staged or deleted.
    /// Untracked files are ignored.
    fn is_clean(&self) -> Result<bool>;

    /// Short name of the checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    fn branch_exists(&self, name: &str) -> Result<bool>;

    /// Switch the working tree and HEAD to the local branch `name`
    ///
    /// Local modifications to files that are identical in both trees are
    /// carried over; conflicting ones make the checkout fail.
    fn checkout_branch(&self, name: &str) -> Result<()>;

    /// Create a local branch at HEAD without switching to it
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Delete the local branch `name`; it must not be checked out
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// Add files (relative to the working tree root) to the index
    fn stage_paths(&self, paths: &[&Path]) -> Result<()>;

    /// True when the index differs from HEAD
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commit the index on the current branch, returning the new commit id
    fn commit(&self, message: &str) -> Result<String>;

    /// Push the local branch `branch` to the same name on `remote`
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;
}
