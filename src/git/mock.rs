use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChangelogError, Result};
use crate::git::Repository;

#[derive(Debug, Default)]
struct MockState {
    remotes: HashMap<String, String>,
    branches: BTreeSet<String>,
    current: Option<String>,
    dirty: bool,
    head_files: BTreeMap<PathBuf, String>,
    index_files: BTreeMap<PathBuf, String>,
    commits: Vec<String>,
    pushes: Vec<(String, String)>,
    failing_checkouts: BTreeSet<String>,
}

/// Mock repository for testing without actual git operations
///
/// Files live in a real directory so the workflow can read and rewrite
/// changelogs; HEAD and the index are tracked as file snapshots.
pub struct MockRepository {
    workdir: PathBuf,
    state: RefCell<MockState>,
}

impl MockRepository {
    /// Create a mock over `workdir` with a checked-out branch `primary`
    pub fn new(workdir: impl Into<PathBuf>, primary: &str) -> Self {
        let state = MockState {
            branches: BTreeSet::from([primary.to_string()]),
            current: Some(primary.to_string()),
            ..MockState::default()
        };
        MockRepository {
            workdir: workdir.into(),
            state: RefCell::new(state),
        }
    }

    /// Add a remote with the given URL
    pub fn add_remote(&self, name: impl Into<String>, url: impl Into<String>) {
        self.state.borrow_mut().remotes.insert(name.into(), url.into());
    }

    pub fn add_branch(&self, name: impl Into<String>) {
        self.state.borrow_mut().branches.insert(name.into());
    }

    /// Mark the working tree as having modified tracked files
    pub fn set_dirty(&self, dirty: bool) {
        self.state.borrow_mut().dirty = dirty;
    }

    /// Make checking out `name` fail
    pub fn fail_checkout(&self, name: impl Into<String>) {
        self.state.borrow_mut().failing_checkouts.insert(name.into());
    }

    /// Record the current content of `path` as committed at HEAD
    pub fn track_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let rel = path.as_ref().to_path_buf();
        let content = fs::read_to_string(self.workdir.join(&rel))?;
        let mut state = self.state.borrow_mut();
        state.head_files.insert(rel.clone(), content.clone());
        state.index_files.insert(rel, content);
        Ok(())
    }

    pub fn branches(&self) -> Vec<String> {
        self.state.borrow().branches.iter().cloned().collect()
    }

    /// Commit messages in order
    pub fn commits(&self) -> Vec<String> {
        self.state.borrow().commits.clone()
    }

    /// `(remote, branch)` pairs pushed
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.state.borrow().pushes.clone()
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.state
            .borrow()
            .remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| ChangelogError::precondition(format!("Cannot find remote '{}'", remote)))
    }

    fn is_clean(&self) -> Result<bool> {
        Ok(!self.state.borrow().dirty)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.state.borrow().current.clone())
    }

    fn branch_exists(&self, name: &str) -> Result<bool> {
        Ok(self.state.borrow().branches.contains(name))
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.failing_checkouts.contains(name) || !state.branches.contains(name) {
            return Err(ChangelogError::precondition(format!(
                "Failed to check out '{}'",
                name
            )));
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.branches.insert(name.to_string()) {
            return Err(ChangelogError::precondition(format!(
                "Branch '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.current.as_deref() == Some(name) {
            return Err(ChangelogError::precondition(format!(
                "Cannot delete checked out branch '{}'",
                name
            )));
        }
        state.branches.remove(name);
        Ok(())
    }

    fn stage_paths(&self, paths: &[&Path]) -> Result<()> {
        for path in paths {
            let content = fs::read_to_string(self.workdir.join(path))?;
            self.state
                .borrow_mut()
                .index_files
                .insert(path.to_path_buf(), content);
        }
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let state = self.state.borrow();
        Ok(state.index_files != state.head_files)
    }

    fn commit(&self, message: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        let snapshot = state.index_files.clone();
        state.head_files = snapshot;
        state.commits.push(message.to_string());
        Ok(format!("{:040x}", state.commits.len()))
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.remotes.contains_key(remote) {
            return Err(ChangelogError::precondition(format!(
                "Cannot find remote '{}'",
                remote
            )));
        }
        state.pushes.push((remote.to_string(), branch.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_branch_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MockRepository::new(dir.path(), "master");

        repo.create_branch("update-v1.0.1").unwrap();
        repo.checkout_branch("update-v1.0.1").unwrap();
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("update-v1.0.1"));
        assert!(repo.delete_branch("update-v1.0.1").is_err());

        repo.checkout_branch("master").unwrap();
        repo.delete_branch("update-v1.0.1").unwrap();
        assert!(!repo.branch_exists("update-v1.0.1").unwrap());
    }

    #[test]
    fn test_mock_staging_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CHANGELOG-1.0.md"), "# v1.0.1\n").unwrap();
        let repo = MockRepository::new(dir.path(), "master");
        repo.track_file("CHANGELOG-1.0.md").unwrap();

        repo.stage_paths(&[Path::new("CHANGELOG-1.0.md")]).unwrap();
        assert!(!repo.has_staged_changes().unwrap());

        fs::write(dir.path().join("CHANGELOG-1.0.md"), "# v1.0.1\n\n* new\n").unwrap();
        repo.stage_paths(&[Path::new("CHANGELOG-1.0.md")]).unwrap();
        assert!(repo.has_staged_changes().unwrap());

        repo.commit("Update CHANGELOG for v1.0.1").unwrap();
        assert!(!repo.has_staged_changes().unwrap());
        assert_eq!(repo.commits(), vec!["Update CHANGELOG for v1.0.1"]);
    }

    #[test]
    fn test_mock_remote_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MockRepository::new(dir.path(), "master");
        repo.add_remote("origin", "git@github.com:someone/kubernetes.git");

        assert!(repo.remote_url("origin").unwrap().contains("someone"));
        assert!(repo.remote_url("upstream").is_err());
    }
}
