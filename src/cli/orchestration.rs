//! Main workflow orchestration logic
//!
//! Drives one update run: preflight checks, work branch setup, per-tag
//! splicing, TOC regeneration, commit and the push decision. Errors
//! propagate up to [run_update_workflow], which always runs
//! [UpdateWorkflow::cleanup] before handing the outcome to the caller.

use std::path::{Component, Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::boundary::SkipReason;
use crate::changelog::{Changelog, Fragment};
use crate::config::Config;
use crate::domain::{Tag, WorkBranch};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;
use crate::tools::ExternalTools;
use crate::ui::{self, Prompter};

/// Arguments for the update workflow
///
/// Mirrors the CLI arguments in a form that doesn't depend on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateWorkflowArgs {
    /// Tags to refresh, in command-line order
    pub tags: Vec<String>,
}

/// What happened to a single tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    /// The tag's section was regenerated in `file` (relative to the work tree)
    Updated { file: PathBuf, previous: String },
    Skipped(SkipReason),
}

/// Result of a finished update run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowResult {
    /// The work branch holding the commit
    pub branch: String,

    /// Tags whose sections were spliced
    pub updated_tags: Vec<String>,

    pub skipped: Vec<SkipReason>,

    /// Changelog files touched, relative to the work tree
    pub files: Vec<PathBuf>,

    /// Commit id, `None` when there was nothing to commit
    pub commit: Option<String>,

    /// Whether the branch was pushed to the remote
    pub pushed: bool,
}

impl WorkflowResult {
    /// True when the run ended without a commit
    pub fn is_noop(&self) -> bool {
        self.commit.is_none()
    }
}

/// Print a pass/fail line for a step and pass its result through.
fn step<T>(label: &str, action: impl FnOnce() -> Result<T>) -> Result<T> {
    match action() {
        Ok(value) => {
            ui::display_success(label);
            Ok(value)
        }
        Err(e) => {
            ui::display_failure(label);
            Err(e)
        }
    }
}

/// Drop `.` components so paths are valid index entries.
/// The `owner/repo` part of a remote URL, for both `scheme://host/path`
/// and scp-like `user@host:path` forms.
fn repository_path(url: &str) -> &str {
    let path = match url.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => url.split_once(':').map_or(url, |(_, path)| path),
    };
    let path = path.trim_matches('/');
    path.strip_suffix(".git").unwrap_or(path)
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// One update run over a repository
pub struct UpdateWorkflow<'a, R, T, P> {
    repo: &'a R,
    tools: &'a T,
    prompter: &'a P,
    config: &'a Config,
    branch: Option<WorkBranch>,
    committed: bool,
}

impl<'a, R, T, P> UpdateWorkflow<'a, R, T, P>
where
    R: Repository,
    T: ExternalTools,
    P: Prompter,
{
    pub fn new(repo: &'a R, tools: &'a T, prompter: &'a P, config: &'a Config) -> Self {
        UpdateWorkflow {
            repo,
            tools,
            prompter,
            config,
            branch: None,
            committed: false,
        }
    }

    /// Run every stage for `tags`. Does not clean up; see [Self::cleanup].
    pub fn run(&mut self, tags: &[Tag]) -> Result<WorkflowResult> {
        let branch = WorkBranch::for_tags(&self.config.repository.branch_prefix, tags)
            .ok_or_else(|| ChangelogError::precondition("No tags given"))?;

        self.preflight()?;
        self.setup_branch(&branch)?;

        let mut result = WorkflowResult {
            branch: branch.name.clone(),
            ..WorkflowResult::default()
        };

        for tag in tags {
            ui::display_tag_header(&tag.name);
            match self.process_tag(tag)? {
                TagOutcome::Updated { file, previous } => {
                    info!(tag = %tag, %previous, file = %file.display(), "tag updated");
                    if !result.files.contains(&file) {
                        result.files.push(file);
                    }
                    result.updated_tags.push(tag.name.clone());
                }
                TagOutcome::Skipped(reason) => {
                    warn!(tag = %tag, %reason, "tag skipped");
                    ui::display_skip(&reason);
                    result.skipped.push(reason);
                }
            }
        }

        self.finalize(&branch, &mut result)?;
        Ok(result)
    }

    /// The remote must be a personal fork and the working tree clean.
    pub fn preflight(&self) -> Result<()> {
        let repository = &self.config.repository;

        step(
            &format!("Remote '{}' is a personal fork", repository.remote),
            || {
                let url = self.repo.remote_url(&repository.remote)?;
                let upstream = repository.upstream.trim_matches('/');
                if repository_path(&url).eq_ignore_ascii_case(upstream) {
                    return Err(ChangelogError::precondition(format!(
                        "Remote '{}' points at the upstream repository ({}); use your personal fork",
                        repository.remote, url
                    )));
                }
                Ok(())
            },
        )?;

        step("Working tree is clean", || {
            if self.repo.is_clean()? {
                Ok(())
            } else {
                Err(ChangelogError::precondition(
                    "Working tree has uncommitted changes",
                ))
            }
        })
    }

    /// Check out the primary branch and create a fresh work branch from it.
    fn setup_branch(&mut self, branch: &WorkBranch) -> Result<()> {
        let primary = &self.config.repository.primary_branch;

        step(&format!("Checked out {}", primary), || {
            self.repo.checkout_branch(primary)
        })?;

        if self.repo.branch_exists(&branch.name)? {
            let prompt = format!("Branch '{}' already exists. Delete it?", branch.name);
            if !self.prompter.confirm(&prompt)? {
                return Err(ChangelogError::cancelled(format!(
                    "Branch '{}' already exists",
                    branch.name
                )));
            }
            step(&format!("Deleted branch {}", branch.name), || {
                self.repo.delete_branch(&branch.name)
            })?;
        }

        step(&format!("Created branch {}", branch.name), || {
            self.repo.create_branch(&branch.name)
        })?;
        self.branch = Some(branch.clone());

        step(&format!("Checked out {}", branch.name), || {
            self.repo.checkout_branch(&branch.name)
        })
    }

    /// Classify, locate, fetch and splice a single tag.
    #[instrument(skip_all, fields(tag = %tag))]
    pub fn process_tag(&self, tag: &Tag) -> Result<TagOutcome> {
        let kind = tag.classify()?;
        let Some(file_name) = kind.changelog_file_name() else {
            return Ok(TagOutcome::Skipped(SkipReason::MajorMilestone {
                tag: tag.name.clone(),
            }));
        };

        let relative = normalize(&self.config.repository.changelog_dir.join(&file_name));
        let path = self.repo.workdir()?.join(&relative);

        if !path.is_file() {
            return Ok(TagOutcome::Skipped(SkipReason::ChangelogMissing {
                tag: tag.name.clone(),
                file: file_name,
            }));
        }

        let mut changelog = Changelog::read(&path)?;
        if !changelog.contains_tag(&tag.name) {
            return Ok(TagOutcome::Skipped(SkipReason::TagNotFound {
                tag: tag.name.clone(),
                file: file_name,
            }));
        }

        let previous = changelog.previous_tag(&tag.name, &file_name)?;
        ui::display_status(&format!("Previous tag for {} is {}", tag, previous));

        let notes = tempfile::Builder::new()
            .prefix("changelog-update-")
            .suffix(".md")
            .tempfile()?;

        step(
            &format!("Fetched release notes for {}..{}", previous, tag),
            || {
                self.tools
                    .fetch_release_notes(&previous, &tag.name, notes.path())
            },
        )?;

        let fragment = Fragment::read(notes.path(), &previous)?;
        if fragment.is_empty() {
            warn!(%previous, "release notes generator returned no entries");
        }

        step(&format!("Updated {} for {}", file_name, tag), || {
            changelog.splice(&tag.name, &fragment, &file_name)?;
            changelog.write(&path)
        })?;

        Ok(TagOutcome::Updated {
            file: relative,
            previous,
        })
    }

    /// Regenerate TOCs, commit and offer to push.
    fn finalize(&mut self, branch: &WorkBranch, result: &mut WorkflowResult) -> Result<()> {
        let workdir = self.repo.workdir()?;

        for file in &result.files {
            step(
                &format!("Regenerated table of contents in {}", file.display()),
                || self.tools.regenerate_toc(&workdir.join(file)),
            )?;
        }

        let paths: Vec<&Path> = result.files.iter().map(PathBuf::as_path).collect();
        if !paths.is_empty() {
            self.repo.stage_paths(&paths)?;
        }

        if !self.repo.has_staged_changes()? {
            info!("no changes to commit");
            ui::display_success("No changes to commit");
            return Ok(());
        }

        let message = ui::commit_message(&result.updated_tags);
        let commit = step(&format!("Committed \"{}\"", message), || {
            self.repo.commit(&message)
        })?;
        self.committed = true;
        info!(%commit, branch = %branch.name, "committed changelog update");
        result.commit = Some(commit);

        let remote = &self.config.repository.remote;
        let prompt = format!("Push branch '{}' to remote '{}'?", branch.name, remote);
        if self.prompter.confirm(&prompt)? {
            step(&format!("Pushed {} to {}", branch.name, remote), || {
                self.repo.push_branch(remote, &branch.name)
            })?;
            result.pushed = true;
        } else {
            ui::display_manual_push_instruction(&branch.name, remote);
        }

        Ok(())
    }

    /// Offer to delete the work branch when the run didn't end in a commit.
    ///
    /// The primary branch is checked out before deleting.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }
        let Some(branch) = self.branch.take() else {
            return Ok(());
        };
        if !self.repo.branch_exists(&branch.name)? {
            return Ok(());
        }

        let prompt = format!("Delete work branch '{}'?", branch.name);
        if !self.prompter.confirm(&prompt)? {
            info!(branch = %branch.name, "keeping work branch");
            return Ok(());
        }

        let primary = &self.config.repository.primary_branch;
        if self.repo.current_branch()?.as_deref() == Some(branch.name.as_str()) {
            step(&format!("Checked out {}", primary), || {
                self.repo.checkout_branch(primary)
            })?;
        }
        step(&format!("Deleted branch {}", branch.name), || {
            self.repo.delete_branch(&branch.name)
        })
    }
}

/// Main update workflow
///
/// Runs every stage, then cleanup on both the success and failure paths.
/// A cleanup failure is logged and reported but never replaces the run's
/// own outcome.
pub fn run_update_workflow<R, T, P>(
    args: UpdateWorkflowArgs,
    config: &Config,
    repo: &R,
    tools: &T,
    prompter: &P,
) -> Result<WorkflowResult>
where
    R: Repository,
    T: ExternalTools,
    P: Prompter,
{
    let mut tags: Vec<Tag> = Vec::with_capacity(args.tags.len());
    for name in args.tags {
        if tags.iter().any(|t| t.name == name) {
            warn!(tag = %name, "duplicate tag ignored");
            continue;
        }
        tags.push(Tag::new(name));
    }
    let mut workflow = UpdateWorkflow::new(repo, tools, prompter, config);

    let outcome = workflow.run(&tags);
    if let Err(e) = &outcome {
        ui::display_error(&e.to_string());
    }

    if let Err(e) = workflow.cleanup() {
        warn!(error = %e, "cleanup failed");
        ui::display_error(&format!("Cleanup failed: {}", e));
    }

    outcome
}
