//! External collaborators: the release notes generator and the TOC generator
//!
//! Both are run as child processes from the command lines in [ToolsConfig].

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::config::ToolsConfig;
use crate::error::{ChangelogError, Result};

/// Operations delegated to external programs
pub trait ExternalTools {
    /// Write markdown release notes for `previous..current` to `output`
    fn fetch_release_notes(&self, previous: &str, current: &str, output: &Path) -> Result<()>;

    /// Rebuild the table of contents of `file` in place
    fn regenerate_toc(&self, file: &Path) -> Result<()>;
}

/// Runs the configured command lines
pub struct CommandTools {
    config: ToolsConfig,
}

impl CommandTools {
    pub fn new(config: ToolsConfig) -> Self {
        CommandTools { config }
    }
}

impl ExternalTools for CommandTools {
    fn fetch_release_notes(&self, previous: &str, current: &str, output: &Path) -> Result<()> {
        let range = format!("{}..{}", previous, current);
        let output = output.display().to_string();
        let argv = expand(
            &self.config.relnotes,
            &[("{range}", range.as_str()), ("{output}", output.as_str())],
        );
        info!(%range, "fetching release notes");
        run(&argv)
    }

    fn regenerate_toc(&self, file: &Path) -> Result<()> {
        let file = file.display().to_string();
        let argv = expand(&self.config.toc, &[("{file}", file.as_str())]);
        info!(%file, "regenerating table of contents");
        run(&argv)
    }
}

/// Substitute `{placeholder}` values into every argument
pub fn expand(template: &[String], values: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            values
                .iter()
                .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
        })
        .collect()
}

/// Execute a command line, failing on spawn errors and non-zero exit codes.
pub fn run(argv: &[String]) -> Result<()> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ChangelogError::tool("empty command line"))?;

    debug!(program = %program, ?args, "running external tool");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ChangelogError::tool(format!("Failed to execute {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        return Err(ChangelogError::tool(format!(
            "{} failed with exit code {}\nStdout: {}\nStderr: {}",
            program,
            output.status.code().unwrap_or(-1),
            stdout.trim_end(),
            stderr.trim_end()
        )));
    }

    Ok(())
}
