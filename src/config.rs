use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChangelogError, Result};

/// File name looked up in the current directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "changelog-update.toml";

/// Represents the complete configuration for changelog-update.
///
/// Contains repository conventions, the external tool command lines, and log file settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_primary_branch() -> String {
    "master".to_string()
}

fn default_upstream() -> String {
    "kubernetes/kubernetes".to_string()
}

fn default_branch_prefix() -> String {
    "update-".to_string()
}

fn default_changelog_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Repository conventions: which remote is the user's fork, which branch
/// changelogs live on, and where the files are.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,

    /// `owner/repo` path of the canonical upstream repository, compared
    /// case-insensitively against the remote URL path.
    #[serde(default = "default_upstream")]
    pub upstream: String,

    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,

    /// Directory holding the CHANGELOG files, relative to the working tree root.
    #[serde(default = "default_changelog_dir")]
    pub changelog_dir: PathBuf,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            remote: default_remote(),
            primary_branch: default_primary_branch(),
            upstream: default_upstream(),
            branch_prefix: default_branch_prefix(),
            changelog_dir: default_changelog_dir(),
        }
    }
}

fn default_relnotes_command() -> Vec<String> {
    vec![
        "relnotes".to_string(),
        "--quiet".to_string(),
        "--htmlize-md".to_string(),
        "--markdown".to_string(),
        "--file={output}".to_string(),
        "{range}".to_string(),
    ]
}

fn default_toc_command() -> Vec<String> {
    vec![
        "mdtoc".to_string(),
        "--inplace".to_string(),
        "{file}".to_string(),
    ]
}

/// Command lines for the external collaborators.
///
/// The first element is the program, the rest are arguments. Placeholders:
/// `{range}` and `{output}` for the release notes generator, `{file}` for the
/// table of contents generator.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_relnotes_command")]
    pub relnotes: Vec<String>,

    #[serde(default = "default_toc_command")]
    pub toc: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            relnotes: default_relnotes_command(),
            toc: default_toc_command(),
        }
    }
}

fn default_log_keep() -> usize {
    10
}

/// Log file location and rotation depth.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory for `changelog-update.log`; the system temp dir when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_log_keep")]
    pub keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            directory: None,
            keep: default_log_keep(),
        }
    }
}

impl LoggingConfig {
    pub fn log_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Config {
    /// Rejects settings that would only fail later in the run.
    pub fn validate(&self) -> Result<()> {
        if self.tools.relnotes.is_empty() {
            return Err(ChangelogError::config("tools.relnotes must name a program"));
        }
        if self.tools.toc.is_empty() {
            return Err(ChangelogError::config("tools.toc must name a program"));
        }
        if self.repository.remote.trim().is_empty() {
            return Err(ChangelogError::config("repository.remote must not be empty"));
        }
        if self.repository.primary_branch.trim().is_empty() {
            return Err(ChangelogError::config(
                "repository.primary_branch must not be empty",
            ));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog-update.toml` in current directory
/// 3. `changelog-update.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration, validated
/// * `Err` - If file exists but cannot be read, parsed, or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| ChangelogError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
