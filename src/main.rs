use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use changelog_update::cli::{run_update_workflow, UpdateWorkflowArgs, WorkflowResult};
use changelog_update::config::{self, Config};
use changelog_update::git::Git2Repository;
use changelog_update::tools::CommandTools;
use changelog_update::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "changelog-update",
    about = "Regenerate CHANGELOG sections for release tags and commit them on a work branch",
    long_about = "Regenerate CHANGELOG sections for release tags and commit them on a work branch.\n\n\
        For every TAG the matching CHANGELOG-X.Y.md file is located, the previous tag is read \
        from the tag's \"Changes since\" heading, fresh release notes for previous..TAG are \
        spliced in, and the table of contents is rebuilt. Dot-zero tags (vX.Y.0) and tags \
        missing from their changelog are skipped. The result is committed on branch \
        update-<first TAG>, which can then be pushed to your fork.\n\n\
        Settings are read from ./changelog-update.toml or the user config directory.",
    disable_help_flag = true
)]
struct Args {
    #[arg(required = true, value_name = "TAG", help = "Release tags to update (e.g. v1.4.2)")]
    tags: Vec<String>,

    #[arg(
        short = 'h',
        long = "help",
        visible_alias = "man",
        action = ArgAction::HelpLong,
        help = "Show full documentation"
    )]
    help: Option<bool>,

    #[arg(short = '?', long = "usage", action = ArgAction::HelpShort, help = "Show short usage")]
    usage: Option<bool>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _cursor = ui::CursorGuard::new();

    let (config, repo) = match prepare() {
        Ok(ready) => ready,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    let tools = CommandTools::new(config.tools.clone());
    let workflow_args = UpdateWorkflowArgs { tags: args.tags };

    // Errors were already reported by the workflow before cleanup ran.
    match run_update_workflow(workflow_args, &config, &repo, &tools, &ui::StdinPrompter) {
        Ok(result) => {
            display_summary(&result);
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}

/// Load configuration, start the run log and open the repository.
fn prepare() -> Result<(Config, Git2Repository)> {
    let config = config::load_config(None).context("Error loading config")?;
    let log_path = logging::init(&config.logging).context("Error starting log")?;
    ui::display_status(&format!("Logging to {}", log_path.display()));

    let repo = Git2Repository::open(".").context("Git repository error")?;
    Ok((config, repo))
}

fn display_summary(result: &WorkflowResult) {
    if result.is_noop() {
        println!(
            "\n\x1b[32m✓\x1b[0m No changes needed ({} skipped)\n",
            result.skipped.len()
        );
        return;
    }

    let action = if result.pushed {
        "pushed"
    } else {
        "committed locally"
    };
    println!(
        "\n\x1b[32m✓\x1b[0m Updated CHANGELOG for {} on branch {} ({})\n",
        result.updated_tags.join(" "),
        result.branch,
        action
    );
}
