//! Command-line interface module for tidyfolder.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Resolving relative paths against the working directory
//! - Dispatching to organization or log clearing
//! - Mapping failures to exit codes

use crate::action_log::{self, ClearOutcome, DEFAULT_LOG_DIR, LogError, RunContext};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::file_organizer::{OrganizeError, OrganizeSummary, Organizer, RunOptions};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Organize files into folders and manage logs.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "tidyfolder", version, about)]
pub struct CliArgs {
    /// The directory to organize. Optional if --cd is used.
    pub path: Option<PathBuf>,

    /// Organize the current directory instead of PATH.
    #[arg(long)]
    pub cd: bool,

    /// Log intended actions without moving anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Delete the log file and exit.
    #[arg(long)]
    pub clear_logs: bool,

    /// Directory for the log file.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Extension-to-folder mapping (JSON, or TOML with a .toml extension).
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize the entries of a directory.
    Organize {
        /// Directory to organize.
        target: PathBuf,
        /// If true, simulate the operation without making changes.
        dry_run: bool,
    },
    /// Remove the log file.
    ClearLogs,
}

/// What a successful CLI run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliOutcome {
    Organized(OrganizeSummary),
    LogsCleared(ClearOutcome),
}

/// Errors that end the process with a non-zero status.
///
/// The `Display` output is the full diagnostic printed on stderr.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Neither a path nor `--cd` was given.
    #[error("Error: No directory to organize. Pass a path or use --cd for the current directory.")]
    MissingTarget,
    /// Setup of the organizer failed.
    #[error("Error: {0}")]
    Organize(#[from] OrganizeError),
    /// The log file exists but could not be removed.
    #[error("Error clearing logs: {0}")]
    ClearLogs(#[source] LogError),
}

impl CliError {
    /// Exit status for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::MissingTarget => 2,
            CliError::Organize(_) | CliError::ClearLogs(_) => 1,
        }
    }
}

impl CliArgs {
    /// Resolves the command to run. `--clear-logs` wins over everything else
    /// and `--cd` wins over an explicit path.
    ///
    /// # Arguments
    ///
    /// * `cwd` - Working directory used for `--cd` and relative paths
    ///
    /// # Errors
    ///
    /// Returns `CliError::MissingTarget` when neither a path nor `--cd` was given.
    pub fn command(&self, cwd: &Path) -> Result<OrganizeCommand, CliError> {
        if self.clear_logs {
            return Ok(OrganizeCommand::ClearLogs);
        }

        let target = if self.cd {
            cwd.to_path_buf()
        } else {
            match &self.path {
                Some(path) => cwd.join(path),
                None => return Err(CliError::MissingTarget),
            }
        };

        Ok(OrganizeCommand::Organize {
            target,
            dry_run: self.dry_run,
        })
    }

    /// Log location, with a relative `--log-dir` taken from `cwd`.
    ///
    /// # Arguments
    ///
    /// * `cwd` - Working directory relative log directories resolve against
    pub fn run_context(&self, cwd: &Path) -> RunContext {
        RunContext::new(cwd.join(&self.log_dir))
    }
}

/// Runs the CLI with already-parsed arguments.
///
/// `cwd` stands in for the process working directory: relative paths and
/// `--cd` resolve against it, and the default config is read from it.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use tidyfolder::cli::{CliArgs, run};
///
/// let args = CliArgs::parse_from(["tidyfolder", "--cd", "--dry-run"]);
/// let cwd = std::env::current_dir().unwrap();
/// if let Err(e) = run(&args, &cwd) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(args: &CliArgs, cwd: &Path) -> Result<CliOutcome, CliError> {
    let command = args.command(cwd)?;
    let context = args.run_context(cwd);
    run_cli(command, context, &cwd.join(&args.config))
}

/// Executes a resolved command.
///
/// # Arguments
///
/// * `command` - The command to execute (Organize or ClearLogs)
/// * `context` - Where the action log lives
/// * `config_path` - Classification config file, used by Organize only
///
/// # Examples
///
/// ```no_run
/// use tidyfolder::action_log::RunContext;
/// use tidyfolder::cli::{OrganizeCommand, run_cli};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::ClearLogs, RunContext::new("logs"), Path::new("config.json"));
/// match result {
///     Ok(outcome) => println!("{:?}", outcome),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn run_cli(
    command: OrganizeCommand,
    context: RunContext,
    config_path: &Path,
) -> Result<CliOutcome, CliError> {
    match command {
        OrganizeCommand::ClearLogs => clear_logs(&context).map(CliOutcome::LogsCleared),
        OrganizeCommand::Organize { target, dry_run } => {
            let options = RunOptions::new(context)
                .dry_run(dry_run)
                .config_path(config_path);
            organize_directory(&target, options).map(CliOutcome::Organized)
        }
    }
}

/// Runs a full organization pass over `target` and prints a summary.
///
/// This function:
/// 1. Builds the organizer (log sink, config, directory snapshot)
/// 2. Creates the declared folders
/// 3. Moves every entry, recording failures in the log
/// 4. Prints a per-folder summary and a warning if any entry failed
///
/// # Arguments
///
/// * `target` - The directory to organize
/// * `options` - Dry-run flag, log location and config path
///
/// # Errors
///
/// Returns `CliError::Organize` if setup fails. Per-entry failures are not errors.
pub fn organize_directory(
    target: &Path,
    options: RunOptions,
) -> Result<OrganizeSummary, CliError> {
    let dry_run = options.dry_run;
    let mut organizer = Organizer::new(Some(target), options)?;
    let summary = organizer.organize();

    if !summary.per_folder.is_empty() {
        OutputFormatter::summary_table(&summary.per_folder, summary.moved);
    }

    if summary.failed > 0 {
        OutputFormatter::warning(&format!(
            "{} of {} entries could not be moved. See {} for details.",
            summary.failed,
            summary.moved + summary.failed,
            organizer.log_path().display()
        ));
    }

    if dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    }

    Ok(summary)
}

/// Deletes the log file and reports the result on the console.
///
/// A missing log file is reported and counts as success.
///
/// # Arguments
///
/// * `context` - Where the action log lives
///
/// # Errors
///
/// Returns `CliError::ClearLogs` when the file exists but cannot be removed.
pub fn clear_logs(context: &RunContext) -> Result<ClearOutcome, CliError> {
    match action_log::clear_logs(context) {
        Ok(ClearOutcome::Cleared(path)) => {
            OutputFormatter::success(&format!(
                "Logs cleared successfully from {}.",
                path.display()
            ));
            Ok(ClearOutcome::Cleared(path))
        }
        Ok(ClearOutcome::NotFound(path)) => {
            OutputFormatter::info("Log file not found, nothing to clear.");
            Ok(ClearOutcome::NotFound(path))
        }
        Err(e) => Err(CliError::ClearLogs(e)),
    }
}
