//! tidyfolder - sort the entries of a directory into folders by extension.
//!
//! This library loads an extension-to-folder mapping, creates the declared
//! folders, moves every top-level entry of a directory into its folder and
//! records each decision in an append-only action log. A dry-run mode logs
//! the same decisions without touching the filesystem.

pub mod action_log;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use action_log::{ActionLog, ClearOutcome, LogError, RunContext, clear_logs};
pub use config::{ConfigError, load_classification};
pub use file_category::{ClassificationMap, FALLBACK_FOLDER};
pub use file_organizer::{MoveError, OrganizeError, OrganizeSummary, Organizer, PathError, RunOptions};

pub use cli::{CliArgs, CliOutcome, OrganizeCommand, run};
