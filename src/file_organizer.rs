//! Sorting of directory entries into category folders.
//!
//! An [`Organizer`] is built once per run from explicit [`RunOptions`]. It
//! snapshots the target directory at construction time, then
//! [`Organizer::create_folders`] and [`Organizer::move_files`] act on that
//! snapshot. Every decision and outcome is appended to the action log.

use crate::action_log::{ActionLog, LogError, RunContext};
use crate::config::{self, ConfigError};
use crate::file_category::{ClassificationMap, FolderNameError, folder_path};
use crate::output::OutputFormatter;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Options for a single run, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Simulate only: log intended actions without touching the filesystem.
    pub dry_run: bool,
    /// Location of the action log.
    pub context: RunContext,
    /// Classification config file to load.
    pub config_path: PathBuf,
}

impl RunOptions {
    /// Options for a real run logging to `context`, reading `config.json`
    /// from the current directory.
    pub fn new(context: RunContext) -> Self {
        Self {
            dry_run: false,
            context,
            config_path: PathBuf::from(config::DEFAULT_CONFIG_FILE),
        }
    }

    /// Sets dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the classification config file.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::new(RunContext::default())
    }
}

/// Problems with the directory to organize.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// No path was given and the current directory is unavailable.
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
    /// The target does not exist.
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    /// The target exists but is not a directory.
    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// The target directory could not be listed.
    #[error("Error reading directory {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Fatal setup errors. Nothing is moved or created once one of these occurs.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error(transparent)]
    Log(#[from] LogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result type for organizer setup.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Why a single entry could not be moved. Always recovered inside the move loop.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// The configured folder name cannot be used under the target directory.
    #[error(transparent)]
    InvalidFolder(#[from] FolderNameError),
    /// The entry is the destination folder itself.
    #[error("Cannot move a directory into itself")]
    IntoItself,
    /// Something with the same name already exists in the destination.
    #[error("Destination path '{}' already exists", .0.display())]
    DestinationExists(PathBuf),
    /// The missing destination folder could not be created.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The rename itself failed (permissions, cross-device, vanished entry).
    #[error("{0}")]
    Rename(#[source] io::Error),
}

/// A direct child of the target directory, captured at listing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: OsString,
}

impl Entry {
    /// Raw file name.
    pub fn file_name(&self) -> &OsStr {
        &self.name
    }

    /// File name for classification and logging.
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeSummary {
    /// Folders created, or that would be created in dry-run mode.
    pub folders_created: Vec<String>,
    /// Entries moved (or planned, in dry-run mode).
    pub moved: usize,
    /// Entries whose move failed.
    pub failed: usize,
    /// Entries per destination folder, counting successes only.
    pub per_folder: BTreeMap<String, usize>,
}

/// Organizes the top-level entries of one directory.
#[derive(Debug)]
pub struct Organizer {
    target: PathBuf,
    entries: Vec<Entry>,
    map: ClassificationMap,
    options: RunOptions,
    log: ActionLog,
}

impl Organizer {
    /// Prepares a run over `path`, or over the current directory if `path` is
    /// `None`.
    ///
    /// Creates the log directory, opens the log in append mode, loads the
    /// classification config and snapshots the directory listing.
    ///
    /// # Errors
    ///
    /// Fails with `OrganizeError::Config` if the config is missing or invalid
    /// and with `OrganizeError::Path` if the target is not a readable directory.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyfolder::action_log::RunContext;
    /// use tidyfolder::file_organizer::{Organizer, RunOptions};
    /// use std::path::Path;
    ///
    /// let options = RunOptions::new(RunContext::new("logs")).dry_run(true);
    /// let mut organizer = Organizer::new(Some(Path::new("/home/user/Downloads")), options)?;
    /// organizer.organize();
    /// # Ok::<(), tidyfolder::file_organizer::OrganizeError>(())
    /// ```
    pub fn new(path: Option<&Path>, options: RunOptions) -> OrganizeResult<Self> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().map_err(PathError::CurrentDir)?,
        };

        let mut log = ActionLog::open(&options.context)?;
        log.info("File organizer started.");

        let map = config::load_classification(&options.config_path)?;
        let entries = snapshot_entries(&target, &mut log)?;

        tracing::debug!(
            dir = %target.display(),
            entries = entries.len(),
            dry_run = options.dry_run,
            "organizer ready"
        );

        Ok(Self {
            target,
            entries,
            map,
            options,
            log,
        })
    }

    /// Directory being organized.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Entries captured at construction, in enumeration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Loaded classification map.
    pub fn classification(&self) -> &ClassificationMap {
        &self.map
    }

    /// Path of the action log file.
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Creates every folder named in the classification map that does not
    /// exist yet. The fallback folder is not created here.
    ///
    /// Returns the names created (or that would be created in dry-run mode).
    /// Safe to call repeatedly. Names that are not a single path segment are
    /// logged as errors and skipped.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyfolder::action_log::RunContext;
    /// use tidyfolder::file_organizer::{Organizer, RunOptions};
    /// use std::path::Path;
    ///
    /// let options = RunOptions::new(RunContext::new("logs")).dry_run(true);
    /// let mut organizer = Organizer::new(Some(Path::new("/tmp/inbox")), options)?;
    /// for folder in organizer.create_folders() {
    ///     println!("created {}", folder);
    /// }
    /// # Ok::<(), tidyfolder::file_organizer::OrganizeError>(())
    /// ```
    pub fn create_folders(&mut self) -> Vec<String> {
        OutputFormatter::info(&format!("Organizing files in {}.", self.target.display()));

        let folders: Vec<String> = self
            .map
            .declared_folders()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut created = Vec::new();
        for folder in folders {
            let path = match folder_path(&self.target, &folder) {
                Ok(path) => path,
                Err(e) => {
                    self.log
                        .error(&format!("Invalid folder name '{}': {}", folder, e));
                    continue;
                }
            };

            if path.exists() {
                continue;
            }

            if self.options.dry_run {
                self.log.info(&format!("Would create folder: {}", folder));
                created.push(folder);
                continue;
            }

            match fs::create_dir(&path) {
                Ok(()) => {
                    self.log.info(&format!("Folder created: {}", folder));
                    created.push(folder);
                }
                // Created concurrently by someone else; nothing to do.
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => {
                    self.log
                        .error(&format!("Error creating folder {}: {}", folder, e));
                }
            }
        }

        created
    }

    /// Moves every snapshotted entry into its destination folder.
    ///
    /// Failures are logged per entry and never stop the loop. A destination
    /// folder that is missing at move time (usually the fallback folder) is
    /// created first and logged as such.
    pub fn move_files(&mut self) -> OrganizeSummary {
        let mut summary = OrganizeSummary::default();
        let entries = std::mem::take(&mut self.entries);

        let progress = (!self.options.dry_run)
            .then(|| OutputFormatter::create_progress_bar(entries.len() as u64));

        for entry in &entries {
            let name = entry.display_name();
            let folder = self.map.folder_for(&name).to_string();

            if let Some(pb) = &progress {
                pb.set_message(name.clone());
            }

            match self.move_entry(entry, &folder, &mut summary) {
                Ok(()) => {
                    let message = if self.options.dry_run {
                        format!("Would move {} to {}.", name, folder)
                    } else {
                        format!("Moved {} to {}.", name, folder)
                    };
                    self.log.info(&message);
                    summary.moved += 1;
                    *summary.per_folder.entry(folder).or_insert(0) += 1;
                }
                Err(e) => {
                    self.log
                        .error(&format!("Error moving {} to {}: {}", name, folder, e));
                    summary.failed += 1;
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        self.entries = entries;
        summary
    }

    /// Runs [`Self::create_folders`] then [`Self::move_files`] and writes the
    /// completion record.
    ///
    /// The returned summary lists declared folders first, then any folder
    /// created on demand during the move loop.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidyfolder::action_log::RunContext;
    /// use tidyfolder::file_organizer::{Organizer, RunOptions};
    /// use std::path::Path;
    ///
    /// let options = RunOptions::new(RunContext::new("logs"));
    /// let mut organizer = Organizer::new(Some(Path::new("/tmp/inbox")), options)?;
    /// let summary = organizer.organize();
    /// println!("{} moved, {} failed", summary.moved, summary.failed);
    /// # Ok::<(), tidyfolder::file_organizer::OrganizeError>(())
    /// ```
    pub fn organize(&mut self) -> OrganizeSummary {
        let mut folders_created = self.create_folders();
        let mut summary = self.move_files();
        folders_created.append(&mut summary.folders_created);
        summary.folders_created = folders_created;

        self.log.info("File organization complete.");
        OutputFormatter::success(&format!(
            "File organization complete. Logs available at {}.",
            self.log.path().display()
        ));

        summary
    }

    /// Moves one entry into `folder`. In dry-run mode nothing is checked or
    /// touched; the caller only records the intended move.
    fn move_entry(
        &mut self,
        entry: &Entry,
        folder: &str,
        summary: &mut OrganizeSummary,
    ) -> Result<(), MoveError> {
        if self.options.dry_run {
            return Ok(());
        }

        let folder_dir = folder_path(&self.target, folder)?;
        let source = self.target.join(entry.file_name());

        if source == folder_dir {
            return Err(MoveError::IntoItself);
        }

        if !folder_dir.exists() {
            fs::create_dir(&folder_dir).map_err(|source| MoveError::DirectoryCreationFailed {
                path: folder_dir.clone(),
                source,
            })?;
            self.log.info(&format!("Folder created: {}", folder));
            summary.folders_created.push(folder.to_string());
        }

        let destination = folder_dir.join(entry.file_name());
        if destination.symlink_metadata().is_ok() {
            return Err(MoveError::DestinationExists(destination));
        }

        fs::rename(&source, &destination).map_err(MoveError::Rename)
    }
}

/// Lists the direct children of `target`, in enumeration order.
///
/// Children that cannot be read are skipped with an ERROR record.
fn snapshot_entries(target: &Path, log: &mut ActionLog) -> Result<Vec<Entry>, PathError> {
    if !target.exists() {
        return Err(PathError::NotFound(target.to_path_buf()));
    }
    if !target.is_dir() {
        return Err(PathError::NotADirectory(target.to_path_buf()));
    }

    let listing = fs::read_dir(target).map_err(|source| PathError::Unreadable {
        path: target.to_path_buf(),
        source,
    })?;

    let names = listing.map(|dir_entry| dir_entry.map(|e| e.file_name()));
    Ok(collect_entries(target, names, log))
}

fn collect_entries<I>(target: &Path, names: I, log: &mut ActionLog) -> Vec<Entry>
where
    I: IntoIterator<Item = io::Result<OsString>>,
{
    let mut entries = Vec::new();
    for name in names {
        match name {
            Ok(name) => entries.push(Entry { name }),
            Err(e) => log.error(&format!(
                "Error reading an entry of {}: {}",
                target.display(),
                e
            )),
        }
    }
    entries
}
