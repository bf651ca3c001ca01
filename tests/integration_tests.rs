use clap::Parser;
use tidyfolder::cli::{CliArgs, CliError, CliOutcome, run};
use tidyfolder::{ClearOutcome, OrganizeError};
/// Integration tests for tidyfolder
///
/// These tests drive the CLI entry point end to end against temporary
/// directories. The fixture root plays the role of the working directory:
/// it holds `config.json` and the `logs/` directory, while the entries to
/// organize live in the `inbox/` subdirectory.
///
/// Test categories:
/// 1. Basic organization workflows
/// 2. Dry-run mode verification
/// 3. Action log contents and log clearing
/// 4. Configuration and argument errors
/// 5. Per-entry failures
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

const INBOX: &str = "inbox";
const SCENARIO_CONFIG: &str = r#"{"txt": "Documents", "png": "Images"}"#;

/// A temporary working directory with a config file and an inbox to organize.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a fixture with the given `config.json` content and an empty inbox.
    fn with_config(config: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join(INBOX)).expect("Failed to create inbox");
        let fixture = TestFixture { temp_dir };
        fixture.write_root_file("config.json", config);
        fixture
    }

    /// Fixture with the two-folder scenario config.
    fn new() -> Self {
        Self::with_config(SCENARIO_CONFIG)
    }

    /// The simulated working directory.
    fn cwd(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The directory being organized.
    fn inbox(&self) -> PathBuf {
        self.cwd().join(INBOX)
    }

    fn log_path(&self) -> PathBuf {
        self.cwd().join("logs").join("file_organizer.log")
    }

    fn write_root_file(&self, name: &str, content: &str) {
        fs::write(self.cwd().join(name), content).expect("Failed to write file");
    }

    /// Create a file with content in the inbox.
    fn create_file(&self, name: &str, content: &str) {
        let mut file = File::create(self.inbox().join(name)).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    /// Create a subdirectory in the inbox.
    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.inbox().join(name)).expect("Failed to create subdirectory");
    }

    /// Parse arguments the way the binary would.
    fn args(&self, args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("tidyfolder").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    /// Run with the given arguments from the fixture's working directory.
    fn run(&self, args: &[&str]) -> Result<CliOutcome, CliError> {
        run(&self.args(args), self.cwd())
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.inbox().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.inbox().join(rel_path);
        assert!(path.is_dir(), "Directory should exist: {}", path.display());
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.inbox().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// All log lines, without the timestamp prefix.
    fn log_messages(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .expect("Failed to read log file")
            .lines()
            .map(|line| {
                line.split_once(" - ")
                    .map(|(_, rest)| rest.to_string())
                    .unwrap_or_else(|| line.to_string())
            })
            .collect()
    }

    fn count_messages(&self, needle: &str) -> usize {
        self.log_messages()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }

    /// Every path under the inbox, recursively, relative and sorted.
    fn snapshot_inbox(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        Self::walk_dir(&self.inbox(), &self.inbox(), &mut paths);
        paths.sort();
        paths
    }

    fn walk_dir(root: &Path, dir: &Path, paths: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                paths.push(path.strip_prefix(root).unwrap().to_path_buf());
                if path.is_dir() {
                    Self::walk_dir(root, &path, paths);
                }
            }
        }
    }
}

fn summary_of(outcome: CliOutcome) -> tidyfolder::OrganizeSummary {
    match outcome {
        CliOutcome::Organized(summary) => summary,
        other => panic!("expected an organize run, got {:?}", other),
    }
}

// ============================================================================
// Test Suite 1: Basic Organization
// ============================================================================

#[test]
fn test_scenario_real_run() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");
    fixture.create_file("b.png", "beta");
    fixture.create_file("c.pdf", "gamma");

    let summary = summary_of(fixture.run(&[INBOX]).expect("run should succeed"));

    fixture.assert_file_exists("Documents/a.txt");
    fixture.assert_file_exists("Images/b.png");
    fixture.assert_file_exists("Others/c.pdf");
    fixture.assert_not_exists("a.txt");
    fixture.assert_not_exists("b.png");
    fixture.assert_not_exists("c.pdf");

    assert_eq!(summary.moved, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.folders_created, vec!["Documents", "Images", "Others"]);
    assert_eq!(summary.per_folder.get("Others"), Some(&1));

    assert_eq!(fixture.count_messages("INFO - Moved "), 3);
    assert_eq!(fixture.count_messages("INFO - Folder created: Documents"), 1);
    assert_eq!(fixture.count_messages("INFO - Folder created: Images"), 1);
    assert_eq!(fixture.count_messages("ERROR"), 0);
}

#[test]
fn test_log_records_follow_processing_order() {
    let fixture = TestFixture::new();
    fixture.create_file("c.pdf", "gamma");

    fixture.run(&[INBOX]).unwrap();

    assert_eq!(
        fixture.log_messages(),
        vec![
            "INFO - File organizer started.",
            "INFO - Folder created: Documents",
            "INFO - Folder created: Images",
            "INFO - Folder created: Others",
            "INFO - Moved c.pdf to Others.",
            "INFO - File organization complete.",
        ]
    );
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let summary = summary_of(fixture.run(&[INBOX]).unwrap());

    assert_eq!(summary.moved, 0);
    fixture.assert_dir_exists("Documents");
    fixture.assert_dir_exists("Images");
    fixture.assert_not_exists("Others");
}

#[test]
fn test_extension_match_is_case_insensitive() {
    let fixture = TestFixture::new();
    fixture.create_file("SHOUT.TXT", "loud");
    fixture.create_file("photo.final.Png", "img");

    fixture.run(&[INBOX]).unwrap();

    fixture.assert_file_exists("Documents/SHOUT.TXT");
    fixture.assert_file_exists("Images/photo.final.Png");
}

#[test]
fn test_extensionless_entries_use_whole_name() {
    let fixture = TestFixture::with_config(r#"{"makefile": "Build"}"#);
    fixture.create_file("Makefile", "all:");
    fixture.create_file("README", "hi");

    fixture.run(&[INBOX]).unwrap();

    fixture.assert_file_exists("Build/Makefile");
    fixture.assert_file_exists("Others/README");
}

#[test]
fn test_directories_are_moved_as_entries() {
    let fixture = TestFixture::new();
    fixture.create_subdir("photos");
    fs::write(fixture.inbox().join("photos").join("inner.png"), "x").unwrap();

    fixture.run(&[INBOX]).unwrap();

    // Only top-level entries move; contents come along untouched.
    fixture.assert_file_exists("Others/photos/inner.png");
    fixture.assert_not_exists("Images/inner.png");
}

#[test]
fn test_cd_organizes_working_directory() {
    let fixture = TestFixture::new();
    let elsewhere = TempDir::new().unwrap();
    let config = elsewhere.path().join("rules.json");
    fs::write(&config, SCENARIO_CONFIG).unwrap();
    let log_dir = elsewhere.path().join("logs");

    let work = fixture.inbox();
    fs::write(work.join("notes.txt"), "n").unwrap();

    let args = fixture.args(&[
        "--cd",
        "--config",
        config.to_str().unwrap(),
        "--log-dir",
        log_dir.to_str().unwrap(),
    ]);
    run(&args, &work).unwrap();

    fixture.assert_file_exists("Documents/notes.txt");
    assert!(log_dir.join("file_organizer.log").is_file());
}

#[test]
fn test_toml_config() {
    let fixture = TestFixture::new();
    fixture.write_root_file("rules.toml", "mp3 = \"Music\"\n");
    fixture.create_file("song.mp3", "la");

    fixture.run(&[INBOX, "--config", "rules.toml"]).unwrap();

    fixture.assert_file_exists("Music/song.mp3");
    fixture.assert_not_exists("Documents");
}

// ============================================================================
// Test Suite 2: Dry-Run Mode
// ============================================================================

#[test]
fn test_scenario_dry_run() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");
    fixture.create_file("b.png", "beta");
    fixture.create_file("c.pdf", "gamma");
    let before = fixture.snapshot_inbox();

    let summary = summary_of(fixture.run(&[INBOX, "--dry-run"]).unwrap());

    assert_eq!(fixture.snapshot_inbox(), before);
    assert_eq!(summary.moved, 3);
    assert_eq!(summary.folders_created, vec!["Documents", "Images"]);

    assert_eq!(fixture.count_messages("INFO - Would move "), 3);
    assert_eq!(fixture.count_messages("INFO - Would create folder: "), 2);
    assert_eq!(fixture.count_messages("Would move c.pdf to Others."), 1);
    assert_eq!(fixture.count_messages("Moved "), 0);
    assert_eq!(fixture.count_messages("Folder created"), 0);
}

#[test]
fn test_dry_run_skips_existing_folders() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");

    fixture.run(&[INBOX, "--dry-run"]).unwrap();

    assert_eq!(fixture.count_messages("Would create folder: Documents"), 1);
    assert_eq!(fixture.count_messages("Would create folder: Images"), 0);
}

#[test]
fn test_dry_run_over_organized_directory_plans_every_entry() {
    let fixture = TestFixture::with_config(r#"{"txt": "Documents"}"#);
    fixture.create_subdir("Others");
    fixture.create_file("c.pdf", "gamma");
    let before = fixture.snapshot_inbox();

    let summary = summary_of(fixture.run(&[INBOX, "--dry-run"]).unwrap());

    assert_eq!(fixture.snapshot_inbox(), before);
    assert_eq!(summary.moved, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(fixture.count_messages("INFO - Would move "), 2);
    assert_eq!(fixture.count_messages("Would move Others to Others."), 1);
    assert_eq!(fixture.count_messages("Would move c.pdf to Others."), 1);
    assert_eq!(fixture.count_messages("ERROR"), 0);
}

// ============================================================================
// Test Suite 3: Action Log and Clearing
// ============================================================================

#[test]
fn test_log_appends_across_runs() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");

    fixture.run(&[INBOX, "--dry-run"]).unwrap();
    fixture.run(&[INBOX, "--dry-run"]).unwrap();

    assert_eq!(fixture.count_messages("File organizer started."), 2);
    assert_eq!(fixture.count_messages("File organization complete."), 2);
}

#[test]
fn test_log_line_format() {
    let fixture = TestFixture::new();
    fixture.run(&[INBOX, "--dry-run"]).unwrap();

    let content = fs::read_to_string(fixture.log_path()).unwrap();
    let first = content.lines().next().unwrap();
    let (timestamp, rest) = first.split_once(" - ").unwrap();

    // e.g. "2026-10-16 09:14:03,512"
    assert_eq!(timestamp.len(), 23);
    assert_eq!(&timestamp[19..20], ",");
    assert_eq!(rest, "INFO - File organizer started.");
}

#[test]
fn test_custom_log_dir() {
    let fixture = TestFixture::new();

    fixture.run(&[INBOX, "--log-dir", "audit/trail"]).unwrap();

    assert!(
        fixture
            .cwd()
            .join("audit/trail/file_organizer.log")
            .is_file()
    );
    assert!(!fixture.log_path().exists());
}

#[test]
fn test_clear_logs_without_log_file() {
    let fixture = TestFixture::new();

    let outcome = fixture.run(&["--clear-logs"]).unwrap();

    assert!(matches!(
        outcome,
        CliOutcome::LogsCleared(ClearOutcome::NotFound(_))
    ));
}

#[test]
fn test_clear_logs_removes_log_and_skips_organizing() {
    let fixture = TestFixture::new();
    fixture.run(&[INBOX]).unwrap();
    fixture.create_file("a.txt", "alpha");
    assert!(fixture.log_path().is_file());

    let outcome = fixture.run(&[INBOX, "--clear-logs"]).unwrap();

    assert!(matches!(
        outcome,
        CliOutcome::LogsCleared(ClearOutcome::Cleared(_))
    ));
    assert!(!fixture.log_path().exists());
    fixture.assert_file_exists("a.txt");
}

#[test]
fn test_clear_logs_failure_is_reported() {
    let fixture = TestFixture::new();
    // A directory in place of the log file cannot be removed as a file.
    fs::create_dir_all(fixture.log_path()).unwrap();

    let err = fixture.run(&["--clear-logs"]).unwrap_err();

    assert!(matches!(err, CliError::ClearLogs(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("Error clearing logs: "));
    assert!(fixture.log_path().is_dir());
}

// ============================================================================
// Test Suite 4: Configuration and Argument Errors
// ============================================================================

#[test]
fn test_missing_target_argument() {
    let fixture = TestFixture::new();
    fixture.create_file("a.txt", "alpha");

    let err = fixture.run(&[]).unwrap_err();

    assert!(matches!(err, CliError::MissingTarget));
    assert_ne!(err.exit_code(), 0);
    assert!(!fixture.cwd().join("logs").exists());
    fixture.assert_file_exists("a.txt");
}

#[test]
fn test_missing_config_is_fatal() {
    let fixture = TestFixture::new();
    fs::remove_file(fixture.cwd().join("config.json")).unwrap();
    fixture.create_file("a.txt", "alpha");

    let err = fixture.run(&[INBOX]).unwrap_err();

    assert!(matches!(err, CliError::Organize(OrganizeError::Config(_))));
    assert_eq!(err.exit_code(), 1);
    fixture.assert_file_exists("a.txt");
    fixture.assert_not_exists("Others");
}

#[test]
fn test_malformed_config_is_fatal() {
    let fixture = TestFixture::with_config("{\"txt\": ");
    fixture.create_file("a.txt", "alpha");

    let err = fixture.run(&[INBOX]).unwrap_err();

    assert!(matches!(err, CliError::Organize(OrganizeError::Config(_))));
    fixture.assert_file_exists("a.txt");
}

#[test]
fn test_invalid_target_is_fatal() {
    let fixture = TestFixture::new();

    let err = fixture.run(&["does-not-exist"]).unwrap_err();

    assert!(matches!(err, CliError::Organize(OrganizeError::Path(_))));
    assert_eq!(err.exit_code(), 1);
}

// ============================================================================
// Test Suite 5: Per-Entry Failures
// ============================================================================

#[test]
fn test_collision_is_logged_and_run_continues() {
    // "documents" keeps the existing Documents folder from moving into Others.
    let fixture =
        TestFixture::with_config(r#"{"txt": "Documents", "png": "Images", "documents": "Documents"}"#);
    fixture.create_subdir("Documents");
    fs::write(fixture.inbox().join("Documents").join("a.txt"), "old").unwrap();
    fixture.create_file("a.txt", "new");
    fixture.create_file("b.png", "beta");

    let summary = summary_of(fixture.run(&[INBOX]).unwrap());

    // The colliding file stays put, the other entries still move.
    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("Images/b.png");
    assert_eq!(
        fs::read_to_string(fixture.inbox().join("Documents/a.txt")).unwrap(),
        "old"
    );
    assert_eq!(summary.moved, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(fixture.count_messages("ERROR - Error moving a.txt to Documents:"), 1);
    assert_eq!(
        fixture.count_messages("ERROR - Error moving Documents to Documents: Cannot move a directory into itself"),
        1
    );
    assert_eq!(fixture.count_messages("File organization complete."), 1);
}

#[test]
fn test_unusable_folder_name_fails_only_its_entries() {
    let fixture = TestFixture::with_config(r#"{"txt": "../outside", "png": "Images"}"#);
    fixture.create_file("a.txt", "alpha");
    fixture.create_file("b.png", "beta");

    let summary = summary_of(fixture.run(&[INBOX]).unwrap());

    fixture.assert_file_exists("a.txt");
    fixture.assert_file_exists("Images/b.png");
    assert!(!fixture.cwd().join("outside").exists());
    assert_eq!(summary.failed, 1);
    assert_eq!(fixture.count_messages("ERROR - Invalid folder name '../outside'"), 1);
    assert_eq!(fixture.count_messages("ERROR - Error moving a.txt to ../outside:"), 1);
}
