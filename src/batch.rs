use crate::error::GutterError;
use crate::operation::{display_name, ImageOperation, Outcome};
use glob::Pattern;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Processed,
    Skipped,
    Failed,
}

/// Result of running the operation on a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a whole run including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub operation: String,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_time_ms: u64,
    pub files: Vec<FileReport>,
}

/// Sorted list of files in `dir` whose names match the glob `pattern`
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, GutterError> {
    let search = PathBuf::from(Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let search = search.to_string_lossy();

    let mut files = Vec::new();
    for entry in glob::glob(&search)? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping unreadable path {}: {}", e.path().display(), e.error()),
        }
    }
    files.sort();

    if files.is_empty() {
        tracing::warn!("No files found matching: {}", search);
    } else {
        tracing::info!("Found {} images to process", files.len());
    }

    Ok(files)
}

/// Run `operation` over every file, one at a time
///
/// A failure on one file is logged and recorded; the remaining files are still
/// processed.
pub fn run(operation: &dyn ImageOperation, files: &[PathBuf]) -> BatchReport {
    let start = Instant::now();
    tracing::info!("{}: {}", operation.name(), operation.description());

    let files: Vec<FileReport> = files
        .iter()
        .map(|path| run_file(operation, path))
        .collect();

    let count = |status: FileStatus| files.iter().filter(|f| f.status == status).count();
    let report = BatchReport {
        operation: operation.name().to_string(),
        processed: count(FileStatus::Processed),
        skipped: count(FileStatus::Skipped),
        failed: count(FileStatus::Failed),
        total_time_ms: start.elapsed().as_millis() as u64,
        files,
    };

    tracing::info!(
        "Processing complete! {} processed, {} skipped, {} failed in {}ms",
        report.processed,
        report.skipped,
        report.failed,
        report.total_time_ms
    );

    report
}

fn run_file(operation: &dyn ImageOperation, path: &Path) -> FileReport {
    let file_start = Instant::now();
    let result = operation.process(path);
    let time_ms = file_start.elapsed().as_millis() as u64;

    let (status, outcome, error) = match result {
        Ok(outcome @ Outcome::Skipped { .. }) => (FileStatus::Skipped, Some(outcome), None),
        Ok(outcome) => (FileStatus::Processed, Some(outcome), None),
        Err(e @ GutterError::FileNotFound(_)) => {
            tracing::warn!("{}", e);
            (FileStatus::Skipped, None, Some(e.to_string()))
        }
        Err(e) => {
            tracing::error!("[ERROR] Error processing {}: {}", display_name(path), e);
            (FileStatus::Failed, None, Some(e.to_string()))
        }
    };

    FileReport {
        path: path.to_path_buf(),
        status,
        time_ms,
        outcome,
        error,
    }
}
