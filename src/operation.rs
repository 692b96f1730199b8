use crate::error::GutterError;
use crate::operations::split::SplitPlan;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What an operation did to one file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Split {
        outputs: Vec<PathBuf>,
        plan: SplitPlan,
    },
    Trimmed {
        before: (u32, u32),
        after: (u32, u32),
        output: PathBuf,
    },
    Cropped {
        before: (u32, u32),
        after: (u32, u32),
        divider_x: u32,
        output: PathBuf,
    },
    /// Nothing to do; the file was left untouched
    Skipped { reason: String },
}

/// Trait that every per-file image operation implements
pub trait ImageOperation {
    /// Returns the operation identifier (e.g., "split", "trim")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the operation
    fn description(&self) -> &'static str;

    /// Process one image file, writing any derived images to disk
    fn process(&self, path: &Path) -> Result<Outcome, GutterError>;
}

/// Fail with `FileNotFound` unless `path` is an existing file
pub fn ensure_exists(path: &Path) -> Result<(), GutterError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(GutterError::FileNotFound(path.to_path_buf()))
    }
}

/// File name for log lines
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
