use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GutterError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to decode or encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("Region has no pixels: {0}")]
    EmptyRegion(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
