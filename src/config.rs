use crate::detection::BrightnessMode;
use crate::error::GutterError;
use crate::{Args, Command};
use std::path::{Path, PathBuf};

/// Share of the width where the divider scan starts when no column is given
pub const DIVIDER_START_FRACTION: f64 = 0.7;

/// Where and how wide a gutter is searched for along one axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GutterSearch {
    /// Primary search window as fractions of the dimension, `[start, end)`
    pub vicinity: (f64, f64),
    pub min_width_floor: u32,
    pub min_width_divisor: u32,
    /// Narrower minimum used when retrying over the whole profile
    pub retry_min_width_floor: u32,
    pub retry_min_width_divisor: u32,
}

impl GutterSearch {
    /// Row gutter between the top block and the bottom pair
    pub fn horizontal() -> Self {
        Self {
            vicinity: (0.5, 0.9),
            min_width_floor: 4,
            min_width_divisor: 500,
            retry_min_width_floor: 3,
            retry_min_width_divisor: 700,
        }
    }

    /// Column gutter between the bottom-left and bottom-right blocks
    pub fn vertical() -> Self {
        Self {
            vicinity: (0.35, 0.65),
            min_width_floor: 4,
            min_width_divisor: 700,
            retry_min_width_floor: 3,
            retry_min_width_divisor: 900,
        }
    }

    pub fn min_width(&self, dimension: u32) -> usize {
        scaled_width(dimension, self.min_width_floor, self.min_width_divisor)
    }

    pub fn retry_min_width(&self, dimension: u32) -> usize {
        scaled_width(dimension, self.retry_min_width_floor, self.retry_min_width_divisor)
    }

    fn validate(&self, axis: &str) -> Result<(), GutterError> {
        let (start, end) = self.vicinity;
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start > end {
            return Err(GutterError::InvalidConfig(format!(
                "{} vicinity ({}, {}) must satisfy 0 <= start <= end <= 1",
                axis, start, end
            )));
        }
        if self.min_width_divisor == 0 || self.retry_min_width_divisor == 0 {
            return Err(GutterError::InvalidConfig(format!(
                "{} minimum width divisors must be non-zero",
                axis
            )));
        }
        Ok(())
    }
}

fn scaled_width(dimension: u32, floor: u32, divisor: u32) -> usize {
    floor.max(dimension / divisor.max(1)) as usize
}

/// Heuristics for the composite split
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Percentile of the vicinity used as the brightness cut
    pub percentile: f64,
    /// Pixels left between a gutter and the crop boxes around it
    pub padding: u32,
    pub brightness: BrightnessMode,
    pub horizontal: GutterSearch,
    pub vertical: GutterSearch,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            percentile: 90.0,
            padding: 1,
            brightness: BrightnessMode::ChannelMean,
            horizontal: GutterSearch::horizontal(),
            vertical: GutterSearch::vertical(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub pattern: String,
    pub detection: DetectionConfig,
}

#[derive(Debug, Clone)]
pub struct TrimConfig {
    pub dir: PathBuf,
    pub pattern: String,
    /// Luma at or above this value counts as white
    pub tolerance: u8,
    /// Write trimmed copies here instead of overwriting
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct DividerConfig {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub tolerance: u8,
    pub start_x: Option<u32>,
}

#[derive(Debug, Clone)]
pub enum Task {
    Split(SplitConfig),
    Trim(TrimConfig),
    CropDivider(DividerConfig),
}

/// Resolved run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub json: bool,
    pub task: Task,
}

impl Config {
    pub fn validate(&self) -> Result<(), GutterError> {
        if let Task::Split(split) = &self.task {
            let detection = &split.detection;
            if !(0.0..=100.0).contains(&detection.percentile) {
                return Err(GutterError::InvalidConfig(format!(
                    "percentile {} is outside [0, 100]",
                    detection.percentile
                )));
            }
            detection.horizontal.validate("horizontal")?;
            detection.vertical.validate("vertical")?;
        }
        Ok(())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let root = args.root;
        let task = match args.command {
            Command::Split {
                source_dir,
                output_dir,
                pattern,
                percentile,
                padding,
            } => Task::Split(SplitConfig {
                source_dir: resolve(&root, &source_dir),
                output_dir: resolve(&root, &output_dir),
                pattern,
                detection: DetectionConfig {
                    percentile,
                    padding,
                    ..DetectionConfig::default()
                },
            }),
            Command::Trim {
                dir,
                pattern,
                tolerance,
                output_dir,
            } => Task::Trim(TrimConfig {
                dir: resolve(&root, &dir),
                pattern,
                tolerance,
                output_dir: output_dir.map(|d| resolve(&root, &d)),
            }),
            Command::CropDivider {
                file,
                output,
                tolerance,
                start_x,
            } => Task::CropDivider(DividerConfig {
                file: resolve(&root, &file),
                output: output.map(|o| resolve(&root, &o)),
                tolerance,
                start_x,
            }),
        };

        Self {
            root,
            json: args.json,
            task,
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
