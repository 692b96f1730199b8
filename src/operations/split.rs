//! Composite 3-way split
//!
//! A composite screenshot holds one wide block on top and two blocks side by
//! side underneath, separated by blank gutters. The row gutter is searched in
//! the lower half of the image, the column gutter in the middle of the bottom
//! region. Either axis falls back to a half split when no gutter qualifies.

use crate::config::{DetectionConfig, GutterSearch, SplitConfig};
use crate::detection::{find_white_band, vicinity_range, Axis, Band, BrightnessMap, CropBox};
use crate::error::GutterError;
use crate::operation::{display_name, ensure_exists, ImageOperation, Outcome};
use image::DynamicImage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Crop boxes for one composite, plus the gutters they were derived from
#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    /// Row gutter; `None` means the top/bottom cut fell back to the midpoint
    pub horizontal_gutter: Option<Band>,
    /// Column gutter inside the bottom region; `None` means midpoint fallback
    pub vertical_gutter: Option<Band>,
    pub top: CropBox,
    pub left: CropBox,
    pub right: CropBox,
}

impl SplitPlan {
    pub fn boxes(&self) -> [CropBox; 3] {
        [self.top, self.left, self.right]
    }
}

/// Derive the top, left and right crop boxes of a composite image
pub fn plan_split(image: &DynamicImage, config: &DetectionConfig) -> Result<SplitPlan, GutterError> {
    let map = BrightnessMap::new(image, config.brightness);
    let (width, height) = map.dimensions();
    let pad = config.padding;

    let rows = map.profile(Axis::Rows, None)?;
    let horizontal_gutter = locate_gutter(&rows, height, &config.horizontal, config.percentile);

    let (top, bottom_y0) = match horizontal_gutter {
        Some(band) => (
            CropBox::new(0, 0, width, (band.start as u32).saturating_sub(pad)),
            (band.end as u32).saturating_add(pad).min(height),
        ),
        None => (CropBox::new(0, 0, width, height / 2), height / 2),
    };
    let bottom = CropBox::new(0, bottom_y0, width, height);

    let vertical_gutter = if bottom.is_empty() {
        None
    } else {
        let columns = map.profile(Axis::Columns, Some(bottom))?;
        locate_gutter(&columns, width, &config.vertical, config.percentile)
    };

    let (left_x1, right_x0) = match vertical_gutter {
        Some(band) => (
            (band.start as u32).saturating_sub(pad),
            (band.end as u32).saturating_add(pad).min(width),
        ),
        None => (width / 2, width / 2),
    };

    Ok(SplitPlan {
        horizontal_gutter,
        vertical_gutter,
        top,
        left: CropBox::new(0, bottom.y0, left_x1, height),
        right: CropBox::new(right_x0, bottom.y0, width, height),
    })
}

/// Search the primary vicinity, then the whole profile with a narrower minimum
fn locate_gutter(
    profile: &[f32],
    dimension: u32,
    search: &GutterSearch,
    percentile: f64,
) -> Option<Band> {
    let (from, to) = search.vicinity;
    let vicinity = vicinity_range(dimension, from, to);

    find_white_band(profile, search.min_width(dimension), vicinity, percentile).or_else(|| {
        tracing::debug!("No gutter in primary vicinity, retrying over the full profile");
        find_white_band(
            profile,
            search.retry_min_width(dimension),
            0..profile.len(),
            percentile,
        )
    })
}

/// Splits each composite into `<base>-1.png`, `<base>-2.png` and `<base>-3.png`
pub struct Splitter {
    output_dir: PathBuf,
    detection: DetectionConfig,
}

impl Splitter {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            detection: config.detection.clone(),
        }
    }

    fn output_paths(&self, source: &Path) -> Vec<PathBuf> {
        let base = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        (1..=3)
            .map(|i| self.output_dir.join(format!("{}-{}.png", base, i)))
            .collect()
    }
}

impl ImageOperation for Splitter {
    fn name(&self) -> &'static str {
        "split"
    }

    fn description(&self) -> &'static str {
        "Split composite screenshots into top, left and right images"
    }

    fn process(&self, path: &Path) -> Result<Outcome, GutterError> {
        ensure_exists(path)?;
        let image = DynamicImage::ImageRgb8(image::open(path)?.to_rgb8());

        let plan = plan_split(&image, &self.detection)?;

        tracing::debug!(
            "{}: row gutter {:?}, column gutter {:?}",
            display_name(path),
            plan.horizontal_gutter,
            plan.vertical_gutter
        );
        if plan.horizontal_gutter.is_none() {
            tracing::warn!("{}: no row gutter found, splitting at mid-height", display_name(path));
        }
        if plan.vertical_gutter.is_none() {
            tracing::warn!("{}: no column gutter found, splitting at mid-width", display_name(path));
        }

        if let Some(empty) = plan.boxes().iter().find(|b| b.is_empty()) {
            return Err(GutterError::EmptyRegion(format!(
                "split of {} produced empty box {}",
                display_name(path),
                empty
            )));
        }

        fs::create_dir_all(&self.output_dir)?;

        let outputs = self.output_paths(path);
        for (crop_box, output) in plan.boxes().iter().zip(&outputs) {
            crop_box.crop(&image).save(output)?;
        }

        tracing::info!(
            "Saved: {}",
            outputs
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        tracing::info!(
            "  top {}, left {}, right {}",
            plan.top,
            plan.left,
            plan.right
        );

        Ok(Outcome::Split { outputs, plan })
    }
}
