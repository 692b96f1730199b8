use crate::config::TrimConfig;
use crate::detection::{to_rec601_gray, CropBox};
use crate::error::GutterError;
use crate::operation::{display_name, ensure_exists, ImageOperation, Outcome};
use image::{DynamicImage, GrayImage};
use imageproc::contrast::{threshold, ThresholdType};
use std::fs;
use std::path::{Path, PathBuf};

/// Mark content pixels (Rec.601 luma below `tolerance`) as 255, white pixels as 0
fn content_mask(gray: &GrayImage, tolerance: u8) -> GrayImage {
    threshold(gray, tolerance.saturating_sub(1), ThresholdType::BinaryInverted)
}

/// Bounding box of every non-white pixel, `None` for an all-white image
pub fn content_bounds(image: &DynamicImage, tolerance: u8) -> Option<CropBox> {
    // Every pixel is at least 0, so nothing counts as content
    if tolerance == 0 {
        return None;
    }

    let mask = content_mask(&to_rec601_gray(image), tolerance);

    mask.enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] != 0)
        .fold(None, |bounds: Option<CropBox>, (x, y, _)| {
            Some(match bounds {
                None => CropBox::new(x, y, x + 1, y + 1),
                Some(b) => CropBox::new(b.x0.min(x), b.y0.min(y), b.x1.max(x + 1), b.y1.max(y + 1)),
            })
        })
}

/// Crops uniform white margins off each image
pub struct BorderTrimmer {
    tolerance: u8,
    output_dir: Option<PathBuf>,
}

impl BorderTrimmer {
    pub fn new(config: &TrimConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            output_dir: config.output_dir.clone(),
        }
    }

    fn output_path(&self, source: &Path) -> PathBuf {
        match (&self.output_dir, source.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => source.to_path_buf(),
        }
    }
}

impl ImageOperation for BorderTrimmer {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn description(&self) -> &'static str {
        "Trim white borders down to the content bounding box"
    }

    fn process(&self, path: &Path) -> Result<Outcome, GutterError> {
        ensure_exists(path)?;
        let image = DynamicImage::ImageRgb8(image::open(path)?.to_rgb8());
        let before = (image.width(), image.height());

        let bounds = match content_bounds(&image, self.tolerance) {
            Some(bounds) if bounds != CropBox::full(before.0, before.1) => bounds,
            _ => {
                tracing::info!("[SKIP] {} - no borders detected", display_name(path));
                return Ok(Outcome::Skipped {
                    reason: "no borders detected".to_string(),
                });
            }
        };

        let cropped = bounds.crop(&image);
        let after = (cropped.width(), cropped.height());

        let output = self.output_path(path);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        cropped.save(&output)?;

        tracing::info!("[OK] {}", display_name(path));
        tracing::info!(
            "  {}x{} -> {}x{} (-{}w, -{}h)",
            before.0,
            before.1,
            after.0,
            after.1,
            before.0 - after.0,
            before.1 - after.1
        );

        Ok(Outcome::Trimmed {
            before,
            after,
            output,
        })
    }
}
