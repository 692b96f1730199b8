use crate::config::{DividerConfig, DIVIDER_START_FRACTION};
use crate::detection::{Axis, BrightnessMap, BrightnessMode, CropBox};
use crate::error::GutterError;
use crate::operation::{display_name, ensure_exists, ImageOperation, Outcome};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

/// First column at or right of `start_x` whose mean luma reaches `tolerance`
///
/// `start_x` defaults to 70% of the width.
pub fn find_vertical_divider(
    image: &DynamicImage,
    start_x: Option<u32>,
    tolerance: u8,
) -> Result<Option<u32>, GutterError> {
    let map = BrightnessMap::new(image, BrightnessMode::Rec601);
    let (width, height) = map.dimensions();
    let start = start_x.unwrap_or((f64::from(width) * DIVIDER_START_FRACTION) as u32);

    if start >= width {
        return Ok(None);
    }

    let columns = map.profile(Axis::Columns, Some(CropBox::new(start, 0, width, height)))?;
    let cutoff = f32::from(tolerance);

    Ok(columns
        .iter()
        .position(|&mean| mean >= cutoff)
        .map(|offset| start + offset as u32))
}

/// Crops one image to everything left of its first bright divider column
pub struct DividerCrop {
    tolerance: u8,
    start_x: Option<u32>,
    output: Option<PathBuf>,
}

impl DividerCrop {
    pub fn new(config: &DividerConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            start_x: config.start_x,
            output: config.output.clone(),
        }
    }
}

impl ImageOperation for DividerCrop {
    fn name(&self) -> &'static str {
        "crop-divider"
    }

    fn description(&self) -> &'static str {
        "Crop an image at its first bright vertical divider"
    }

    fn process(&self, path: &Path) -> Result<Outcome, GutterError> {
        ensure_exists(path)?;
        let image = image::open(path)?;
        let before = (image.width(), image.height());

        let divider_x = match find_vertical_divider(&image, self.start_x, self.tolerance)? {
            Some(0) => {
                return Err(GutterError::EmptyRegion(format!(
                    "divider of {} is at column 0",
                    display_name(path)
                )))
            }
            Some(x) => x,
            None => {
                tracing::info!("No vertical divider found in {}", display_name(path));
                return Ok(Outcome::Skipped {
                    reason: "no vertical divider found".to_string(),
                });
            }
        };

        let cropped = CropBox::new(0, 0, divider_x, before.1).crop(&image);
        let after = (cropped.width(), cropped.height());

        let output = self.output.clone().unwrap_or_else(|| path.to_path_buf());
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        cropped.save(&output)?;

        tracing::info!("Cropped {}", display_name(path));
        tracing::info!(
            "  {}x{} -> {}x{} (-{}w)",
            before.0,
            before.1,
            after.0,
            after.1,
            before.0 - after.0
        );
        tracing::info!("  Divider found at x={}", divider_x);

        Ok(Outcome::Cropped {
            before,
            after,
            divider_x,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn with_white_column_at(width: u32, column: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, 20, |x, y| {
            if x == column || (x > column && y % 3 != 0) {
                Luma([255])
            } else {
                Luma([60])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_finds_first_bright_column_after_start() {
        let img = with_white_column_at(100, 85);
        assert_eq!(find_vertical_divider(&img, None, 240).unwrap(), Some(85));
    }

    #[test]
    fn test_columns_before_start_are_ignored() {
        let img = with_white_column_at(100, 40);
        // Columns right of 40 average about 190, below the tolerance
        assert_eq!(find_vertical_divider(&img, None, 240).unwrap(), None);
        assert_eq!(find_vertical_divider(&img, Some(30), 240).unwrap(), Some(40));
    }

    #[test]
    fn test_start_past_width_finds_nothing() {
        let img = with_white_column_at(10, 5);
        assert_eq!(find_vertical_divider(&img, Some(10), 240).unwrap(), None);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 4, Luma([240])));
        assert_eq!(find_vertical_divider(&img, None, 240).unwrap(), Some(7));
        assert_eq!(find_vertical_divider(&img, None, 241).unwrap(), None);
    }

    fn crop_for(start_x: Option<u32>) -> DividerCrop {
        DividerCrop::new(&DividerConfig {
            file: PathBuf::from("unused.png"),
            output: None,
            tolerance: 240,
            start_x,
        })
    }

    #[test]
    fn test_divider_at_first_column_is_empty_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        GrayImage::from_fn(30, 10, |x, _| if x == 0 { Luma([255]) } else { Luma([30]) })
            .save(&path)
            .unwrap();

        let result = crop_for(Some(0)).process(&path);
        assert!(matches!(result, Err(GutterError::EmptyRegion(_))));
    }

    #[test]
    fn test_no_divider_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark.png");
        GrayImage::from_pixel(30, 10, Luma([30])).save(&path).unwrap();
        let original = fs::read(&path).unwrap();

        let outcome = crop_for(None).process(&path).unwrap();
        assert!(matches!(outcome, Outcome::Skipped { .. }));
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_crop_overwrites_input_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        with_white_column_at(100, 85).save(&path).unwrap();

        let outcome = crop_for(None).process(&path).unwrap();
        assert!(matches!(outcome, Outcome::Cropped { divider_x: 85, .. }));
        assert_eq!(image::open(&path).unwrap().width(), 85);
    }
}
