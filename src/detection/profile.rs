use super::geometry::CropBox;
use crate::error::GutterError;
use image::{DynamicImage, GrayImage, Luma};

/// Direction a profile runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// One value per row, averaged across the row's columns
    Rows,
    /// One value per column, averaged across the column's rows
    Columns,
}

/// How a pixel is reduced to a single brightness value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrightnessMode {
    /// ITU-R 601 luma (299/587/114 weights)
    #[default]
    Rec601,
    /// Arithmetic mean of the red, green and blue channels
    ChannelMean,
}

/// ITU-R 601 luma of one RGB pixel
///
/// Fixed-point with 16 fractional bits, rounded to nearest, so results agree
/// with the usual `L` conversion of screenshot tooling rather than with the
/// Rec.709 weights of `DynamicImage::to_luma8`.
pub fn rec601_luma([r, g, b]: [u8; 3]) -> u8 {
    let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

/// Grayscale copy of `image` using [`rec601_luma`]
pub fn to_rec601_gray(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        Luma([rec601_luma(rgb.get_pixel(x, y).0)])
    })
}

/// Per-pixel brightness of one image in [0, 255]
pub struct BrightnessMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl BrightnessMap {
    pub fn new(image: &DynamicImage, mode: BrightnessMode) -> Self {
        let values = match mode {
            BrightnessMode::Rec601 => to_rec601_gray(image)
                .into_raw()
                .into_iter()
                .map(f32::from)
                .collect(),
            BrightnessMode::ChannelMean => image
                .to_rgb8()
                .pixels()
                .map(|p| {
                    let [r, g, b] = p.0;
                    (f32::from(r) + f32::from(g) + f32::from(b)) / 3.0
                })
                .collect(),
        };

        Self {
            width: image.width(),
            height: image.height(),
            values,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Mean brightness of every row or column inside `region`
    ///
    /// `region` defaults to the whole image and is clamped to it. The returned
    /// indices are relative to the region's origin along `axis`.
    pub fn profile(&self, axis: Axis, region: Option<CropBox>) -> Result<Vec<f32>, GutterError> {
        let region = region
            .unwrap_or_else(|| CropBox::full(self.width, self.height))
            .clamp_to(self.width, self.height);

        let (lines, span) = match axis {
            Axis::Rows => (region.y0..region.y1, region.x0..region.x1),
            Axis::Columns => (region.x0..region.x1, region.y0..region.y1),
        };

        if span.is_empty() {
            return Err(GutterError::EmptyRegion(format!(
                "cannot profile {:?} of region {}",
                axis, region
            )));
        }

        let count = f64::from(span.end - span.start);

        let profile = lines
            .map(|line| {
                let sum: f64 = span
                    .clone()
                    .map(|i| match axis {
                        Axis::Rows => self.get(i, line),
                        Axis::Columns => self.get(line, i),
                    })
                    .map(f64::from)
                    .sum();
                (sum / count) as f32
            })
            .collect();

        Ok(profile)
    }
}
