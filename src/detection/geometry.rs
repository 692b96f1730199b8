use image::DynamicImage;
use serde::Serialize;
use std::fmt;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
///
/// Construction normalizes inverted edges to an empty box, so a box never has
/// negative width or height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl CropBox {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x0,
            y0,
            x1: x1.max(x0),
            y1: y1.max(y0),
        }
    }

    /// Box covering a whole `width` x `height` image
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Shrink the box so it lies inside a `width` x `height` image
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x0 = self.x0.min(width);
        let y0 = self.y0.min(height);
        Self::new(x0, y0, self.x1.min(width), self.y1.min(height))
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Copy the boxed pixels out of `image`
    pub fn crop(&self, image: &DynamicImage) -> DynamicImage {
        let clamped = self.clamp_to(image.width(), image.height());
        image.crop_imm(clamped.x0, clamped.y0, clamped.width(), clamped.height())
    }
}

impl fmt::Display for CropBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x0, self.y0, self.x1, self.y1)
    }
}
