//! Gutter detection primitives
//!
//! Brightness profiling, adaptive band detection and the crop boxes derived
//! from detected bands. Everything here is a pure function of pixel data.

pub mod band;
pub mod geometry;
pub mod profile;

pub use band::{find_white_band, vicinity_range, Band};
pub use geometry::CropBox;
pub use profile::{to_rec601_gray, Axis, BrightnessMap, BrightnessMode};
