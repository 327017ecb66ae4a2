//! Pure-computation rasterization of a scalar field through an [`RgbGradient`].
//!
//! This module is always available (no feature gate) so that callers which
//! only need the pixel buffer do not pull in the `image` crate. The PNG cache
//! in [`crate::cache`] builds on it.

use fieldviz_core::error::FieldError;
use fieldviz_core::field::ScalarField;
use fieldviz_core::gradient::RgbGradient;
use fieldviz_core::params::{param_f64, param_usize};
use glam::DVec3;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on `pixel_width * pixel_height`.
pub const MAX_PIXELS: usize = 100_000_000;

/// Pixel size and the plane-coordinate frame it covers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterConfig {
    pub pixel_width: usize,
    pub pixel_height: usize,
    /// Width of the centered frame in plane units.
    pub frame_width: f64,
    /// Height of the centered frame in plane units.
    pub frame_height: f64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            pixel_width: 1920,
            pixel_height: 1080,
            frame_width: 8.0 * 16.0 / 9.0,
            frame_height: 8.0,
        }
    }
}

impl RasterConfig {
    /// Reads raster settings from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            pixel_width: param_usize(params, "pixel_width", d.pixel_width),
            pixel_height: param_usize(params, "pixel_height", d.pixel_height),
            frame_width: param_f64(params, "frame_width", d.frame_width),
            frame_height: param_f64(params, "frame_height", d.frame_height),
        }
    }

    /// Rejects zero or oversize pixel dimensions and non-positive frames.
    ///
    /// Each side must fit in a `u32` and the pixel count may not exceed
    /// [`MAX_PIXELS`].
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        if u32::try_from(self.pixel_width).is_err() || u32::try_from(self.pixel_height).is_err() {
            return Err(FieldError::InvalidDimensions);
        }
        match self.pixel_width.checked_mul(self.pixel_height) {
            Some(n) if n <= MAX_PIXELS => {}
            _ => return Err(FieldError::InvalidDimensions),
        }
        for (name, value) in [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FieldError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Plane point shown at pixel `(row, col)`.
    ///
    /// Columns span `[-w/2, w/2]` left to right and rows span `[h/2, -h/2]`
    /// top to bottom, both inclusive.
    pub fn pixel_to_point(&self, row: usize, col: usize) -> DVec3 {
        let x = linspace_at(-self.frame_width / 2.0, self.frame_width / 2.0, self.pixel_width, col);
        let y = linspace_at(self.frame_height / 2.0, -self.frame_height / 2.0, self.pixel_height, row);
        DVec3::new(x, y, 0.0)
    }

    /// Byte length of an RGB8 buffer for this raster.
    ///
    /// Saturates at `usize::MAX`; [`RasterConfig::validate`] keeps real
    /// rasters far below that.
    pub fn rgb_len(&self) -> usize {
        self.pixel_width
            .saturating_mul(self.pixel_height)
            .saturating_mul(3)
    }
}

/// The `i`-th of `n` evenly spaced samples from `start` to `end`.
fn linspace_at(start: f64, end: f64, n: usize, i: usize) -> f64 {
    if n <= 1 {
        return start;
    }
    start + (end - start) * i as f64 / (n - 1) as f64
}

/// Evaluates `scalar` at every pixel and maps it through `gradient`.
///
/// Returns an RGB8 buffer in row-major order, top row first, of length
/// `pixel_width * pixel_height * 3`.
pub fn rasterize<S>(
    scalar: &S,
    gradient: &RgbGradient,
    config: &RasterConfig,
) -> Result<Vec<u8>, FieldError>
where
    S: ScalarField + ?Sized,
{
    config.validate()?;
    let mut rgb = Vec::with_capacity(config.rgb_len());
    for row in 0..config.pixel_height {
        for col in 0..config.pixel_width {
            let value = scalar.value_at(config.pixel_to_point(row, col));
            rgb.extend_from_slice(&gradient.color_at(value).to_rgb8());
        }
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldviz_core::color::Srgb;

    fn small(width: usize, height: usize) -> RasterConfig {
        RasterConfig {
            pixel_width: width,
            pixel_height: height,
            frame_width: 4.0,
            frame_height: 2.0,
        }
    }

    fn black_to_white() -> RgbGradient {
        RgbGradient::new(0.0, 1.0, vec![Srgb::BLACK, Srgb::WHITE]).unwrap()
    }

    // -- Coordinates --

    #[test]
    fn corners_map_to_frame_corners() {
        let config = small(5, 3);
        assert_eq!(config.pixel_to_point(0, 0), DVec3::new(-2.0, 1.0, 0.0));
        assert_eq!(config.pixel_to_point(0, 4), DVec3::new(2.0, 1.0, 0.0));
        assert_eq!(config.pixel_to_point(2, 0), DVec3::new(-2.0, -1.0, 0.0));
        assert_eq!(config.pixel_to_point(1, 2), DVec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn single_pixel_sits_at_top_left() {
        assert_eq!(small(1, 1).pixel_to_point(0, 0), DVec3::new(-2.0, 1.0, 0.0));
    }

    #[test]
    fn default_frame_is_sixteen_by_nine() {
        let config = RasterConfig::default();
        let ratio = config.frame_width / config.frame_height;
        assert!((ratio - 16.0 / 9.0).abs() < 1e-12);
    }

    // -- Buffer --

    #[test]
    fn rasterize_correct_length() {
        let config = small(8, 4);
        let buf = rasterize(&|_p: DVec3| 0.5, &black_to_white(), &config).unwrap();
        assert_eq!(buf.len(), 8 * 4 * 3);
    }

    #[test]
    fn rasterize_is_row_major_with_y_decreasing() {
        // Value = y: top row is bright, bottom row is dark.
        let config = small(2, 2);
        let gradient = RgbGradient::new(-1.0, 1.0, vec![Srgb::BLACK, Srgb::WHITE]).unwrap();
        let buf = rasterize(&|p: DVec3| p.y, &gradient, &config).unwrap();
        assert_eq!(&buf[0..6], &[255; 6]);
        assert_eq!(&buf[6..12], &[0; 6]);
    }

    #[test]
    fn values_outside_range_are_clamped() {
        let config = small(2, 1);
        let buf = rasterize(&|p: DVec3| p.x * 100.0, &black_to_white(), &config).unwrap();
        assert_eq!(buf, vec![0, 0, 0, 255, 255, 255]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let result = rasterize(&|_p: DVec3| 0.0, &black_to_white(), &small(0, 4));
        assert!(matches!(result, Err(FieldError::InvalidDimensions)));
    }

    #[test]
    fn oversize_dimensions_are_rejected_instead_of_overflowing() {
        let huge = small(usize::MAX / 2, usize::MAX / 2);
        assert_eq!(huge.rgb_len(), usize::MAX);
        assert!(matches!(huge.validate(), Err(FieldError::InvalidDimensions)));
        let result = rasterize(&|_p: DVec3| 0.0, &black_to_white(), &huge);
        assert!(matches!(result, Err(FieldError::InvalidDimensions)));
    }

    #[test]
    fn pixel_count_over_limit_is_rejected() {
        assert!(small(10_000, 10_000).validate().is_ok());
        assert!(matches!(
            small(10_001, 10_000).validate(),
            Err(FieldError::InvalidDimensions)
        ));
        assert!(matches!(
            small((u32::MAX as usize).saturating_add(1), 1).validate(),
            Err(FieldError::InvalidDimensions)
        ));
    }

    #[test]
    fn from_json_reads_pixel_size() {
        let config = RasterConfig::from_json(&serde_json::json!({"pixel_width": 64, "pixel_height": 36}));
        assert_eq!(config.pixel_width, 64);
        assert_eq!(config.pixel_height, 36);
        assert_eq!(config.frame_height, 8.0);
    }
}
