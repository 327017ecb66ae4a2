//! Piecewise-linear multi-stop color gradient over a scalar range.
//!
//! Inputs are normalized to `alpha = clamp((v - min) / (max - min), 0, 1)`,
//! scaled to `alpha * (k - 1)` for `k` stops, and interpolated linearly
//! between the two neighbouring stops. The gradient backs both per-glyph
//! coloring and whole-image rasterization, so it is applied to slices as
//! well as single values.

use crate::color::{self, Srgb};
use crate::error::FieldError;
use serde::Serialize;

/// Maps scalar magnitudes to interpolated RGB colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RgbGradient {
    min_value: f64,
    max_value: f64,
    colors: Vec<Srgb>,
}

impl RgbGradient {
    /// Creates a gradient over `[min_value, max_value]` with evenly spaced stops.
    ///
    /// Requires at least two colors, finite bounds and `min_value != max_value`.
    /// A reversed range (`min_value > max_value`) is allowed and flips the ramp.
    pub fn new(min_value: f64, max_value: f64, colors: Vec<Srgb>) -> Result<Self, FieldError> {
        if colors.len() < 2 {
            return Err(FieldError::InvalidGradient(format!(
                "gradient requires at least 2 colors, got {}",
                colors.len()
            )));
        }
        if !min_value.is_finite() || !max_value.is_finite() {
            return Err(FieldError::InvalidGradient(format!(
                "bounds must be finite, got [{min_value}, {max_value}]"
            )));
        }
        if min_value == max_value {
            return Err(FieldError::InvalidGradient(format!(
                "min_value and max_value must differ, both are {min_value}"
            )));
        }
        Ok(Self {
            min_value,
            max_value,
            colors,
        })
    }

    /// Creates a gradient by parsing hex color strings.
    pub fn from_hex<S: AsRef<str>>(
        min_value: f64,
        max_value: f64,
        hexes: &[S],
    ) -> Result<Self, FieldError> {
        Self::new(min_value, max_value, color::parse_hex_list(hexes)?)
    }

    /// Gradient over `[min_value, max_value]` using the default scalar-field palette.
    pub fn scalar_field(min_value: f64, max_value: f64) -> Result<Self, FieldError> {
        Self::new(min_value, max_value, color::default_scalar_field_colors())
    }

    pub fn min_value(&self) -> f64 {
        self.min_value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Normalized position of `value` in [0, 1]. NaN maps to 0.
    pub fn alpha(&self, value: f64) -> f64 {
        let alpha = (value - self.min_value) / (self.max_value - self.min_value);
        if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        }
    }

    /// Color for a single scalar value.
    pub fn color_at(&self, value: f64) -> Srgb {
        let last = self.colors.len() - 1;
        let scaled = self.alpha(value) * last as f64;
        let index = (scaled as usize).min(last);
        let next = (index + 1).min(last);
        let frac = scaled % 1.0;
        self.colors[index].lerp(self.colors[next], frac)
    }

    /// Colors for a slice of scalar values, in order.
    pub fn colors_for(&self, values: &[f64]) -> Vec<Srgb> {
        values.iter().map(|&v| self.color_at(v)).collect()
    }
}

impl Default for RgbGradient {
    /// Blue to red over [0, 1].
    fn default() -> Self {
        Self {
            min_value: 0.0,
            max_value: 1.0,
            colors: vec![color::blue(), color::red()],
        }
    }
}
