//! Discrete vector-field glyphs: one arrow per lattice point.
//!
//! Drawn length goes through a monotone saturating [`LengthScale`] so that
//! near-singular field strengths stay visually bounded, while the color is
//! taken from the true magnitude.

use crate::color::{self, Srgb};
use crate::error::FieldError;
use crate::field::VectorField;
use crate::gradient::RgbGradient;
use crate::grid::{lattice_points, GridConfig};
use crate::params::{param_f64, param_string, param_string_list};
use glam::DVec3;
use serde::Serialize;
use serde_json::Value;

/// Maps a true field norm to a drawn glyph length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LengthScale {
    /// `scale * sigmoid(norm)`.
    Sigmoid { scale: f64 },
    /// `factor * norm`.
    Linear { factor: f64 },
    /// `min(norm, max)`.
    Clamped { max: f64 },
}

impl Default for LengthScale {
    fn default() -> Self {
        LengthScale::Sigmoid { scale: 0.5 }
    }
}

impl LengthScale {
    pub fn apply(&self, norm: f64) -> f64 {
        match *self {
            LengthScale::Sigmoid { scale } => scale * sigmoid(norm),
            LengthScale::Linear { factor } => factor * norm,
            LengthScale::Clamped { max } => norm.min(max),
        }
    }

    /// Reads `length_scale` (`sigmoid`, `linear` or `clamped`) and `length_param`.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let kind = param_string(params, "length_scale", "sigmoid");
        match kind.as_str() {
            "sigmoid" => Ok(LengthScale::Sigmoid {
                scale: param_f64(params, "length_param", 0.5),
            }),
            "linear" => Ok(LengthScale::Linear {
                factor: param_f64(params, "length_param", 1.0),
            }),
            "clamped" => Ok(LengthScale::Clamped {
                max: param_f64(params, "length_param", 1.0),
            }),
            other => Err(FieldError::InvalidConfig(format!(
                "unknown length_scale '{other}' (expected sigmoid, linear or clamped)"
            ))),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Layout, coloring and scaling of a glyph grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorFieldConfig {
    /// Lattice bounds and spacing; noise and repeats are ignored.
    pub grid: GridConfig,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub colors: Vec<Srgb>,
    pub length: LengthScale,
}

impl Default for VectorFieldConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                x_min: -8.0,
                x_max: 8.0,
                y_min: -4.0,
                y_max: 4.0,
                delta_x: 0.5,
                delta_y: 0.5,
                ..GridConfig::default()
            },
            min_magnitude: 0.0,
            max_magnitude: 2.0,
            colors: color::default_scalar_field_colors(),
            length: LengthScale::default(),
        }
    }
}

impl VectorFieldConfig {
    /// Reads glyph settings from a JSON object, falling back to defaults.
    ///
    /// Grid keys are shared with [`GridConfig::from_json`]; `colors` is a list
    /// of hex strings.
    pub fn from_json(params: &Value) -> Result<Self, FieldError> {
        let d = Self::default();
        let colors = match param_string_list(params, "colors") {
            Some(hexes) => color::parse_hex_list(&hexes[..])?,
            None => d.colors,
        };
        Ok(Self {
            grid: GridConfig::from_json_with(params, &d.grid),
            min_magnitude: param_f64(params, "min_magnitude", d.min_magnitude),
            max_magnitude: param_f64(params, "max_magnitude", d.max_magnitude),
            colors,
            length: LengthScale::from_json(params)?,
        })
    }

    /// Magnitude gradient for glyph colors.
    pub fn gradient(&self) -> Result<RgbGradient, FieldError> {
        RgbGradient::new(self.min_magnitude, self.max_magnitude, self.colors.clone())
    }
}

/// One drawn arrow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glyph {
    /// Lattice point the arrow is anchored at.
    pub position: DVec3,
    /// Drawn arrow: field direction with length from the [`LengthScale`].
    pub vector: DVec3,
    /// True, unscaled field norm.
    pub magnitude: f64,
    pub color: Srgb,
}

impl Glyph {
    pub fn is_finite(&self) -> bool {
        self.vector.is_finite() && self.magnitude.is_finite()
    }
}

/// Builds the glyph for a single point.
///
/// A zero vector yields a zero-length glyph regardless of the length scale.
pub fn glyph_at<F>(field: &F, position: DVec3, length: &LengthScale, gradient: &RgbGradient) -> Glyph
where
    F: VectorField + ?Sized,
{
    let v = field.vector_at(position);
    let magnitude = v.length();
    let vector = if magnitude == 0.0 {
        DVec3::ZERO
    } else {
        v * (length.apply(magnitude) / magnitude)
    };
    Glyph {
        position,
        vector,
        magnitude,
        color: gradient.color_at(magnitude),
    }
}

/// Evaluates `field` on the undisturbed lattice of `config.grid`, x-major.
///
/// Non-finite samples are kept (their color falls back to the first stop)
/// and reported through a warning; callers can drop them with
/// [`Glyph::is_finite`].
pub fn render_glyphs<F>(field: &F, config: &VectorFieldConfig) -> Result<Vec<Glyph>, FieldError>
where
    F: VectorField + ?Sized,
{
    let gradient = config.gradient()?;
    let glyphs: Vec<Glyph> = lattice_points(&config.grid)?
        .into_iter()
        .map(|p| glyph_at(field, p, &config.length, &gradient))
        .collect();
    let bad = glyphs.iter().filter(|g| !g.is_finite()).count();
    if bad > 0 {
        log::warn!("{bad} of {} glyphs have non-finite field values", glyphs.len());
    }
    Ok(glyphs)
}
