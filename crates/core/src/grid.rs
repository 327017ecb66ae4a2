//! Sample grid generation for streamline seeding and glyph placement.
//!
//! Points are emitted repeat-major, then by `x`, then by `y`. Consumers rely
//! on this order for a deterministic visual layout, so it is part of the
//! contract. Each axis behaves like `arange(min, max + step, step)`, which
//! makes the upper bound inclusive when the range is a multiple of the step.

use crate::error::FieldError;
use crate::params::{param_f64, param_opt_f64, param_u64, param_usize};
use crate::prng::Xorshift64;
use glam::DVec3;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on the number of points a single grid may generate.
pub const MAX_POINTS: usize = 50_000_000;

/// Bounds, spacing, repeats and jitter for a sample grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    /// Number of full passes over the lattice, each with fresh jitter.
    pub n_repeats: usize,
    /// Jitter amplitude; `None` means `delta_y / 2`.
    pub noise_factor: Option<f64>,
    /// Seed for the jitter sequence.
    pub seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_min: -8.0,
            x_max: 8.0,
            y_min: -5.0,
            y_max: 5.0,
            delta_x: 0.5,
            delta_y: 0.5,
            n_repeats: 1,
            noise_factor: None,
            seed: 0,
        }
    }
}

impl GridConfig {
    /// Reads grid settings from a JSON object, falling back to `base` per key.
    pub fn from_json_with(params: &Value, base: &GridConfig) -> Self {
        Self {
            x_min: param_f64(params, "x_min", base.x_min),
            x_max: param_f64(params, "x_max", base.x_max),
            y_min: param_f64(params, "y_min", base.y_min),
            y_max: param_f64(params, "y_max", base.y_max),
            delta_x: param_f64(params, "delta_x", base.delta_x),
            delta_y: param_f64(params, "delta_y", base.delta_y),
            n_repeats: param_usize(params, "n_repeats", base.n_repeats),
            noise_factor: param_opt_f64(params, "noise_factor").or(base.noise_factor),
            seed: param_u64(params, "seed", base.seed),
        }
    }

    /// Reads grid settings from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self::from_json_with(params, &Self::default())
    }

    /// Same bounds and spacing with no jitter and a single pass.
    pub fn lattice(&self) -> Self {
        Self {
            n_repeats: 1,
            noise_factor: Some(0.0),
            ..self.clone()
        }
    }

    /// Jitter amplitude actually applied.
    pub fn effective_noise(&self) -> f64 {
        self.noise_factor.unwrap_or(self.delta_y / 2.0)
    }

    /// Rejects non-positive or non-finite steps, non-finite bounds, negative
    /// noise and grids with more than [`MAX_POINTS`] points.
    pub fn validate(&self) -> Result<(), FieldError> {
        for (name, value) in [("delta_x", self.delta_x), ("delta_y", self.delta_y)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FieldError::InvalidStep {
                    name: name.to_string(),
                    value,
                });
            }
        }
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(FieldError::InvalidConfig(format!(
                "grid bounds must be finite, got {bounds:?}"
            )));
        }
        let noise = self.effective_noise();
        if !(noise.is_finite() && noise >= 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "noise_factor must be finite and non-negative, got {noise}"
            )));
        }
        match self.checked_point_count() {
            Some(n) if n <= MAX_POINTS => Ok(()),
            _ => Err(FieldError::InvalidConfig(format!(
                "grid of {} x {} points over {} repeats exceeds the limit of {MAX_POINTS}",
                self.x_count(),
                self.y_count(),
                self.n_repeats
            ))),
        }
    }

    pub fn x_count(&self) -> usize {
        axis_count(self.x_min, self.x_max, self.delta_x)
    }

    pub fn y_count(&self) -> usize {
        axis_count(self.y_min, self.y_max, self.delta_y)
    }

    /// `n_repeats * x_count * y_count`, saturating at `usize::MAX`.
    pub fn point_count(&self) -> usize {
        self.checked_point_count().unwrap_or(usize::MAX)
    }

    /// `n_repeats * x_count * y_count`, or `None` on overflow.
    pub fn checked_point_count(&self) -> Option<usize> {
        self.n_repeats
            .checked_mul(self.x_count())?
            .checked_mul(self.y_count())
    }
}

/// Number of samples in `arange(min, max + step, step)`.
fn axis_count(min: f64, max: f64, step: f64) -> usize {
    let n = ((max + step - min) / step).ceil();
    if n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Jittered seed points for streamlines.
///
/// Every lattice point is offset by an independent uniform draw from
/// `[0, noise)^3`, using the PRNG seeded with `config.seed`.
pub fn flow_start_points(config: &GridConfig) -> Result<Vec<DVec3>, FieldError> {
    config.validate()?;
    let noise = config.effective_noise();
    let (nx, ny) = (config.x_count(), config.y_count());
    let mut rng = Xorshift64::new(config.seed);
    let mut points = Vec::with_capacity(config.point_count());
    for _ in 0..config.n_repeats {
        for i in 0..nx {
            let x = config.x_min + i as f64 * config.delta_x;
            for j in 0..ny {
                let y = config.y_min + j as f64 * config.delta_y;
                let jitter = noise * rng.next_unit_cube();
                points.push(DVec3::new(x, y, 0.0) + jitter);
            }
        }
    }
    Ok(points)
}

/// The undisturbed lattice: one pass, no jitter.
pub fn lattice_points(config: &GridConfig) -> Result<Vec<DVec3>, FieldError> {
    flow_start_points(&config.lattice())
}
