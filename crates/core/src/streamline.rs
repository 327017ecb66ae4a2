//! Streamline integration with fixed-step explicit Euler.
//!
//! Each seed runs for `ceil(virtual_time / dt)` steps of
//! `next = current + dt * F(current)`, stopping early before the first point
//! that would leave the ball of radius `cutoff_norm`. The captured polyline is then
//! resampled to a fixed anchor budget before curve fitting.
//!
//! Non-finite field values are not detected here; they propagate into the
//! trajectory. Use [`crate::field::check_finite`] on the seeds beforehand
//! when the field may be singular.

use crate::curve::{smooth_through, CubicSegment};
use crate::error::FieldError;
use crate::field::VectorField;
use crate::params::{param_f64, param_usize};
use glam::DVec3;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on Euler steps per streamline.
pub const MAX_STEPS: usize = 10_000_000;

/// Integration settings shared by every seed of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamlineConfig {
    pub dt: f64,
    pub virtual_time: f64,
    pub n_anchors_per_line: usize,
    pub cutoff_norm: f64,
}

impl Default for StreamlineConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            virtual_time: 3.0,
            n_anchors_per_line: 100,
            cutoff_norm: 15.0,
        }
    }
}

impl StreamlineConfig {
    /// Reads integrator settings from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            dt: param_f64(params, "dt", d.dt),
            virtual_time: param_f64(params, "virtual_time", d.virtual_time),
            n_anchors_per_line: param_usize(params, "n_anchors_per_line", d.n_anchors_per_line),
            cutoff_norm: param_f64(params, "cutoff_norm", d.cutoff_norm),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(FieldError::InvalidStep {
                name: "dt".to_string(),
                value: self.dt,
            });
        }
        if !(self.virtual_time.is_finite() && self.virtual_time >= 0.0) {
            return Err(FieldError::InvalidConfig(format!(
                "virtual_time must be finite and non-negative, got {}",
                self.virtual_time
            )));
        }
        if self.n_anchors_per_line == 0 {
            return Err(FieldError::InvalidConfig(
                "n_anchors_per_line must be at least 1".to_string(),
            ));
        }
        if self.cutoff_norm.is_nan() || self.cutoff_norm < 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "cutoff_norm must be non-negative, got {}",
                self.cutoff_norm
            )));
        }
        let steps = (self.virtual_time / self.dt).ceil();
        if steps > MAX_STEPS as f64 {
            return Err(FieldError::InvalidConfig(format!(
                "virtual_time / dt needs {steps} steps, more than the limit of {MAX_STEPS}"
            )));
        }
        Ok(())
    }

    /// Number of Euler steps in the full time budget, capped at [`MAX_STEPS`].
    pub fn step_count(&self) -> usize {
        ((self.virtual_time / self.dt).ceil() as usize).min(MAX_STEPS)
    }
}

/// Why integration of a streamline stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The whole time budget was used.
    Completed,
    /// A point left the cutoff ball.
    Truncated,
}

/// The integrated trajectory of one seed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Streamline {
    points: Vec<DVec3>,
    termination: Termination,
}

impl Streamline {
    /// Every integration point, seed first.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a streamline holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn is_truncated(&self) -> bool {
        self.termination == Termination::Truncated
    }

    /// Every `max(1, len / n_anchors)`-th point, starting with the seed.
    pub fn anchors(&self, n_anchors: usize) -> Vec<DVec3> {
        let stride = (self.points.len() / n_anchors.max(1)).max(1);
        self.points.iter().step_by(stride).copied().collect()
    }

    /// Smooth Bézier curve through the resampled anchors.
    pub fn smooth_curve(&self, n_anchors: usize) -> Vec<CubicSegment> {
        smooth_through(&self.anchors(n_anchors))
    }
}

/// Integrates a single streamline from `seed`.
///
/// Every recorded point lies within `cutoff_norm` of the origin, except a
/// seed that already starts outside (which is returned alone as truncated).
/// A step that would leave the ball is discarded and ends the line, so a
/// truncated line is always shorter than a completed one.
pub fn integrate<F>(field: &F, seed: DVec3, config: &StreamlineConfig) -> Streamline
where
    F: VectorField + ?Sized,
{
    let steps = config.step_count();
    let mut points = Vec::with_capacity(steps.min(4096).checked_add(1).unwrap_or(1));
    points.push(seed);
    if seed.length() > config.cutoff_norm {
        return Streamline {
            points,
            termination: Termination::Truncated,
        };
    }
    let mut current = seed;
    let mut termination = Termination::Completed;
    for _ in 0..steps {
        let next = current + config.dt * field.vector_at(current);
        if next.length() > config.cutoff_norm {
            termination = Termination::Truncated;
            break;
        }
        points.push(next);
        current = next;
    }
    Streamline {
        points,
        termination,
    }
}

/// Integrates one streamline per seed, in seed order.
pub fn stream_lines<F>(
    field: &F,
    seeds: &[DVec3],
    config: &StreamlineConfig,
) -> Result<Vec<Streamline>, FieldError>
where
    F: VectorField + ?Sized,
{
    config.validate()?;
    let lines: Vec<Streamline> = seeds
        .iter()
        .map(|&seed| integrate(field, seed, config))
        .collect();
    let truncated = lines.iter().filter(|l| l.is_truncated()).count();
    log::debug!(
        "integrated {} streamlines ({} truncated at norm {})",
        lines.len(),
        truncated,
        config.cutoff_norm
    );
    Ok(lines)
}

/// Moves every point one Euler step along the field: `p += dt * F(p)`.
pub fn advect<F>(field: &F, points: &mut [DVec3], dt: f64)
where
    F: VectorField + ?Sized,
{
    for p in points.iter_mut() {
        *p += dt * field.vector_at(*p);
    }
}

/// Like [`advect`], but only moves points with `|x| < half_width` and
/// `|y| < half_height`; points outside that frame stay where they are.
pub fn advect_within<F>(field: &F, points: &mut [DVec3], dt: f64, half_width: f64, half_height: f64)
where
    F: VectorField + ?Sized,
{
    for p in points.iter_mut() {
        if p.x.abs() < half_width && p.y.abs() < half_height {
            *p += dt * field.vector_at(*p);
        }
    }
}
