//! Field traits: pure mappings from points in space to vectors or scalars.
//!
//! Points and vectors are `glam::DVec3`. Planar fields simply ignore (and
//! return zero for) the `z` component. Any closure with the right signature
//! is a field, and small parameter structs implement the traits directly so
//! fields carry their parameters by value instead of capturing state.

use crate::error::FieldError;
use glam::DVec3;

/// A vector field `R3 -> R3`.
///
/// Implementations must be pure: the same point always yields the same vector.
pub trait VectorField {
    /// Evaluates the field at `p`.
    fn vector_at(&self, p: DVec3) -> DVec3;
}

/// A scalar field (or potential) `R3 -> R`.
pub trait ScalarField {
    /// Evaluates the field at `p`.
    fn value_at(&self, p: DVec3) -> f64;
}

impl<F> VectorField for F
where
    F: Fn(DVec3) -> DVec3,
{
    fn vector_at(&self, p: DVec3) -> DVec3 {
        self(p)
    }
}

impl<F> ScalarField for F
where
    F: Fn(DVec3) -> f64,
{
    fn value_at(&self, p: DVec3) -> f64 {
        self(p)
    }
}

/// Scalar field giving the Euclidean norm of a vector field.
///
/// Used to color streamlines and glyphs by field strength.
#[derive(Debug, Clone)]
pub struct Magnitude<F> {
    field: F,
}

impl<F: VectorField> Magnitude<F> {
    pub fn new(field: F) -> Self {
        Self { field }
    }
}

impl<F: VectorField> ScalarField for Magnitude<F> {
    fn value_at(&self, p: DVec3) -> f64 {
        self.field.vector_at(p).length()
    }
}

/// Returns every point at which `field` evaluates to a NaN or infinite vector.
pub fn non_finite_samples<F>(field: &F, points: &[DVec3]) -> Vec<DVec3>
where
    F: VectorField + ?Sized,
{
    points
        .iter()
        .copied()
        .filter(|&p| !field.vector_at(p).is_finite())
        .collect()
}

/// Validation pass over a sample set.
///
/// Returns `FieldError::NonFiniteSample` for the first point whose vector is
/// not finite. Fields are expected to be finite on the sampled domain; this
/// lets callers reject an ill-posed field before it corrupts a render.
pub fn check_finite<F>(field: &F, points: &[DVec3]) -> Result<(), FieldError>
where
    F: VectorField + ?Sized,
{
    match points.iter().find(|&&p| !field.vector_at(p).is_finite()) {
        Some(p) => Err(FieldError::NonFiniteSample {
            x: p.x,
            y: p.y,
            z: p.z,
        }),
        None => Ok(()),
    }
}
