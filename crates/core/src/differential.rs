//! Finite-difference differential operators over fields.
//!
//! Every operator wraps a field by value together with a fixed step `dt` and
//! is itself a field, so operators compose (`divergence(negative_gradient(phi))`).
//! All derivatives are one-sided forward differences `(f(p + dt e) - f(p)) / dt`
//! with no adaptive step sizing. With the default `dt = 1e-7` the error is
//! roughly `dt * |f''| + eps * |f| / dt`, which is fine for visualization but
//! loses precision when field values are very large.

use crate::field::{ScalarField, VectorField};
use glam::DVec3;
use num_complex::Complex64;

/// Default finite-difference step.
pub const DEFAULT_DT: f64 = 1e-7;

const AXES: [DVec3; 3] = [DVec3::X, DVec3::Y, DVec3::Z];

/// A complex function `C -> C`.
pub trait ComplexMap {
    fn apply(&self, z: Complex64) -> Complex64;
}

impl<G> ComplexMap for G
where
    G: Fn(Complex64) -> Complex64,
{
    fn apply(&self, z: Complex64) -> Complex64 {
        self(z)
    }
}

/// Forward-difference derivative of a complex function along the real axis.
#[derive(Debug, Clone)]
pub struct Derivative<G> {
    func: G,
    dt: f64,
}

impl<G: ComplexMap> Derivative<G> {
    pub fn with_step(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

impl<G: ComplexMap> ComplexMap for Derivative<G> {
    fn apply(&self, z: Complex64) -> Complex64 {
        (self.func.apply(z + self.dt) - self.func.apply(z)) / self.dt
    }
}

/// `z -> (g(z + dt) - g(z)) / dt`.
pub fn derivative<G: ComplexMap>(func: G) -> Derivative<G> {
    Derivative {
        func,
        dt: DEFAULT_DT,
    }
}

/// Negative gradient `-∇φ` of a scalar potential.
#[derive(Debug, Clone)]
pub struct NegativeGradient<P> {
    potential: P,
    dt: f64,
}

impl<P: ScalarField> NegativeGradient<P> {
    pub fn with_step(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

impl<P: ScalarField> VectorField for NegativeGradient<P> {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        let base = self.potential.value_at(p);
        let partial = |axis: DVec3| (self.potential.value_at(p + self.dt * axis) - base) / self.dt;
        -DVec3::new(partial(DVec3::X), partial(DVec3::Y), partial(DVec3::Z))
    }
}

/// Builds `-∇φ`, stepping each axis independently.
pub fn negative_gradient<P: ScalarField>(potential: P) -> NegativeGradient<P> {
    NegativeGradient {
        potential,
        dt: DEFAULT_DT,
    }
}

/// Divergence `Σ ∂Fᵢ/∂xᵢ` of a vector field.
#[derive(Debug, Clone)]
pub struct Divergence<F> {
    field: F,
    dt: f64,
}

impl<F: VectorField> Divergence<F> {
    pub fn with_step(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

impl<F: VectorField> ScalarField for Divergence<F> {
    fn value_at(&self, p: DVec3) -> f64 {
        let base = self.field.vector_at(p);
        // Component i is perturbed along axis i.
        AXES.iter()
            .enumerate()
            .map(|(i, &axis)| (self.field.vector_at(p + self.dt * axis)[i] - base[i]) / self.dt)
            .sum()
    }
}

/// Builds the divergence of `field` over all three axes.
pub fn divergence<F: VectorField>(field: F) -> Divergence<F> {
    Divergence {
        field,
        dt: DEFAULT_DT,
    }
}

/// Planar scalar curl `∂Fy/∂x - ∂Fx/∂y`.
#[derive(Debug, Clone)]
pub struct TwoDCurl<F> {
    field: F,
    dt: f64,
}

impl<F: VectorField> TwoDCurl<F> {
    pub fn with_step(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }
}

impl<F: VectorField> ScalarField for TwoDCurl<F> {
    fn value_at(&self, p: DVec3) -> f64 {
        let base = self.field.vector_at(p);
        let dfy_dx = (self.field.vector_at(p + self.dt * DVec3::X).y - base.y) / self.dt;
        let dfx_dy = (self.field.vector_at(p + self.dt * DVec3::Y).x - base.x) / self.dt;
        dfy_dx - dfx_dy
    }
}

/// Builds the scalar curl of a planar field.
pub fn two_d_curl<F: VectorField>(field: F) -> TwoDCurl<F> {
    TwoDCurl {
        field,
        dt: DEFAULT_DT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-5;

    fn rotation(p: DVec3) -> DVec3 {
        DVec3::new(-p.y, p.x, 0.0)
    }

    fn sample_points() -> Vec<DVec3> {
        let mut points = Vec::new();
        for i in -4..=4 {
            for j in -3..=3 {
                points.push(DVec3::new(i as f64 * 0.75, j as f64 * 1.1, 0.0));
            }
        }
        points
    }

    // -- Complex derivative --

    #[test]
    fn derivative_of_square_is_two_z() {
        let d = derivative(|z: Complex64| z * z);
        let z = Complex64::new(1.5, -0.5);
        let got = d.apply(z);
        assert!((got - 2.0 * z).norm() < TOL, "got {got}");
    }

    #[test]
    fn derivative_step_is_configurable() {
        let coarse = derivative(|z: Complex64| z * z).with_step(0.5);
        // Forward difference of z^2 with h = 0.5 is exactly 2z + h.
        let got = coarse.apply(Complex64::new(1.0, 0.0));
        assert!((got - Complex64::new(2.5, 0.0)).norm() < 1e-12);
    }

    // -- Negative gradient --

    #[test]
    fn negative_gradient_of_quadratic_bowl_points_inward() {
        let bowl = |p: DVec3| 0.5 * p.length_squared();
        let g = negative_gradient(bowl);
        let p = DVec3::new(1.0, -2.0, 0.5);
        let v = g.vector_at(p);
        assert!((v - (-p)).length() < TOL, "got {v}");
    }

    #[test]
    fn negative_gradient_steps_each_axis_independently() {
        let plane = |p: DVec3| 3.0 * p.x - 2.0 * p.y + 5.0 * p.z;
        let v = negative_gradient(plane).vector_at(DVec3::new(0.3, 0.7, -1.0));
        assert!((v - DVec3::new(-3.0, 2.0, -5.0)).length() < TOL, "got {v}");
    }

    // -- Divergence --

    #[test]
    fn divergence_of_pure_rotation_is_zero() {
        let div = divergence(rotation);
        for p in sample_points() {
            let d = div.value_at(p);
            assert!(d.abs() < TOL, "divergence {d} at {p}");
        }
    }

    #[test]
    fn divergence_of_radial_field_is_three() {
        let div = divergence(|p: DVec3| p);
        for p in sample_points() {
            let d = div.value_at(p);
            assert!((d - 3.0).abs() < TOL, "divergence {d} at {p}");
        }
    }

    #[test]
    fn divergence_perturbs_each_component_along_its_own_axis() {
        // Only Fy depends on y. Stepping every term along x would report 0.
        let stretch_y = |p: DVec3| DVec3::new(0.0, 2.0 * p.y, 0.0);
        let d = divergence(stretch_y).value_at(DVec3::new(1.0, 1.0, 0.0));
        assert!((d - 2.0).abs() < TOL, "divergence {d}");

        let stretch_z = |p: DVec3| DVec3::new(0.0, 0.0, -4.0 * p.z);
        let d = divergence(stretch_z).value_at(DVec3::new(0.0, 0.0, 2.0));
        assert!((d + 4.0).abs() < TOL, "divergence {d}");
    }

    // -- Curl --

    #[test]
    fn curl_of_pure_rotation_is_two() {
        let curl = two_d_curl(rotation);
        for p in sample_points() {
            let c = curl.value_at(p);
            assert!((c - 2.0).abs() < TOL, "curl {c} at {p}");
        }
    }

    #[test]
    fn curl_of_gradient_field_is_zero() {
        let field = negative_gradient(|p: DVec3| p.x * p.x + 3.0 * p.y).with_step(1e-6);
        let c = two_d_curl(field).with_step(1e-3).value_at(DVec3::new(0.5, 0.5, 0.0));
        assert!(c.abs() < 1e-2, "curl {c}");
    }

    #[test]
    fn curl_of_shear_flow_is_negative_rate() {
        let shear = |p: DVec3| DVec3::new(0.5 * p.y, 0.0, 0.0);
        let c = two_d_curl(shear).value_at(DVec3::new(2.0, -1.0, 0.0));
        assert!((c + 0.5).abs() < TOL, "curl {c}");
    }
}
