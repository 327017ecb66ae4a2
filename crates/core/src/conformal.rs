//! Conformal maps on the complex plane and the flow fields built from them.
//!
//! The Joukowsky map `J(z) = z + 1/z` sends circles centred at the origin to
//! ellipses; its derivative gives the complex velocity of potential flow
//! around a cylinder.

use crate::differential::{derivative, ComplexMap};
use crate::field::VectorField;
use glam::DVec3;
use num_complex::Complex64;

/// Interprets the `(x, y)` part of a point as `x + iy`.
pub fn point_to_complex(p: DVec3) -> Complex64 {
    Complex64::new(p.x, p.y)
}

/// Embeds `x + iy` as the point `(x, y, 0)`.
pub fn complex_to_point(z: Complex64) -> DVec3 {
    DVec3::new(z.re, z.im, 0.0)
}

/// `J(z) = z + 1/z`, with `J(0) = 0` instead of a division by zero.
pub fn joukowsky_map(z: Complex64) -> Complex64 {
    if z == Complex64::new(0.0, 0.0) {
        return Complex64::new(0.0, 0.0);
    }
    z + z.inv()
}

/// Inverse of [`joukowsky_map`]: `(w + s * sqrt(w^2 - 4)) / 2`.
///
/// `s` is the sign of `Re(w)`, with a real part of zero (either sign of
/// zero) taking `s = +1`. For `|z| > 1` and `Re(z) != 0` this recovers `z`
/// rather than `1/z`.
pub fn inverse_joukowsky_map(w: Complex64) -> Complex64 {
    // Normalize -0.0 so the principal sqrt sees the same branch as +0.0.
    let w = if w.re == 0.0 {
        Complex64::new(0.0, w.im)
    } else {
        w
    };
    let sign = if w.re >= 0.0 { 1.0 } else { -1.0 };
    (w + sign * (w * w - 4.0).sqrt()) / 2.0
}

/// Potential flow of speed `speed` around a cylinder of radius `radius`
/// centred at the origin.
///
/// The velocity at `z` is `speed * conj(J'(z / radius))`, where `J'` is the
/// forward-difference derivative of the Joukowsky map. With unit radius and
/// speed this is `conj(1 - 1/z^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderFlow {
    pub radius: f64,
    pub speed: f64,
}

impl Default for CylinderFlow {
    fn default() -> Self {
        Self {
            radius: 1.0,
            speed: 1.0,
        }
    }
}

impl VectorField for CylinderFlow {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        let z = point_to_complex(p) / self.radius;
        let velocity = derivative(joukowsky_map).apply(z).conj() * self.speed;
        complex_to_point(velocity)
    }
}

/// Flow speed of the unit [`CylinderFlow`] at `p`.
pub fn cylinder_flow_magnitude(p: DVec3) -> f64 {
    CylinderFlow::default().vector_at(p).length()
}
