//! Ready-made planar vector fields for demonstrations and tests.
//!
//! Each field is a small value type holding its parameters. All of them are
//! deterministic and return a zero `z` component.

use crate::conformal::CylinderFlow;
use crate::field::{ScalarField, VectorField};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Rigid rotation `(-y, x)`: divergence 0, curl 2 everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation;

impl VectorField for Rotation {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        DVec3::new(-p.y, p.x, 0.0)
    }
}

/// The same vector everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub direction: DVec3,
}

impl VectorField for Uniform {
    fn vector_at(&self, _p: DVec3) -> DVec3 {
        self.direction
    }
}

/// Four counter-rotating swirls: `0.05 * (y^3 - 4y, x^3 - 16x)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FourSwirls;

impl VectorField for FourSwirls {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        let (x, y) = (p.x, p.y);
        0.05 * DVec3::new(y.powi(3) - 4.0 * y, x.powi(3) - 16.0 * x, 0.0)
    }
}

/// Lotka-Volterra style phase flow circulating around `(30, 30)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PredatorPrey;

impl VectorField for PredatorPrey {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        DVec3::new(-(p.y - 30.0), p.x - 30.0, 0.0)
    }
}

/// Horizontal shear `(rate * y, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shear {
    pub rate: f64,
}

impl Default for Shear {
    fn default() -> Self {
        Self { rate: 0.5 }
    }
}

impl VectorField for Shear {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        DVec3::new(self.rate * p.y, 0.0, 0.0)
    }
}

/// `(sin(x + y), sin(xy / 3))`, a field with patches of both signs of divergence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SineFlow;

impl VectorField for SineFlow {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        DVec3::new((p.x + p.y).sin(), (p.x * p.y / 3.0).sin(), 0.0)
    }
}

/// Two opposite swirls centred at `y = ±0.25`, softened by `1 / (r^2 + 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TwinSwirl;

impl VectorField for TwinSwirl {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        let top = DVec3::new(p.y - 0.25, -p.x, 0.0);
        let bottom = DVec3::new(-(p.y + 0.25), p.x, 0.0);
        3.0 * (top / (top.length_squared() + 1.0) + bottom / (bottom.length_squared() + 1.0))
    }
}

/// Two hills at `(±4, 0)` with a floor at `-10`:
/// `max(-10, 2 - 0.01 * ((x-4)^2 + y^2) * ((x+4)^2 + y^2))`.
///
/// Its negative gradient runs downhill away from both peaks and vanishes on
/// the flat floor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HillPotential;

impl HillPotential {
    pub const FLOOR: f64 = -10.0;
}

impl ScalarField for HillPotential {
    fn value_at(&self, p: DVec3) -> f64 {
        let (x, y) = (p.x, p.y);
        let right = (x - 4.0).powi(2) + y * y;
        let left = (x + 4.0).powi(2) + y * y;
        (2.0 - 0.01 * right * left).max(Self::FLOOR)
    }
}

/// A point charge: position and signed strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub center: DVec3,
    pub strength: f64,
}

/// Inverse-square force field of a set of charges.
///
/// Each charge contributes `-strength * (center - p) / r^3`. Inside the core
/// radius `r` is replaced by `radius`, and a point exactly at a charge gets
/// no contribution from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceField {
    pub charges: Vec<Charge>,
    pub radius: f64,
}

impl ForceField {
    pub const DEFAULT_RADIUS: f64 = 0.5;

    pub fn new(charges: Vec<Charge>) -> Self {
        Self {
            charges,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    /// A positive and a negative unit charge at `(-d, 0)` and `(d, 0)`.
    pub fn dipole(d: f64) -> Self {
        Self::new(vec![
            Charge {
                center: DVec3::new(-d, 0.0, 0.0),
                strength: 1.0,
            },
            Charge {
                center: DVec3::new(d, 0.0, 0.0),
                strength: -1.0,
            },
        ])
    }

    /// A heavy body at `(3, 2)` and a light one at `(-3, -1)`, both attracting.
    pub fn gravity() -> Self {
        Self::new(vec![
            Charge {
                center: DVec3::new(3.0, 2.0, 0.0),
                strength: -6.0,
            },
            Charge {
                center: DVec3::new(-3.0, -1.0, 0.0),
                strength: -1.0,
            },
        ])
    }
}

impl VectorField for ForceField {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        self.charges.iter().fold(DVec3::ZERO, |acc, charge| {
            let to_center = charge.center - p;
            let norm = to_center.length();
            if norm == 0.0 {
                return acc;
            }
            let falloff = if norm < self.radius {
                self.radius.powi(3)
            } else {
                norm.powi(3)
            };
            acc - charge.strength * to_center / falloff
        })
    }
}

/// Rotates another field by 90° in the plane and zeroes it inside the unit disc.
///
/// Applied to [`CylinderFlow`] this gives the field lines around a charged
/// cylinder.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotated90<F> {
    pub inner: F,
}

impl Rotated90<CylinderFlow> {
    pub fn cylinder() -> Self {
        Self {
            inner: CylinderFlow::default(),
        }
    }
}

impl<F: VectorField> VectorField for Rotated90<F> {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        if p.length() < 1.0 {
            return DVec3::ZERO;
        }
        let v = self.inner.vector_at(p);
        DVec3::new(-v.y, v.x, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differential::{divergence, negative_gradient, two_d_curl};

    const TOL: f64 = 1e-5;

    #[test]
    fn rotation_has_zero_divergence_and_unit_double_curl() {
        let p = DVec3::new(1.3, -0.4, 0.0);
        assert!(divergence(Rotation).value_at(p).abs() < TOL);
        assert!((two_d_curl(Rotation).value_at(p) - 2.0).abs() < TOL);
    }

    #[test]
    fn four_swirls_vanishes_at_swirl_centres() {
        for (x, y) in [(0.0, 0.0), (4.0, 2.0), (-4.0, -2.0), (4.0, -2.0)] {
            let v = FourSwirls.vector_at(DVec3::new(x, y, 0.0));
            assert!(v.length() < 1e-12, "non-zero at ({x}, {y}): {v}");
        }
    }

    #[test]
    fn predator_prey_circulates_around_equilibrium() {
        let eq = DVec3::new(30.0, 30.0, 0.0);
        assert_eq!(PredatorPrey.vector_at(eq), DVec3::ZERO);
        let v = PredatorPrey.vector_at(eq + DVec3::X);
        assert_eq!(v, DVec3::Y);
    }

    #[test]
    fn shear_curl_is_negative_rate() {
        let c = two_d_curl(Shear::default()).value_at(DVec3::new(0.0, 2.0, 0.0));
        assert!((c + 0.5).abs() < TOL, "curl {c}");
    }

    #[test]
    fn sine_flow_matches_formula() {
        let p = DVec3::new(0.5, 1.0, 0.0);
        let v = SineFlow.vector_at(p);
        assert!((v.x - 1.5_f64.sin()).abs() < 1e-12);
        assert!((v.y - (0.5_f64 / 3.0).sin()).abs() < 1e-12);
    }

    #[test]
    fn twin_swirl_is_bounded() {
        for i in -20..=20 {
            for j in -20..=20 {
                let v = TwinSwirl.vector_at(DVec3::new(i as f64 * 0.25, j as f64 * 0.25, 0.0));
                assert!(v.length() < 6.0, "unbounded at ({i}, {j}): {v}");
            }
        }
    }

    #[test]
    fn uniform_ignores_position() {
        let u = Uniform {
            direction: DVec3::new(0.0, 1.0, 0.0),
        };
        assert_eq!(u.vector_at(DVec3::new(5.0, -3.0, 1.0)), DVec3::Y);
    }

    // -- Hill potential --

    #[test]
    fn hill_peaks_at_two_and_is_floored() {
        assert_eq!(HillPotential.value_at(DVec3::new(4.0, 0.0, 0.0)), 2.0);
        assert_eq!(HillPotential.value_at(DVec3::new(-4.0, 0.0, 0.0)), 2.0);
        assert!((HillPotential.value_at(DVec3::ZERO) + 0.56).abs() < 1e-12);
        assert_eq!(HillPotential.value_at(DVec3::new(20.0, 0.0, 0.0)), HillPotential::FLOOR);
    }

    #[test]
    fn hill_flow_vanishes_at_peaks_and_on_the_floor() {
        let flow = negative_gradient(HillPotential);
        for p in [DVec3::new(4.0, 0.0, 0.0), DVec3::new(-4.0, 0.0, 0.0)] {
            assert!(flow.vector_at(p).length() < 1e-4, "non-zero at {p}");
        }
        assert_eq!(flow.vector_at(DVec3::new(20.0, 5.0, 0.0)), DVec3::ZERO);
    }

    #[test]
    fn hill_flow_runs_downhill_toward_the_saddle() {
        let flow = negative_gradient(HillPotential);
        // Between the peaks the potential drops toward the origin.
        let v = flow.vector_at(DVec3::new(1.0, 0.0, 0.0));
        assert!(v.x < 0.0 && v.y.abs() < 1e-4, "got {v}");
        // Above the saddle it drops further away from the axis.
        let v = flow.vector_at(DVec3::new(0.0, 1.0, 0.0));
        assert!(v.y > 0.0 && v.x.abs() < 1e-4, "got {v}");
    }

    #[test]
    fn hill_flow_is_curl_free() {
        let flow = negative_gradient(HillPotential).with_step(1e-6);
        let c = two_d_curl(flow).with_step(1e-4).value_at(DVec3::new(1.5, -0.7, 0.0));
        assert!(c.abs() < 1e-2, "curl {c}");
    }

    // -- Force field --

    #[test]
    fn positive_charge_pushes_away() {
        let field = ForceField::new(vec![Charge {
            center: DVec3::ZERO,
            strength: 1.0,
        }]);
        let v = field.vector_at(DVec3::new(2.0, 0.0, 0.0));
        assert!(v.x > 0.0, "expected outward push, got {v}");
        assert!((v.x - 0.25).abs() < 1e-12, "expected 1/r^2 = 0.25, got {}", v.x);
    }

    #[test]
    fn force_is_softened_inside_core_radius() {
        let field = ForceField::new(vec![Charge {
            center: DVec3::ZERO,
            strength: 1.0,
        }]);
        let v = field.vector_at(DVec3::new(0.25, 0.0, 0.0));
        // r replaced by the 0.5 core radius: 0.25 / 0.125.
        assert!((v.x - 2.0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn point_at_charge_gets_no_contribution() {
        let field = ForceField::dipole(1.0);
        let v = field.vector_at(DVec3::new(-1.0, 0.0, 0.0));
        assert!(v.is_finite());
        // Only the negative charge at (1, 0) contributes: pull toward +x.
        assert!(v.x > 0.0, "got {v}");
    }

    #[test]
    fn dipole_field_on_axis_points_from_positive_to_negative() {
        let v = ForceField::dipole(1.0).vector_at(DVec3::ZERO);
        assert!(v.x > 0.0 && v.y.abs() < 1e-12, "got {v}");
    }

    #[test]
    fn gravity_pulls_toward_the_nearer_body() {
        let field = ForceField::gravity();
        let v = field.vector_at(DVec3::new(5.0, 2.0, 0.0));
        assert!(v.x < 0.0, "expected pull toward (3, 2), got {v}");
        let v = field.vector_at(DVec3::new(-3.0, -3.0, 0.0));
        assert!(v.y > 0.0, "expected pull toward (-3, -1), got {v}");
    }

    #[test]
    fn rotated_cylinder_is_zero_inside_and_perpendicular_outside() {
        let rotated = Rotated90::cylinder();
        assert_eq!(rotated.vector_at(DVec3::new(0.2, 0.3, 0.0)), DVec3::ZERO);
        let p = DVec3::new(2.0, 1.0, 0.0);
        let original = CylinderFlow::default().vector_at(p);
        let turned = rotated.vector_at(p);
        assert!(original.dot(turned).abs() < 1e-12);
        assert!((original.length() - turned.length()).abs() < 1e-12);
    }
}
