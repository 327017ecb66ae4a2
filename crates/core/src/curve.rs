//! Smooth cubic Bézier curves through a polyline.
//!
//! Fits a C2-continuous piecewise cubic through the given anchors with
//! natural end conditions (zero second derivative at both ends). The first
//! control points satisfy a tridiagonal system solved with the Thomas
//! algorithm; the second control points follow from C1 continuity.

use glam::DVec3;
use serde::Serialize;

/// One cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicSegment {
    pub start: DVec3,
    pub handle1: DVec3,
    pub handle2: DVec3,
    pub end: DVec3,
}

impl CubicSegment {
    /// Evaluates the segment at `t` in [0, 1].
    pub fn point_at(&self, t: f64) -> DVec3 {
        let u = 1.0 - t;
        u * u * u * self.start
            + 3.0 * u * u * t * self.handle1
            + 3.0 * u * t * t * self.handle2
            + t * t * t * self.end
    }
}

/// Fits smooth segments through `anchors`. Fewer than two anchors give no segments.
pub fn smooth_through(anchors: &[DVec3]) -> Vec<CubicSegment> {
    let n = match anchors.len() {
        0 | 1 => return Vec::new(),
        len => len - 1,
    };

    if n == 1 {
        let handle1 = (2.0 * anchors[0] + anchors[1]) / 3.0;
        let handle2 = 2.0 * handle1 - anchors[0];
        return vec![CubicSegment {
            start: anchors[0],
            handle1,
            handle2,
            end: anchors[1],
        }];
    }

    let first = first_control_points(anchors, n);
    (0..n)
        .map(|i| {
            let handle2 = if i < n - 1 {
                2.0 * anchors[i + 1] - first[i + 1]
            } else {
                (anchors[n] + first[n - 1]) / 2.0
            };
            CubicSegment {
                start: anchors[i],
                handle1: first[i],
                handle2,
                end: anchors[i + 1],
            }
        })
        .collect()
}

/// Solves for the first control point of each of the `n >= 2` segments.
fn first_control_points(k: &[DVec3], n: usize) -> Vec<DVec3> {
    // Tridiagonal system: sub-diagonal a, diagonal b, super-diagonal 1.
    let mut rhs: Vec<DVec3> = (0..n)
        .map(|i| match i {
            0 => k[0] + 2.0 * k[1],
            i if i == n - 1 => 8.0 * k[n - 1] + k[n],
            i => 4.0 * k[i] + 2.0 * k[i + 1],
        })
        .collect();
    let diag = |i: usize| match i {
        0 => 2.0,
        i if i == n - 1 => 7.0,
        _ => 4.0,
    };
    let sub = |i: usize| if i == n - 1 { 2.0 } else { 1.0 };

    // Forward sweep.
    let mut c_prime = vec![0.0; n];
    c_prime[0] = 1.0 / diag(0);
    rhs[0] /= diag(0);
    for i in 1..n {
        let m = diag(i) - sub(i) * c_prime[i - 1];
        c_prime[i] = 1.0 / m;
        rhs[i] = (rhs[i] - sub(i) * rhs[i - 1]) / m;
    }

    // Back substitution.
    for i in (0..n - 1).rev() {
        rhs[i] = rhs[i] - c_prime[i] * rhs[i + 1];
    }
    rhs
}
