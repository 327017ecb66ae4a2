#![deny(unsafe_code)]
//! Field registry, scalar-field rasterization and the color-image cache.
//!
//! This crate sits between `fieldviz-core` (field traits, operators and the
//! built-in flows) and front ends such as the CLI, so that name-based field
//! construction and image caching live in one place.

pub mod raster;

#[cfg(feature = "png")]
pub mod cache;

use fieldviz_core::conformal::CylinderFlow;
use fieldviz_core::differential::{
    divergence, negative_gradient, two_d_curl, Divergence, NegativeGradient, TwoDCurl,
};
use fieldviz_core::error::FieldError;
use fieldviz_core::field::{Magnitude, ScalarField, VectorField};
use fieldviz_core::flows::{
    FourSwirls, ForceField, HillPotential, PredatorPrey, Rotated90, Rotation, Shear, SineFlow,
    TwinSwirl,
};
use fieldviz_core::params::param_f64;
use glam::DVec3;
use serde_json::Value;

/// All available field names.
const FIELD_NAMES: &[&str] = &[
    "cylinder",
    "rotation",
    "four-swirls",
    "predator-prey",
    "shear",
    "sine",
    "twin-swirl",
    "dipole",
    "gravity",
    "hill",
    "rotated-cylinder",
];

/// All scalar quantities derivable from a vector field.
const SCALAR_NAMES: &[&str] = &["magnitude", "divergence", "curl"];

/// Enumeration of the built-in vector fields.
///
/// Use [`FieldKind::from_name`] for string-based construction.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Potential flow around a cylinder (`radius`, `speed`).
    Cylinder(CylinderFlow),
    Rotation(Rotation),
    FourSwirls(FourSwirls),
    PredatorPrey(PredatorPrey),
    /// Horizontal shear (`rate`).
    Shear(Shear),
    Sine(SineFlow),
    TwinSwirl(TwinSwirl),
    /// Two opposite unit charges at `(±half_separation, 0)` (`half_separation`, `core_radius`).
    Dipole(ForceField),
    /// Attraction toward a heavy and a light body (`core_radius`).
    Gravity(ForceField),
    /// Downhill flow off two peaks at `(±4, 0)`.
    Hill(NegativeGradient<HillPotential>),
    /// Field lines around a charged cylinder.
    RotatedCylinder(Rotated90<CylinderFlow>),
}

impl FieldKind {
    /// Constructs a field by name, reading its parameters from `params`.
    ///
    /// Returns `FieldError::UnknownField` if the name is not recognized.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, FieldError> {
        match name {
            "cylinder" => {
                let d = CylinderFlow::default();
                let flow = CylinderFlow {
                    radius: param_f64(params, "radius", d.radius),
                    speed: param_f64(params, "speed", d.speed),
                };
                if !(flow.radius.is_finite() && flow.radius > 0.0) {
                    return Err(FieldError::InvalidConfig(format!(
                        "cylinder radius must be positive, got {}",
                        flow.radius
                    )));
                }
                Ok(FieldKind::Cylinder(flow))
            }
            "rotation" => Ok(FieldKind::Rotation(Rotation)),
            "four-swirls" => Ok(FieldKind::FourSwirls(FourSwirls)),
            "predator-prey" => Ok(FieldKind::PredatorPrey(PredatorPrey)),
            "shear" => Ok(FieldKind::Shear(Shear {
                rate: param_f64(params, "rate", Shear::default().rate),
            })),
            "sine" => Ok(FieldKind::Sine(SineFlow)),
            "twin-swirl" => Ok(FieldKind::TwinSwirl(TwinSwirl)),
            "dipole" => {
                let mut field = ForceField::dipole(param_f64(params, "half_separation", 1.0));
                field.radius = param_f64(params, "core_radius", ForceField::DEFAULT_RADIUS);
                Ok(FieldKind::Dipole(field))
            }
            "gravity" => {
                let mut field = ForceField::gravity();
                field.radius = param_f64(params, "core_radius", ForceField::DEFAULT_RADIUS);
                Ok(FieldKind::Gravity(field))
            }
            "hill" => Ok(FieldKind::Hill(negative_gradient(HillPotential))),
            "rotated-cylinder" => Ok(FieldKind::RotatedCylinder(Rotated90::cylinder())),
            _ => Err(FieldError::UnknownField(name.to_string())),
        }
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }
}

impl VectorField for FieldKind {
    fn vector_at(&self, p: DVec3) -> DVec3 {
        match self {
            FieldKind::Cylinder(f) => f.vector_at(p),
            FieldKind::Rotation(f) => f.vector_at(p),
            FieldKind::FourSwirls(f) => f.vector_at(p),
            FieldKind::PredatorPrey(f) => f.vector_at(p),
            FieldKind::Shear(f) => f.vector_at(p),
            FieldKind::Sine(f) => f.vector_at(p),
            FieldKind::TwinSwirl(f) => f.vector_at(p),
            FieldKind::Dipole(f) => f.vector_at(p),
            FieldKind::Gravity(f) => f.vector_at(p),
            FieldKind::Hill(f) => f.vector_at(p),
            FieldKind::RotatedCylinder(f) => f.vector_at(p),
        }
    }
}

/// Which scalar to derive from a vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Magnitude,
    Divergence,
    Curl,
}

impl ScalarKind {
    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        match name {
            "magnitude" => Ok(ScalarKind::Magnitude),
            "divergence" => Ok(ScalarKind::Divergence),
            "curl" => Ok(ScalarKind::Curl),
            _ => Err(FieldError::UnknownField(format!("scalar '{name}'"))),
        }
    }

    pub fn list_scalars() -> &'static [&'static str] {
        SCALAR_NAMES
    }

    /// Wraps `field` in the matching operator.
    pub fn derive(self, field: FieldKind) -> DerivedScalar {
        match self {
            ScalarKind::Magnitude => DerivedScalar::Magnitude(Magnitude::new(field)),
            ScalarKind::Divergence => DerivedScalar::Divergence(divergence(field)),
            ScalarKind::Curl => DerivedScalar::Curl(two_d_curl(field)),
        }
    }
}

/// A scalar field derived from a registry field.
#[derive(Debug, Clone)]
pub enum DerivedScalar {
    Magnitude(Magnitude<FieldKind>),
    Divergence(Divergence<FieldKind>),
    Curl(TwoDCurl<FieldKind>),
}

impl ScalarField for DerivedScalar {
    fn value_at(&self, p: DVec3) -> f64 {
        match self {
            DerivedScalar::Magnitude(s) => s.value_at(p),
            DerivedScalar::Divergence(s) => s.value_at(p),
            DerivedScalar::Curl(s) => s.value_at(p),
        }
    }
}
