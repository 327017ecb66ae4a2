#![deny(unsafe_code)]
//! Core numerics for fieldviz, a vector-field and flow-visualization engine.
//!
//! Provides the `VectorField`/`ScalarField` traits, finite-difference
//! operators (`divergence`, `two_d_curl`, `negative_gradient`), Joukowsky
//! conformal maps, ready-made planar flows, the seed grid generator, the
//! Euler streamline integrator with Bézier smoothing, the glyph renderer,
//! `RgbGradient` color mapping, the `Xorshift64` PRNG, and parameter helpers.

pub mod color;
pub mod conformal;
pub mod curve;
pub mod differential;
pub mod error;
pub mod field;
pub mod flows;
pub mod glyph;
pub mod gradient;
pub mod grid;
pub mod params;
pub mod prng;
pub mod streamline;

pub use color::Srgb;
pub use conformal::CylinderFlow;
pub use differential::{divergence, negative_gradient, two_d_curl};
pub use error::FieldError;
pub use field::{Magnitude, ScalarField, VectorField};
pub use glyph::{render_glyphs, Glyph, LengthScale, VectorFieldConfig};
pub use gradient::RgbGradient;
pub use grid::{flow_start_points, GridConfig};
pub use prng::Xorshift64;
pub use streamline::{stream_lines, Streamline, StreamlineConfig, Termination};
