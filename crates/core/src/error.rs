//! Error types for the fieldviz core.

use thiserror::Error;

/// Errors produced by field sampling, configuration and caching operations.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Pixel width or height was zero when rasterizing.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A step size (grid spacing, integration dt) was zero, negative or non-finite.
    #[error("invalid step for '{name}': {value} (must be positive and finite)")]
    InvalidStep { name: String, value: f64 },

    /// A configuration struct held an unusable combination of values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A color gradient could not be constructed from the given bounds and colors.
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),

    /// A field evaluated to NaN or infinity at the given point.
    #[error("non-finite field sample at ({x}, {y}, {z})")]
    NonFiniteSample { x: f64, y: f64, z: f64 },

    /// A field name was not recognized by the registry.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Reading or writing a cached image failed.
    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = FieldError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_step_includes_name_and_value() {
        let err = FieldError::InvalidStep {
            name: "delta_x".into(),
            value: -0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("delta_x"), "missing step name in: {msg}");
        assert!(msg.contains("-0.5"), "missing value in: {msg}");
    }

    #[test]
    fn non_finite_sample_includes_coordinates() {
        let err = FieldError::NonFiniteSample {
            x: 1.5,
            y: -2.0,
            z: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("1.5"), "missing x in: {msg}");
        assert!(msg.contains("-2"), "missing y in: {msg}");
    }

    #[test]
    fn unknown_field_includes_name() {
        let msg = FieldError::UnknownField("vortex-street".into()).to_string();
        assert!(msg.contains("vortex-street"), "missing name in: {msg}");
    }

    #[test]
    fn io_error_includes_message() {
        let msg = FieldError::Io("permission denied".into()).to_string();
        assert!(msg.contains("permission denied"), "missing message in: {msg}");
    }

    #[test]
    fn invalid_gradient_and_color_include_message() {
        assert!(FieldError::InvalidGradient("one color".into())
            .to_string()
            .contains("one color"));
        assert!(FieldError::InvalidColor("bad hex".into())
            .to_string()
            .contains("bad hex"));
    }

    #[test]
    fn field_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldError>();
    }

    #[test]
    fn field_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FieldError>();
    }
}
