//! sRGB color type used by gradients, glyphs and rasterized images.
//!
//! Components are `f64` in [0, 1]. Interpolation happens directly on the
//! gamma-encoded components, which is what the color gradient contract asks
//! for (piecewise-linear RGB between stops).

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Builds a color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Srgb {
        Srgb {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `FieldError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, FieldError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FieldError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| FieldError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| FieldError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| FieldError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Srgb::from_rgb8(r, g, b))
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels with clamping and rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Component-wise linear interpolation; `t = 0` gives `self`, `t = 1` gives `other`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Relative luminance weights (Rec. 709) applied to the encoded components.
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Parses a list of hex strings into colors, failing on the first bad entry.
pub fn parse_hex_list<S: AsRef<str>>(hexes: &[S]) -> Result<Vec<Srgb>, FieldError> {
    hexes.iter().map(|h| Srgb::from_hex(h.as_ref())).collect()
}

// -- Named colors used by the default palettes --

/// Dark teal blue (`#1C758A`).
pub fn blue_e() -> Srgb {
    Srgb::from_rgb8(0x1c, 0x75, 0x8a)
}

/// Sky blue (`#58C4DD`).
pub fn blue() -> Srgb {
    Srgb::from_rgb8(0x58, 0xc4, 0xdd)
}

/// Soft green (`#83C167`).
pub fn green() -> Srgb {
    Srgb::from_rgb8(0x83, 0xc1, 0x67)
}

/// Pure yellow (`#FFFF00`).
pub fn yellow() -> Srgb {
    Srgb::from_rgb8(0xff, 0xff, 0x00)
}

/// Coral red (`#FC6255`).
pub fn red() -> Srgb {
    Srgb::from_rgb8(0xfc, 0x62, 0x55)
}

/// Palette used for magnitude coloring of scalar fields, streamlines and glyphs.
pub fn default_scalar_field_colors() -> Vec<Srgb> {
    vec![blue_e(), green(), yellow(), red()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    // -- Hex parsing --

    #[test]
    fn from_hex_parses_red_with_hash() {
        let c = Srgb::from_hex("#ff0000").unwrap();
        assert!(approx_eq(c.r, 1.0) && approx_eq(c.g, 0.0) && approx_eq(c.b, 0.0));
    }

    #[test]
    fn from_hex_parses_without_hash_and_is_case_insensitive() {
        let lower = Srgb::from_hex("fc6255").unwrap();
        let upper = Srgb::from_hex("#FC6255").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, red());
    }

    #[test]
    fn from_hex_returns_error_for_invalid_hex() {
        assert!(Srgb::from_hex("#zzzzzz").is_err());
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn from_hex_rejects_sign_characters() {
        for bad in ["#+f+f+f", "+f+f+f", "#-1-1-1", "#00+f00"] {
            assert!(
                matches!(Srgb::from_hex(bad), Err(FieldError::InvalidColor(_))),
                "{bad} was accepted"
            );
        }
    }

    #[test]
    fn to_hex_round_trips_named_colors() {
        for c in default_scalar_field_colors() {
            assert_eq!(Srgb::from_hex(&c.to_hex()).unwrap(), c);
        }
        assert_eq!(blue_e().to_hex(), "#1c758a");
    }

    #[test]
    fn to_rgb8_clamps_out_of_range() {
        let c = Srgb {
            r: 1.5,
            g: -0.2,
            b: 0.5,
        };
        assert_eq!(c.to_rgb8(), [255, 0, 128]);
    }

    // -- Interpolation --

    #[test]
    fn lerp_endpoints_return_inputs() {
        let a = blue();
        let b = red();
        assert_eq!(a.lerp(b, 0.0), a);
        let end = a.lerp(b, 1.0);
        assert!(approx_eq(end.r, b.r) && approx_eq(end.g, b.g) && approx_eq(end.b, b.b));
    }

    #[test]
    fn lerp_midpoint_black_white_is_gray() {
        let mid = Srgb::BLACK.lerp(Srgb::WHITE, 0.5);
        assert!(approx_eq(mid.r, 0.5) && approx_eq(mid.g, 0.5) && approx_eq(mid.b, 0.5));
    }

    #[test]
    fn luminance_of_white_is_one_and_black_is_zero() {
        assert!(approx_eq(Srgb::WHITE.luminance(), 1.0));
        assert!(approx_eq(Srgb::BLACK.luminance(), 0.0));
    }

    // -- Serde --

    #[test]
    fn srgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&yellow()).unwrap();
        assert_eq!(json, "\"#ffff00\"");
    }

    #[test]
    fn srgb_deserialize_rejects_invalid_hex() {
        assert!(serde_json::from_str::<Srgb>("\"#12\"").is_err());
    }

    #[test]
    fn parse_hex_list_fails_on_first_bad_entry() {
        assert_eq!(parse_hex_list(&["#000000", "#ffffff"]).unwrap().len(), 2);
        assert!(parse_hex_list(&["#000000", "nope"]).is_err());
    }
}
