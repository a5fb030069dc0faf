//! Conversions between hex text, 8-bit RGB triples, and HSL.
//!
//! # Design
//! - `Color` is the canonical 24-bit value; hex text and HSL are views of it.
//! - Hex parsing is strict: exactly six hexadecimal digits, no prefix.
//! - Hue is a fraction of the hue circle in `[0, 1)`, not degrees.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ColorError, ColorResult};

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Hue, saturation, and lightness components of a color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    /// Fraction of the hue circle. `[0.0, 1.0)`
    pub hue: f64,
    /// Saturation. `[0.0, 1.0]`
    pub saturation: f64,
    /// Lightness. `[0.0, 1.0]`
    pub lightness: f64,
}

impl Hsl {
    /// Construct an [`Hsl`] triple from components.
    #[must_use]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

/// Linear interpolation of two colors.
pub trait Mix: Sized {
    /// Interpolate between this and another color, by factor.
    /// A factor of `0.0` yields `self`, `1.0` yields `other`.
    #[must_use]
    fn mix(&self, other: &Self, factor: f64) -> Self;
}

impl Color {
    /// Pure white.
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct a color from 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Construct a color from the low 24 bits of `value`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Pack the channels into a 24-bit integer.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse exactly six hexadecimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidColorFormat`] for any other input.
    pub fn from_hex(text: &str) -> ColorResult<Self> {
        hex_to_color(text)
    }

    /// Parse hand-written input: surrounding whitespace and one leading `#`
    /// are dropped before the strict six-digit parse.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidColorFormat`] when the remaining text is
    /// not six hexadecimal digits.
    pub fn from_hex_input(text: &str) -> ColorResult<Self> {
        let trimmed = text.trim();
        hex_to_color(trimmed.strip_prefix('#').unwrap_or(trimmed))
    }

    /// Uppercase six-digit hex form.
    #[must_use]
    pub fn to_hex(self) -> String {
        color_to_hex(self)
    }

    /// Convert to HSL.
    #[must_use]
    pub fn to_hsl(self) -> Hsl {
        color_to_hsl(self)
    }

    /// Convert from HSL.
    #[must_use]
    pub fn from_hsl(hsl: Hsl) -> Self {
        hsl_to_color(hsl)
    }

    /// Construct a color from channels expressed in the unit interval.
    /// Out-of-range inputs are clamped.
    #[must_use]
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
    }

    /// Channels expressed in the unit interval.
    #[must_use]
    pub fn to_unit_rgb(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// HSL lightness of this color.
    #[must_use]
    pub fn lightness(self) -> f64 {
        self.to_hsl().lightness
    }
}

/// Parse a six-digit hex string into a [`Color`].
///
/// # Errors
///
/// Returns [`ColorError::InvalidColorFormat`] when `text` is not exactly six
/// ASCII hexadecimal digits.
pub fn hex_to_color(text: &str) -> ColorResult<Color> {
    if text.len() != 6 {
        return Err(ColorError::InvalidColorFormat {
            value: text.to_string(),
            reason: "expected exactly 6 hex digits",
        });
    }
    if !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidColorFormat {
            value: text.to_string(),
            reason: "non-hexadecimal character",
        });
    }
    u32::from_str_radix(text, 16)
        .map(Color::from_u32)
        .map_err(|_| ColorError::InvalidColorFormat {
            value: text.to_string(),
            reason: "non-hexadecimal character",
        })
}

/// Render a [`Color`] as six uppercase hex digits.
#[must_use]
pub fn color_to_hex(color: Color) -> String {
    format!("{:06X}", color.to_u32())
}

/// Standard RGB to HSL conversion. Achromatic colors have hue and saturation `0`.
#[allow(clippy::float_cmp, clippy::many_single_char_names)]
#[must_use]
pub fn color_to_hsl(color: Color) -> Hsl {
    let [r, g, b] = color.to_unit_rgb();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(h / 6.0, s, l)
}

/// Standard HSL to RGB conversion. Zero saturation yields a gray of `round(l * 255)`.
#[allow(clippy::float_cmp)]
#[must_use]
pub fn hsl_to_color(hsl: Hsl) -> Color {
    let Hsl {
        hue,
        saturation,
        lightness,
    } = hsl;

    if saturation == 0.0 {
        let channel = unit_to_channel(lightness);
        return Color::new(channel, channel, channel);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    Color::from_unit_rgb(
        hue_to_channel(p, q, hue + 1.0 / 3.0),
        hue_to_channel(p, q, hue),
        hue_to_channel(p, q, hue - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, factor: f64) -> u8 {
    (f64::from(from) * (1.0 - factor) + f64::from(to) * factor)
        .round()
        .clamp(0.0, 255.0) as u8
}

impl Mix for Color {
    #[inline]
    fn mix(&self, other: &Self, factor: f64) -> Self {
        Self {
            r: lerp_channel(self.r, other.r, factor),
            g: lerp_channel(self.g, other.g, factor),
            b: lerp_channel(self.b, other.b, factor),
        }
    }
}

impl Display for Color {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:06X}", self.to_u32())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_color(s)
    }
}

impl TryFrom<&str> for Color {
    type Error = ColorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        hex_to_color(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex_to_color(&text).map_err(|_| de::Error::custom(format!("invalid hex color '{text}'")))
    }
}
