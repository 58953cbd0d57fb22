//! Shared value types

use crate::error::GasketError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A principal rotation axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// RGBA color, channels in [0, 1].
///
/// Serialized as a `#rrggbb` hex string; alpha is always written as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `#rrggbb` (leading `#` optional). Alpha is set to 1.0.
    pub fn from_hex(hex: &str) -> Result<Self, GasketError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(GasketError::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32, GasketError> {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| GasketError::InvalidColor(hex.to_string()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as lowercase `#rrggbb`, dropping alpha
    pub fn to_hex(&self) -> String {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<String> for Color {
    type Error = GasketError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
