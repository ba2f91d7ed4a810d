//! Per-cell colors.

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color, as stored in the data model.
///
/// Vertex color buffers carry the raw 0-255 channels as floats; the shaders
/// divide by 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the channels as unnormalized floats (0.0 to 255.0).
    #[must_use]
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            f32::from(self.r),
            f32::from(self.g),
            f32::from(self.b),
            f32::from(self.a),
        ]
    }

    /// Returns the channels scaled to `0.0..=1.0`, as used for uniforms.
    #[must_use]
    pub fn to_unit_array(self) -> [f32; 4] {
        self.to_f32_array().map(|c| c / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
