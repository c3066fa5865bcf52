//! RGBA color values used for highlight tinting.
//!
//! [`Color4`] is an immutable 4-byte value type. The resolver produces a
//! fresh color on every call -- colors are never cached across frames, which
//! is what lets time-dependent highlights (the fuse-timer gradient) animate
//! smoothly.

use serde::{Deserialize, Serialize};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color4 {
    /// Red channel, 0-255.
    pub r: u8,
    /// Green channel, 0-255.
    pub g: u8,
    /// Blue channel, 0-255.
    pub b: u8,
    /// Alpha channel, 0-255 (255 = opaque).
    pub a: u8,
}

impl Color4 {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    /// Create a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack into a `0xAARRGGBB` integer, the layout host glow passes expect
    /// for team colors.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from a `0xAARRGGBB` integer.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Linear interpolation toward `other`. `t` is clamped to `0.0..=1.0`;
    /// `t = 0.0` returns `self`, `t = 1.0` returns `other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let blended = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            blended.round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_round_trip() {
        let color = Color4::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color.to_argb(), 0x7812_3456);
        assert_eq!(Color4::from_argb(color.to_argb()), color);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let red = Color4::opaque(255, 0, 0);
        let green = Color4::opaque(0, 255, 0);
        assert_eq!(red.lerp(green, 0.0), red);
        assert_eq!(red.lerp(green, 1.0), green);
        let mid = red.lerp(green, 0.5);
        assert_eq!(mid.r, 128);
        assert_eq!(mid.g, 128);
        assert_eq!(mid.b, 0);
    }

    #[test]
    fn lerp_clamps_t() {
        let red = Color4::opaque(255, 0, 0);
        let green = Color4::opaque(0, 255, 0);
        assert_eq!(red.lerp(green, -3.0), red);
        assert_eq!(red.lerp(green, 42.0), green);
    }
}
