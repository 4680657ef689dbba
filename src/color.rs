use std::ops::{ Add, Sub, Mul };

use crate::feq;

/// A color.
///
/// Represented with red-green-blue (RGB) values, each ranging from 0.0 to
/// 1.0 inclusive.
///
/// # Examples
///
/// Tint a color halfway towards another:
///
/// ```
/// # use portal_cone::color::Color;
/// let tinted = Color::white().blend(&Color::blue(), 0.5);
/// assert_eq!(tinted, Color::rgb(0.5, 0.5, 1.0));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise, accounting for possible floating
/// point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Creates a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Color {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f64 / 255.0;
        Color { r: channel(16), g: channel(8), b: channel(0) }
    }

    pub fn black() -> Color {
        Color { r: 0.0, g: 0.0, b: 0.0 }
    }

    pub fn white() -> Color {
        Color { r: 1.0, g: 1.0, b: 1.0 }
    }

    pub fn red() -> Color {
        Color { r: 1.0, g: 0.0, b: 0.0 }
    }

    pub fn green() -> Color {
        Color { r: 0.0, g: 1.0, b: 0.0 }
    }

    pub fn blue() -> Color {
        Color { r: 0.0, g: 0.0, b: 1.0 }
    }

    /// Mixes `other` over this color with opacity `alpha` (0.0 keeps this
    /// color, 1.0 replaces it).
    pub fn blend(&self, other: &Color, alpha: f64) -> Color {
        *self + (*other - *self) * alpha
    }

    /// Scales a channel to the 0-255 range used by image files.
    pub fn to_bytes(&self) -> [u8; 3] {
        let scale = |c: f64| (c * 255.0).clamp(0.0, 255.0).round() as u8;
        [scale(self.r), scale(self.g), scale(self.b)]
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

#[test]
fn hex_colors() {
    assert_eq!(Color::from_hex(0xff0000), Color::red());
    assert_eq!(Color::from_hex(0x000000), Color::black());
    assert_eq!(Color::from_hex(0x4466ff),
        Color::rgb(68.0 / 255.0, 102.0 / 255.0, 1.0));
}

#[test]
fn blend_endpoints() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1.blend(&c2, 0.0), c1);
    assert_eq!(c1.blend(&c2, 1.0), c2);
}

#[test]
fn bytes_are_clamped() {
    assert_eq!(Color::rgb(1.5, -0.2, 0.5).to_bytes(), [255, 0, 128]);
}
