//! Colour-space helpers shared by the lighting, fog and grading code.
//!
//! Authored colours are stored in gamma (sRGB) space as `Vec4` RGBA and are
//! converted to linear space right before they are handed to shaders.

use glam::{Vec3, Vec4};

/// Converts one sRGB-encoded channel to linear space.
#[inline]
#[must_use]
pub fn gamma_to_linear(value: f32) -> f32 {
    if value <= 0.040_45 {
        value / 12.92
    } else if value < 1.0 {
        ((value + 0.055) / 1.055).powf(2.4)
    } else {
        value.powf(2.2)
    }
}

/// Converts an sRGB colour to linear space. Alpha is left untouched.
#[inline]
#[must_use]
pub fn linear_color(srgb: Vec4) -> Vec4 {
    Vec4::new(
        gamma_to_linear(srgb.x),
        gamma_to_linear(srgb.y),
        gamma_to_linear(srgb.z),
        srgb.w,
    )
}

// CIE xy chromaticity → LMS cone response (CAT02-style matrix).
fn cie_xy_to_lms(x: f32, y: f32) -> Vec3 {
    let big_y = 1.0;
    let big_x = big_y * x / y;
    let big_z = big_y * (1.0 - x - y) / y;

    let l = 0.7328 * big_x + 0.4296 * big_y - 0.1624 * big_z;
    let m = -0.7036 * big_x + 1.6975 * big_y + 0.0061 * big_z;
    let s = 0.0030 * big_x + 0.0136 * big_y + 0.9834 * big_z;
    Vec3::new(l, m, s)
}

/// White-balance coefficients in LMS space for a temperature/tint pair,
/// both in `[-100, 100]`.
///
/// The shader converts to LMS, multiplies by these coefficients and converts
/// back. `(0, 0)` yields (approximately) the identity.
#[must_use]
pub fn color_balance_to_lms(temperature: f32, tint: f32) -> Vec4 {
    let t1 = temperature / 65.0;
    let t2 = tint / 65.0;

    // Shift the D65 white point along the Planckian locus.
    let x = 0.31271 - t1 * if t1 < 0.0 { 0.1 } else { 0.05 };
    let standard_illuminant_y = 2.87 * x - 3.0 * x * x - 0.275_095_07;
    let y = standard_illuminant_y + t2 * 0.05;

    // D65 in LMS.
    let w1 = Vec3::new(0.949_237, 1.035_42, 1.087_28);
    let w2 = cie_xy_to_lms(x, y);

    (w1 / w2).extend(0.0)
}
