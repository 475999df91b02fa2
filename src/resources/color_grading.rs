//! Colour-grading parameter blocks.
//!
//! Each block maps to one or more uniforms of the LUT bake shader. Colours
//! are authored in gamma space; conversion happens in the accessor methods
//! that produce shader values.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::resources::color::{color_balance_to_lms, linear_color};

const WHITE: Vec4 = Vec4::ONE;
const GRAY: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

// ============================================================================
// Colour Adjustments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjustments {
    /// Exposure in stops.
    pub post_exposure: f32,
    /// `-100..=100`.
    pub contrast: f32,
    /// HDR tint multiplied into the image.
    pub color_filter: Vec4,
    /// Degrees, `-180..=180`.
    pub hue_shift: f32,
    /// `-100..=100`.
    pub saturation: f32,
}

impl Default for ColorAdjustments {
    fn default() -> Self {
        Self {
            post_exposure: 0.0,
            contrast: 0.0,
            color_filter: WHITE,
            hue_shift: 0.0,
            saturation: 0.0,
        }
    }
}

impl ColorAdjustments {
    /// `_ColorAdjustments`: (exposure scale, contrast, hue shift, saturation).
    #[must_use]
    pub fn params(&self) -> Vec4 {
        Vec4::new(
            2f32.powf(self.post_exposure),
            self.contrast * 0.01 + 1.0,
            self.hue_shift / 360.0,
            self.saturation * 0.01 + 1.0,
        )
    }

    /// `_ColorFilter` in linear space.
    #[must_use]
    pub fn color_filter_linear(&self) -> Vec4 {
        linear_color(self.color_filter)
    }
}

// ============================================================================
// White Balance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalance {
    /// `-100..=100`, positive is warmer.
    pub temperature: f32,
    /// `-100..=100`, positive is more magenta.
    pub tint: f32,
}

impl WhiteBalance {
    /// `_WhiteBalance` LMS coefficients.
    #[must_use]
    pub fn lms_coefficients(&self) -> Vec4 {
        color_balance_to_lms(self.temperature, self.tint)
    }
}

// ============================================================================
// Split Toning
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitToning {
    pub shadows: Vec4,
    pub highlights: Vec4,
    /// `-100..=100`.
    pub balance: f32,
}

impl Default for SplitToning {
    fn default() -> Self {
        Self {
            shadows: GRAY,
            highlights: GRAY,
            balance: 0.0,
        }
    }
}

impl SplitToning {
    /// `_SplitToningShadows`, with the balance carried in alpha.
    #[must_use]
    pub fn shadows_with_balance(&self) -> Vec4 {
        self.shadows.truncate().extend(self.balance * 0.01)
    }
}

// ============================================================================
// Channel Mixer
// ============================================================================

/// Output channel rows of a 3×3 mixing matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMixer {
    pub red: Vec3,
    pub green: Vec3,
    pub blue: Vec3,
}

impl Default for ChannelMixer {
    fn default() -> Self {
        Self {
            red: Vec3::X,
            green: Vec3::Y,
            blue: Vec3::Z,
        }
    }
}

// ============================================================================
// Shadows / Midtones / Highlights
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowsMidtonesHighlights {
    pub shadows: Vec4,
    pub midtones: Vec4,
    pub highlights: Vec4,
    pub shadows_start: f32,
    pub shadows_end: f32,
    pub highlights_start: f32,
    pub highlights_end: f32,
}

impl Default for ShadowsMidtonesHighlights {
    fn default() -> Self {
        Self {
            shadows: WHITE,
            midtones: WHITE,
            highlights: WHITE,
            shadows_start: 0.0,
            shadows_end: 0.3,
            highlights_start: 0.55,
            highlights_end: 1.0,
        }
    }
}

impl ShadowsMidtonesHighlights {
    /// `_SMHRange`.
    #[must_use]
    pub fn range(&self) -> Vec4 {
        Vec4::new(
            self.shadows_start,
            self.shadows_end,
            self.highlights_start,
            self.highlights_end,
        )
    }
}
