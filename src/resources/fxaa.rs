//! FXAA (Fast Approximate Anti-Aliasing) Configuration
//!
//! FXAA runs last in the post stack and is the only stage that writes the
//! camera's real target. With [`LuminanceMode::None`] the stage is skipped and
//! a plain copy presents the image instead.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Where FXAA reads luma from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LuminanceMode {
    /// FXAA disabled.
    None,
    /// Luma is computed from the colour in the shader.
    #[default]
    Calculate,
}

impl LuminanceMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Calculate => "Calculate",
        }
    }
}

/// FXAA post-processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxaaSettings {
    pub luminance_source: LuminanceMode,
    /// Absolute contrast below which edges are ignored, `0.0312..=0.0833`.
    pub contrast_threshold: f32,
    /// Contrast relative to local maximum luma, `0.063..=0.333`.
    pub relative_threshold: f32,
    /// Sub-pixel blend factor, `0..=1`.
    pub subpixel_blending: f32,
}

impl Default for FxaaSettings {
    fn default() -> Self {
        Self {
            luminance_source: LuminanceMode::Calculate,
            contrast_threshold: 0.0312,
            relative_threshold: 0.063,
            subpixel_blending: 1.0,
        }
    }
}

impl FxaaSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.luminance_source != LuminanceMode::None
    }

    pub fn set_contrast_threshold(&mut self, value: f32) {
        self.contrast_threshold = value.clamp(0.0312, 0.0833);
    }

    pub fn set_relative_threshold(&mut self, value: f32) {
        self.relative_threshold = value.clamp(0.063, 0.333);
    }

    pub fn set_subpixel_blending(&mut self, value: f32) {
        self.subpixel_blending = value.clamp(0.0, 1.0);
    }

    /// `_ContrastThreshold` uniform.
    #[inline]
    #[must_use]
    pub fn contrast_threshold_vector(&self) -> Vec4 {
        Vec4::new(
            self.contrast_threshold,
            self.relative_threshold,
            self.subpixel_blending,
            0.0,
        )
    }
}
