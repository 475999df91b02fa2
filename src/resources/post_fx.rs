//! Post-Effect Settings Snapshot
//!
//! [`PostEffectSettings`] gathers every post-processing block into one
//! serialisable value. The stack reads it immutably for the duration of a
//! frame; reloading (for example from a JSON file) happens between frames.
//!
//! ```rust,ignore
//! let mut settings = PostEffectSettings::from_json_str(r#"{
//!     "bloom": { "intensity": 1.2, "mode": "Additive" },
//!     "tone_mapping": "Neutral"
//! }"#)?;
//! settings.fxaa.luminance_source = LuminanceMode::None;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, Result};
use crate::resources::bloom::BloomSettings;
use crate::resources::color_grading::{
    ChannelMixer, ColorAdjustments, ShadowsMidtonesHighlights, SplitToning, WhiteBalance,
};
use crate::resources::depth_of_field::DepthOfFieldSettings;
use crate::resources::fxaa::FxaaSettings;
use crate::resources::tone_mapping::{ToneMappingMode, VignetteSettings};

/// Iterated Kawase blur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurSettings {
    /// `0..=16`; zero disables the stage.
    pub max_iterations: u32,
    /// Base radius, `0..=5`. Iteration `i` uses `radius + i`.
    pub radius: f32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            radius: 0.5,
        }
    }
}

impl BlurSettings {
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_iterations > 0
    }

    #[inline]
    #[must_use]
    pub fn radius_for_iteration(&self, iteration: u32) -> f32 {
        self.radius + iteration as f32
    }
}

/// Complete post-processing configuration for one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostEffectSettings {
    /// Debug visualisation of scene depth as stripes.
    pub depth_stripes: bool,
    pub blur: BlurSettings,
    pub bloom: BloomSettings,
    pub color_adjustments: ColorAdjustments,
    pub white_balance: WhiteBalance,
    pub split_toning: SplitToning,
    pub channel_mixer: ChannelMixer,
    pub shadows_midtones_highlights: ShadowsMidtonesHighlights,
    pub tone_mapping: ToneMappingMode,
    pub vignette: VignetteSettings,
    pub fxaa: FxaaSettings,
    pub depth_of_field: DepthOfFieldSettings,
}

impl PostEffectSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings with every optional stage switched off. Only the uber
    /// composite and the final copy remain.
    #[must_use]
    pub fn minimal() -> Self {
        let mut settings = Self::default();
        settings.blur.max_iterations = 0;
        settings.bloom.intensity = 0.0;
        settings.depth_of_field.enabled = false;
        settings.fxaa.luminance_source = crate::resources::fxaa::LuminanceMode::None;
        settings
    }

    /// Parses and validates settings from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading post-effect settings from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Rejects values that would make a stage divide by zero or overflow its
    /// fixed-size resources.
    pub fn validate(&self) -> Result<()> {
        if self.blur.max_iterations > 16 {
            return Err(RenderError::InvalidSettings(format!(
                "blur.max_iterations must be <= 16, got {}",
                self.blur.max_iterations
            )));
        }
        if self.bloom.diffusion > 5 {
            return Err(RenderError::InvalidSettings(format!(
                "bloom.diffusion must be <= 5, got {}",
                self.bloom.diffusion
            )));
        }
        if !(self.bloom.threshold >= 0.0 && self.bloom.intensity >= 0.0) {
            return Err(RenderError::InvalidSettings(
                "bloom threshold and intensity must be non-negative".into(),
            ));
        }
        if self.depth_of_field.enabled && self.depth_of_field.aperture <= 0.0 {
            return Err(RenderError::InvalidSettings(
                "depth_of_field.aperture must be positive".into(),
            ));
        }
        Ok(())
    }
}
