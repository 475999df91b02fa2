//! Tone Mapping & Vignette Configuration
//!
//! Tone mapping is baked into the colour-grading LUT: the LUT pass index is
//! `ColorGrading + mode`, so the enum order below matches the shader's pass
//! order. Vignette is applied by the uber composite.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::renderer::graph::command::PostFxPass;

/// Tone mapping operator applied while baking the grading LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToneMappingMode {
    /// Grading only, values are clamped to `[0, 1]`.
    None,
    /// ACES filmic curve.
    #[default]
    Aces,
    /// Neutral curve, keeps hue and saturation closer to the input.
    Neutral,
}

impl ToneMappingMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Aces => "ACES",
            Self::Neutral => "Neutral",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [ToneMappingMode] {
        &[Self::None, Self::Aces, Self::Neutral]
    }

    /// LUT bake pass for this operator.
    #[must_use]
    pub const fn lut_pass(self) -> PostFxPass {
        match self {
            Self::None => PostFxPass::ColorGrading,
            Self::Aces => PostFxPass::ColorGradingAces,
            Self::Neutral => PostFxPass::ColorGradingNeutral,
        }
    }
}

pub const VIGNETTE_KEYWORD: &str = "_VIGNETTE";

/// Screen-edge darkening applied in the uber composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteSettings {
    pub color: Vec3,
    /// Offset from the screen centre in UV units.
    pub center: Vec2,
    /// `0..=1`; zero disables the effect.
    pub intensity: f32,
    /// `0.01..=1`.
    pub smoothness: f32,
    /// Keep the vignette circular regardless of aspect ratio.
    pub rounded: bool,
}

impl Default for VignetteSettings {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            center: Vec2::ZERO,
            intensity: 0.0,
            smoothness: 0.2,
            rounded: false,
        }
    }
}

impl VignetteSettings {
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.intensity > 0.0
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn set_smoothness(&mut self, smoothness: f32) {
        self.smoothness = smoothness.clamp(0.01, 1.0);
    }

    /// `_VignetteParams1`: colour and the horizontal rounding factor.
    #[must_use]
    pub fn params1(&self, aspect_ratio: f32) -> Vec4 {
        let rounding = if self.rounded { aspect_ratio } else { 1.0 };
        self.color.extend(rounding)
    }

    /// `_VignetteParams2`: centre, scaled intensity and scaled smoothness.
    #[must_use]
    pub fn params2(&self) -> Vec4 {
        Vec4::new(
            self.center.x,
            self.center.y,
            self.intensity * 3.0,
            self.smoothness * 5.0,
        )
    }
}
