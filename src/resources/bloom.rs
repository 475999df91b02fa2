//! Bloom Post-Processing Configuration
//!
//! Pure data for the threshold + mip-pyramid bloom stage. The pass itself
//! lives in [`crate::renderer::graph::passes::bloom`].
//!
//! # Pyramid
//!
//! ```text
//! source ──prefilter──► down[0] ──H──► up[1] ──V──► down[1] ──H──► ... down[n-1]
//!                                                                        │
//!  _BloomTexture ◄── up[0] ◄──combine── up[1] ◄── ... ◄──combine─────────┘
//! ```
//!
//! The pyramid starts at half the camera resolution. Its depth is derived from
//! that size and [`BloomSettings::diffusion`] by [`bloom_mip_count`].

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::renderer::graph::command::PostFxPass;
use crate::resources::color::gamma_to_linear;

/// Hard upper bound on the number of pyramid levels.
pub const MAX_BLOOM_PYRAMID_LEVELS: u32 = 16;

/// How each upsampled level is combined with the level above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BloomMode {
    /// Energy-conserving lerp between levels weighted by `scatter`.
    #[default]
    Scattering,
    /// Plain additive accumulation.
    Additive,
}

/// Bloom configuration.
///
/// Bloom is enabled whenever `intensity > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Levels removed from the bottom of the pyramid, `0..=5`.
    /// Larger values give a tighter glow.
    pub diffusion: u32,
    /// Brightness threshold in gamma space.
    pub threshold: f32,
    /// Fraction of the threshold used as a soft knee, `0..=1`.
    pub threshold_knee: f32,
    pub intensity: f32,
    pub mode: BloomMode,
    /// Scatter weight for [`BloomMode::Scattering`], `0.05..=0.95`.
    pub scatter: f32,
    /// Upper bound on pyramid depth; never above [`MAX_BLOOM_PYRAMID_LEVELS`].
    pub max_pyramid_levels: u32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            diffusion: 3,
            threshold: 0.5,
            threshold_knee: 0.5,
            intensity: 0.0,
            mode: BloomMode::Scattering,
            scatter: 0.7,
            max_pyramid_levels: MAX_BLOOM_PYRAMID_LEVELS,
        }
    }
}

/// Parameters of the upsample combine loop and the uber composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomCombine {
    pub pass: PostFxPass,
    /// `_BloomIntensity` while combining pyramid levels.
    pub combine_intensity: f32,
    /// `_BloomIntensity` on the uber material.
    pub final_intensity: f32,
    /// Uber material keyword selecting the composite variant.
    pub keyword: &'static str,
}

impl BloomSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.intensity > 0.0
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    pub fn set_diffusion(&mut self, diffusion: u32) {
        self.diffusion = diffusion.min(5);
    }

    pub fn set_threshold_knee(&mut self, knee: f32) {
        self.threshold_knee = knee.clamp(0.0, 1.0);
    }

    pub fn set_scatter(&mut self, scatter: f32) {
        self.scatter = scatter.clamp(0.05, 0.95);
    }

    /// The `_BloomThreshold` vector consumed by the prefilter shader.
    #[inline]
    #[must_use]
    pub fn threshold_vector(&self) -> Vec4 {
        soft_knee_threshold(gamma_to_linear(self.threshold), self.threshold_knee)
    }

    /// Combine pass and intensities for the configured mode.
    #[must_use]
    pub fn combine(&self) -> BloomCombine {
        match self.mode {
            BloomMode::Scattering => BloomCombine {
                pass: PostFxPass::BloomScatter,
                combine_intensity: self.scatter,
                final_intensity: self.intensity.min(0.95),
                keyword: BLOOM_SCATTER_KEYWORD,
            },
            BloomMode::Additive => BloomCombine {
                pass: PostFxPass::BloomAdd,
                combine_intensity: 1.0,
                final_intensity: self.intensity,
                keyword: BLOOM_ADD_KEYWORD,
            },
        }
    }
}

pub const BLOOM_ADD_KEYWORD: &str = "_BLOOM_ADD";
pub const BLOOM_SCATTER_KEYWORD: &str = "_BLOOM_SCATTER";

/// Soft-knee threshold vector for a linear-space threshold `t` and knee
/// fraction `knee`.
///
/// With `k = t·knee` the result is `(t, k − t, 2k, 0.25 / (k + 1e-5))`. The
/// shader evaluates `clamp(b − t + k, 0, 2k)² · w` around the cut-off instead
/// of a hard step.
#[must_use]
pub fn soft_knee_threshold(threshold: f32, knee: f32) -> Vec4 {
    let k = threshold * knee;
    Vec4::new(threshold, k - threshold, 2.0 * k, 0.25 / (k + 1e-5))
}

/// Number of pyramid levels for a `width × height` base.
///
/// `clamp(floor(log2(max(width, height)) − 1) − diffusion, 1, max_levels)`.
#[must_use]
pub fn bloom_mip_count(width: u32, height: u32, diffusion: u32, max_levels: u32) -> u32 {
    let max_size = width.max(height).max(1);
    let iterations = ((max_size as f32).log2() - 1.0).floor() as i64;
    let max_levels = i64::from(max_levels.clamp(1, MAX_BLOOM_PYRAMID_LEVELS));
    (iterations - i64::from(diffusion)).clamp(1, max_levels) as u32
}
