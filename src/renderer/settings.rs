//! Renderer Settings
//!
//! Global configuration of the render pipeline, shared by every camera.
//!
//! Per-camera [`CameraOverrides`](crate::scene::CameraOverrides) replace the
//! depth/opaque-texture requirements, layer mask, shadow toggle and
//! post-processing flag of individual cameras; everything else here applies
//! uniformly.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lumen::renderer::{RendererSettings, MsaaMode};
//!
//! let settings = RendererSettings {
//!     msaa: MsaaMode::X4,
//!     render_scale: 0.75,
//!     ..Default::default()
//! };
//!
//! // Or reload between frames from disk:
//! let settings = RendererSettings::from_json_file("pipeline.json")?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{RenderError, Result};
use crate::resources::fog::FogSettings;
use crate::resources::post_fx::PostEffectSettings;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Hardware multi-sample anti-aliasing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MsaaMode {
    #[default]
    Off,
    X2,
    X4,
    X8,
}

impl MsaaMode {
    #[inline]
    #[must_use]
    pub const fn samples(self) -> u32 {
        match self {
            Self::Off => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

/// Edge length of the colour-grading LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LutResolution {
    R16,
    #[default]
    R32,
    R64,
}

impl LutResolution {
    #[inline]
    #[must_use]
    pub const fn size(self) -> u32 {
        match self {
            Self::R16 => 16,
            Self::R32 => 32,
            Self::R64 => 64,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-settings
// ---------------------------------------------------------------------------

/// Configuration forwarded to the shadow renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// World-space distance beyond which nothing casts shadows.
    pub max_distance: f32,
    /// Fraction of `max_distance` over which shadows fade out.
    pub distance_fade: f32,
    pub directional_atlas_size: u32,
    pub other_atlas_size: u32,
    pub cascade_count: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            distance_fade: 0.1,
            directional_atlas_size: 1024,
            other_atlas_size: 1024,
            cascade_count: 4,
        }
    }
}

/// Capacities of the packed light arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightLimits {
    pub max_directional_lights: usize,
    pub max_other_lights: usize,
}

impl Default for LightLimits {
    fn default() -> Self {
        Self {
            max_directional_lights: 4,
            max_other_lights: 64,
        }
    }
}

// ---------------------------------------------------------------------------
// RendererSettings
// ---------------------------------------------------------------------------

/// Global pipeline configuration.
///
/// | Field                    | Default |
/// |--------------------------|---------|
/// | `use_dynamic_batching`   | `true`  |
/// | `use_gpu_instancing`     | `true`  |
/// | `use_lights_per_object`  | `true`  |
/// | `support_hdr`            | `true`  |
/// | `msaa`                   | `Off`   |
/// | `render_scale`           | `1.0`   |
/// | `require_depth_texture`  | `true`  |
/// | `require_opaque_texture` | `true`  |
/// | `color_lut_resolution`   | `R32`   |
/// | `post_fx`                | default |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub use_dynamic_batching: bool,
    pub use_gpu_instancing: bool,
    /// Build a per-object light index map and draw with per-object light data.
    pub use_lights_per_object: bool,

    pub support_hdr: bool,
    pub msaa: MsaaMode,
    /// Scale of the intermediate colour target, `0.25..=2.0`.
    pub render_scale: f32,
    /// Preserve framebuffer alpha; forces a 4-channel HDR format.
    pub preserve_alpha: bool,

    pub require_depth_texture: bool,
    pub require_opaque_texture: bool,

    pub shadows: ShadowSettings,
    pub lights: LightLimits,
    pub fog: FogSettings,

    pub color_lut_resolution: LutResolution,
    /// `None` disables post-processing for every camera.
    pub post_fx: Option<PostEffectSettings>,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            use_dynamic_batching: true,
            use_gpu_instancing: true,
            use_lights_per_object: true,
            support_hdr: true,
            msaa: MsaaMode::Off,
            render_scale: 1.0,
            preserve_alpha: false,
            require_depth_texture: true,
            require_opaque_texture: true,
            shadows: ShadowSettings::default(),
            lights: LightLimits::default(),
            fog: FogSettings::default(),
            color_lut_resolution: LutResolution::default(),
            post_fx: Some(PostEffectSettings::default()),
        }
    }
}

impl RendererSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading renderer settings from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges, including the nested post-effect settings.
    pub fn validate(&self) -> Result<()> {
        if !(0.25..=2.0).contains(&self.render_scale) {
            return Err(RenderError::InvalidSettings(format!(
                "render_scale must be within [0.25, 2.0], got {}",
                self.render_scale
            )));
        }
        if self.lights.max_directional_lights == 0 {
            return Err(RenderError::InvalidSettings(
                "at least one directional light slot is required".into(),
            ));
        }
        if self.shadows.max_distance < 0.0 {
            return Err(RenderError::InvalidSettings(
                "shadows.max_distance must be non-negative".into(),
            ));
        }
        if let Some(post_fx) = &self.post_fx {
            post_fx.validate()?;
        }
        Ok(())
    }

    /// Sets the render scale, clamped to the supported range.
    pub fn set_render_scale(&mut self, scale: f32) {
        self.render_scale = scale.clamp(0.25, 2.0);
    }

    #[inline]
    #[must_use]
    pub fn msaa_samples(&self) -> u32 {
        self.msaa.samples()
    }
}
