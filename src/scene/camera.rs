//! Camera input for the frame orchestrator.
//!
//! A [`Camera`] is a plain description of one view: where it renders, how it
//! clears, and which per-camera overrides apply. The orchestrator turns it
//! into a [`CameraFrameContext`](crate::renderer::CameraFrameContext) at the
//! start of every frame.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::renderer::graph::command::PixelRect;

/// What kind of view the camera renders.
///
/// Ordering matters: post-processing is only available up to `SceneView`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum CameraType {
    #[default]
    Game,
    /// Editor scene-inspection view.
    SceneView,
    /// Editor asset preview.
    Preview,
    /// Planar-reflection or probe capture.
    Reflection,
}

/// How the camera's targets are cleared before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraClearFlags {
    /// Clear depth; colour is covered by the skybox (or cleared if there is none).
    #[default]
    Skybox,
    Color,
    Depth,
    /// Keep both attachments.
    Nothing,
}

/// An externally owned render texture the camera draws into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTexture {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub msaa_samples: u32,
    pub depth_bits: u32,
}

/// Per-camera overrides of the global pipeline settings.
///
/// When present, every field replaces the corresponding global value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOverrides {
    pub post_processing: bool,
    pub rendering_layer_mask: u32,
    pub require_depth_texture: bool,
    pub require_opaque_texture: bool,
    pub render_shadows: bool,
}

impl Default for CameraOverrides {
    fn default() -> Self {
        Self {
            post_processing: false,
            rendering_layer_mask: u32::MAX,
            require_depth_texture: false,
            require_opaque_texture: false,
            render_shadows: true,
        }
    }
}

/// One camera to render this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub name: String,
    pub camera_type: CameraType,
    /// Viewport in target pixels.
    pub pixel_rect: PixelRect,
    pub target_texture: Option<TargetTexture>,
    pub clear_flags: CameraClearFlags,
    /// Background colour in gamma space.
    pub background_color: Vec4,
    pub allow_hdr: bool,
    pub allow_msaa: bool,
    pub near_clip: f32,
    pub far_clip: f32,
    /// A skybox material is assigned to the scene.
    pub has_skybox: bool,
    pub overrides: Option<CameraOverrides>,
}

impl Camera {
    /// A game camera covering a `width × height` backbuffer.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            camera_type: CameraType::Game,
            pixel_rect: PixelRect::new(0.0, 0.0, width as f32, height as f32),
            target_texture: None,
            clear_flags: CameraClearFlags::Skybox,
            background_color: Vec4::new(0.192_157, 0.301_961, 0.474_51, 0.0),
            allow_hdr: true,
            allow_msaa: true,
            near_clip: 0.3,
            far_clip: 1000.0,
            has_skybox: true,
            overrides: None,
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: CameraOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    #[must_use]
    pub fn with_type(mut self, camera_type: CameraType) -> Self {
        self.camera_type = camera_type;
        self
    }

    #[must_use]
    pub fn with_target_texture(mut self, target: TargetTexture) -> Self {
        self.pixel_rect = PixelRect::new(0.0, 0.0, target.width as f32, target.height as f32);
        self.target_texture = Some(target);
        self
    }

    /// Width of the viewport in whole pixels.
    #[inline]
    #[must_use]
    pub fn pixel_width(&self) -> u32 {
        self.pixel_rect.width.max(0.0) as u32
    }

    #[inline]
    #[must_use]
    pub fn pixel_height(&self) -> u32 {
        self.pixel_rect.height.max(0.0) as u32
    }

    #[inline]
    #[must_use]
    pub fn is_scene_view(&self) -> bool {
        self.camera_type == CameraType::SceneView
    }

    #[inline]
    #[must_use]
    pub fn is_preview(&self) -> bool {
        self.camera_type == CameraType::Preview
    }
}
