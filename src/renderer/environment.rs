//! Host environment policy.
//!
//! Editor- and platform-specific decisions are injected at construction
//! instead of being compiled in, so the frame logic stays host-agnostic.

use crate::scene::{Camera, CameraType};

pub trait EnvironmentPolicy {
    /// Whether post-processing may run for this camera (for example the
    /// scene view's image-effects toggle).
    fn allow_post_processing(&self, _camera: &Camera) -> bool {
        true
    }

    /// Whether the graphics device can run the post stack at all.
    fn supports_post_processing(&self) -> bool {
        true
    }

    /// Mobile tiled GPUs always clear on the first bind.
    fn is_mobile_platform(&self) -> bool {
        false
    }

    /// Treat every camera as clearing to its background colour.
    fn force_color_clear(&self) -> bool {
        false
    }
}

/// Allows everything, forces nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvironment;

impl EnvironmentPolicy for DefaultEnvironment {}

/// Editor host: forces colour clears and honours the scene view's
/// image-effects toggle.
#[derive(Debug, Clone, Copy)]
pub struct EditorEnvironment {
    pub scene_view_image_effects: bool,
}

impl Default for EditorEnvironment {
    fn default() -> Self {
        Self {
            scene_view_image_effects: true,
        }
    }
}

impl EnvironmentPolicy for EditorEnvironment {
    fn allow_post_processing(&self, camera: &Camera) -> bool {
        camera.camera_type != CameraType::SceneView || self.scene_view_image_effects
    }

    fn force_color_clear(&self) -> bool {
        true
    }
}

/// Mobile host.
#[derive(Debug, Clone, Copy, Default)]
pub struct MobileEnvironment {
    /// Device lacks the features the post stack needs.
    pub low_end: bool,
}

impl EnvironmentPolicy for MobileEnvironment {
    fn supports_post_processing(&self) -> bool {
        !self.low_end
    }

    fn is_mobile_platform(&self) -> bool {
        true
    }
}
