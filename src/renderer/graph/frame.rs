//! Per-Camera Frame Context
//!
//! [`CameraFrameContext`] is built once per camera per frame from three
//! inputs, in increasing precedence:
//!
//! 1. Global [`RendererSettings`]
//! 2. The camera's optional [`CameraOverrides`](crate::scene::CameraOverrides)
//! 3. Camera state (HDR, target texture, type) and the [`EnvironmentPolicy`]
//!
//! It is never shared between cameras and is dropped when the camera's
//! command buffer has been submitted.
//!
//! # Flags
//!
//! ```text
//! depth_only_prepass = (require_depth && msaa > 1) || scene view || preview
//! own_depth_target   = require_depth && !depth_only_prepass
//! depth_copy         = own_depth_target
//! color_copy         = require_opaque
//! own_color_target   = require_opaque || render_scale != 1 || post || own_depth_target
//! color_grading_lut  = post
//! ```

use crate::renderer::environment::EnvironmentPolicy;
use crate::renderer::graph::command::{ClearFlags, PerObjectData, PixelRect, RenderTargetId, TransientTextureDesc};
use crate::renderer::graph::rendering_utils::create_camera_target_descriptor;
use crate::renderer::settings::RendererSettings;
use crate::scene::{Camera, CameraClearFlags, CameraType};

const RENDER_SCALE_EPSILON: f32 = 0.01;

/// Feature flags of one camera frame.
///
/// All flags are cleared by [`reset`](Self::reset) once the frame's
/// transient resources have been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameFlags {
    pub needs_color_copy: bool,
    pub needs_depth_copy: bool,
    pub needs_own_color_target: bool,
    pub needs_own_depth_target: bool,
    pub needs_depth_only_prepass: bool,
    pub needs_color_grading_lut: bool,
}

impl FrameFlags {
    #[must_use]
    pub fn compute(
        camera_type: CameraType,
        require_depth: bool,
        require_opaque: bool,
        msaa_samples: u32,
        render_scale: f32,
        post_processing: bool,
    ) -> Self {
        let editor_view = matches!(camera_type, CameraType::SceneView | CameraType::Preview);
        let needs_depth_only_prepass = (require_depth && msaa_samples > 1) || editor_view;
        let needs_own_depth_target = require_depth && !needs_depth_only_prepass;

        Self {
            needs_color_copy: require_opaque,
            needs_depth_copy: needs_own_depth_target,
            needs_own_color_target: require_opaque
                || (render_scale - 1.0).abs() > RENDER_SCALE_EPSILON
                || post_processing
                || needs_own_depth_target,
            needs_own_depth_target,
            needs_depth_only_prepass,
            needs_color_grading_lut: post_processing,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    #[must_use]
    pub fn any(&self) -> bool {
        *self != Self::default()
    }
}

/// Everything the orchestrator needs to know about one camera this frame.
#[derive(Debug, Clone)]
pub struct CameraFrameContext {
    pub camera_name: String,
    pub camera_type: CameraType,
    /// The camera's real output.
    pub final_target: RenderTargetId,
    /// Descriptor of the camera's colour target at render scale.
    pub target_descriptor: TransientTextureDesc,
    pub pixel_rect: PixelRect,
    pub is_hdr: bool,
    pub msaa_samples: u32,
    pub render_scale: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// Already resolved against the near/far planes and the shadow override.
    pub max_shadow_distance: f32,

    pub require_depth_texture: bool,
    pub require_opaque_texture: bool,
    pub post_processing: bool,
    pub rendering_layer_mask: u32,

    pub clear_flags: ClearFlags,
    /// Linear background colour, transparent unless colour is cleared.
    pub background_color: wgpu::Color,
    pub draw_skybox: bool,

    pub use_lights_per_object: bool,
    pub use_dynamic_batching: bool,
    pub use_gpu_instancing: bool,
    pub per_object_data: PerObjectData,

    pub flags: FrameFlags,
}

impl CameraFrameContext {
    #[must_use]
    pub fn new(camera: &Camera, settings: &RendererSettings, env: &dyn EnvironmentPolicy) -> Self {
        let (post_requested, rendering_layer_mask, require_depth, require_opaque, render_shadows) =
            match &camera.overrides {
                Some(o) => (
                    o.post_processing,
                    o.rendering_layer_mask,
                    o.require_depth_texture,
                    o.require_opaque_texture,
                    o.render_shadows,
                ),
                None => (
                    false,
                    u32::MAX,
                    settings.require_depth_texture,
                    settings.require_opaque_texture,
                    true,
                ),
            };

        let post_processing = post_requested
            && settings.post_fx.is_some()
            && camera.camera_type <= CameraType::SceneView
            && env.supports_post_processing()
            && env.allow_post_processing(camera);

        let is_hdr = settings.support_hdr && camera.allow_hdr;
        let msaa_samples = match &camera.target_texture {
            Some(target) => target.msaa_samples.max(1),
            None if camera.allow_msaa => settings.msaa_samples(),
            None => 1,
        };
        let render_scale = if camera.camera_type == CameraType::Game {
            settings.render_scale
        } else {
            1.0
        };

        let target_descriptor = create_camera_target_descriptor(
            camera,
            render_scale,
            is_hdr,
            msaa_samples,
            settings.preserve_alpha,
        );

        let max_shadow_distance = if render_shadows {
            resolve_shadow_distance(settings.shadows.max_distance, camera.near_clip, camera.far_clip)
        } else {
            0.0
        };

        let mut per_object_data = PerObjectData::REFLECTION_PROBES
            | PerObjectData::LIGHT_PROBE
            | PerObjectData::LIGHTMAPS
            | PerObjectData::OCCLUSION_PROBE
            | PerObjectData::SHADOW_MASK;
        if settings.use_lights_per_object {
            per_object_data |= PerObjectData::LIGHT_DATA | PerObjectData::LIGHT_INDICES;
        }

        let flags = FrameFlags::compute(
            camera.camera_type,
            require_depth,
            require_opaque,
            msaa_samples,
            render_scale,
            post_processing,
        );

        let clear_flags = resolve_clear_flags(camera, post_processing, env);

        Self {
            camera_name: camera.name.clone(),
            camera_type: camera.camera_type,
            final_target: camera
                .target_texture
                .map_or(RenderTargetId::CameraTarget, |t| RenderTargetId::Texture(t.id)),
            target_descriptor,
            pixel_rect: camera.pixel_rect,
            is_hdr,
            msaa_samples,
            render_scale,
            near_clip: camera.near_clip,
            far_clip: camera.far_clip,
            max_shadow_distance,
            require_depth_texture: require_depth,
            require_opaque_texture: require_opaque,
            post_processing,
            rendering_layer_mask,
            clear_flags,
            background_color: if clear_flags.contains(ClearFlags::COLOR) {
                linear_clear_color(camera)
            } else {
                wgpu::Color::TRANSPARENT
            },
            draw_skybox: camera.clear_flags == CameraClearFlags::Skybox && camera.has_skybox,
            use_lights_per_object: settings.use_lights_per_object,
            use_dynamic_batching: settings.use_dynamic_batching,
            use_gpu_instancing: settings.use_gpu_instancing,
            per_object_data,
            flags,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.target_descriptor.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.target_descriptor.height
    }
}

/// `min(max_distance, far)`, or zero when that falls inside the near plane.
#[must_use]
pub fn resolve_shadow_distance(max_distance: f32, near_clip: f32, far_clip: f32) -> f32 {
    let distance = max_distance.min(far_clip);
    if distance < near_clip { 0.0 } else { distance }
}

/// Which attachments the first bind of the frame clears.
#[must_use]
pub fn resolve_clear_flags(
    camera: &Camera,
    post_processing: bool,
    env: &dyn EnvironmentPolicy,
) -> ClearFlags {
    if env.is_mobile_platform() || post_processing {
        return ClearFlags::ALL;
    }

    let mode = if env.force_color_clear() {
        CameraClearFlags::Color
    } else {
        camera.clear_flags
    };

    match mode {
        CameraClearFlags::Skybox if camera.has_skybox => ClearFlags::DEPTH,
        CameraClearFlags::Skybox | CameraClearFlags::Color => ClearFlags::ALL,
        CameraClearFlags::Depth => ClearFlags::DEPTH,
        CameraClearFlags::Nothing => ClearFlags::empty(),
    }
}

fn linear_clear_color(camera: &Camera) -> wgpu::Color {
    let c = crate::resources::color::linear_color(camera.background_color);
    wgpu::Color {
        r: f64::from(c.x),
        g: f64::from(c.y),
        b: f64::from(c.z),
        a: f64::from(c.w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::environment::{DefaultEnvironment, EditorEnvironment, MobileEnvironment};
    use crate::scene::CameraOverrides;

    #[test]
    fn msaa_depth_request_uses_prepass_instead_of_own_depth() {
        let flags = FrameFlags::compute(CameraType::Game, true, false, 4, 1.0, false);
        assert!(flags.needs_depth_only_prepass);
        assert!(!flags.needs_own_depth_target);
        assert!(!flags.needs_depth_copy);
        assert!(!flags.needs_own_color_target);
    }

    #[test]
    fn depth_copy_implies_own_color_target() {
        let flags = FrameFlags::compute(CameraType::Game, true, false, 1, 1.0, false);
        assert!(flags.needs_own_depth_target);
        assert!(flags.needs_depth_copy);
        assert!(flags.needs_own_color_target);
    }

    #[test]
    fn reset_clears_every_flag() {
        let mut flags = FrameFlags::compute(CameraType::SceneView, true, true, 1, 0.5, true);
        assert!(flags.any());
        flags.reset();
        assert!(!flags.any());
    }

    #[test]
    fn missing_override_disables_post_but_keeps_global_requirements() {
        let settings = RendererSettings::default();
        let camera = Camera::new("main", 640, 480);
        let ctx = CameraFrameContext::new(&camera, &settings, &DefaultEnvironment);
        assert!(!ctx.post_processing);
        assert!(ctx.require_depth_texture);
        assert!(ctx.require_opaque_texture);
        assert_eq!(ctx.rendering_layer_mask, u32::MAX);
    }

    #[test]
    fn override_replaces_globals() {
        let settings = RendererSettings::default();
        let camera = Camera::new("main", 640, 480).with_overrides(CameraOverrides {
            post_processing: true,
            rendering_layer_mask: 0b10,
            require_depth_texture: false,
            require_opaque_texture: false,
            render_shadows: false,
        });
        let ctx = CameraFrameContext::new(&camera, &settings, &DefaultEnvironment);
        assert!(ctx.post_processing);
        assert_eq!(ctx.rendering_layer_mask, 0b10);
        assert!(!ctx.require_depth_texture);
        assert_eq!(ctx.max_shadow_distance, 0.0);
        assert_eq!(ctx.clear_flags, ClearFlags::ALL);
    }

    #[test]
    fn reflection_cameras_never_post_process() {
        let settings = RendererSettings::default();
        let camera = Camera::new("reflection", 64, 64)
            .with_type(CameraType::Reflection)
            .with_overrides(CameraOverrides {
                post_processing: true,
                ..Default::default()
            });
        let ctx = CameraFrameContext::new(&camera, &settings, &DefaultEnvironment);
        assert!(!ctx.post_processing);
    }

    #[test]
    fn shadow_distance_is_bounded_by_clip_planes() {
        assert_eq!(resolve_shadow_distance(100.0, 0.3, 50.0), 50.0);
        assert_eq!(resolve_shadow_distance(0.1, 0.3, 50.0), 0.0);
        assert_eq!(resolve_shadow_distance(20.0, 0.3, 50.0), 20.0);
    }

    #[test]
    fn clear_policy_follows_camera_mode() {
        let env = DefaultEnvironment;
        let mut camera = Camera::new("c", 8, 8);
        assert_eq!(resolve_clear_flags(&camera, false, &env), ClearFlags::DEPTH);
        camera.has_skybox = false;
        assert_eq!(resolve_clear_flags(&camera, false, &env), ClearFlags::ALL);
        camera.clear_flags = CameraClearFlags::Depth;
        assert_eq!(resolve_clear_flags(&camera, false, &env), ClearFlags::DEPTH);
        camera.clear_flags = CameraClearFlags::Nothing;
        assert_eq!(resolve_clear_flags(&camera, false, &env), ClearFlags::empty());
        assert_eq!(
            resolve_clear_flags(&camera, false, &MobileEnvironment::default()),
            ClearFlags::ALL
        );
        assert_eq!(
            resolve_clear_flags(&camera, false, &EditorEnvironment::default()),
            ClearFlags::ALL
        );
    }
}
