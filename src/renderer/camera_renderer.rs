//! Camera Frame Orchestrator
//!
//! Records one camera's frame into a [`CommandBuffer`] and submits it.
//!
//! # Frame Sequence
//!
//! ```text
//! CameraFrameContext::new ─► cull ──(no frustum)──► return
//!        │
//!        ▼
//! lighting + shadows ─► [depth prepass] ─► [grading LUT] ─► [own colour / depth]
//!        │
//!        ▼
//! bind + clear ─► opaque ─► skybox ─► [opaque / depth copies] ─► transparent
//!        │
//!        ▼
//! post stack  |  final blit (own colour, no post)  |  nothing (drew directly)
//!        │
//!        ▼
//! release (reverse order) ─► shadow cleanup ─► submit
//! ```
//!
//! Nothing is allocated before culling succeeds, so the early return needs
//! no cleanup.

use smallvec::SmallVec;

use crate::errors::report_invariant_violation;
use crate::renderer::backend::GraphicsBackend;
use crate::renderer::color_grading_lut::ColorGradingLut;
use crate::renderer::culling::{Culler, CullingParameters};
use crate::renderer::environment::EnvironmentPolicy;
use crate::renderer::graph::command::{
    ClearFlags, CommandBuffer, RenderTargetId, TransientTextureDesc, TransientTextureId,
};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::frame::CameraFrameContext;
use crate::renderer::graph::passes::{
    CopyPass, DepthPrepass, OpaquePass, PostFxStack, SkyboxPass, TransparentPass,
};
use crate::renderer::graph::rendering_utils::{
    DEPTH_FORMAT, final_blit_procedural, set_render_target,
};
use crate::renderer::lighting::Lighting;
use crate::renderer::settings::{RendererSettings, ShadowSettings};
use crate::renderer::shadows::ShadowRenderer;
use crate::scene::Camera;

pub const CAMERA_COLOR_TEXTURE: &str = "_CameraColorTexture";
pub const CAMERA_DEPTH_ATTACHMENT: &str = "_CameraDepthAttachment";

const BUFFER_NAME: &str = "Render Camera";

/// Frame-scoped transient handles, released in reverse allocation order.
type FrameAllocations = SmallVec<[TransientTextureId; 8]>;

/// External collaborators of a camera frame.
pub struct FrameServices<'a> {
    pub env: &'a dyn EnvironmentPolicy,
    pub culler: &'a mut dyn Culler,
    pub shadows: &'a mut dyn ShadowRenderer,
    pub backend: &'a mut dyn GraphicsBackend,
}

/// Per-pipeline camera renderer. Holds the light arrays reused across frames.
#[derive(Debug, Clone)]
pub struct CameraRenderer {
    lighting: Lighting,
}

impl CameraRenderer {
    #[must_use]
    pub fn new(settings: &RendererSettings) -> Self {
        Self {
            lighting: Lighting::new(settings.lights),
        }
    }

    #[inline]
    #[must_use]
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Records and submits one camera frame.
    ///
    /// Returns `false` when the camera was skipped because no culling
    /// frustum could be built for it.
    pub fn render(
        &mut self,
        camera: &Camera,
        settings: &RendererSettings,
        services: &mut FrameServices<'_>,
    ) -> bool {
        let mut frame = CameraFrameContext::new(camera, settings, services.env);

        let params = CullingParameters::new(frame.max_shadow_distance);
        let Some(mut geometry) = services.culler.try_cull(camera, &params) else {
            log::debug!("camera '{}' has no culling frustum, skipped", camera.name);
            return false;
        };

        let mut cmd = CommandBuffer::new(BUFFER_NAME);
        cmd.begin_sample(frame.camera_name.clone());

        // Lighting and shadows
        let shadow_settings = ShadowSettings {
            max_distance: frame.max_shadow_distance,
            ..settings.shadows.clone()
        };
        self.lighting.packer_mut().set_limits(settings.lights);
        self.lighting.setup(
            &mut cmd,
            &mut geometry,
            &shadow_settings,
            services.shadows,
            frame.use_lights_per_object,
            &settings.fog,
        );

        let mut allocations = FrameAllocations::new();

        if frame.flags.needs_depth_only_prepass {
            allocations.push(DepthPrepass::run(&mut cmd, &frame));
        }

        let mut lut = None;
        if frame.flags.needs_color_grading_lut
            && let Some(post_fx) = settings.post_fx.as_ref()
        {
            let baked = ColorGradingLut::build(&mut cmd, post_fx, settings.color_lut_resolution.size());
            allocations.push(baked.texture);
            lut = Some(baked);
        }

        let (color, depth) = Self::create_camera_targets(&mut cmd, &frame, &mut allocations);
        let color_target = color.map_or(frame.final_target, RenderTargetId::from);
        let depth_target = depth.map(RenderTargetId::from);

        set_render_target(
            &mut cmd,
            color_target,
            depth_target,
            frame.clear_flags,
            frame.background_color,
        );
        if color.is_none() {
            cmd.set_viewport(frame.pixel_rect);
        }

        OpaquePass::run(&mut cmd, &frame);
        SkyboxPass::run(&mut cmd, &frame);
        Self::copy_color_and_depth(&mut cmd, &frame, color_target, depth_target, &mut allocations);
        TransparentPass::run(&mut cmd, &frame);

        match color {
            Some(color) if frame.post_processing => {
                if let Some(post_fx) = settings.post_fx.as_ref() {
                    let mut ctx = PostFxContext::new(
                        &mut cmd,
                        post_fx,
                        &frame.target_descriptor,
                        frame.final_target,
                        frame.pixel_rect,
                        lut,
                    );
                    PostFxStack::render(&mut ctx, color);
                }
            }
            Some(color) => {
                final_blit_procedural(&mut cmd, color.into(), frame.final_target, frame.pixel_rect);
            }
            None => {}
        }

        // Cleanup
        while let Some(id) = allocations.pop() {
            cmd.release_temporary(id);
        }
        self.lighting.cleanup(&mut cmd, services.shadows);
        frame.flags.reset();
        cmd.end_sample(frame.camera_name.clone());

        if let Err(err) = cmd.check_balanced() {
            report_invariant_violation(&err);
        }
        services.backend.submit(cmd);
        true
    }

    fn create_camera_targets(
        cmd: &mut CommandBuffer,
        frame: &CameraFrameContext,
        allocations: &mut FrameAllocations,
    ) -> (Option<TransientTextureId>, Option<TransientTextureId>) {
        let own_depth = frame.flags.needs_own_depth_target;

        let color = frame.flags.needs_own_color_target.then(|| {
            let desc = TransientTextureDesc {
                depth_bits: if own_depth { 0 } else { 32 },
                filter: wgpu::FilterMode::Linear,
                label: CAMERA_COLOR_TEXTURE,
                ..frame.target_descriptor.clone()
            };
            let id = cmd.get_temporary(desc);
            allocations.push(id);
            id
        });

        let depth = own_depth.then(|| {
            let desc = TransientTextureDesc {
                format: DEPTH_FORMAT,
                msaa_samples: 1,
                depth_bits: 32,
                filter: wgpu::FilterMode::Nearest,
                label: CAMERA_DEPTH_ATTACHMENT,
                ..frame.target_descriptor.clone()
            };
            let id = cmd.get_temporary(desc);
            allocations.push(id);
            id
        });

        (color, depth)
    }

    fn copy_color_and_depth(
        cmd: &mut CommandBuffer,
        frame: &CameraFrameContext,
        color: RenderTargetId,
        depth: Option<RenderTargetId>,
        allocations: &mut FrameAllocations,
    ) {
        let copy_depth = frame.flags.needs_depth_copy && depth.is_some();
        if !frame.flags.needs_color_copy && !copy_depth {
            return;
        }

        if frame.flags.needs_color_copy {
            allocations.push(CopyPass::copy_color(cmd, color, &frame.target_descriptor));
        }
        if let Some(depth) = depth
            && frame.flags.needs_depth_copy
        {
            allocations.push(CopyPass::copy_depth(cmd, depth, &frame.target_descriptor));
        }

        set_render_target(cmd, color, depth, ClearFlags::empty(), wgpu::Color::TRANSPARENT);
    }
}
