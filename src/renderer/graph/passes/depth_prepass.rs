//! Depth-Only Pre Pass
//!
//! Renders opaque geometry with the `DepthOnly` shader tag into a dedicated
//! single-sample `_CameraDepthTexture` before the main pass. Used when the
//! camera's depth cannot simply be copied afterwards: multi-sampled targets
//! and editor views.
//!
//! # Data Flow
//! ```text
//! visible opaque renderers ─► DepthPrepass ─► _CameraDepthTexture (global)
//! ```

use crate::renderer::graph::command::{
    ClearFlags, CommandBuffer, FilteringSettings, LoadAction, PerObjectData, RenderQueueRange,
    RenderTargetId, ShaderTag, SortingCriteria, StoreAction, TransientTextureDesc,
    TransientTextureId,
};
use crate::renderer::graph::frame::CameraFrameContext;
use crate::renderer::graph::rendering_utils::{DEPTH_FORMAT, create_drawing_settings};

pub const CAMERA_DEPTH_TEXTURE: &str = "_CameraDepthTexture";

pub struct DepthPrepass;

impl DepthPrepass {
    pub const NAME: &'static str = "DepthOnly";

    /// Descriptor of the pre-pass depth target.
    #[must_use]
    pub fn descriptor(frame: &CameraFrameContext) -> TransientTextureDesc {
        TransientTextureDesc {
            format: DEPTH_FORMAT,
            msaa_samples: 1,
            depth_bits: 32,
            filter: wgpu::FilterMode::Nearest,
            label: CAMERA_DEPTH_TEXTURE,
            ..frame.target_descriptor.clone()
        }
    }

    /// Allocates the depth texture and draws into it. The caller owns the
    /// returned handle.
    pub fn run(cmd: &mut CommandBuffer, frame: &CameraFrameContext) -> TransientTextureId {
        let depth = cmd.get_temporary(Self::descriptor(frame));
        let target = RenderTargetId::Transient(depth);

        cmd.set_render_target(
            target,
            LoadAction::DontCare,
            StoreAction::Store,
            None,
            ClearFlags::DEPTH,
            wgpu::Color::TRANSPARENT,
        );

        cmd.begin_sample(Self::NAME);
        let drawing = create_drawing_settings(
            ShaderTag::DEPTH_ONLY,
            SortingCriteria::CommonOpaque,
            PerObjectData::empty(),
            frame.use_dynamic_batching,
            frame.use_gpu_instancing,
        );
        cmd.draw_renderers(
            drawing,
            FilteringSettings {
                queue_range: RenderQueueRange::Opaque,
                rendering_layer_mask: frame.rendering_layer_mask,
            },
        );
        cmd.end_sample(Self::NAME);

        cmd.set_global_texture(CAMERA_DEPTH_TEXTURE, target);
        depth
    }
}
