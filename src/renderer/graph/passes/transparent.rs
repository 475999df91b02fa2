//! Transparent Geometry Pass
//!
//! Same tags and per-object data as [`OpaquePass`], back-to-front over the
//! transparent queue range. Runs after the opaque copies so transparent
//! shaders may sample `_CameraOpaqueTexture` / `_CameraDepthTexture`.

use crate::renderer::graph::command::{
    CommandBuffer, FilteringSettings, RenderQueueRange, SortingCriteria,
};
use crate::renderer::graph::frame::CameraFrameContext;
use crate::renderer::graph::passes::opaque::OpaquePass;

pub struct TransparentPass;

impl TransparentPass {
    pub fn run(cmd: &mut CommandBuffer, frame: &CameraFrameContext) {
        cmd.draw_renderers(
            OpaquePass::drawing_settings(frame, SortingCriteria::CommonTransparent),
            FilteringSettings {
                queue_range: RenderQueueRange::Transparent,
                rendering_layer_mask: frame.rendering_layer_mask,
            },
        );
    }
}
