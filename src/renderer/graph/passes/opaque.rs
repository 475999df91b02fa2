//! Opaque Geometry Pass
//!
//! Draws the opaque queue range with the unlit and lit shader tags,
//! sorted front-to-back (`CommonOpaque`).

use smallvec::smallvec;

use crate::renderer::graph::command::{
    CommandBuffer, DrawingSettings, FilteringSettings, RenderQueueRange, ShaderTag,
    SortingCriteria,
};
use crate::renderer::graph::frame::CameraFrameContext;

pub struct OpaquePass;

impl OpaquePass {
    /// Shared draw settings of the opaque and transparent passes.
    #[must_use]
    pub fn drawing_settings(frame: &CameraFrameContext, sorting: SortingCriteria) -> DrawingSettings {
        DrawingSettings {
            shader_tags: smallvec![ShaderTag::SRP_DEFAULT_UNLIT, ShaderTag::CUSTOM_LIT],
            sorting,
            per_object_data: frame.per_object_data,
            enable_dynamic_batching: frame.use_dynamic_batching,
            enable_instancing: frame.use_gpu_instancing,
        }
    }

    pub fn run(cmd: &mut CommandBuffer, frame: &CameraFrameContext) {
        cmd.draw_renderers(
            Self::drawing_settings(frame, SortingCriteria::CommonOpaque),
            FilteringSettings {
                queue_range: RenderQueueRange::Opaque,
                rendering_layer_mask: frame.rendering_layer_mask,
            },
        );
    }
}
