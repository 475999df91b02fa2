//! FXAA / Final Copy
//!
//! The last post stage and the only one that writes the camera's real
//! target. With FXAA enabled the anti-aliasing pass presents the image;
//! otherwise a plain [`PostFxPass::Copy`] does.

use crate::renderer::graph::command::{PostFxPass, RenderTargetId};
use crate::renderer::graph::context::PostFxContext;

pub const CONTRAST_THRESHOLD: &str = "_ContrastThreshold";

#[derive(Debug, Clone, Copy, Default)]
pub struct FinalNode;

impl FinalNode {
    #[must_use]
    pub fn name(&self, ctx: &PostFxContext) -> &'static str {
        if ctx.settings.fxaa.is_enabled() {
            "FXAA"
        } else {
            "Final Copy"
        }
    }

    pub fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId) {
        let name = self.name(ctx);
        ctx.cmd.begin_sample(name);
        if ctx.settings.fxaa.is_enabled() {
            let threshold = ctx.settings.fxaa.contrast_threshold_vector();
            ctx.cmd.set_global_vector(CONTRAST_THRESHOLD, threshold);
            ctx.draw_final(source, PostFxPass::Fxaa);
        } else {
            ctx.draw_final(source, PostFxPass::Copy);
        }
        ctx.cmd.end_sample(name);
    }
}
