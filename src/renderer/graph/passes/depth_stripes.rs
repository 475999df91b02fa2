//! Depth-stripe debug visualisation.

use crate::renderer::graph::command::{PostFxPass, RenderTargetId};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::node::RenderNode;

/// Overlays scene depth as stripes. Single full-screen pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthStripesNode;

impl RenderNode for DepthStripesNode {
    fn name(&self) -> &'static str {
        "Depth Stripes"
    }

    fn is_enabled(&self, ctx: &PostFxContext) -> bool {
        ctx.settings.depth_stripes
    }

    fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId, destination: RenderTargetId) {
        ctx.cmd.begin_sample(self.name());
        ctx.draw(source, destination, PostFxPass::DepthStripes);
        ctx.cmd.end_sample(self.name());
    }
}
