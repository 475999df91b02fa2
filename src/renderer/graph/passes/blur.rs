//! Iterated Kawase Blur
//!
//! Each iteration samples four diagonal taps at a growing offset
//! (`_BlurRadius = radius + i`). Iterations alternate between the stage's
//! destination and a private `_BlurTemp` texture; the target of iteration `i`
//! is chosen so that the last iteration always lands in the destination:
//!
//! ```text
//! n = 3:  source ──► dst ──► tmp ──► dst
//! n = 4:  source ──► tmp ──► dst ──► tmp ──► dst
//! ```

use crate::renderer::graph::command::{PostFxPass, RenderTargetId};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::node::RenderNode;

pub const BLUR_RADIUS: &str = "_BlurRadius";

#[derive(Debug, Clone, Copy, Default)]
pub struct KawaseBlurNode;

/// Whether iteration `i` of `n` writes the destination (otherwise the temp).
#[inline]
#[must_use]
pub fn writes_destination(iteration: u32, iterations: u32) -> bool {
    (iterations - 1 - iteration) % 2 == 0
}

impl RenderNode for KawaseBlurNode {
    fn name(&self) -> &'static str {
        "Blur"
    }

    fn is_enabled(&self, ctx: &PostFxContext) -> bool {
        ctx.settings.blur.is_enabled()
    }

    fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId, destination: RenderTargetId) {
        let settings = ctx.settings;
        let blur = &settings.blur;
        let iterations = blur.max_iterations;
        if iterations == 0 {
            return;
        }

        ctx.cmd.begin_sample(self.name());

        // A single iteration goes straight to the destination.
        let temp = (iterations > 1).then(|| {
            let desc = ctx.default_descriptor("_BlurTemp");
            ctx.get_temporary(desc)
        });

        let mut from = source;
        for i in 0..iterations {
            let to = match temp {
                Some(temp) if !writes_destination(i, iterations) => RenderTargetId::Transient(temp),
                _ => destination,
            };
            ctx.cmd
                .set_global_float(BLUR_RADIUS, blur.radius_for_iteration(i));
            ctx.draw(from, to, PostFxPass::Blur);
            from = to;
        }

        if let Some(temp) = temp {
            ctx.release_temporary(temp);
        }
        ctx.cmd.end_sample(self.name());
    }
}
