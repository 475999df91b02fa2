//! Post-Effect Stack
//!
//! Drives the post stages over an explicit `(source, destination)` pair:
//!
//! ```text
//! camera colour ─► [depth stripes] ─► [blur] ─► [depth of field]
//!                                                     │
//!               bloom pyramid (reads source) ◄────────┤
//!                         │                           ▼
//!                         └──────────────────► uber composite ─► FXAA | copy ─► camera target
//! ```
//!
//! Every enabled stage writes the current destination and is followed by a
//! [`PingPong::swap`]. The destination is allocated lazily the first time a
//! stage needs one and is shared by all later stages, so the stack never
//! holds more than one ping-pong texture besides the camera colour and the
//! stage-private intermediates.
//!
//! The camera's real target is written exactly once, by the final stage.

use crate::renderer::graph::command::{RenderTargetId, TransientTextureId};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::node::RenderNode;
use crate::renderer::graph::passes::bloom::BloomNode;
use crate::renderer::graph::passes::blur::KawaseBlurNode;
use crate::renderer::graph::passes::depth_of_field::DepthOfFieldNode;
use crate::renderer::graph::passes::depth_stripes::DepthStripesNode;
use crate::renderer::graph::passes::fxaa::FinalNode;
use crate::renderer::graph::passes::uber::UberNode;

pub const POST_FX_TEMP_TEXTURE: &str = "_PostFXTempTexture";

/// Ping-ponged stages, in execution order.
const PING_PONG_STAGES: &[&dyn RenderNode] = &[&DepthStripesNode, &KawaseBlurNode, &DepthOfFieldNode];

/// Explicit source/destination state of the stack.
#[derive(Debug)]
pub struct PingPong {
    source: RenderTargetId,
    destination: Option<RenderTargetId>,
    /// The lazily allocated shared texture, whichever side it is on.
    temp: Option<TransientTextureId>,
}

impl PingPong {
    #[must_use]
    pub fn new(source: RenderTargetId) -> Self {
        Self {
            source,
            destination: None,
            temp: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> RenderTargetId {
        self.source
    }

    /// Current destination, allocating the shared texture on first use.
    pub fn destination(&mut self, ctx: &mut PostFxContext) -> RenderTargetId {
        if let Some(destination) = self.destination {
            return destination;
        }
        let desc = ctx.default_descriptor(POST_FX_TEMP_TEXTURE);
        let id = ctx.get_temporary(desc);
        self.temp = Some(id);
        self.destination = Some(id.into());
        id.into()
    }

    /// Makes the last written destination the next source.
    ///
    /// A no-op until [`destination`](Self::destination) has been taken, so
    /// source and destination never alias.
    pub fn swap(&mut self) {
        if let Some(destination) = self.destination {
            self.destination = Some(self.source);
            self.source = destination;
        }
    }

    /// Whether the shared texture has been allocated.
    #[inline]
    #[must_use]
    pub fn allocated(&self) -> bool {
        self.temp.is_some()
    }

    pub fn release(self, ctx: &mut PostFxContext) {
        if let Some(temp) = self.temp {
            ctx.release_temporary(temp);
        }
    }
}

pub struct PostFxStack;

impl PostFxStack {
    pub const NAME: &'static str = "Post FX";

    /// Runs every enabled stage on `source` and presents the result.
    pub fn render(ctx: &mut PostFxContext, source: TransientTextureId) {
        ctx.cmd.begin_sample(Self::NAME);
        let mut ping_pong = PingPong::new(source.into());

        for stage in PING_PONG_STAGES {
            if !stage.is_enabled(ctx) {
                continue;
            }
            log::trace!("post stage '{}'", stage.name());
            let destination = ping_pong.destination(ctx);
            stage.run(ctx, ping_pong.source(), destination);
            ping_pong.swap();
        }

        let bloom = BloomNode.run(ctx, ping_pong.source());

        let destination = ping_pong.destination(ctx);
        UberNode.run(ctx, ping_pong.source(), destination, bloom.as_ref());
        ping_pong.swap();

        FinalNode.run(ctx, ping_pong.source());

        if let Some(bloom) = bloom {
            ctx.release_temporary(bloom.texture);
        }
        ping_pong.release(ctx);
        ctx.cmd.end_sample(Self::NAME);
    }
}
