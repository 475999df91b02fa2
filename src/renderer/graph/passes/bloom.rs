//! Bloom Threshold + Mip Pyramid
//!
//! Bloom does not own a ping-pong destination. It builds a separable-blur
//! pyramid from the current source and hands the top upsampled level back to
//! the uber composite, which blends it over the image.
//!
//! # Algorithm
//!
//! 1. **Prefilter**: soft-knee threshold from the source into `down[0]`
//!    (half resolution).
//! 2. **Downsample**: for each further level, halve the size and run a
//!    horizontal pass `down[i-1] → up[i]` then a vertical pass
//!    `up[i] → down[i]`.
//! 3. **Upsample**: from the second-lowest level up, combine `down[i]` with
//!    the level below (`_BloomLowMip`) into `up[i]`, additive or
//!    scatter-weighted.
//!
//! A single-level pyramid copies `down[0]` into `up[0]` instead.
//!
//! Every level except `up[0]` is released before [`BloomNode::run`]
//! returns. `up[0]` belongs to the caller.

use glam::Vec4;
use smallvec::SmallVec;

use crate::renderer::graph::command::{PostFxPass, RenderTargetId, TransientTextureId};
use crate::renderer::graph::context::PostFxContext;
use crate::resources::bloom::{BloomCombine, MAX_BLOOM_PYRAMID_LEVELS, bloom_mip_count};

pub const BLOOM_THRESHOLD: &str = "_BloomThreshold";
pub const BLOOM_INTENSITY: &str = "_BloomIntensity";
pub const BLOOM_LOW_MIP: &str = "_BloomLowMip";
pub const BLOOM_TEXTURE: &str = "_BloomTexture";

/// One `(down, up)` pair of the pyramid.
#[derive(Debug, Clone, Copy)]
struct BloomMip {
    down: TransientTextureId,
    up: TransientTextureId,
}

type BloomMipChain = SmallVec<[BloomMip; MAX_BLOOM_PYRAMID_LEVELS as usize]>;

/// Result handed to the uber composite.
#[derive(Debug, Clone, Copy)]
pub struct BloomOutput {
    /// Top of the upsampled pyramid. Released by the caller.
    pub texture: TransientTextureId,
    /// `_BloomThreshold` used by the prefilter.
    pub threshold: Vec4,
    pub combine: BloomCombine,
    pub mip_count: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BloomNode;

impl BloomNode {
    pub const NAME: &'static str = "Bloom";

    #[must_use]
    pub fn is_enabled(&self, ctx: &PostFxContext) -> bool {
        ctx.settings.bloom.is_enabled()
    }

    /// Builds the pyramid from `source`. Returns `None` when bloom is off.
    pub fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId) -> Option<BloomOutput> {
        if !self.is_enabled(ctx) {
            return None;
        }
        let settings = ctx.settings;
        let bloom = &settings.bloom;

        ctx.cmd.begin_sample(Self::NAME);

        let mut width = (ctx.width() >> 1).max(1);
        let mut height = (ctx.height() >> 1).max(1);
        let format = ctx.format();

        // Prefilter
        let threshold = bloom.threshold_vector();
        ctx.cmd.set_global_vector(BLOOM_THRESHOLD, threshold);

        let mut chain = BloomMipChain::new();
        let desc = ctx.descriptor(width, height, format, "_BloomMipDown");
        let down = ctx.get_temporary(desc);
        let desc = ctx.descriptor(width, height, format, "_BloomMipUp");
        let up = ctx.get_temporary(desc);
        chain.push(BloomMip { down, up });
        ctx.draw(source, down.into(), PostFxPass::BloomPrefilter);

        let mip_count = bloom_mip_count(width, height, bloom.diffusion, bloom.max_pyramid_levels);

        // Downsample + separable gaussian
        let mut last_down = down;
        for _ in 1..mip_count {
            width = (width >> 1).max(1);
            height = (height >> 1).max(1);

            let desc = ctx.descriptor(width, height, format, "_BloomMipDown");
            let mip_down = ctx.get_temporary(desc);
            let desc = ctx.descriptor(width, height, format, "_BloomMipUp");
            let mip_up = ctx.get_temporary(desc);

            ctx.draw(last_down.into(), mip_up.into(), PostFxPass::BloomHorizontal);
            ctx.draw(mip_up.into(), mip_down.into(), PostFxPass::BloomVertical);
            chain.push(BloomMip {
                down: mip_down,
                up: mip_up,
            });
            last_down = mip_down;
        }

        // Upsample + combine
        let combine = bloom.combine();
        ctx.cmd.set_global_float(BLOOM_INTENSITY, combine.combine_intensity);
        let mut low_mip = last_down;
        for mip in chain.iter().rev().skip(1) {
            ctx.cmd.set_global_texture(BLOOM_LOW_MIP, low_mip.into());
            ctx.draw(mip.down.into(), mip.up.into(), combine.pass);
            low_mip = mip.up;
        }
        if chain.len() == 1 {
            ctx.draw(down.into(), up.into(), PostFxPass::Copy);
        }

        for (i, mip) in chain.iter().enumerate() {
            ctx.release_temporary(mip.down);
            if i > 0 {
                ctx.release_temporary(mip.up);
            }
        }
        ctx.cmd.end_sample(Self::NAME);

        Some(BloomOutput {
            texture: up,
            threshold,
            combine,
            mip_count,
        })
    }
}
