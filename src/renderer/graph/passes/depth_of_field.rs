//! Depth of Field
//!
//! Five [`Material::DepthOfField`] passes:
//!
//! ```text
//! source ──CoC──────────────► _CoCTexture (R8, full res)
//! source ──downsample───────► ping (half res)
//! ping ───scatter H─────────► pong
//! pong ───scatter V─────────► ping ─► _DoFTexture
//! source ──composite────────► destination
//! ```
//!
//! The stage is skipped when the lens is degenerate (see
//! [`DepthOfFieldSettings::coc_params`](crate::resources::DepthOfFieldSettings::coc_params)).

use crate::renderer::graph::command::{DofPass, Material, RenderTargetId};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::node::RenderNode;

pub const COC_PARAMS: &str = "_CoCParams";
pub const COC_TEXTURE: &str = "_CoCTexture";
pub const DOF_TEXTURE: &str = "_DoFTexture";

const COC_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R8Unorm;
const DOF_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthOfFieldNode;

impl RenderNode for DepthOfFieldNode {
    fn name(&self) -> &'static str {
        "DepthOfField"
    }

    fn is_enabled(&self, ctx: &PostFxContext) -> bool {
        ctx.settings
            .depth_of_field
            .coc_params(ctx.width(), ctx.height())
            .is_some()
    }

    fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId, destination: RenderTargetId) {
        let (width, height) = (ctx.width(), ctx.height());
        let Some(coc_params) = ctx.settings.depth_of_field.coc_params(width, height) else {
            return;
        };

        ctx.cmd.begin_sample(self.name());
        ctx.cmd.set_global_vector(COC_PARAMS, coc_params);

        let coc_desc = ctx.descriptor(width, height, COC_FORMAT, COC_TEXTURE);
        let coc = ctx.get_temporary(coc_desc);
        let ping_desc = ctx.descriptor(width / 2, height / 2, DOF_FORMAT, "_DoFPingTexture");
        let ping = ctx.get_temporary(ping_desc);
        let pong_desc = ctx.descriptor(width / 2, height / 2, DOF_FORMAT, "_DoFPongTexture");
        let pong = ctx.get_temporary(pong_desc);

        let (coc, ping, pong) = (
            RenderTargetId::Transient(coc),
            RenderTargetId::Transient(ping),
            RenderTargetId::Transient(pong),
        );
        let pass = |p: DofPass| p.index();

        ctx.draw_material(source, coc, Material::DepthOfField, pass(DofPass::CircleOfConfusion));
        ctx.cmd.set_global_texture(COC_TEXTURE, coc);

        ctx.draw_material(source, ping, Material::DepthOfField, pass(DofPass::Downsample));
        ctx.draw_material(ping, pong, Material::DepthOfField, pass(DofPass::ScatterHorizontal));
        ctx.draw_material(pong, ping, Material::DepthOfField, pass(DofPass::ScatterVertical));

        ctx.cmd.set_global_texture(DOF_TEXTURE, ping);
        ctx.draw_material(source, destination, Material::DepthOfField, pass(DofPass::Composite));

        for id in [coc, pong, ping].into_iter().filter_map(RenderTargetId::transient) {
            ctx.release_temporary(id);
        }
        ctx.cmd.end_sample(self.name());
    }
}
