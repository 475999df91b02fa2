//! Uber Composite
//!
//! One [`Material::Uber`] pass that applies, in shader order, the bloom
//! pyramid, the baked colour-grading LUT (which already contains tone
//! mapping) and the vignette.
//!
//! Material keywords are reset before anything else so a variant enabled
//! on a previous frame never leaks into this one.

use crate::renderer::graph::command::{Material, RenderTargetId};
use crate::renderer::graph::context::PostFxContext;
use crate::renderer::graph::passes::bloom::{
    BLOOM_INTENSITY, BLOOM_TEXTURE, BLOOM_THRESHOLD, BloomOutput,
};
use crate::resources::tone_mapping::VIGNETTE_KEYWORD;

pub const LUT_TEXTURE: &str = "_LUTTexture";
pub const COLOR_GRADING_LUT_PARAMETERS: &str = "_ColorGradingLUTParameters";
pub const VIGNETTE_PARAMS_1: &str = "_VignetteParams1";
pub const VIGNETTE_PARAMS_2: &str = "_VignetteParams2";

#[derive(Debug, Clone, Copy, Default)]
pub struct UberNode;

impl UberNode {
    pub const NAME: &'static str = "UberPost";

    pub fn run(
        &self,
        ctx: &mut PostFxContext,
        source: RenderTargetId,
        destination: RenderTargetId,
        bloom: Option<&BloomOutput>,
    ) {
        ctx.cmd.begin_sample(Self::NAME);
        ctx.cmd.reset_material_keywords(Material::Uber);

        if let Some(bloom) = bloom {
            Self::setup_bloom(ctx, bloom);
        }
        Self::setup_color_grading(ctx);
        Self::setup_vignette(ctx);

        ctx.draw_material(source, destination, Material::Uber, 0);
        ctx.cmd.end_sample(Self::NAME);
    }

    fn setup_bloom(ctx: &mut PostFxContext, bloom: &BloomOutput) {
        ctx.cmd
            .set_material_vector(Material::Uber, BLOOM_THRESHOLD, bloom.threshold);
        ctx.cmd
            .set_material_float(Material::Uber, BLOOM_INTENSITY, bloom.combine.final_intensity);
        ctx.cmd
            .set_global_texture(BLOOM_TEXTURE, bloom.texture.into());
        ctx.cmd
            .enable_material_keyword(Material::Uber, bloom.combine.keyword);
    }

    fn setup_color_grading(ctx: &mut PostFxContext) {
        let Some(lut) = ctx.lut else {
            return;
        };
        ctx.cmd.set_global_texture(LUT_TEXTURE, lut.texture.into());
        ctx.cmd.set_material_vector(
            Material::Uber,
            COLOR_GRADING_LUT_PARAMETERS,
            lut.sample_parameters(),
        );
    }

    fn setup_vignette(ctx: &mut PostFxContext) {
        let settings = ctx.settings;
        let vignette = &settings.vignette;
        if vignette.is_enabled() {
            ctx.cmd
                .enable_material_keyword(Material::Uber, VIGNETTE_KEYWORD);
        }
        let aspect = ctx.aspect_ratio();
        ctx.cmd
            .set_material_vector(Material::Uber, VIGNETTE_PARAMS_1, vignette.params1(aspect));
        ctx.cmd
            .set_material_vector(Material::Uber, VIGNETTE_PARAMS_2, vignette.params2());
    }
}
