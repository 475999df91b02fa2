//! Colour-Grading LUT Bake
//!
//! Bakes the complete colour-grading transform (adjustments, white balance,
//! split toning, channel mixer, shadows/midtones/highlights and tone mapping)
//! into a 2D texture of `h² × h` texels: a 3D LUT of edge `h` with its blue
//! slices laid out side by side.
//!
//! The LUT is rebuilt every frame the camera post-processes. The baked
//! texture is owned by the orchestrator, which releases it together with the
//! other frame targets.
//!
//! # Shader Parameters
//!
//! | Global                        | Value                                           |
//! |-------------------------------|-------------------------------------------------|
//! | `_ColorAdjustments`           | `(2^exposure, contrast, hue / 360, saturation)` |
//! | `_ColorFilter`                | linear colour filter                            |
//! | `_WhiteBalance`               | LMS coefficients                                |
//! | `_SplitToningShadows`         | linear shadows, balance in alpha                |
//! | `_SplitToningHighlights`      | linear highlights                               |
//! | `_ChannelMixerRed/Green/Blue` | mixer rows                                      |
//! | `_SMHShadows/MidTones/HighLights` | linear colours                              |
//! | `_SMHRange`                   | range boundaries                                |
//! | `_ColorGradingLUTParameters`  | `(h, 0.5 / w, 0.5 / h, h / (h - 1))`            |

use glam::Vec4;

use crate::renderer::graph::command::{CommandBuffer, Material, TransientTextureDesc, TransientTextureId};
use crate::renderer::graph::rendering_utils::{HDR_ALPHA_FORMAT, blit_procedural};
use crate::resources::color::linear_color;
use crate::resources::post_fx::PostEffectSettings;

pub const COLOR_GRADING_LUT: &str = "_ColorGradingLUT";

const COLOR_ADJUSTMENTS: &str = "_ColorAdjustments";
const COLOR_FILTER: &str = "_ColorFilter";
const WHITE_BALANCE: &str = "_WhiteBalance";
const SPLIT_TONING_SHADOWS: &str = "_SplitToningShadows";
const SPLIT_TONING_HIGHLIGHTS: &str = "_SplitToningHighlights";
const CHANNEL_MIXER_RED: &str = "_ChannelMixerRed";
const CHANNEL_MIXER_GREEN: &str = "_ChannelMixerGreen";
const CHANNEL_MIXER_BLUE: &str = "_ChannelMixerBlue";
const SMH_SHADOWS: &str = "_SMHShadows";
const SMH_MIDTONES: &str = "_SMHMidTones";
const SMH_HIGHLIGHTS: &str = "_SMHHighLights";
const SMH_RANGE: &str = "_SMHRange";
const LUT_BAKE_PARAMETERS: &str = "_ColorGradingLUTParameters";

/// A baked LUT for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorGradingLut {
    pub texture: TransientTextureId,
    /// Edge length `h` of the 3D LUT.
    pub resolution: u32,
}

impl ColorGradingLut {
    /// Width of the flattened texture, `h²`.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.resolution * self.resolution
    }

    /// Sampling parameters for the uber pass: `(1 / w, 1 / h, h - 1, 0)`.
    #[must_use]
    pub fn sample_parameters(&self) -> Vec4 {
        let h = self.resolution as f32;
        let w = self.width() as f32;
        Vec4::new(1.0 / w, 1.0 / h, h - 1.0, 0.0)
    }

    /// Bake parameters: `(h, 0.5 / w, 0.5 / h, h / (h - 1))`.
    #[must_use]
    pub fn bake_parameters(resolution: u32) -> Vec4 {
        let h = resolution.max(2) as f32;
        let w = h * h;
        Vec4::new(h, 0.5 / w, 0.5 / h, h / (h - 1.0))
    }

    #[must_use]
    pub fn descriptor(resolution: u32) -> TransientTextureDesc {
        TransientTextureDesc {
            width: resolution * resolution,
            height: resolution,
            format: HDR_ALPHA_FORMAT,
            msaa_samples: 1,
            depth_bits: 0,
            filter: wgpu::FilterMode::Linear,
            label: COLOR_GRADING_LUT,
        }
    }

    /// Uploads the grading parameters and renders the LUT.
    ///
    /// The returned texture must be released by the caller.
    pub fn build(cmd: &mut CommandBuffer, settings: &PostEffectSettings, resolution: u32) -> Self {
        cmd.begin_sample("ColorGrading");
        upload_grading_parameters(cmd, settings);

        let texture = cmd.get_temporary(Self::descriptor(resolution));
        cmd.set_global_vector(LUT_BAKE_PARAMETERS, Self::bake_parameters(resolution));

        // The bake shader ignores its input; the LUT is both source and target.
        blit_procedural(
            cmd,
            texture.into(),
            texture.into(),
            Material::PostFx,
            settings.tone_mapping.lut_pass().index(),
        );
        cmd.end_sample("ColorGrading");

        Self {
            texture,
            resolution,
        }
    }
}

fn upload_grading_parameters(cmd: &mut CommandBuffer, settings: &PostEffectSettings) {
    let adjustments = &settings.color_adjustments;
    cmd.set_global_vector(COLOR_ADJUSTMENTS, adjustments.params());
    cmd.set_global_vector(COLOR_FILTER, adjustments.color_filter_linear());

    cmd.set_global_vector(WHITE_BALANCE, settings.white_balance.lms_coefficients());

    let split = &settings.split_toning;
    cmd.set_global_vector(SPLIT_TONING_SHADOWS, linear_color(split.shadows_with_balance()));
    cmd.set_global_vector(SPLIT_TONING_HIGHLIGHTS, linear_color(split.highlights));

    let mixer = &settings.channel_mixer;
    cmd.set_global_vector(CHANNEL_MIXER_RED, mixer.red.extend(0.0));
    cmd.set_global_vector(CHANNEL_MIXER_GREEN, mixer.green.extend(0.0));
    cmd.set_global_vector(CHANNEL_MIXER_BLUE, mixer.blue.extend(0.0));

    let smh = &settings.shadows_midtones_highlights;
    cmd.set_global_vector(SMH_SHADOWS, linear_color(smh.shadows));
    cmd.set_global_vector(SMH_MIDTONES, linear_color(smh.midtones));
    cmd.set_global_vector(SMH_HIGHLIGHTS, linear_color(smh.highlights));
    cmd.set_global_vector(SMH_RANGE, smh.range());
}
