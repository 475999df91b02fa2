//! Post-processing and fog configuration.
//!
//! Pure data with no GPU dependencies:
//! - `PostEffectSettings`: per-frame snapshot of every post stage
//! - Bloom, FXAA, tone mapping, vignette, colour grading, depth of field
//! - Fog globals
//! - Colour-space helpers

pub mod bloom;
pub mod color;
pub mod color_grading;
pub mod depth_of_field;
pub mod fog;
pub mod fxaa;
pub mod post_fx;
pub mod tone_mapping;

pub use bloom::{BloomMode, BloomSettings, MAX_BLOOM_PYRAMID_LEVELS, bloom_mip_count, soft_knee_threshold};
pub use color_grading::{
    ChannelMixer, ColorAdjustments, ShadowsMidtonesHighlights, SplitToning, WhiteBalance,
};
pub use depth_of_field::DepthOfFieldSettings;
pub use fog::FogSettings;
pub use fxaa::{FxaaSettings, LuminanceMode};
pub use post_fx::{BlurSettings, PostEffectSettings};
pub use tone_mapping::{ToneMappingMode, VignetteSettings};
