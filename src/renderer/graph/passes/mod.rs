//! Render Pass Implementations
//!
//! Geometry passes recorded directly by the camera orchestrator, and the
//! post-effect stages driven by [`PostFxStack`].

pub mod bloom;
pub mod blur;
pub mod copy_color;
pub mod depth_of_field;
pub mod depth_prepass;
pub mod depth_stripes;
pub mod fxaa;
pub mod opaque;
pub mod post_fx_stack;
pub mod skybox;
pub mod transparent;
pub mod uber;

pub use bloom::{BloomNode, BloomOutput};
pub use blur::KawaseBlurNode;
pub use copy_color::CopyPass;
pub use depth_of_field::DepthOfFieldNode;
pub use depth_prepass::DepthPrepass;
pub use depth_stripes::DepthStripesNode;
pub use fxaa::FinalNode;
pub use opaque::OpaquePass;
pub use post_fx_stack::{PingPong, PostFxStack};
pub use skybox::SkyboxPass;
pub use transparent::TransparentPass;
pub use uber::UberNode;
