//! Frame Recording
//!
//! - [`CommandBuffer`] / [`RenderCommand`]: the recorded command stream and
//!   the per-camera transient texture namespace
//! - [`TransientTexturePool`]: physical texture recycling behind the backend
//! - [`CameraFrameContext`] / [`FrameFlags`]: per-camera frame state
//! - [`PostFxContext`] / [`RenderNode`]: post-effect stage plumbing
//! - `rendering_utils`: stateless descriptor, blit and bind helpers
//! - `passes`: geometry passes and post-effect stages

pub mod command;
pub mod context;
pub mod frame;
pub mod node;
pub mod passes;
pub mod rendering_utils;
pub mod transient_pool;

pub use command::{
    ClearFlags, CommandBuffer, DepthAttachment, DofPass, DrawingSettings, FilteringSettings,
    LoadAction, Material, PerObjectData, PixelRect, PostFxPass, RenderCommand, RenderQueueRange,
    RenderTargetId, ShaderTag, SortingCriteria, StoreAction, TransientTextureDesc,
    TransientTextureId,
};
pub use context::PostFxContext;
pub use frame::{CameraFrameContext, FrameFlags};
pub use node::RenderNode;
pub use transient_pool::{PhysicalTextureId, TransientTexturePool};
