//! Rendering System
//!
//! The per-camera frame orchestrator and everything it drives.
//!
//! # Architecture
//!
//! ```text
//! RenderPipeline ──► CameraRenderer ──► CommandBuffer ──► GraphicsBackend
//!      │                   │
//!      │                   ├─ Lighting (light packing, shadows, fog)
//!      │                   ├─ ColorGradingLut
//!      │                   └─ graph::passes (geometry passes, PostFxStack)
//!      │
//!      └─ injected seams: EnvironmentPolicy, Culler, ShadowRenderer
//! ```
//!
//! - [`settings`]: global pipeline configuration
//! - [`graph`]: command recording, transient textures and passes
//! - [`backend`]: command execution seam and the recording backend

pub mod backend;
pub mod camera_renderer;
pub mod color_grading_lut;
pub mod culling;
pub mod environment;
pub mod graph;
pub mod lighting;
pub mod pipeline;
pub mod settings;
pub mod shadows;

pub use backend::{GlobalShaderState, GraphicsBackend, RecordingBackend};
pub use camera_renderer::{CameraRenderer, FrameServices};
pub use color_grading_lut::ColorGradingLut;
pub use culling::{Culler, CullingParameters, StaticCuller, VisibleGeometrySet};
pub use environment::{DefaultEnvironment, EditorEnvironment, EnvironmentPolicy, MobileEnvironment};
pub use graph::{CameraFrameContext, CommandBuffer, FrameFlags, RenderCommand, RenderTargetId};
pub use lighting::{LightBuffer, LightPacker, Lighting, main_light_index};
pub use pipeline::RenderPipeline;
pub use settings::{LightLimits, LutResolution, MsaaMode, RendererSettings, ShadowSettings};
pub use shadows::{NO_SHADOW, NoShadows, ShadowRenderer};
