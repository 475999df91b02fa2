//! # Lumen
//!
//! A per-camera frame orchestrator for a forward render pipeline.
//!
//! For every camera the pipeline culls, packs lights into fixed-capacity
//! arrays, allocates the transient targets the camera's feature flags call
//! for, records the geometry passes and runs a configurable post-processing
//! chain (blur, depth of field, bloom, LUT colour grading, vignette, FXAA)
//! before presenting. The result is a recorded command stream handed to a
//! [`GraphicsBackend`](renderer::GraphicsBackend).
//!
//! ## Modules
//!
//! - [`renderer`]: orchestrator, light packing, LUT bake, command recording
//! - [`resources`]: post-processing and fog configuration
//! - [`scene`]: camera and visible-light inputs
//! - [`errors`]: error type and invariant reporting

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use errors::{RenderError, Result};
pub use renderer::{
    CameraRenderer, CommandBuffer, GraphicsBackend, RecordingBackend, RenderCommand,
    RenderPipeline, RendererSettings,
};
pub use resources::PostEffectSettings;
pub use scene::{Camera, CameraClearFlags, CameraOverrides, CameraType, LightKind, VisibleLight};
