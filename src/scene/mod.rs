//! Scene-side inputs consumed by the renderer.
//!
//! - Camera: one view to render, with optional per-camera overrides
//! - VisibleLight: a culled light ready for packing

pub mod camera;
pub mod light;

pub use camera::{Camera, CameraClearFlags, CameraOverrides, CameraType, TargetTexture};
pub use light::{LightKind, VisibleLight};
