//! Shadow collaborator seam.
//!
//! Shadow-map rendering and atlas packing live outside the pipeline. The
//! light packer calls the two reservation entry points while packing and
//! stores the returned vectors verbatim as per-light shadow data.
//!
//! ```text
//! setup ──► reserve_directional_shadows / reserve_other_shadows (per light)
//!       ──► render ──► ... frame ... ──► cleanup
//! ```

use glam::Vec4;

use crate::renderer::culling::VisibleGeometrySet;
use crate::renderer::graph::command::CommandBuffer;
use crate::renderer::settings::ShadowSettings;
use crate::scene::VisibleLight;

/// Shadow data meaning "this light casts no shadows".
pub const NO_SHADOW: Vec4 = Vec4::new(0.0, 0.0, 0.0, -1.0);

pub trait ShadowRenderer {
    /// Starts a frame. Transient resources allocated here must be released
    /// in [`cleanup`](Self::cleanup).
    fn setup(
        &mut self,
        cmd: &mut CommandBuffer,
        geometry: &VisibleGeometrySet,
        settings: &ShadowSettings,
    );

    fn reserve_directional_shadows(&mut self, light: &VisibleLight, visible_index: usize) -> Vec4;

    fn reserve_other_shadows(&mut self, light: &VisibleLight, visible_index: usize) -> Vec4;

    fn render(&mut self, cmd: &mut CommandBuffer);

    fn cleanup(&mut self, cmd: &mut CommandBuffer);
}

/// Shadow renderer that never reserves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShadows;

impl ShadowRenderer for NoShadows {
    fn setup(&mut self, _: &mut CommandBuffer, _: &VisibleGeometrySet, _: &ShadowSettings) {}

    fn reserve_directional_shadows(&mut self, _: &VisibleLight, _: usize) -> Vec4 {
        NO_SHADOW
    }

    fn reserve_other_shadows(&mut self, _: &VisibleLight, _: usize) -> Vec4 {
        NO_SHADOW
    }

    fn render(&mut self, _: &mut CommandBuffer) {}

    fn cleanup(&mut self, _: &mut CommandBuffer) {}
}
