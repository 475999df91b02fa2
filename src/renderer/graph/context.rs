//! Post-Processing Context
//!
//! [`PostFxContext`] is the single mutable handle the post-effect stages
//! receive. It bundles the camera's command buffer with the read-only
//! settings snapshot, the baked grading LUT and the descriptor every
//! full-resolution intermediate is derived from.
//!
//! Stages never bind render targets by hand: they go through
//! [`draw`](PostFxContext::draw) / [`draw_material`](PostFxContext::draw_material)
//! (intermediate targets) and [`draw_final`](PostFxContext::draw_final)
//! (the camera's real target).

use crate::renderer::color_grading_lut::ColorGradingLut;
use crate::renderer::graph::command::{
    ClearFlags, CommandBuffer, LoadAction, Material, PixelRect, PostFxPass, RenderTargetId,
    StoreAction, TransientTextureDesc, TransientTextureId,
};
use crate::renderer::graph::rendering_utils::{BLIT_TEXTURE, blit_procedural};
use crate::resources::post_fx::PostEffectSettings;

pub struct PostFxContext<'a> {
    pub cmd: &'a mut CommandBuffer,
    pub settings: &'a PostEffectSettings,
    pub lut: Option<ColorGradingLut>,
    /// The camera's real output.
    pub final_target: RenderTargetId,
    pub viewport: PixelRect,
    /// Single-sample, depth-less copy of the camera colour descriptor.
    base: TransientTextureDesc,
}

impl<'a> PostFxContext<'a> {
    #[must_use]
    pub fn new(
        cmd: &'a mut CommandBuffer,
        settings: &'a PostEffectSettings,
        camera_desc: &TransientTextureDesc,
        final_target: RenderTargetId,
        viewport: PixelRect,
        lut: Option<ColorGradingLut>,
    ) -> Self {
        let base = TransientTextureDesc {
            msaa_samples: 1,
            depth_bits: 0,
            filter: wgpu::FilterMode::Linear,
            ..camera_desc.clone()
        };
        Self {
            cmd,
            settings,
            lut,
            final_target,
            viewport,
            base,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.base.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.base.height
    }

    #[inline]
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.base.width as f32 / self.base.height.max(1) as f32
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.base.format
    }

    /// Full-resolution intermediate in the camera's colour format.
    #[must_use]
    pub fn default_descriptor(&self, label: &'static str) -> TransientTextureDesc {
        TransientTextureDesc {
            label,
            ..self.base.clone()
        }
    }

    /// Intermediate of arbitrary size and format.
    #[must_use]
    pub fn descriptor(
        &self,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: &'static str,
    ) -> TransientTextureDesc {
        TransientTextureDesc {
            width: width.max(1),
            height: height.max(1),
            format,
            label,
            ..self.base.clone()
        }
    }

    pub fn get_temporary(&mut self, desc: TransientTextureDesc) -> TransientTextureId {
        self.cmd.get_temporary(desc)
    }

    pub fn release_temporary(&mut self, id: TransientTextureId) {
        self.cmd.release_temporary(id);
    }

    /// One [`Material::PostFx`] pass from `from` into `to`.
    pub fn draw(&mut self, from: RenderTargetId, to: RenderTargetId, pass: PostFxPass) {
        blit_procedural(self.cmd, from, to, Material::PostFx, pass.index());
    }

    pub fn draw_material(
        &mut self,
        from: RenderTargetId,
        to: RenderTargetId,
        material: Material,
        pass: u32,
    ) {
        blit_procedural(self.cmd, from, to, material, pass);
    }

    /// Writes `from` into the camera's real target, restricted to the viewport.
    ///
    /// The target is loaded so pixels outside the viewport survive.
    pub fn draw_final(&mut self, from: RenderTargetId, pass: PostFxPass) {
        self.cmd.set_global_texture(BLIT_TEXTURE, from);
        self.cmd.set_render_target(
            self.final_target,
            LoadAction::Load,
            StoreAction::Store,
            None,
            ClearFlags::empty(),
            wgpu::Color::TRANSPARENT,
        );
        self.cmd.set_viewport(self.viewport);
        self.cmd.draw_procedural(Material::PostFx, pass.index());
    }
}
