//! Opaque Colour & Depth Copies
//!
//! After the opaque geometry and the skybox, the camera's colour (and, when
//! it owns one, its depth attachment) is copied into textures the
//! transparent pass can sample:
//!
//! | Global                   | Source                   | Format         |
//! |--------------------------|--------------------------|----------------|
//! | `_CameraOpaqueTexture`   | `_CameraColorTexture`    | camera colour  |
//! | `_CameraDepthTexture`    | `_CameraDepthAttachment` | `R32Float`     |
//!
//! Both are single-sample copies without a depth buffer, drawn with the plain
//! blit material. The caller re-binds the camera targets afterwards.

use crate::renderer::graph::command::{
    CommandBuffer, Material, RenderTargetId, TransientTextureDesc, TransientTextureId,
};
use crate::renderer::graph::passes::depth_prepass::CAMERA_DEPTH_TEXTURE;
use crate::renderer::graph::rendering_utils::blit_procedural;

pub const CAMERA_OPAQUE_TEXTURE: &str = "_CameraOpaqueTexture";

/// Format of the sampled depth copy.
pub const DEPTH_COPY_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

pub struct CopyPass;

impl CopyPass {
    /// Copies `source` into a new texture bound as the global `name`.
    pub fn copy(
        cmd: &mut CommandBuffer,
        source: RenderTargetId,
        target_desc: &TransientTextureDesc,
        format: wgpu::TextureFormat,
        name: &'static str,
    ) -> TransientTextureId {
        let desc = TransientTextureDesc {
            format,
            msaa_samples: 1,
            depth_bits: 0,
            label: name,
            ..target_desc.clone()
        };
        let copy = cmd.get_temporary(desc);
        blit_procedural(cmd, source, copy.into(), Material::Blit, 0);
        cmd.set_global_texture(name, copy.into());
        copy
    }

    pub fn copy_color(
        cmd: &mut CommandBuffer,
        color: RenderTargetId,
        target_desc: &TransientTextureDesc,
    ) -> TransientTextureId {
        Self::copy(cmd, color, target_desc, target_desc.format, CAMERA_OPAQUE_TEXTURE)
    }

    pub fn copy_depth(
        cmd: &mut CommandBuffer,
        depth: RenderTargetId,
        target_desc: &TransientTextureDesc,
    ) -> TransientTextureId {
        Self::copy(cmd, depth, target_desc, DEPTH_COPY_FORMAT, CAMERA_DEPTH_TEXTURE)
    }
}
