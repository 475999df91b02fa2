//! Resource & Draw Utility Layer
//!
//! Stateless helpers shared by the orchestrator and the passes: target
//! descriptor construction, full-screen procedural blits, render-target
//! bind + clear, and geometry draw settings.

use smallvec::smallvec;

use super::command::{
    ClearFlags, CommandBuffer, DepthAttachment, DrawingSettings, LoadAction, Material,
    PerObjectData, PixelRect, RenderTargetId, ShaderTag, SortingCriteria, StoreAction,
    TransientTextureDesc,
};
use crate::scene::Camera;

/// Shader texture slot every full-screen blit samples from.
pub const BLIT_TEXTURE: &str = "_BlitTex";

/// HDR colour format for cameras that do not need alpha.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg11b10Ufloat;
/// HDR colour format when framebuffer alpha must survive.
pub const HDR_ALPHA_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const LDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Builds the descriptor of a camera's colour target.
///
/// The camera's pixel size is multiplied by `render_scale` and truncated (at
/// least one pixel). A camera target texture dictates format, depth bits and
/// sample count; otherwise HDR picks [`HDR_FORMAT`] (or [`HDR_ALPHA_FORMAT`]
/// when alpha is needed) and LDR picks [`LDR_FORMAT`].
#[must_use]
pub fn create_camera_target_descriptor(
    camera: &Camera,
    render_scale: f32,
    hdr: bool,
    msaa_samples: u32,
    needs_alpha: bool,
) -> TransientTextureDesc {
    let width = ((camera.pixel_width() as f32 * render_scale) as u32).max(1);
    let height = ((camera.pixel_height() as f32 * render_scale) as u32).max(1);

    let (format, depth_bits, msaa_samples) = match &camera.target_texture {
        Some(target) => (target.format, target.depth_bits, target.msaa_samples.max(1)),
        None => {
            let format = match (hdr, needs_alpha) {
                (true, false) => HDR_FORMAT,
                (true, true) => HDR_ALPHA_FORMAT,
                (false, _) => LDR_FORMAT,
            };
            (format, 32, msaa_samples.max(1))
        }
    };

    TransientTextureDesc {
        width,
        height,
        format,
        msaa_samples,
        depth_bits,
        filter: wgpu::FilterMode::Linear,
        label: "CameraTarget",
    }
}

/// Copies `from` into `to` with a full-screen triangle.
///
/// `from` is bound as [`BLIT_TEXTURE`]; the destination is bound without
/// loading its previous contents.
pub fn blit_procedural(
    cmd: &mut CommandBuffer,
    from: RenderTargetId,
    to: RenderTargetId,
    material: Material,
    pass: u32,
) {
    cmd.set_global_texture(BLIT_TEXTURE, from);
    cmd.set_render_target(
        to,
        LoadAction::DontCare,
        StoreAction::Store,
        None,
        ClearFlags::empty(),
        wgpu::Color::TRANSPARENT,
    );
    cmd.draw_procedural(material, pass);
}

/// Resolves an intermediate colour target into the camera target, restricted
/// to the camera's viewport.
pub fn final_blit_procedural(
    cmd: &mut CommandBuffer,
    from: RenderTargetId,
    to: RenderTargetId,
    viewport: PixelRect,
) {
    cmd.set_global_texture(BLIT_TEXTURE, from);
    cmd.set_render_target(
        to,
        LoadAction::Load,
        StoreAction::Store,
        None,
        ClearFlags::empty(),
        wgpu::Color::TRANSPARENT,
    );
    cmd.set_viewport(viewport);
    cmd.draw_procedural(Material::Blit, 0);
}

/// Binds colour (and optionally a separate depth) attachment.
///
/// Attachments that are cleared are loaded with `DontCare`; the rest are
/// loaded. `depth = None` uses the depth buffer attached to `color`.
pub fn set_render_target(
    cmd: &mut CommandBuffer,
    color: RenderTargetId,
    depth: Option<RenderTargetId>,
    clear: ClearFlags,
    clear_color: wgpu::Color,
) {
    let load_for = |flag: ClearFlags| {
        if clear.contains(flag) {
            LoadAction::DontCare
        } else {
            LoadAction::Load
        }
    };

    let depth = depth.map(|target| DepthAttachment {
        target,
        load: load_for(ClearFlags::DEPTH),
        store: StoreAction::Store,
    });

    cmd.set_render_target(
        color,
        load_for(ClearFlags::COLOR),
        StoreAction::Store,
        depth,
        clear,
        clear_color,
    );
}

/// Geometry draw settings for one shader tag.
#[must_use]
pub fn create_drawing_settings(
    tag: ShaderTag,
    sorting: SortingCriteria,
    per_object_data: PerObjectData,
    enable_dynamic_batching: bool,
    enable_instancing: bool,
) -> DrawingSettings {
    DrawingSettings {
        shader_tags: smallvec![tag],
        sorting,
        per_object_data,
        enable_dynamic_batching,
        enable_instancing,
    }
}
