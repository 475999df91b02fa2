//! Recorded Command Stream
//!
//! Every camera records its frame into a [`CommandBuffer`]: an ordered list of
//! [`RenderCommand`]s that a [`GraphicsBackend`](crate::renderer::GraphicsBackend)
//! executes on submit. The buffer also owns the camera's transient texture
//! namespace.
//!
//! # Transient Lifetime Discipline
//!
//! ```text
//! get_temporary(desc) ──► TransientTextureId ──► (bind / sample) ──► release_temporary(id)
//!        │                                                                  │
//!        └──────────── exactly once per allocation, before submit ──────────┘
//! ```
//!
//! Handles are generational `slotmap` keys, so a handle that has been
//! released can never alias a later allocation. Releasing twice, releasing an
//! unknown handle, or referencing a released handle as a render target or
//! shader texture are invariant violations (fatal in debug builds).

use std::borrow::Cow;

use bitflags::bitflags;
use glam::Vec4;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{RenderError, Result, report_invariant_violation};

// ─── Handles & Descriptors ────────────────────────────────────────────────────

slotmap::new_key_type! {
    /// Lightweight handle to a transient texture recorded in a [`CommandBuffer`].
    ///
    /// Valid between the `AllocateTransient` and `ReleaseTransient` commands
    /// that bracket it.
    pub struct TransientTextureId;
}

/// Descriptor for requesting a transient texture.
#[derive(Clone, Debug, PartialEq)]
pub struct TransientTextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub msaa_samples: u32,
    /// Bits of the depth buffer attached to a colour target (0 = none).
    pub depth_bits: u32,
    pub filter: wgpu::FilterMode,
    pub label: &'static str,
}

/// Identifies what a draw reads from or writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderTargetId {
    /// The camera's real output (backbuffer or its target texture).
    CameraTarget,
    /// An externally owned texture, such as a camera's render texture.
    Texture(u64),
    /// A transient texture owned by the current command buffer.
    Transient(TransientTextureId),
}

impl RenderTargetId {
    #[inline]
    #[must_use]
    pub fn transient(self) -> Option<TransientTextureId> {
        match self {
            Self::Transient(id) => Some(id),
            _ => None,
        }
    }
}

impl From<TransientTextureId> for RenderTargetId {
    fn from(id: TransientTextureId) -> Self {
        Self::Transient(id)
    }
}

/// What happens to attachment contents when a render target is bound.
///
/// Clearing is carried by the `clear` flags of the bind; a cleared
/// attachment is bound with `DontCare`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadAction {
    Load,
    DontCare,
}

/// What happens to attachment contents when a render target is unbound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreAction {
    Store,
    DontCare,
}

bitflags! {
    /// Which attachments a render-target bind clears.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const ALL = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

bitflags! {
    /// Per-object data the geometry draw must provide to shaders.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PerObjectData: u32 {
        const LIGHT_PROBE = 1 << 0;
        const REFLECTION_PROBES = 1 << 1;
        const LIGHTMAPS = 1 << 2;
        const OCCLUSION_PROBE = 1 << 3;
        const SHADOW_MASK = 1 << 4;
        const LIGHT_DATA = 1 << 5;
        const LIGHT_INDICES = 1 << 6;
    }
}

/// A depth attachment bound together with a colour attachment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthAttachment {
    pub target: RenderTargetId,
    pub load: LoadAction,
    pub store: StoreAction,
}

/// Pixel-space viewport rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// ─── Materials & Passes ───────────────────────────────────────────────────────

/// Materials used by full-screen procedural draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Plain copy shader used by camera-level blits.
    Blit,
    /// Multi-pass post-processing shader (see [`PostFxPass`]).
    PostFx,
    /// Uber composite shader (bloom + colour grading + vignette).
    Uber,
    /// Depth-of-field shader (see [`DofPass`]).
    DepthOfField,
}

/// Pass indices of the [`Material::PostFx`] shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PostFxPass {
    DepthStripes,
    Blur,
    BloomPrefilter,
    BloomHorizontal,
    BloomVertical,
    BloomScatter,
    BloomAdd,
    BloomScatterFinal,
    Copy,
    ColorGrading,
    ColorGradingAces,
    ColorGradingNeutral,
    Fxaa,
}

impl PostFxPass {
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// Pass indices of the [`Material::DepthOfField`] shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DofPass {
    CircleOfConfusion,
    Downsample,
    ScatterHorizontal,
    ScatterVertical,
    Composite,
}

impl DofPass {
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }
}

// ─── Geometry Draw Settings ───────────────────────────────────────────────────

/// Shader pass tag used to select which material passes a geometry draw runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderTag(pub &'static str);

impl ShaderTag {
    pub const SRP_DEFAULT_UNLIT: Self = Self("SRPDefaultUnlit");
    pub const CUSTOM_LIT: Self = Self("CustomLit");
    pub const DEPTH_ONLY: Self = Self("DepthOnly");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortingCriteria {
    /// Front-to-back, grouped by material.
    CommonOpaque,
    /// Back-to-front.
    CommonTransparent,
}

/// Render-queue window selected by a geometry draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderQueueRange {
    Opaque,
    Transparent,
}

impl RenderQueueRange {
    /// Inclusive queue bounds.
    #[must_use]
    pub const fn bounds(self) -> (u32, u32) {
        match self {
            Self::Opaque => (0, 2500),
            Self::Transparent => (2501, 5000),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawingSettings {
    pub shader_tags: SmallVec<[ShaderTag; 2]>,
    pub sorting: SortingCriteria,
    pub per_object_data: PerObjectData,
    pub enable_dynamic_batching: bool,
    pub enable_instancing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilteringSettings {
    pub queue_range: RenderQueueRange,
    pub rendering_layer_mask: u32,
}

// ─── Commands ─────────────────────────────────────────────────────────────────

/// A single recorded command.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    BeginSample(Cow<'static, str>),
    EndSample(Cow<'static, str>),

    AllocateTransient {
        id: TransientTextureId,
        desc: TransientTextureDesc,
    },
    ReleaseTransient {
        id: TransientTextureId,
    },

    SetRenderTarget {
        color: RenderTargetId,
        color_load: LoadAction,
        color_store: StoreAction,
        depth: Option<DepthAttachment>,
        clear: ClearFlags,
        clear_color: wgpu::Color,
    },
    SetViewport(PixelRect),

    /// Full-screen triangle with the given material pass.
    DrawProcedural {
        material: Material,
        pass: u32,
    },
    DrawRenderers {
        drawing: DrawingSettings,
        filtering: FilteringSettings,
    },
    DrawSkybox,

    SetGlobalInt {
        name: &'static str,
        value: i32,
    },
    SetGlobalFloat {
        name: &'static str,
        value: f32,
    },
    SetGlobalVector {
        name: &'static str,
        value: Vec4,
    },
    SetGlobalVectorArray {
        name: &'static str,
        values: Vec<Vec4>,
    },
    SetGlobalTexture {
        name: &'static str,
        texture: RenderTargetId,
    },
    SetGlobalKeyword {
        keyword: &'static str,
        enabled: bool,
    },

    SetMaterialVector {
        material: Material,
        name: &'static str,
        value: Vec4,
    },
    SetMaterialFloat {
        material: Material,
        name: &'static str,
        value: f32,
    },
    /// Disables every keyword on the material.
    ResetMaterialKeywords {
        material: Material,
    },
    EnableMaterialKeyword {
        material: Material,
        keyword: &'static str,
    },
}

/// Ordered command recorder with per-buffer transient texture tracking.
#[derive(Debug)]
pub struct CommandBuffer {
    name: &'static str,
    commands: Vec<RenderCommand>,
    live: SlotMap<TransientTextureId, TransientTextureDesc>,
    released: FxHashSet<TransientTextureId>,
}

impl CommandBuffer {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            commands: Vec::new(),
            live: SlotMap::with_key(),
            released: FxHashSet::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    // ── Transient textures ─────────────────────────────────────────────────

    /// Allocates a transient texture for the remainder of this buffer.
    pub fn get_temporary(&mut self, desc: TransientTextureDesc) -> TransientTextureId {
        let id = self.live.insert(desc.clone());
        log::trace!("[{}] allocate {} {}x{}", self.name, desc.label, desc.width, desc.height);
        self.commands.push(RenderCommand::AllocateTransient { id, desc });
        id
    }

    /// Releases a transient texture. Must be called exactly once per allocation.
    pub fn release_temporary(&mut self, id: TransientTextureId) {
        if self.live.remove(id).is_some() {
            self.released.insert(id);
            self.commands.push(RenderCommand::ReleaseTransient { id });
        } else if self.released.contains(&id) {
            report_invariant_violation(&RenderError::TransientDoubleRelease(id));
        } else {
            report_invariant_violation(&RenderError::TransientNotAllocated(id));
        }
    }

    /// Returns `true` while `id` is allocated and not yet released.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: TransientTextureId) -> bool {
        self.live.contains_key(id)
    }

    /// Returns the descriptor of a live transient texture.
    #[must_use]
    pub fn descriptor(&self, id: TransientTextureId) -> Option<&TransientTextureDesc> {
        self.live.get(id)
    }

    /// Number of transient textures currently allocated.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Checks that every allocation has been released.
    pub fn check_balanced(&self) -> Result<()> {
        if self.live.is_empty() {
            return Ok(());
        }
        Err(RenderError::TransientLeaked {
            count: self.live.len(),
            labels: self.live.values().map(|d| d.label).collect(),
        })
    }

    fn check_readable(&self, target: RenderTargetId, context: &'static str) {
        let Some(id) = target.transient() else {
            return;
        };
        if self.live.contains_key(id) {
            return;
        }
        if self.released.contains(&id) {
            report_invariant_violation(&RenderError::TransientReadAfterRelease { id, context });
        } else {
            report_invariant_violation(&RenderError::TransientNotAllocated(id));
        }
    }

    // ── Recording ──────────────────────────────────────────────────────────

    pub fn begin_sample(&mut self, name: impl Into<Cow<'static, str>>) {
        self.commands.push(RenderCommand::BeginSample(name.into()));
    }

    pub fn end_sample(&mut self, name: impl Into<Cow<'static, str>>) {
        self.commands.push(RenderCommand::EndSample(name.into()));
    }

    pub fn set_render_target(
        &mut self,
        color: RenderTargetId,
        color_load: LoadAction,
        color_store: StoreAction,
        depth: Option<DepthAttachment>,
        clear: ClearFlags,
        clear_color: wgpu::Color,
    ) {
        self.check_readable(color, "SetRenderTarget");
        if let Some(depth) = &depth {
            self.check_readable(depth.target, "SetRenderTarget");
        }
        self.commands.push(RenderCommand::SetRenderTarget {
            color,
            color_load,
            color_store,
            depth,
            clear,
            clear_color,
        });
    }

    pub fn set_viewport(&mut self, rect: PixelRect) {
        self.commands.push(RenderCommand::SetViewport(rect));
    }

    pub fn draw_procedural(&mut self, material: Material, pass: u32) {
        self.commands
            .push(RenderCommand::DrawProcedural { material, pass });
    }

    pub fn draw_renderers(&mut self, drawing: DrawingSettings, filtering: FilteringSettings) {
        self.commands
            .push(RenderCommand::DrawRenderers { drawing, filtering });
    }

    pub fn draw_skybox(&mut self) {
        self.commands.push(RenderCommand::DrawSkybox);
    }

    pub fn set_global_int(&mut self, name: &'static str, value: i32) {
        self.commands
            .push(RenderCommand::SetGlobalInt { name, value });
    }

    pub fn set_global_float(&mut self, name: &'static str, value: f32) {
        self.commands
            .push(RenderCommand::SetGlobalFloat { name, value });
    }

    pub fn set_global_vector(&mut self, name: &'static str, value: Vec4) {
        self.commands
            .push(RenderCommand::SetGlobalVector { name, value });
    }

    pub fn set_global_vector_array(&mut self, name: &'static str, values: &[Vec4]) {
        self.commands.push(RenderCommand::SetGlobalVectorArray {
            name,
            values: values.to_vec(),
        });
    }

    pub fn set_global_texture(&mut self, name: &'static str, texture: RenderTargetId) {
        self.check_readable(texture, name);
        self.commands
            .push(RenderCommand::SetGlobalTexture { name, texture });
    }

    pub fn set_global_keyword(&mut self, keyword: &'static str, enabled: bool) {
        self.commands
            .push(RenderCommand::SetGlobalKeyword { keyword, enabled });
    }

    pub fn set_material_vector(&mut self, material: Material, name: &'static str, value: Vec4) {
        self.commands.push(RenderCommand::SetMaterialVector {
            material,
            name,
            value,
        });
    }

    pub fn set_material_float(&mut self, material: Material, name: &'static str, value: f32) {
        self.commands.push(RenderCommand::SetMaterialFloat {
            material,
            name,
            value,
        });
    }

    pub fn reset_material_keywords(&mut self, material: Material) {
        self.commands
            .push(RenderCommand::ResetMaterialKeywords { material });
    }

    pub fn enable_material_keyword(&mut self, material: Material, keyword: &'static str) {
        self.commands
            .push(RenderCommand::EnableMaterialKeyword { material, keyword });
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new("Render Camera")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(label: &'static str) -> TransientTextureDesc {
        TransientTextureDesc {
            width: 64,
            height: 32,
            format: wgpu::TextureFormat::Rgba16Float,
            msaa_samples: 1,
            depth_bits: 0,
            filter: wgpu::FilterMode::Linear,
            label,
        }
    }

    #[test]
    fn allocate_then_release_restores_tracking_state() {
        let mut cmd = CommandBuffer::new("test");
        assert!(cmd.check_balanced().is_ok());

        let id = cmd.get_temporary(desc("a"));
        assert!(cmd.is_live(id));
        assert!(cmd.check_balanced().is_err());

        cmd.set_global_texture("_Source", id.into());
        cmd.release_temporary(id);
        assert!(!cmd.is_live(id));
        assert_eq!(cmd.live_count(), 0);
        assert!(cmd.check_balanced().is_ok());
    }

    #[test]
    fn released_handles_are_never_reused() {
        let mut cmd = CommandBuffer::new("test");
        let first = cmd.get_temporary(desc("a"));
        cmd.release_temporary(first);
        let second = cmd.get_temporary(desc("b"));
        assert_ne!(first, second);
        assert!(!cmd.is_live(first));
        assert!(cmd.is_live(second));
    }

    #[test]
    fn leak_report_lists_labels() {
        let mut cmd = CommandBuffer::new("test");
        let _ = cmd.get_temporary(desc("leaky"));
        match cmd.check_balanced() {
            Err(RenderError::TransientLeaked { count, labels }) => {
                assert_eq!(count, 1);
                assert_eq!(labels, vec!["leaky"]);
            }
            other => panic!("expected leak, got {other:?}"),
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "released more than once")]
    fn double_release_is_fatal_in_debug() {
        let mut cmd = CommandBuffer::new("test");
        let id = cmd.get_temporary(desc("a"));
        cmd.release_temporary(id);
        cmd.release_temporary(id);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "read after release")]
    fn read_after_release_is_fatal_in_debug() {
        let mut cmd = CommandBuffer::new("test");
        let id = cmd.get_temporary(desc("a"));
        cmd.release_temporary(id);
        cmd.set_global_texture("_Source", id.into());
    }

    #[test]
    fn queue_ranges_do_not_overlap() {
        let (_, opaque_end) = RenderQueueRange::Opaque.bounds();
        let (transparent_start, _) = RenderQueueRange::Transparent.bounds();
        assert!(opaque_end < transparent_start);
    }
}
