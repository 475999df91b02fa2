//! Graphics Backend
//!
//! The pipeline never talks to a GPU directly: each camera's recorded
//! [`CommandBuffer`] is handed to a [`GraphicsBackend`] on submit.
//!
//! [`RecordingBackend`] is the in-crate implementation used for headless runs
//! and tests. It replays every submission against a [`TransientTexturePool`]
//! (so logical transient handles are backed by recycled physical textures),
//! tracks global shader state and keeps the submitted streams of the most
//! recent frame for inspection. Streams of earlier frames are dropped when the
//! next frame's first camera is submitted.
//!
//! # Global Shader State
//!
//! Global ints, floats, vectors, arrays and keywords are process-wide: a later
//! submission overwrites what an earlier one wrote. With several cameras per
//! frame, the last camera wins for any global-only value.

use glam::Vec4;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{RenderError, report_invariant_violation};
use crate::renderer::graph::command::{
    CommandBuffer, Material, RenderCommand, RenderTargetId, TransientTextureId,
};
use crate::renderer::graph::transient_pool::{PhysicalTextureId, TransientTexturePool};

/// Executes recorded command streams.
pub trait GraphicsBackend {
    fn submit(&mut self, commands: CommandBuffer);

    /// Called once after every camera of a frame has been submitted.
    fn end_frame(&mut self) {}
}

/// Process-wide shader globals as left by the last submission.
#[derive(Debug, Default)]
pub struct GlobalShaderState {
    ints: FxHashMap<&'static str, i32>,
    floats: FxHashMap<&'static str, f32>,
    vectors: FxHashMap<&'static str, Vec4>,
    vector_arrays: FxHashMap<&'static str, Vec<Vec4>>,
    keywords: FxHashSet<&'static str>,
    material_vectors: FxHashMap<(Material, &'static str), Vec4>,
    material_floats: FxHashMap<(Material, &'static str), f32>,
    material_keywords: FxHashMap<Material, FxHashSet<&'static str>>,
}

impl GlobalShaderState {
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i32> {
        self.ints.get(name).copied()
    }

    #[must_use]
    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    #[must_use]
    pub fn vector(&self, name: &str) -> Option<Vec4> {
        self.vectors.get(name).copied()
    }

    #[must_use]
    pub fn vector_array(&self, name: &str) -> Option<&[Vec4]> {
        self.vector_arrays.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn keyword_enabled(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn material_vector(&self, material: Material, name: &'static str) -> Option<Vec4> {
        self.material_vectors.get(&(material, name)).copied()
    }

    #[must_use]
    pub fn material_float(&self, material: Material, name: &'static str) -> Option<f32> {
        self.material_floats.get(&(material, name)).copied()
    }

    #[must_use]
    pub fn material_keyword_enabled(&self, material: Material, keyword: &str) -> bool {
        self.material_keywords
            .get(&material)
            .is_some_and(|set| set.contains(keyword))
    }
}

/// Headless backend that records and replays submissions.
pub struct RecordingBackend {
    pool: TransientTexturePool,
    /// Physical textures bound to the transient handles of the submission
    /// being replayed.
    bindings: FxHashMap<TransientTextureId, PhysicalTextureId>,
    globals: GlobalShaderState,
    /// Streams of the current frame, or of the last one until the next
    /// submission.
    submissions: Vec<CommandBuffer>,
    frame_ended: bool,
    uploaded_bytes: usize,
    draw_count: usize,
    frame_count: u64,
    max_idle_frames: u32,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: TransientTexturePool::new(),
            bindings: FxHashMap::default(),
            globals: GlobalShaderState::default(),
            submissions: Vec::new(),
            frame_ended: false,
            uploaded_bytes: 0,
            draw_count: 0,
            frame_count: 0,
            max_idle_frames: 8,
        }
    }

    /// Frames a free pooled texture survives before it is trimmed.
    #[must_use]
    pub fn with_max_idle_frames(mut self, frames: u32) -> Self {
        self.max_idle_frames = frames;
        self
    }

    #[inline]
    #[must_use]
    pub fn globals(&self) -> &GlobalShaderState {
        &self.globals
    }

    #[inline]
    #[must_use]
    pub fn pool(&self) -> &TransientTexturePool {
        &self.pool
    }

    #[inline]
    #[must_use]
    pub fn submissions(&self) -> &[CommandBuffer] {
        &self.submissions
    }

    #[must_use]
    pub fn last_submission(&self) -> Option<&CommandBuffer> {
        self.submissions.last()
    }

    /// Drains the recorded submissions of the current or last frame.
    pub fn take_submissions(&mut self) -> Vec<CommandBuffer> {
        std::mem::take(&mut self.submissions)
    }

    /// Bytes of uniform data uploaded through global vector arrays.
    #[inline]
    #[must_use]
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    #[inline]
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn resolve(&self, target: RenderTargetId, context: &'static str) {
        if let RenderTargetId::Transient(id) = target
            && !self.bindings.contains_key(&id)
        {
            report_invariant_violation(&RenderError::TransientReadAfterRelease { id, context });
        }
    }

    fn replay(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::AllocateTransient { id, desc } => {
                let physical = self.pool.allocate(desc);
                self.bindings.insert(*id, physical);
            }
            RenderCommand::ReleaseTransient { id } => match self.bindings.remove(id) {
                Some(physical) => {
                    self.pool.release(physical);
                }
                None => report_invariant_violation(&RenderError::TransientNotAllocated(*id)),
            },
            RenderCommand::SetRenderTarget { color, depth, .. } => {
                self.resolve(*color, "SetRenderTarget");
                if let Some(depth) = depth {
                    self.resolve(depth.target, "SetRenderTarget");
                }
            }
            RenderCommand::SetGlobalTexture { name, texture } => self.resolve(*texture, *name),
            RenderCommand::DrawProcedural { .. }
            | RenderCommand::DrawRenderers { .. }
            | RenderCommand::DrawSkybox => self.draw_count += 1,
            RenderCommand::SetGlobalInt { name, value } => {
                self.globals.ints.insert(*name, *value);
            }
            RenderCommand::SetGlobalFloat { name, value } => {
                self.globals.floats.insert(*name, *value);
            }
            RenderCommand::SetGlobalVector { name, value } => {
                self.globals.vectors.insert(*name, *value);
            }
            RenderCommand::SetGlobalVectorArray { name, values } => {
                self.uploaded_bytes += bytemuck::cast_slice::<Vec4, u8>(values).len();
                self.globals.vector_arrays.insert(*name, values.clone());
            }
            RenderCommand::SetGlobalKeyword { keyword, enabled } => {
                if *enabled {
                    self.globals.keywords.insert(*keyword);
                } else {
                    self.globals.keywords.remove(*keyword);
                }
            }
            RenderCommand::SetMaterialVector {
                material,
                name,
                value,
            } => {
                self.globals
                    .material_vectors
                    .insert((*material, *name), *value);
            }
            RenderCommand::SetMaterialFloat {
                material,
                name,
                value,
            } => {
                self.globals.material_floats.insert((*material, *name), *value);
            }
            RenderCommand::ResetMaterialKeywords { material } => {
                self.globals.material_keywords.remove(material);
            }
            RenderCommand::EnableMaterialKeyword { material, keyword } => {
                self.globals
                    .material_keywords
                    .entry(*material)
                    .or_default()
                    .insert(*keyword);
            }
            RenderCommand::BeginSample(_)
            | RenderCommand::EndSample(_)
            | RenderCommand::SetViewport(_) => {}
        }
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for RecordingBackend {
    fn submit(&mut self, commands: CommandBuffer) {
        if std::mem::take(&mut self.frame_ended) {
            self.submissions.clear();
        }
        log::trace!(
            "submit '{}': {} commands",
            commands.name(),
            commands.len()
        );
        for command in commands.commands() {
            self.replay(command);
        }

        if !self.bindings.is_empty() {
            report_invariant_violation(&RenderError::TransientLeaked {
                count: self.bindings.len(),
                labels: Vec::new(),
            });
            for (_, physical) in self.bindings.drain() {
                self.pool.release(physical);
            }
        }

        self.submissions.push(commands);
    }

    fn end_frame(&mut self) {
        self.frame_count += 1;
        self.frame_ended = true;
        self.pool.trim(self.max_idle_frames);
    }
}
