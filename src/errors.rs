//! Error Types
//!
//! This module defines the error types used throughout the render pipeline.
//!
//! # Overview
//!
//! The main error type [`RenderError`] covers two very different families:
//!
//! - **Configuration failures** (settings files that do not parse or carry
//!   out-of-range values). These are returned to the caller as `Err`.
//! - **Transient resource invariants** (double release, read after release,
//!   leaked handles at submit). These are programmer errors: they are routed
//!   through [`report_invariant_violation`], which panics in debug builds and
//!   logs in release builds. Nothing in the frame loop tries to recover from
//!   them.
//!
//! An unavailable culling frustum is *not* an error; the orchestrator skips
//! the camera silently.

use thiserror::Error;

use crate::renderer::graph::command::TransientTextureId;

/// The main error type for the render pipeline.
#[derive(Error, Debug)]
pub enum RenderError {
    // ========================================================================
    // Transient Resource Invariants
    // ========================================================================
    /// A transient texture handle was used or released without being allocated
    /// in the current command buffer.
    #[error("Transient texture {0:?} was never allocated in this command buffer")]
    TransientNotAllocated(TransientTextureId),

    /// A transient texture handle was released twice.
    #[error("Transient texture {0:?} released more than once")]
    TransientDoubleRelease(TransientTextureId),

    /// A transient texture handle was referenced after its release.
    #[error("Transient texture {id:?} read after release by '{context}'")]
    TransientReadAfterRelease {
        /// The stale handle.
        id: TransientTextureId,
        /// The command that referenced it.
        context: &'static str,
    },

    /// Transient textures were still live when the command stream was submitted.
    #[error("{count} transient texture(s) still allocated at submit: {labels:?}")]
    TransientLeaked {
        /// Number of leaked allocations.
        count: usize,
        /// Debug labels of the leaked allocations.
        labels: Vec<&'static str>,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value is outside its supported range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// JSON parsing error while loading settings.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error while loading settings.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Reports a broken transient-resource invariant.
///
/// Fatal when `debug_assertions` are enabled. Release builds log the error and
/// keep going; the frame that triggered it has undefined GPU contents.
#[track_caller]
pub fn report_invariant_violation(err: &RenderError) {
    if cfg!(debug_assertions) {
        panic!("render pipeline invariant violated: {err}");
    }
    log::error!("render pipeline invariant violated: {err}");
}
