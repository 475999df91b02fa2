//! Post-Effect Node Trait
//!
//! Every ping-ponged post stage implements [`RenderNode`]. The stack asks
//! each node whether it is enabled for the current settings, hands it the
//! current `(source, destination)` pair and swaps the pair afterwards.
//!
//! Nodes are stateless: all per-frame data comes through the
//! [`PostFxContext`]. Any transient texture a node allocates beyond the
//! destination it was given must be released before `run` returns.

use super::command::RenderTargetId;
use super::context::PostFxContext;

pub trait RenderNode {
    /// Profiling sample name.
    fn name(&self) -> &'static str;

    fn is_enabled(&self, ctx: &PostFxContext) -> bool;

    /// Reads `source`, writes `destination`.
    fn run(&self, ctx: &mut PostFxContext, source: RenderTargetId, destination: RenderTargetId);
}
