//! Skybox pass. Drawn between opaque and transparent geometry, only for
//! cameras that clear to the skybox and have one assigned.

use crate::renderer::graph::command::CommandBuffer;
use crate::renderer::graph::frame::CameraFrameContext;

pub struct SkyboxPass;

impl SkyboxPass {
    pub fn run(cmd: &mut CommandBuffer, frame: &CameraFrameContext) {
        if frame.draw_skybox {
            cmd.draw_skybox();
        }
    }
}
