//! Render Pipeline
//!
//! [`RenderPipeline`] is the entry point a host drives once per frame. It
//! owns the global settings, the injected collaborators and the backend, and
//! renders the frame's cameras in order.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumen::renderer::{RenderPipeline, RecordingBackend, RendererSettings};
//! use lumen::renderer::culling::StaticCuller;
//!
//! let mut pipeline = RenderPipeline::new(RendererSettings::default(), RecordingBackend::new())?
//!     .with_culler(StaticCuller::default());
//!
//! // Each frame
//! pipeline.render(&cameras);
//!
//! // Between frames
//! pipeline.reload_settings_from_json_file("pipeline.json")?;
//! ```
//!
//! Cameras share nothing but the global shader state: light arrays and fog
//! globals written by a later camera replace those of an earlier one.

use std::path::Path;

use crate::errors::Result;
use crate::renderer::backend::GraphicsBackend;
use crate::renderer::camera_renderer::{CameraRenderer, FrameServices};
use crate::renderer::culling::{Culler, StaticCuller};
use crate::renderer::environment::{DefaultEnvironment, EnvironmentPolicy};
use crate::renderer::settings::RendererSettings;
use crate::renderer::shadows::{NoShadows, ShadowRenderer};
use crate::scene::Camera;

pub struct RenderPipeline<B: GraphicsBackend> {
    settings: RendererSettings,
    env: Box<dyn EnvironmentPolicy>,
    culler: Box<dyn Culler>,
    shadows: Box<dyn ShadowRenderer>,
    backend: B,
    renderer: CameraRenderer,
}

impl<B: GraphicsBackend> RenderPipeline<B> {
    /// A pipeline with the default environment, an empty static culler and
    /// no shadows.
    ///
    /// Fails with [`RenderError::InvalidSettings`] when `settings` are out of
    /// range.
    ///
    /// [`RenderError::InvalidSettings`]: crate::errors::RenderError::InvalidSettings
    pub fn new(settings: RendererSettings, backend: B) -> Result<Self> {
        settings.validate()?;
        let renderer = CameraRenderer::new(&settings);
        Ok(Self {
            settings,
            env: Box::new(DefaultEnvironment),
            culler: Box::new(StaticCuller::default()),
            shadows: Box::new(NoShadows),
            backend,
            renderer,
        })
    }

    #[must_use]
    pub fn with_environment(mut self, env: impl EnvironmentPolicy + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    #[must_use]
    pub fn with_culler(mut self, culler: impl Culler + 'static) -> Self {
        self.culler = Box::new(culler);
        self
    }

    #[must_use]
    pub fn with_shadows(mut self, shadows: impl ShadowRenderer + 'static) -> Self {
        self.shadows = Box::new(shadows);
        self
    }

    /// Renders every camera in order, then ends the backend frame.
    ///
    /// Returns the number of cameras that were submitted.
    pub fn render(&mut self, cameras: &[Camera]) -> usize {
        self.culler.begin_frame();
        let mut services = FrameServices {
            env: self.env.as_ref(),
            culler: self.culler.as_mut(),
            shadows: self.shadows.as_mut(),
            backend: &mut self.backend,
        };

        let mut submitted = 0;
        for camera in cameras {
            if self.renderer.render(camera, &self.settings, &mut services) {
                submitted += 1;
            }
        }
        self.backend.end_frame();

        log::trace!("frame rendered {submitted}/{} cameras", cameras.len());
        submitted
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Replaces the settings after validating them.
    pub fn set_settings(&mut self, settings: RendererSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Reloads settings from JSON. On error the current settings are kept.
    pub fn reload_settings_from_json_str(&mut self, json: &str) -> Result<()> {
        self.settings = RendererSettings::from_json_str(json)?;
        log::debug!("renderer settings reloaded");
        Ok(())
    }

    pub fn reload_settings_from_json_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.settings = RendererSettings::from_json_file(path)?;
        log::debug!("renderer settings reloaded");
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    #[must_use]
    pub fn camera_renderer(&self) -> &CameraRenderer {
        &self.renderer
    }
}
