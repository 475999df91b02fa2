//! Culling seam.
//!
//! Visibility determination is owned by the host. The pipeline only asks a
//! [`Culler`] for a [`VisibleGeometrySet`] per camera and treats the result as
//! opaque apart from the visible lights.

use crate::scene::{Camera, VisibleLight};

/// Parameters of one culling request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullingParameters {
    /// Distance up to which shadow casters are gathered.
    pub shadow_distance: f32,
    /// `false` when the shadow distance is (approximately) zero.
    pub cull_shadow_casters: bool,
}

impl CullingParameters {
    #[must_use]
    pub fn new(shadow_distance: f32) -> Self {
        Self {
            shadow_distance,
            cull_shadow_casters: shadow_distance.abs() > f32::EPSILON,
        }
    }
}

/// Culling result for one camera and one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleGeometrySet {
    /// Visible lights in visibility order.
    pub visible_lights: Vec<VisibleLight>,
    /// Lights that affect visible objects without being on screen.
    pub offscreen_light_count: usize,
    /// Number of visible renderers.
    pub renderer_count: usize,
    light_index_map: Option<Vec<i32>>,
}

impl VisibleGeometrySet {
    #[must_use]
    pub fn new(visible_lights: Vec<VisibleLight>) -> Self {
        Self {
            visible_lights,
            ..Default::default()
        }
    }

    /// Length of the per-object light index map.
    #[inline]
    #[must_use]
    pub fn light_index_map_len(&self) -> usize {
        self.visible_lights.len() + self.offscreen_light_count
    }

    /// Installs the remap used by per-object light indexing.
    pub fn set_light_index_map(&mut self, map: Vec<i32>) {
        self.light_index_map = Some(map);
    }

    #[must_use]
    pub fn light_index_map(&self) -> Option<&[i32]> {
        self.light_index_map.as_deref()
    }
}

/// Produces the visible set of a camera, or `None` when no culling frustum
/// can be built for it.
pub trait Culler {
    fn try_cull(
        &mut self,
        camera: &Camera,
        params: &CullingParameters,
    ) -> Option<VisibleGeometrySet>;

    /// Called once before the first camera of a frame is culled.
    fn begin_frame(&mut self) {}
}

/// Returns the same visible set for every camera with a usable frustum.
///
/// Useful for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCuller {
    pub geometry: VisibleGeometrySet,
    /// Parameters of every request of the current frame, in order.
    pub requests: Vec<CullingParameters>,
}

impl StaticCuller {
    #[must_use]
    pub fn new(geometry: VisibleGeometrySet) -> Self {
        Self {
            geometry,
            requests: Vec::new(),
        }
    }
}

impl Culler for StaticCuller {
    fn try_cull(
        &mut self,
        camera: &Camera,
        params: &CullingParameters,
    ) -> Option<VisibleGeometrySet> {
        self.requests.push(*params);
        let has_frustum = camera.pixel_width() > 0
            && camera.pixel_height() > 0
            && camera.near_clip > 0.0
            && camera.far_clip > camera.near_clip;
        has_frustum.then(|| self.geometry.clone())
    }

    fn begin_frame(&mut self) {
        self.requests.clear();
    }
}
