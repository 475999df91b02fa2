//! Depth-of-field lens configuration (thin-lens model).

use glam::Vec4;
use serde::{Deserialize, Serialize};

const COC_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOfFieldSettings {
    pub enabled: bool,
    /// Metres, at least 0.1.
    pub focus_distance: f32,
    /// f-number, `1..=32`.
    pub aperture: f32,
    /// Millimetres, `1..=300`.
    pub focal_length: f32,
    /// Maximum blur radius in pixels, `1..=15`.
    pub max_radius: f32,
}

impl Default for DepthOfFieldSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            focus_distance: 10.0,
            aperture: 5.6,
            focal_length: 50.0,
            max_radius: 4.0,
        }
    }
}

impl DepthOfFieldSettings {
    /// Largest circle of confusion, `(A·F) / (P − F)`.
    ///
    /// `F` is the focal length in metres, `A = focal_length / aperture` and `P`
    /// the focus distance. Returns `None` when the lens range is degenerate
    /// (focus at or inside the focal length, or a zero aperture).
    #[must_use]
    pub fn max_coc(&self) -> Option<f32> {
        if self.aperture <= COC_EPSILON {
            return None;
        }
        let f = self.focal_length / 1000.0;
        let a = self.focal_length / self.aperture;
        let range = self.focus_distance - f;
        if range <= COC_EPSILON {
            return None;
        }
        Some(a * f / range)
    }

    /// `_CoCParams` for a `width × height` target, or `None` when the stage
    /// must be skipped.
    #[must_use]
    pub fn coc_params(&self, width: u32, height: u32) -> Option<Vec4> {
        if !self.enabled || width == 0 || height == 0 {
            return None;
        }
        let max_coc = self.max_coc()?;
        let height = height as f32;
        let rcp_aspect = height / width as f32;
        let max_radius = (self.max_radius / height).min(0.05);
        Some(Vec4::new(self.focus_distance, max_coc, max_radius, rcp_aspect))
    }
}
