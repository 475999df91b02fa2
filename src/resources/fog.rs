//! Distance & height fog parameters.
//!
//! Fog is evaluated by the lit shaders; the pipeline only publishes the
//! `CUSTOM_FOG` keyword and a handful of global vectors.

use glam::Vec4;
use serde::{Deserialize, Serialize};

pub const FOG_KEYWORD: &str = "CUSTOM_FOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    pub enabled: bool,
    /// `0..=1`.
    pub thickness: f32,

    pub distance_color: Vec4,
    pub distance_start: f32,
    pub distance_end: f32,

    pub height_color: Vec4,
    /// `0..=1`.
    pub height_thickness: f32,
    pub height_base: f32,
    /// `0..=0.3`.
    pub height_falloff: f32,
    /// `0..=1`.
    pub height_distance_falloff: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            thickness: 1.0,
            distance_color: Vec4::new(0.1, 0.8, 0.9, 1.0),
            distance_start: 20.0,
            distance_end: 300.0,
            height_color: Vec4::new(0.1, 0.1, 0.95, 1.0),
            height_thickness: 1.0,
            height_base: 0.0,
            height_falloff: 0.1,
            height_distance_falloff: 0.1,
        }
    }
}

impl FogSettings {
    /// `_DistanceFogParams`; `z·d + w` is the linear fog factor at distance `d`.
    #[must_use]
    pub fn distance_params(&self) -> Vec4 {
        let distance = (self.distance_end - self.distance_start).max(1e-6);
        Vec4::new(0.0, 0.0, 1.0 / distance, -self.distance_start / distance)
    }

    /// `_HeightFogParams`.
    #[must_use]
    pub fn height_params(&self) -> Vec4 {
        Vec4::new(
            self.height_thickness,
            self.height_falloff,
            self.height_base,
            self.height_distance_falloff,
        )
    }
}
