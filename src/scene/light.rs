//! Visible light records produced by culling.

use glam::{Mat4, Vec4};

/// Light classification used for packing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point,
    Spot {
        /// Full inner cone angle in degrees.
        inner_angle: f32,
        /// Full outer cone angle in degrees.
        outer_angle: f32,
    },
    /// Baked-only area light. Never packed.
    Area,
}

/// One light that survived culling for the current camera.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLight {
    /// Stable identifier of the scene light, passed to the shadow renderer.
    pub id: u64,
    pub kind: LightKind,
    /// Colour already multiplied by intensity and converted to linear space.
    pub final_color: Vec4,
    /// Authored intensity, used to pick the main light.
    pub intensity: f32,
    pub local_to_world: Mat4,
    pub range: f32,
}

impl VisibleLight {
    #[must_use]
    pub fn directional(id: u64, final_color: Vec4, intensity: f32, local_to_world: Mat4) -> Self {
        Self {
            id,
            kind: LightKind::Directional,
            final_color,
            intensity,
            local_to_world,
            range: 0.0,
        }
    }

    #[must_use]
    pub fn point(id: u64, final_color: Vec4, local_to_world: Mat4, range: f32) -> Self {
        Self {
            id,
            kind: LightKind::Point,
            final_color,
            intensity: final_color.truncate().max_element(),
            local_to_world,
            range,
        }
    }

    #[must_use]
    pub fn spot(
        id: u64,
        final_color: Vec4,
        local_to_world: Mat4,
        range: f32,
        inner_angle: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            id,
            kind: LightKind::Spot {
                inner_angle,
                outer_angle,
            },
            final_color,
            intensity: final_color.truncate().max_element(),
            local_to_world,
            range,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_directional(&self) -> bool {
        matches!(self.kind, LightKind::Directional)
    }

    /// Direction the light shines along (negated local Z axis).
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Vec4 {
        -self.local_to_world.z_axis
    }

    /// World position with `w = 1 / max(range², 1e-5)`.
    #[inline]
    #[must_use]
    pub fn position_and_inverse_range_sq(&self) -> Vec4 {
        let inv_range_sq = 1.0 / (self.range * self.range).max(1e-5);
        self.local_to_world.w_axis.truncate().extend(inv_range_sq)
    }
}
