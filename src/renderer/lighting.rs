//! Light Packing
//!
//! Turns the visible lights of one camera into the fixed-capacity arrays the
//! lit shaders read:
//!
//! ```text
//! visible lights ─► main light ─► slot 0 of the directional arrays
//!                └► remaining lights, visibility order
//!                     ├─ Directional ─► next directional slot (index map: -1)
//!                     ├─ Point/Spot  ─► next other slot       (index map: slot)
//!                     └─ Area / over capacity ─► dropped      (index map: -1)
//! ```
//!
//! The arrays live in a [`LightBuffer`] owned by the [`LightPacker`]. Every
//! call to [`LightPacker::pack`] zeroes them first, so a frame with fewer
//! lights never sees stale rows from an earlier frame.
//!
//! Directional slot 0 is always reported as populated: with no directional
//! light at all it holds a black light facing `+Z` with shadows disabled.

use glam::Vec4;

use crate::renderer::culling::VisibleGeometrySet;
use crate::renderer::graph::command::CommandBuffer;
use crate::renderer::settings::{LightLimits, ShadowSettings};
use crate::renderer::shadows::{NO_SHADOW, ShadowRenderer};
use crate::resources::fog::{FOG_KEYWORD, FogSettings};
use crate::scene::{LightKind, VisibleLight};

pub const DIRECTIONAL_LIGHT_COUNT: &str = "_DirectionalLightCount";
pub const DIRECTIONAL_LIGHT_COLORS: &str = "_DirectionalLightColors";
pub const DIRECTIONAL_LIGHT_DIRECTIONS: &str = "_DirectionalLightDirections";
pub const DIRECTIONAL_LIGHT_SHADOW_DATA: &str = "_DirectionalLightShadowData";

pub const OTHER_LIGHT_COUNT: &str = "_OtherLightCount";
pub const OTHER_LIGHT_COLORS: &str = "_OtherLightColors";
pub const OTHER_LIGHT_POSITIONS: &str = "_OtherLightPositions";
pub const OTHER_LIGHT_DIRECTIONS: &str = "_OtherLightDirections";
pub const OTHER_LIGHT_SPOT_ANGLES: &str = "_OtherLightSpotAngles";
pub const OTHER_LIGHT_SHADOW_DATA: &str = "_OtherLightShadowData";

pub const LIGHTS_PER_OBJECT_KEYWORD: &str = "_LIGHTS_PER_OBJECT";

pub const FOG_THICKNESS: &str = "_FogThickness";
pub const DISTANCE_FOG_PARAMS: &str = "_DistanceFogParams";
pub const DISTANCE_FOG_COLOR: &str = "_DistanceFogColor";
pub const HEIGHT_FOG_PARAMS: &str = "_HeightFogParams";
pub const HEIGHT_FOG_COLOR: &str = "_HeightFogColor";

/// Direction of the fallback directional light.
const FALLBACK_DIRECTION: Vec4 = Vec4::new(0.0, 0.0, 1.0, 0.0);
/// Spot parameters of a point light: no angular falloff.
const POINT_SPOT_ANGLES: Vec4 = Vec4::new(0.0, 1.0, 0.0, 0.0);
/// Lower bound of `cos(inner) - cos(outer)`.
const MIN_SPOT_ANGLE_RANGE: f32 = 0.001;

// ============================================================================
// Light Buffer
// ============================================================================

/// Fixed-capacity light arrays for one frame.
///
/// Array lengths never change after construction; only the counts do.
#[derive(Debug, Clone, PartialEq)]
pub struct LightBuffer {
    pub directional_count: usize,
    pub directional_colors: Vec<Vec4>,
    pub directional_directions: Vec<Vec4>,
    pub directional_shadow_data: Vec<Vec4>,

    pub other_count: usize,
    pub other_colors: Vec<Vec4>,
    /// World position, `w = 1 / max(range², 1e-5)`.
    pub other_positions: Vec<Vec4>,
    pub other_directions: Vec<Vec4>,
    /// `(1 / (cos inner - cos outer), -cos outer / (cos inner - cos outer), 0, 0)`.
    pub other_spot_angles: Vec<Vec4>,
    pub other_shadow_data: Vec<Vec4>,
}

impl LightBuffer {
    #[must_use]
    pub fn new(limits: LightLimits) -> Self {
        let dir = limits.max_directional_lights.max(1);
        let other = limits.max_other_lights;
        Self {
            directional_count: 0,
            directional_colors: vec![Vec4::ZERO; dir],
            directional_directions: vec![Vec4::ZERO; dir],
            directional_shadow_data: vec![Vec4::ZERO; dir],
            other_count: 0,
            other_colors: vec![Vec4::ZERO; other],
            other_positions: vec![Vec4::ZERO; other],
            other_directions: vec![Vec4::ZERO; other],
            other_spot_angles: vec![Vec4::ZERO; other],
            other_shadow_data: vec![Vec4::ZERO; other],
        }
    }

    #[inline]
    #[must_use]
    pub fn directional_capacity(&self) -> usize {
        self.directional_colors.len()
    }

    #[inline]
    #[must_use]
    pub fn other_capacity(&self) -> usize {
        self.other_colors.len()
    }

    /// Zeroes every row and both counts.
    pub fn reset(&mut self) {
        self.directional_count = 0;
        self.other_count = 0;
        for array in [
            &mut self.directional_colors,
            &mut self.directional_directions,
            &mut self.directional_shadow_data,
            &mut self.other_colors,
            &mut self.other_positions,
            &mut self.other_directions,
            &mut self.other_spot_angles,
            &mut self.other_shadow_data,
        ] {
            array.fill(Vec4::ZERO);
        }
    }

    /// Directional count as seen by shaders: never zero.
    #[inline]
    #[must_use]
    pub fn reported_directional_count(&self) -> usize {
        self.directional_count.max(1)
    }

    /// Raw bytes of the directional colour array, as uploaded.
    #[must_use]
    pub fn directional_colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.directional_colors)
    }

    /// Raw bytes of the other-light position array, as uploaded.
    #[must_use]
    pub fn other_positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.other_positions)
    }

    fn push_directional(&mut self, light: &VisibleLight, shadow: Vec4) {
        let slot = self.directional_count;
        self.directional_colors[slot] = light.final_color;
        self.directional_directions[slot] = light.direction();
        self.directional_shadow_data[slot] = shadow;
        self.directional_count += 1;
    }

    fn push_other(&mut self, light: &VisibleLight, shadow: Vec4) -> usize {
        let slot = self.other_count;
        self.other_colors[slot] = light.final_color;
        self.other_positions[slot] = light.position_and_inverse_range_sq();
        match light.kind {
            LightKind::Spot {
                inner_angle,
                outer_angle,
            } => {
                self.other_directions[slot] = light.direction();
                self.other_spot_angles[slot] = spot_angle_params(inner_angle, outer_angle);
            }
            _ => self.other_spot_angles[slot] = POINT_SPOT_ANGLES,
        }
        self.other_shadow_data[slot] = shadow;
        self.other_count += 1;
        slot
    }

    fn write_fallback_directional(&mut self) {
        self.directional_colors[0] = Vec4::new(0.0, 0.0, 0.0, 1.0);
        self.directional_directions[0] = FALLBACK_DIRECTION;
        self.directional_shadow_data[0] = NO_SHADOW;
    }
}

/// Spot falloff `(a, b)` such that `saturate(dot · a + b)` is the cone
/// attenuation. Angles are full cone angles in degrees.
#[must_use]
pub fn spot_angle_params(inner_angle: f32, outer_angle: f32) -> Vec4 {
    let inner_cos = (0.5 * inner_angle).to_radians().cos();
    let outer_cos = (0.5 * outer_angle).to_radians().cos();
    let inv_range = 1.0 / (inner_cos - outer_cos).max(MIN_SPOT_ANGLE_RANGE);
    Vec4::new(inv_range, -outer_cos * inv_range, 0.0, 0.0)
}

/// Index of the directional light with strictly greatest intensity.
///
/// Ties go to the earliest light. Lights with zero intensity never qualify.
#[must_use]
pub fn main_light_index(lights: &[VisibleLight]) -> Option<usize> {
    let mut brightest = None;
    let mut brightest_intensity = 0.0;
    for (i, light) in lights.iter().enumerate() {
        if light.is_directional() && light.intensity > brightest_intensity {
            brightest_intensity = light.intensity;
            brightest = Some(i);
        }
    }
    brightest
}

// ============================================================================
// Light Packer
// ============================================================================

/// Owns the light arrays and fills them from a visible set every frame.
#[derive(Debug, Clone)]
pub struct LightPacker {
    buffer: LightBuffer,
}

impl LightPacker {
    #[must_use]
    pub fn new(limits: LightLimits) -> Self {
        Self {
            buffer: LightBuffer::new(limits),
        }
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &LightBuffer {
        &self.buffer
    }

    /// Resizes the arrays when the limits changed between frames.
    pub fn set_limits(&mut self, limits: LightLimits) {
        let resized = LightBuffer::new(limits);
        if resized.directional_capacity() != self.buffer.directional_capacity()
            || resized.other_capacity() != self.buffer.other_capacity()
        {
            self.buffer = resized;
        }
    }

    /// Packs `lights` and returns the per-object index map when requested.
    ///
    /// The map has `index_map_len` entries (at least one per visible light);
    /// the region past the visible lights is filled with `-1`.
    pub fn pack(
        &mut self,
        lights: &[VisibleLight],
        index_map_len: Option<usize>,
        shadows: &mut dyn ShadowRenderer,
    ) -> Option<Vec<i32>> {
        self.buffer.reset();
        let mut index_map = index_map_len.map(|len| vec![-1; len.max(lights.len())]);

        let main = main_light_index(lights);
        if let Some(main) = main {
            let light = &lights[main];
            let shadow = shadows.reserve_directional_shadows(light, main);
            self.buffer.push_directional(light, shadow);
        }

        for (i, light) in lights.iter().enumerate() {
            if Some(i) == main {
                continue;
            }
            let packed_slot = match light.kind {
                LightKind::Directional => {
                    if self.buffer.directional_count < self.buffer.directional_capacity() {
                        let shadow = shadows.reserve_directional_shadows(light, i);
                        self.buffer.push_directional(light, shadow);
                    }
                    None
                }
                LightKind::Point | LightKind::Spot { .. } => {
                    if self.buffer.other_count < self.buffer.other_capacity() {
                        let shadow = shadows.reserve_other_shadows(light, i);
                        Some(self.buffer.push_other(light, shadow))
                    } else {
                        None
                    }
                }
                LightKind::Area => None,
            };
            if let (Some(map), Some(slot)) = (index_map.as_mut(), packed_slot) {
                map[i] = slot as i32;
            }
        }

        if self.buffer.directional_count == 0 {
            self.buffer.write_fallback_directional();
        }

        log::trace!(
            "packed {} directional / {} other lights from {} visible",
            self.buffer.directional_count,
            self.buffer.other_count,
            lights.len()
        );
        index_map
    }

    /// Records the packed arrays as global shader data.
    ///
    /// Other-light arrays are only uploaded when at least one is packed; the
    /// count is always written.
    pub fn upload(&self, cmd: &mut CommandBuffer) {
        let buffer = &self.buffer;
        cmd.set_global_int(DIRECTIONAL_LIGHT_COUNT, buffer.reported_directional_count() as i32);
        cmd.set_global_vector_array(DIRECTIONAL_LIGHT_COLORS, &buffer.directional_colors);
        cmd.set_global_vector_array(DIRECTIONAL_LIGHT_DIRECTIONS, &buffer.directional_directions);
        cmd.set_global_vector_array(DIRECTIONAL_LIGHT_SHADOW_DATA, &buffer.directional_shadow_data);

        cmd.set_global_int(OTHER_LIGHT_COUNT, buffer.other_count as i32);
        if buffer.other_count > 0 {
            cmd.set_global_vector_array(OTHER_LIGHT_COLORS, &buffer.other_colors);
            cmd.set_global_vector_array(OTHER_LIGHT_POSITIONS, &buffer.other_positions);
            cmd.set_global_vector_array(OTHER_LIGHT_DIRECTIONS, &buffer.other_directions);
            cmd.set_global_vector_array(OTHER_LIGHT_SPOT_ANGLES, &buffer.other_spot_angles);
            cmd.set_global_vector_array(OTHER_LIGHT_SHADOW_DATA, &buffer.other_shadow_data);
        }
    }
}

// ============================================================================
// Lighting Step
// ============================================================================

/// The lighting step of a camera frame: shadows, light packing and fog.
#[derive(Debug, Clone)]
pub struct Lighting {
    packer: LightPacker,
}

impl Lighting {
    pub const NAME: &'static str = "Lighting";

    #[must_use]
    pub fn new(limits: LightLimits) -> Self {
        Self {
            packer: LightPacker::new(limits),
        }
    }

    #[inline]
    #[must_use]
    pub fn packer(&self) -> &LightPacker {
        &self.packer
    }

    #[inline]
    pub fn packer_mut(&mut self) -> &mut LightPacker {
        &mut self.packer
    }

    /// Sets up shadows, packs and uploads lights, renders shadows and
    /// publishes the fog globals.
    pub fn setup(
        &mut self,
        cmd: &mut CommandBuffer,
        geometry: &mut VisibleGeometrySet,
        shadow_settings: &ShadowSettings,
        shadows: &mut dyn ShadowRenderer,
        use_lights_per_object: bool,
        fog: &FogSettings,
    ) {
        cmd.begin_sample(Self::NAME);
        shadows.setup(cmd, geometry, shadow_settings);

        let map_len = use_lights_per_object.then(|| geometry.light_index_map_len());
        if let Some(map) = self.packer.pack(&geometry.visible_lights, map_len, shadows) {
            geometry.set_light_index_map(map);
        }
        cmd.set_global_keyword(LIGHTS_PER_OBJECT_KEYWORD, use_lights_per_object);
        self.packer.upload(cmd);

        shadows.render(cmd);
        setup_fog(cmd, fog);
        cmd.end_sample(Self::NAME);
    }

    pub fn cleanup(&mut self, cmd: &mut CommandBuffer, shadows: &mut dyn ShadowRenderer) {
        shadows.cleanup(cmd);
    }
}

fn setup_fog(cmd: &mut CommandBuffer, fog: &FogSettings) {
    cmd.set_global_keyword(FOG_KEYWORD, fog.enabled);
    if !fog.enabled {
        return;
    }
    cmd.set_global_float(FOG_THICKNESS, fog.thickness);
    cmd.set_global_vector(DISTANCE_FOG_PARAMS, fog.distance_params());
    cmd.set_global_vector(DISTANCE_FOG_COLOR, fog.distance_color);
    cmd.set_global_vector(HEIGHT_FOG_PARAMS, fog.height_params());
    cmd.set_global_vector(HEIGHT_FOG_COLOR, fog.height_color);
}
