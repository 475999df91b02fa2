//! Transient Texture Pool
//!
//! Backs the logical transient textures of a submitted [`CommandBuffer`]
//! with recyclable physical textures. A physical texture is handed out by
//! `allocate`, returned by `release`, and becomes eligible for reuse by the
//! very next compatible allocation, even within the same frame.
//!
//! # Design
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 TransientTexturePool                 │
//! │                                                      │
//! │  textures: SlotMap<PhysicalTextureId, PhysTexture>   │
//! │  free:     HashMap<Key, Vec<PhysicalTextureId>>      │
//! │                                                      │
//! │  allocate(desc) → PhysicalTextureId                  │
//! │  release(id)    → back into its key bucket           │
//! │  trim(n)        → drop textures idle for > n frames  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Trimmed textures are removed from the slot map, so their slots are
//! recycled by later creations and storage stays bounded by the peak number
//! of live textures.
//!
//! Recycling keys on every attribute that changes the GPU allocation:
//! size, format, sample count, depth bits and filter mode. The debug label
//! is ignored.
//!
//! [`CommandBuffer`]: super::command::CommandBuffer

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use super::command::TransientTextureDesc;

// ─── Public Types ─────────────────────────────────────────────────────────────

slotmap::new_key_type! {
    /// Handle to a physical texture owned by the pool.
    pub struct PhysicalTextureId;
}

// ─── Internal Types ───────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
struct PoolKey {
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    msaa_samples: u32,
    depth_bits: u32,
    filter: wgpu::FilterMode,
}

impl PoolKey {
    fn from_desc(desc: &TransientTextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            msaa_samples: desc.msaa_samples,
            depth_bits: desc.depth_bits,
            filter: desc.filter,
        }
    }
}

#[derive(Debug)]
struct PhysicalTexture {
    key: PoolKey,
    in_use: bool,
    /// Frames spent in the free list without being picked up.
    idle_frames: u32,
}

// ─── Pool Implementation ──────────────────────────────────────────────────────

/// Recycling pool for transient render textures.
#[derive(Debug, Default)]
pub struct TransientTexturePool {
    textures: SlotMap<PhysicalTextureId, PhysicalTexture>,
    free: FxHashMap<PoolKey, Vec<PhysicalTextureId>>,
    created: usize,
}

impl TransientTexturePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a physical texture matching `desc`, reusing a free one when
    /// the key matches.
    pub fn allocate(&mut self, desc: &TransientTextureDesc) -> PhysicalTextureId {
        let key = PoolKey::from_desc(desc);

        if let Some(id) = self.free.get_mut(&key).and_then(Vec::pop)
            && let Some(texture) = self.textures.get_mut(id)
        {
            texture.in_use = true;
            texture.idle_frames = 0;
            return id;
        }

        log::debug!(
            "transient pool: creating '{}' {}x{} {:?} x{}",
            desc.label,
            desc.width,
            desc.height,
            desc.format,
            desc.msaa_samples
        );
        let id = self.textures.insert(PhysicalTexture {
            key,
            in_use: true,
            idle_frames: 0,
        });
        self.created += 1;
        id
    }

    /// Returns a physical texture to its free bucket.
    ///
    /// Returns `false` if the texture was not in use.
    pub fn release(&mut self, id: PhysicalTextureId) -> bool {
        let Some(texture) = self.textures.get_mut(id) else {
            return false;
        };
        if !texture.in_use {
            return false;
        }
        texture.in_use = false;
        self.free.entry(texture.key.clone()).or_default().push(id);
        true
    }

    /// Returns every in-use texture to the free pool.
    pub fn reset(&mut self) {
        for (id, texture) in &mut self.textures {
            if texture.in_use {
                texture.in_use = false;
                self.free.entry(texture.key.clone()).or_default().push(id);
            }
        }
    }

    /// Drops free textures that have been idle for more than `max_idle_frames`.
    ///
    /// Call once per frame.
    pub fn trim(&mut self, max_idle_frames: u32) {
        let textures = &mut self.textures;
        for bucket in self.free.values_mut() {
            bucket.retain(|&id| {
                let Some(texture) = textures.get_mut(id) else {
                    return false;
                };
                texture.idle_frames += 1;
                if texture.idle_frames > max_idle_frames {
                    textures.remove(id);
                    false
                } else {
                    true
                }
            });
        }
        self.free.retain(|_, bucket| !bucket.is_empty());
    }

    /// Number of live physical textures (in use and free).
    #[must_use]
    pub fn total_texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of physical textures currently handed out.
    #[must_use]
    pub fn in_use_count(&self) -> usize {
        self.textures.values().filter(|t| t.in_use).count()
    }

    /// Number of physical textures ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created
    }
}
