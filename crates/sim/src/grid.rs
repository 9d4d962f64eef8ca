//! Uniform spatial hash grid for neighbor queries.
//!
//! Buckets are keyed by a single flattened index so lookups stay a plain
//! hash probe. The grid is rebuilt from scratch every integration sub-step
//! rather than mutated in place; queries between rebuilds therefore see a
//! consistent snapshot of the previous positions.
//!
//! Coordinates are not clamped: callers are expected to keep positions
//! inside non-negative bounds (the boundary constraint does), and queries
//! for far-out positions may alias other rows of the grid.

use crate::particle::Particle;
use glam::Vec2;
use rustc_hash::FxHashMap;

pub struct SpatialGrid {
    /// Cell edge length: `ceil(2 * max_particle_radius)`, so a 3x3 block
    /// always covers the largest possible pair interaction.
    bucket_size: f32,
    inv_bucket_size: f32,
    width_in_buckets: i32,
    buckets: FxHashMap<i32, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(max_particle_radius: f32, bounds_width: f32) -> Self {
        let bucket_size = (max_particle_radius * 2.0).ceil();
        Self {
            bucket_size,
            inv_bucket_size: 1.0 / bucket_size,
            width_in_buckets: (bounds_width / bucket_size).ceil() as i32,
            buckets: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn bucket_size(&self) -> f32 {
        self.bucket_size
    }

    #[inline]
    pub fn width_in_buckets(&self) -> i32 {
        self.width_in_buckets
    }

    /// Flattened bucket index for a position.
    #[inline]
    pub fn bucket_index(&self, pos: Vec2) -> i32 {
        (pos.y * self.inv_bucket_size) as i32 * self.width_in_buckets
            + (pos.x * self.inv_bucket_size) as i32
    }

    /// Particle indices in the `(2r+1) x (2r+1)` block of buckets centered
    /// on `pos`. No distance filtering is applied; callers gate by radius.
    pub fn neighbors(&self, pos: Vec2, range: i32) -> impl Iterator<Item = usize> + '_ {
        let center = self.bucket_index(pos);
        let width = self.width_in_buckets;
        (-range..=range)
            .flat_map(move |dy| (-range..=range).map(move |dx| center + dy * width + dx))
            .filter_map(move |bucket| self.buckets.get(&bucket))
            .flat_map(|indices| indices.iter().copied())
    }

    /// Append a particle index to the bucket for `pos`.
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let bucket = self.bucket_index(pos);
        self.buckets.entry(bucket).or_default().push(index);
    }

    /// Build a fresh bucket map from the current particle positions and
    /// swap it in wholesale.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        let mut next: FxHashMap<i32, Vec<usize>> =
            FxHashMap::with_capacity_and_hasher(particles.len(), Default::default());
        for (i, p) in particles.iter().enumerate() {
            next.entry(self.bucket_index(p.position)).or_default().push(i);
        }
        self.buckets = next;
    }
}
