//! Scatter helpers for seeding particle populations.

use crate::rect::Rect;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Consecutive rejected darts before a scatter gives up.
const MAX_MISSES: usize = 200;

/// Dart-throwing scatter: random points inside `bounds`, at least
/// `distance_to_edge` away from every edge and at least `spacing` apart.
/// Deterministic for a given `seed`, so test and demo populations are
/// reproducible.
pub fn scatter(bounds: &Rect, spacing: f32, distance_to_edge: f32, seed: u64) -> Vec<Vec2> {
    let lo = bounds.min + Vec2::splat(distance_to_edge);
    let hi = bounds.max() - Vec2::splat(distance_to_edge);
    if lo.x >= hi.x || lo.y >= hi.y {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spacing_sq = spacing * spacing;
    let mut points: Vec<Vec2> = Vec::new();
    let mut misses = 0;

    while misses < MAX_MISSES {
        let candidate = Vec2::new(rng.gen_range(lo.x..hi.x), rng.gen_range(lo.y..hi.y));
        if points
            .iter()
            .all(|p| p.distance_squared(candidate) >= spacing_sq)
        {
            points.push(candidate);
            misses = 0;
        } else {
            misses += 1;
        }
    }

    points
}
