//! Particle state and force/integration primitives.
//!
//! Forces accumulate into `next_position`, which doubles as the "next
//! position target" for the integrator: `add_force` offsets it, and
//! `integrate` blends it with the damped position-difference velocity.
//! This is not textbook Verlet - the accumulated target replaces the base
//! position before the velocity carry is added - and the sign convention
//! of `attract`/`repel` (displacement away from the target, so negative
//! strength pulls) is relied on throughout the update loop.

use crate::physics::{
    DEFAULT_DAMPING, DEFAULT_FRICTION, MIN_ATTRACT_DIST_SQ, SMOOTHING,
};
use crate::rect::Rect;
use glam::Vec2;

/// Cluster tag of a particle that belongs to no cluster.
pub const UNASSIGNED: i32 = -1;

/// A point mass with radius and a cluster membership tag.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Continuous position in world coordinates.
    pub position: Vec2,
    /// Position at the previous sub-step; velocity is the difference.
    pub prev_position: Vec2,
    /// Force accumulator, expressed as the next position target.
    pub next_position: Vec2,
    /// Exponentially smoothed position for external consumption only.
    pub smoothed_position: Vec2,
    /// Collision radius, must be positive.
    pub radius: f32,
    /// Cluster id, or [`UNASSIGNED`].
    pub cluster: i32,
    /// Velocity retained per sub-step.
    pub damping: f32,
    /// Fraction of velocity kept along an axis when a boundary clamps it.
    pub friction: f32,
}

impl Particle {
    pub fn new(position: Vec2, radius: f32, cluster: i32) -> Self {
        Self::with_tunables(position, radius, cluster, DEFAULT_DAMPING, DEFAULT_FRICTION)
    }

    /// Construct with per-particle damping/friction overrides.
    pub fn with_tunables(
        position: Vec2,
        radius: f32,
        cluster: i32,
        damping: f32,
        friction: f32,
    ) -> Self {
        Self {
            position,
            prev_position: position,
            next_position: position,
            smoothed_position: position,
            radius,
            cluster,
            damping,
            friction,
        }
    }

    /// Accumulate a raw force offset.
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.next_position += force;
    }

    /// Strength-scaled push along the displacement away from `target`.
    /// Negative strength therefore pulls toward it. Skipped below a small
    /// separation to keep the normalization stable.
    pub fn attract(&mut self, target: Vec2, strength: f32) {
        let diff = self.position - target;
        if diff.length_squared() > MIN_ATTRACT_DIST_SQ {
            self.add_force(diff.normalize() * strength);
        }
    }

    /// Like [`attract`](Self::attract), but only active while the
    /// separation is inside `radius + self.radius`.
    pub fn repel(&mut self, target: Vec2, radius: f32, strength: f32) {
        let diff = self.position - target;
        let d = diff.length();
        if d > 0.0 && d < radius + self.radius {
            self.add_force(diff / d * strength);
        }
    }

    /// Overlap-resolving contact force against another circle. Zero at
    /// exact contact, growing with penetration depth; coincident centers
    /// are skipped.
    pub fn collide(&mut self, other: Vec2, other_radius: f32, strength: f32) {
        let diff = other - self.position;
        let d = diff.length();
        let combined = other_radius + self.radius;
        if d > 0.0 && d < combined {
            self.add_force(diff * ((d - combined) / d * 0.5 * strength));
        }
    }

    /// Push out of a static rectangle. The rectangle is expanded by this
    /// particle's radius so the test is circle-vs-box.
    pub fn collide_box(&mut self, rect: &Rect, strength: f32) {
        let hit = rect.offset_edges(self.radius).signed_distance(self.position);
        if hit.distance < 0.0 {
            self.add_force(hit.dir * strength);
        }
    }

    /// Clamp the position to `[left+radius, right+radius]` on x and
    /// `[top+radius, bottom+radius]` on y. The radius is added on both
    /// sides, not mirrored. When an axis clamps, the previous position is
    /// moved so the particle keeps only `friction` of the velocity that
    /// drove it out.
    pub fn constrain(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        let v = (self.position - self.prev_position) * self.friction;

        let lo = Vec2::new(left + self.radius, top + self.radius);
        let hi = Vec2::new(right + self.radius, bottom + self.radius);

        if self.position.x > hi.x {
            self.position.x = hi.x;
            self.prev_position.x = self.position.x + v.x;
        } else if self.position.x < lo.x {
            self.position.x = lo.x;
            self.prev_position.x = self.position.x + v.x;
        }

        if self.position.y > hi.y {
            self.position.y = hi.y;
            self.prev_position.y = self.position.y + v.y;
        } else if self.position.y < lo.y {
            self.position.y = lo.y;
            self.prev_position.y = self.position.y + v.y;
        }
    }

    /// One integration sub-step. The accumulated force target becomes the
    /// new base position, the damped velocity is carried on top, and the
    /// accumulator is reset to the new position.
    pub fn integrate(&mut self, dt_fraction: f32, accel_scale: f32) {
        let v = (self.position - self.prev_position) * accel_scale;
        self.prev_position = self.position - v * (self.damping * (1.0 - dt_fraction));
        self.position = self.next_position + v * (self.damping * dt_fraction);
        self.smoothed_position = self.smoothed_position.lerp(self.position, SMOOTHING);
        self.next_position = self.position;
    }
}
