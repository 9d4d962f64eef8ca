//! The particle system: force resolution, integration, and cluster
//! membership transitions.
//!
//! Update pipeline (once per host frame):
//! 1. Advance any in-flight split/join by one cooperative slice
//! 2. Recompute cluster grouping/centroids/radii from current membership
//! 3. For each sub-step: rebuild the spatial grid, resolve neighbor and
//!    cluster forces for every particle, constrain and integrate
//!
//! Split and join are long-running operations that reassign membership a
//! bounded slice at a time so the visual transition stays gradual; the
//! frame loop keeps running while they are in flight. A single busy flag
//! (an in-flight transition) guards them against each other, never against
//! `update` itself.

mod join;
mod split;

pub use split::SplitItem;

use crate::cluster::ClusterRegistry;
use crate::error::ConfigError;
use crate::grid::SpatialGrid;
use crate::math::{remap_clamped, smoothstep};
use crate::particle::Particle;
use crate::physics;
use crate::rect::Rect;
use glam::Vec2;
use join::JoinState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use split::SplitState;
use std::f32::consts::TAU;

/// An in-flight membership transition. At most one exists at a time.
enum Transition {
    Split(SplitState),
    Join(JoinState),
}

pub struct ParticleSystem {
    bounds: Rect,
    max_particle_radius: f32,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    registry: ClusterRegistry,
    /// Static obstacles for the current frame; cleared at the end of
    /// every `update` call.
    obstacles: Vec<Rect>,
    /// Per-frame derived membership state, recomputed by `regroup`.
    groups: FxHashMap<i32, Vec<usize>>,
    means: FxHashMap<i32, Vec2>,
    radii: FxHashMap<i32, f32>,
    radii_from_center: FxHashMap<i32, f32>,
    /// Idle-drift phase per particle index, seeded deterministically.
    drift_phase: Vec<f32>,
    transition: Option<Transition>,
}

impl ParticleSystem {
    /// Create an empty system over `bounds`. Fails fast on a degenerate
    /// configuration instead of producing a silently unstable simulation.
    pub fn new(bounds: Rect, max_particle_radius: f32) -> Result<Self, ConfigError> {
        if !max_particle_radius.is_finite() || max_particle_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(max_particle_radius));
        }
        if !(bounds.width() > 0.0 && bounds.height() > 0.0)
            || !bounds.width().is_finite()
            || !bounds.height().is_finite()
        {
            return Err(ConfigError::DegenerateBounds {
                width: bounds.width(),
                height: bounds.height(),
            });
        }

        Ok(Self {
            bounds,
            max_particle_radius,
            particles: Vec::new(),
            grid: SpatialGrid::new(max_particle_radius, bounds.width()),
            registry: ClusterRegistry::new(),
            obstacles: Vec::new(),
            groups: FxHashMap::default(),
            means: FxHashMap::default(),
            radii: FxHashMap::default(),
            radii_from_center: FxHashMap::default(),
            drift_phase: Vec::new(),
            transition: None,
        })
    }

    // ------------------------------------------------------------------
    // Host surface
    // ------------------------------------------------------------------

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn max_particle_radius(&self) -> f32 {
        self.max_particle_radius
    }

    /// Read-only view of the particle collection.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Read-only view of the cluster registry.
    pub fn clusters(&self) -> &ClusterRegistry {
        &self.registry
    }

    /// Centroid of a cluster as of the last `update` call.
    pub fn cluster_mean(&self, id: i32) -> Option<Vec2> {
        self.means.get(&id).copied()
    }

    /// Max member distance from the centroid as of the last `update` call.
    pub fn cluster_radius(&self, id: i32) -> Option<f32> {
        self.radii.get(&id).copied()
    }

    pub fn add_cluster(&mut self, id: i32, color: [u8; 4], target: Option<Vec2>, weight: f32) {
        self.registry.add_or_activate(id, color, target, weight);
    }

    pub fn remove_cluster(&mut self, id: i32) {
        self.registry.deactivate_and_remove(id);
    }

    pub fn spawn(&mut self, position: Vec2, radius: f32, cluster: i32) {
        assert!(radius > 0.0, "particle radius must be positive");
        self.particles.push(Particle::new(position, radius, cluster));
    }

    pub fn spawn_with_tunables(
        &mut self,
        position: Vec2,
        radius: f32,
        cluster: i32,
        damping: f32,
        friction: f32,
    ) {
        assert!(radius > 0.0, "particle radius must be positive");
        self.particles
            .push(Particle::with_tunables(position, radius, cluster, damping, friction));
    }

    /// Replace the whole population.
    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.drift_phase.clear();
    }

    /// Queue a static obstacle rectangle for the next `update` call.
    pub fn add_obstacle(&mut self, rect: Rect) {
        self.obstacles.push(rect);
    }

    /// True when more than one distinct cluster id is present among the
    /// particles. Unassigned particles do not count.
    pub fn is_split(&self) -> bool {
        let mut seen: Option<i32> = None;
        for p in &self.particles {
            if p.cluster < 0 {
                continue;
            }
            match seen {
                None => seen = Some(p.cluster),
                Some(tag) if tag != p.cluster => return true,
                _ => {}
            }
        }
        false
    }

    /// True while a split or join is in flight. Requests made while busy
    /// are dropped silently, not queued.
    pub fn is_busy(&self) -> bool {
        self.transition.is_some()
    }

    // ------------------------------------------------------------------
    // Update loop
    // ------------------------------------------------------------------

    /// Run one frame with the default sub-step count. `elapsed_seconds` is
    /// host wall-clock time, used only to phase the idle drift.
    pub fn update(&mut self, elapsed_seconds: f32) {
        self.update_with_substeps(elapsed_seconds, physics::SUB_STEPS);
    }

    pub fn update_with_substeps(&mut self, elapsed_seconds: f32, substeps: usize) {
        self.step_transition();
        self.regroup();
        self.ensure_drift_phases();

        let n = self.particles.len();
        let center = self.bounds.center();
        let max_radius = self.max_particle_radius;
        let min = self.bounds.min;
        let max = self.bounds.max();

        for _ in 0..substeps {
            self.grid.rebuild(&self.particles);

            let particles = &self.particles;
            let grid = &self.grid;
            let registry = &self.registry;
            let means = &self.means;
            let radii_from_center = &self.radii_from_center;
            let obstacles = &self.obstacles;
            let drift_phase = &self.drift_phase;

            // Each particle reads the start-of-substep snapshot and
            // produces its own successor, so the pass parallelizes without
            // ordering effects.
            let next: Vec<Particle> = (0..n)
                .into_par_iter()
                .map(|i| {
                    let mut p = particles[i];

                    for j in grid.neighbors(p.position, 1) {
                        if j == i {
                            continue;
                        }
                        let other = &particles[j];
                        if p.cluster != other.cluster {
                            p.repel(
                                other.position,
                                other.radius + max_radius * physics::OTHER_CLUSTER_MARGIN,
                                physics::OTHER_CLUSTER_STRENGTH,
                            );
                        } else {
                            p.repel(
                                other.position,
                                other.radius + max_radius * physics::SAME_CLUSTER_MARGIN,
                                physics::SAME_CLUSTER_STRENGTH,
                            );
                        }
                        p.collide(other.position, other.radius, physics::CONTACT_STRENGTH);
                    }

                    if registry.is_active(p.cluster) {
                        if let Some(&mean) = means.get(&p.cluster) {
                            let md = smoothstep(
                                2.0,
                                3.0,
                                remap_clamped(
                                    mean.distance(p.position),
                                    0.0,
                                    physics::CENTROID_FALLOFF_SPAN,
                                    0.0,
                                    1.0,
                                ),
                            );
                            p.attract(mean, physics::CENTROID_PULL * md);
                        }

                        let reach = radii_from_center
                            .get(&p.cluster)
                            .copied()
                            .unwrap_or(0.0);
                        let cd = smoothstep(
                            0.2,
                            1.0,
                            remap_clamped(center.distance(p.position), 0.0, reach, 0.0, 1.0),
                        );
                        p.attract(center, physics::CENTER_PULL * cd);

                        if let Some(target) = registry.get(p.cluster).and_then(|c| c.target) {
                            let td = smoothstep(
                                0.2,
                                1.0,
                                remap_clamped(
                                    center.distance(p.position),
                                    0.0,
                                    physics::TARGET_FALLOFF_SPAN,
                                    0.0,
                                    0.5,
                                ),
                            );
                            p.attract(target, physics::TARGET_PULL * td);
                        }
                    } else {
                        // Unclustered particles mill around the center with
                        // a per-particle phase so they do not move in step.
                        let drift = (drift_phase[i] + elapsed_seconds * physics::DRIFT_RATE * TAU)
                            .sin()
                            * physics::DRIFT_AMPLITUDE;
                        p.attract(center, drift);
                    }

                    for rect in obstacles {
                        p.collide_box(rect, physics::OBSTACLE_STRENGTH);
                    }

                    p.constrain(min.x, min.y, max.x, max.y);
                    p.integrate(physics::DT_FRACTION, physics::ACCEL_SCALE);
                    p
                })
                .collect();

            self.particles = next;
        }

        self.obstacles.clear();
    }

    /// Advance an in-flight split/join by one cooperative slice. `update`
    /// calls this once per frame; it is public so hosts and tests can
    /// drive a transition to completion without stepping physics.
    pub fn step_transition(&mut self) {
        if let Some(mut transition) = self.transition.take() {
            let done = match &mut transition {
                Transition::Split(state) => state.step(&mut self.particles, &mut self.registry),
                Transition::Join(state) => state.step(&mut self.particles, &mut self.registry),
            };
            if !done {
                self.transition = Some(transition);
            }
        }
    }

    /// Recompute membership grouping and cluster geometry from current
    /// particle state. Called once per `update`; the sub-steps within one
    /// call intentionally share this slightly stale geometry.
    fn regroup(&mut self) {
        self.groups.clear();
        self.means.clear();
        self.radii.clear();
        self.radii_from_center.clear();

        for (i, p) in self.particles.iter().enumerate() {
            self.groups.entry(p.cluster).or_default().push(i);
        }

        let center = self.bounds.center();
        for (&tag, members) in &self.groups {
            let mut sum = Vec2::ZERO;
            for &i in members {
                sum += self.particles[i].position;
            }
            let mean = sum / members.len() as f32;

            let mut radius = 0.0_f32;
            let mut reach = 0.0_f32;
            for &i in members {
                let pos = self.particles[i].position;
                radius = radius.max(pos.distance(mean));
                reach = reach.max(pos.distance(center));
            }

            self.means.insert(tag, mean);
            self.radii.insert(tag, radius);
            self.radii_from_center.insert(tag, reach);
        }
    }

    fn ensure_drift_phases(&mut self) {
        while self.drift_phase.len() < self.particles.len() {
            let i = self.drift_phase.len();
            let mut rng = ChaCha8Rng::seed_from_u64(i as u64);
            self.drift_phase.push(rng.gen_range(0.0..1.0_f32) * TAU);
        }
        self.drift_phase.truncate(self.particles.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::DEFAULT_COLOR;
    use crate::particle::UNASSIGNED;

    fn system_with(count: usize, cluster: i32) -> ParticleSystem {
        let mut sys = ParticleSystem::new(Rect::new(0.0, 0.0, 1000.0, 1000.0), 20.0).unwrap();
        for i in 0..count {
            let x = 300.0 + (i % 10) as f32 * 30.0;
            let y = 300.0 + (i / 10) as f32 * 30.0;
            sys.spawn(Vec2::new(x, y), 10.0, cluster);
        }
        sys
    }

    fn drive_to_completion(sys: &mut ParticleSystem) {
        let mut slices = 0;
        while sys.is_busy() {
            sys.step_transition();
            slices += 1;
            assert!(slices < 10_000, "transition failed to complete");
        }
    }

    fn counts_by_tag(sys: &ParticleSystem) -> FxHashMap<i32, usize> {
        let mut counts = FxHashMap::default();
        for p in sys.particles() {
            *counts.entry(p.cluster).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn construction_rejects_bad_config() {
        assert!(ParticleSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0).is_err());
        assert!(ParticleSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), -5.0).is_err());
        assert!(ParticleSystem::new(Rect::new(0.0, 0.0, 0.0, 100.0), 10.0).is_err());
        assert!(ParticleSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0).is_ok());
    }

    #[test]
    fn split_partitions_by_weight_quota() {
        let mut sys = system_with(10, 0);
        sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
        sys.split(&[SplitItem::default()]);
        assert!(sys.is_busy());
        drive_to_completion(&mut sys);

        let counts = counts_by_tag(&sys);
        assert_eq!(counts.get(&0), Some(&5));
        assert_eq!(counts.get(&1), Some(&5));
        assert!(sys.is_split());
        assert!(sys.clusters().is_active(1));
    }

    #[test]
    fn split_while_busy_is_dropped() {
        let mut sys = system_with(12, 0);
        sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
        sys.split(&[SplitItem::default()]);
        // A second request while in flight must not queue or replace.
        sys.split(&[SplitItem::default(), SplitItem::default(), SplitItem::default()]);
        drive_to_completion(&mut sys);

        let counts = counts_by_tag(&sys);
        assert_eq!(counts.len(), 2);
        assert_eq!(sys.clusters().len(), 2);
    }

    #[test]
    fn split_registers_clusters_for_empty_groups() {
        let mut sys = system_with(2, 0);
        sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
        sys.split(&[SplitItem {
            weight: 0.0,
            ..SplitItem::default()
        }]);
        drive_to_completion(&mut sys);

        // Zero quota: no particles reassigned, but the cluster exists.
        let counts = counts_by_tag(&sys);
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), None);
        assert!(sys.clusters().get(1).is_some());
    }

    #[test]
    fn split_without_particles_is_a_no_op() {
        let mut sys = ParticleSystem::new(Rect::new(0.0, 0.0, 100.0, 100.0), 10.0).unwrap();
        sys.split(&[SplitItem::default()]);
        assert!(!sys.is_busy());
    }

    #[test]
    fn join_merges_and_prunes_the_registry() {
        let mut sys = system_with(30, 0);
        for (i, p) in sys.particles.iter_mut().enumerate() {
            p.cluster = (i % 3) as i32;
        }
        for id in 0..3 {
            sys.add_cluster(id, DEFAULT_COLOR, None, 1.0);
        }
        assert!(sys.is_split());

        sys.join(0);
        assert!(sys.is_busy());
        drive_to_completion(&mut sys);

        assert!(!sys.is_split());
        let counts = counts_by_tag(&sys);
        assert_eq!(counts.get(&0), Some(&30));
        assert!(sys.clusters().get(0).is_some());
        assert!(sys.clusters().get(1).is_none());
        assert!(sys.clusters().get(2).is_none());
    }

    #[test]
    fn join_leaves_unassigned_particles_alone() {
        let mut sys = system_with(20, 0);
        for (i, p) in sys.particles.iter_mut().enumerate() {
            p.cluster = match i % 4 {
                0 => UNASSIGNED,
                1 => 0,
                _ => 1,
            };
        }
        sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
        sys.add_cluster(1, DEFAULT_COLOR, None, 1.0);

        sys.join(0);
        drive_to_completion(&mut sys);

        let counts = counts_by_tag(&sys);
        assert_eq!(counts.get(&UNASSIGNED), Some(&5));
        assert_eq!(counts.get(&0), Some(&15));
        assert!(!sys.is_split());
    }

    #[test]
    fn join_requires_a_split_population() {
        let mut sys = system_with(10, 0);
        sys.add_cluster(0, DEFAULT_COLOR, None, 1.0);
        sys.join(0);
        assert!(!sys.is_busy());
    }

    #[test]
    fn is_split_ignores_unassigned() {
        let mut sys = system_with(4, UNASSIGNED);
        assert!(!sys.is_split());
        sys.particles[0].cluster = 0;
        assert!(!sys.is_split());
        sys.particles[1].cluster = 1;
        assert!(sys.is_split());
    }
}
