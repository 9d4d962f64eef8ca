//! Splitting one cluster population into weighted sub-clusters.
//!
//! The partition is computed eagerly when the split is requested: particle
//! indices are ordered by angle around the population centroid and sliced
//! into contiguous angular runs sized by weight quota, so each new cluster
//! takes a wedge of the existing blob. Reassignment then proceeds a
//! bounded slice per frame (innermost particles first) so the wedges peel
//! off gradually instead of jump-cutting.

use super::{ParticleSystem, Transition};
use crate::cluster::{ClusterRegistry, DEFAULT_COLOR};
use crate::particle::Particle;
use crate::physics::{SPLIT_GROUP_PAUSE, SPLIT_YIELD_STRIDE};
use glam::Vec2;
use log::debug;

/// Description of one new cluster requested from a split.
#[derive(Clone, Copy, Debug)]
pub struct SplitItem {
    pub weight: f32,
    pub color: [u8; 4],
    pub target: Option<Vec2>,
}

impl Default for SplitItem {
    fn default() -> Self {
        Self {
            weight: 1.0,
            color: DEFAULT_COLOR,
            target: None,
        }
    }
}

struct SplitGroup {
    id: i32,
    color: [u8; 4],
    target: Option<Vec2>,
    weight: f32,
    /// Member particle indices, innermost (closest to the group's own
    /// centroid) first.
    members: Vec<usize>,
}

pub(super) struct SplitState {
    groups: Vec<SplitGroup>,
    group: usize,
    member: usize,
    registered: bool,
    /// Remaining idle slices after a non-primary group finished.
    pause: u32,
}

impl ParticleSystem {
    /// Partition the population into the existing active clusters plus one
    /// new cluster per item, by weight share. The reassignment runs across
    /// subsequent frames; a request made while another transition is in
    /// flight is dropped silently.
    pub fn split(&mut self, items: &[SplitItem]) {
        if self.transition.is_some() {
            debug!("split requested while busy, dropped");
            return;
        }
        if self.particles.is_empty() {
            return;
        }

        let existing: Vec<(i32, f32)> = self
            .registry
            .active()
            .map(|(id, c)| (id, c.weight))
            .collect();

        let mut weights: Vec<f32> = existing.iter().map(|&(_, w)| w).collect();
        weights.extend(items.iter().map(|item| item.weight));
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return;
        }

        let count = self.particles.len();
        let quotas: Vec<usize> = weights
            .iter()
            .map(|w| ((w / total) * count as f32).ceil() as usize)
            .collect();

        // Stable angular ordering around the population centroid.
        let mut centroid = Vec2::ZERO;
        for p in &self.particles {
            centroid += p.position;
        }
        centroid /= count as f32;

        let keys: Vec<f32> = self
            .particles
            .iter()
            .map(|p| {
                let d = p.position - centroid;
                d.y.atan2(d.x).to_degrees() + 180.0
            })
            .collect();
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));

        let mut groups = Vec::with_capacity(quotas.len());
        let mut taken = 0;
        for (gi, &quota) in quotas.iter().enumerate() {
            let mut members: Vec<usize> =
                order.iter().skip(taken).take(quota).copied().collect();
            taken += quota;

            if !members.is_empty() {
                let mut local = Vec2::ZERO;
                for &i in &members {
                    local += self.particles[i].position;
                }
                local /= members.len() as f32;
                members.sort_by(|&a, &b| {
                    self.particles[a]
                        .position
                        .distance_squared(local)
                        .total_cmp(&self.particles[b].position.distance_squared(local))
                });
            }

            // Groups covering pre-existing clusters keep that cluster's
            // color and target; the items describe only the new ones.
            let (color, target) = if gi < existing.len() {
                self.registry
                    .get(existing[gi].0)
                    .map(|c| (c.color, c.target))
                    .unwrap_or((DEFAULT_COLOR, None))
            } else {
                let item = &items[gi - existing.len()];
                (item.color, item.target)
            };

            groups.push(SplitGroup {
                id: gi as i32,
                color,
                target,
                weight: weights[gi],
                members,
            });
        }

        debug!("split started: {} groups over {count} particles", groups.len());
        self.transition = Some(Transition::Split(SplitState {
            groups,
            group: 0,
            member: 0,
            registered: false,
            pause: 0,
        }));
    }
}

impl SplitState {
    /// Advance by one cooperative slice. Returns true when the split has
    /// completed. Group 0 reassigns in a single slice; later groups stop
    /// every [`SPLIT_YIELD_STRIDE`] members and idle for
    /// [`SPLIT_GROUP_PAUSE`] slices once finished.
    pub(super) fn step(
        &mut self,
        particles: &mut [Particle],
        registry: &mut ClusterRegistry,
    ) -> bool {
        loop {
            if self.pause > 0 {
                self.pause -= 1;
                return false;
            }

            let Some(group) = self.groups.get(self.group) else {
                debug!("split complete");
                return true;
            };

            if !self.registered {
                registry.add_or_activate(group.id, group.color, group.target, group.weight);
                self.registered = true;
            }

            while self.member < group.members.len() {
                let j = self.member;
                // The population may have been replaced mid-flight; stale
                // indices are simply skipped.
                if let Some(p) = particles.get_mut(group.members[j]) {
                    p.cluster = group.id;
                }
                self.member += 1;
                if self.group > 0 && j % SPLIT_YIELD_STRIDE == 0 {
                    return false;
                }
            }

            if self.group > 0 {
                self.pause = SPLIT_GROUP_PAUSE;
            }
            self.group += 1;
            self.member = 0;
            self.registered = false;
        }
    }
}
