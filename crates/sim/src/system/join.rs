//! Merging every cluster back into a single target cluster.

use super::{ParticleSystem, Transition};
use crate::cluster::ClusterRegistry;
use crate::particle::{Particle, UNASSIGNED};
use crate::physics::JOIN_YIELD_STRIDE;
use log::debug;
use rustc_hash::FxHashSet;

pub(super) struct JoinState {
    target: i32,
    cursor: usize,
    /// Cluster ids seen on reassigned particles, removed once the pass
    /// completes.
    displaced: FxHashSet<i32>,
}

impl ParticleSystem {
    /// Fold every clustered particle into `target_id` over the coming
    /// frames, then drop the emptied clusters from the registry.
    /// Unassigned particles are left alone. A no-op unless the population
    /// is actually split and no other transition is in flight.
    pub fn join(&mut self, target_id: i32) {
        if self.transition.is_some() {
            debug!("join requested while busy, dropped");
            return;
        }
        if !self.is_split() {
            return;
        }

        debug!("join started toward cluster {target_id}");
        self.transition = Some(Transition::Join(JoinState {
            target: target_id,
            cursor: 0,
            displaced: FxHashSet::default(),
        }));
    }
}

impl JoinState {
    /// Advance by one cooperative slice. Returns true when the join has
    /// completed and the registry has been pruned.
    pub(super) fn step(
        &mut self,
        particles: &mut [Particle],
        registry: &mut ClusterRegistry,
    ) -> bool {
        while self.cursor < particles.len() {
            let i = self.cursor;
            self.cursor += 1;

            let tag = particles[i].cluster;
            if tag == UNASSIGNED {
                continue;
            }

            particles[i].cluster = self.target;
            if tag != self.target {
                self.displaced.insert(tag);
            }
            if i % JOIN_YIELD_STRIDE == 0 {
                return false;
            }
        }

        for &tag in &self.displaced {
            if tag != self.target {
                registry.deactivate_and_remove(tag);
            }
        }
        debug!(
            "join complete: {} clusters folded into {}",
            self.displaced.len(),
            self.target
        );
        true
    }
}
