//! Cluster records and the registry that owns them.
//!
//! A cluster stores only the externally-set fields (color, target point,
//! weight, active flag). Geometry - centroids and radii - is derived from
//! particle membership every frame by the system and never persisted here.

use glam::Vec2;
use log::debug;
use std::collections::BTreeMap;

/// Default cluster color (opaque white), RGBA.
pub const DEFAULT_COLOR: [u8; 4] = [255, 255, 255, 255];

#[derive(Clone, Copy, Debug)]
pub struct Cluster {
    /// RGBA render tag; opaque to the simulation.
    pub color: [u8; 4],
    /// Optional attraction target for member particles.
    pub target: Option<Vec2>,
    /// Relative particle-count share used when splitting.
    pub weight: f32,
    /// Inactive clusters stop attracting their members immediately.
    pub active: bool,
}

/// Set of active clusters, keyed by id. Ordered storage keeps the id
/// ordering consumed by split deterministic.
#[derive(Debug, Default)]
pub struct ClusterRegistry {
    clusters: BTreeMap<i32, Cluster>,
}

impl ClusterRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert the cluster if absent, otherwise update its fields; either
    /// way it ends up active. Idempotent.
    pub(crate) fn add_or_activate(
        &mut self,
        id: i32,
        color: [u8; 4],
        target: Option<Vec2>,
        weight: f32,
    ) {
        let cluster = self.clusters.entry(id).or_insert(Cluster {
            color,
            target,
            weight,
            active: true,
        });
        cluster.color = color;
        cluster.target = target;
        cluster.weight = weight;
        cluster.active = true;
        debug!("cluster {id} registered (weight {weight})");
    }

    /// Deactivate, then delete the record. Particles keep their tag; the
    /// caller is responsible for reassigning them.
    pub(crate) fn deactivate_and_remove(&mut self, id: i32) {
        if let Some(cluster) = self.clusters.get_mut(&id) {
            cluster.active = false;
        }
        self.clusters.remove(&id);
        debug!("cluster {id} removed");
    }

    pub fn get(&self, id: i32) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    pub fn is_active(&self, id: i32) -> bool {
        self.get(id).map_or(false, |c| c.active)
    }

    /// All clusters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Cluster)> {
        self.clusters.iter().map(|(&id, c)| (id, c))
    }

    /// Active clusters in ascending id order.
    pub fn active(&self) -> impl Iterator<Item = (i32, &Cluster)> {
        self.iter().filter(|(_, c)| c.active)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_or_activate_is_idempotent() {
        let mut reg = ClusterRegistry::new();
        reg.add_or_activate(0, DEFAULT_COLOR, None, 1.0);
        reg.add_or_activate(0, DEFAULT_COLOR, None, 1.0);
        assert_eq!(reg.len(), 1);
        assert!(reg.is_active(0));
    }

    #[test]
    fn add_or_activate_updates_fields_and_reactivates() {
        let mut reg = ClusterRegistry::new();
        reg.add_or_activate(2, DEFAULT_COLOR, None, 1.0);
        reg.add_or_activate(2, [0, 0, 255, 255], Some(Vec2::new(5.0, 5.0)), 3.0);

        let c = reg.get(2).unwrap();
        assert_eq!(c.color, [0, 0, 255, 255]);
        assert_eq!(c.target, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(c.weight, 3.0);
        assert!(c.active);
    }

    #[test]
    fn deactivate_and_remove_deletes_the_record() {
        let mut reg = ClusterRegistry::new();
        reg.add_or_activate(1, DEFAULT_COLOR, None, 1.0);
        reg.deactivate_and_remove(1);
        assert!(reg.get(1).is_none());
        assert!(!reg.is_active(1));
        assert!(reg.is_empty());
    }

    #[test]
    fn active_iterates_in_ascending_id_order() {
        let mut reg = ClusterRegistry::new();
        reg.add_or_activate(3, DEFAULT_COLOR, None, 3.0);
        reg.add_or_activate(0, DEFAULT_COLOR, None, 1.0);
        reg.add_or_activate(7, DEFAULT_COLOR, None, 7.0);

        let ids: Vec<i32> = reg.active().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 3, 7]);
    }
}
