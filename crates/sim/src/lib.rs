//! 2D particle clustering simulation engine.
//!
//! A population of particles self-organizes into clusters through:
//! - Short-range contact forces resolved over a spatial hash grid
//!   (rebuilt every integration sub-step)
//! - Cluster-level attraction toward centroids and optional target points
//! - Gradual split/join operations that reassign membership a bounded
//!   slice per frame
//!
//! This crate is framework-agnostic - it handles simulation only. Hosts
//! drive `ParticleSystem::update` once per frame and consume read-only
//! particle/cluster snapshots for rendering.

pub mod cluster;
pub mod error;
pub mod grid;
pub mod math;
pub mod particle;
pub mod physics;
pub mod rect;
pub mod spawn;
pub mod system;

pub use cluster::{Cluster, ClusterRegistry, DEFAULT_COLOR};
pub use error::ConfigError;
pub use grid::SpatialGrid;
pub use particle::{Particle, UNASSIGNED};
pub use rect::{Rect, SdfHit};
pub use spawn::scatter;
pub use system::{ParticleSystem, SplitItem};
