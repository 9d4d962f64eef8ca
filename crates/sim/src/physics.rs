//! Unified tuning constants for the clustering simulation.
//!
//! All simulation modules should use these constants instead of defining
//! their own. This prevents drift between subsystems and makes tuning easier.

/// Number of integration sub-steps per `update` call.
pub const SUB_STEPS: usize = 10;

/// Fraction of the damped velocity blended into the new position each
/// sub-step. Together with [`ACCEL_SCALE`] this sets how bouncy the
/// population feels.
pub const DT_FRACTION: f32 = 0.1;

/// Scale applied to the position-difference velocity before damping.
pub const ACCEL_SCALE: f32 = 0.1;

/// Default per-particle velocity damping (momentum retained per sub-step).
pub const DEFAULT_DAMPING: f32 = 0.999;

/// Default per-particle friction factor, applied to the velocity component
/// that drove the particle into a boundary.
pub const DEFAULT_FRICTION: f32 = 0.1;

/// Blend factor for the exponentially smoothed position consumed by hosts.
pub const SMOOTHING: f32 = 0.05;

/// Squared separation below which `attract` applies no force.
pub const MIN_ATTRACT_DIST_SQ: f32 = 0.01;

/// Pairwise strength between particles of the same cluster. Negative
/// strength points the force back toward the neighbor, so same-cluster
/// contacts cohere.
pub const SAME_CLUSTER_STRENGTH: f32 = -1.5;

/// Interaction radius margin for same-cluster pairs, as a fraction of the
/// maximum particle radius.
pub const SAME_CLUSTER_MARGIN: f32 = 0.02;

/// Pairwise strength between particles of different clusters (weak push).
pub const OTHER_CLUSTER_STRENGTH: f32 = 0.01;

/// Interaction radius margin for cross-cluster pairs.
pub const OTHER_CLUSTER_MARGIN: f32 = 0.05;

/// Strength of the overlap-resolving contact force.
pub const CONTACT_STRENGTH: f32 = 1.0;

/// Attraction toward the cluster centroid (negative = pull).
pub const CENTROID_PULL: f32 = -2.0;

/// Attraction toward the bounds center for clustered particles.
pub const CENTER_PULL: f32 = -0.4;

/// Attraction toward a cluster's target point.
pub const TARGET_PULL: f32 = -1.0;

/// Distance span over which the centroid falloff input is normalized.
pub const CENTROID_FALLOFF_SPAN: f32 = 300.0;

/// Distance span over which the target falloff input is normalized.
pub const TARGET_FALLOFF_SPAN: f32 = 100.0;

/// Strength of the static-obstacle push.
pub const OBSTACLE_STRENGTH: f32 = 3.0;

/// Amplitude of the idle drift applied to unclustered particles.
pub const DRIFT_AMPLITUDE: f32 = 0.75;

/// Idle drift oscillation rate in cycles per second of host time.
pub const DRIFT_RATE: f32 = 0.05;

/// A split reassignment slice ends after the member whose in-group index
/// is a multiple of this stride (groups after the first only).
pub const SPLIT_YIELD_STRIDE: usize = 8;

/// Idle slices inserted after each non-primary group finishes reassigning.
pub const SPLIT_GROUP_PAUSE: u32 = 10;

/// A join reassignment slice ends after the particle whose index is a
/// multiple of this stride.
pub const JOIN_YIELD_STRIDE: usize = 10;
