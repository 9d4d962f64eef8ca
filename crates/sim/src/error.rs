//! Error types for simulation construction.
//!
//! Only configuration is validated; runtime operations never fail (busy or
//! unmet preconditions are silent no-ops, numeric edges are guarded where
//! they occur).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max particle radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("simulation bounds must have positive extent, got {width}x{height}")]
    DegenerateBounds { width: f32, height: f32 },
}
