//! Error types for the simulation kernel

use thiserror::Error;

/// Failures surfaced at the kernel boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Mass must be strictly positive and finite
    #[error("invalid mass: {0} (must be finite and > 0)")]
    InvalidMass(f32),

    /// Contact polygons need at least three vertices
    #[error("invalid vertex count: {0} (must be >= 3)")]
    InvalidVertexCount(usize),

    /// Rejected configuration value
    #[error("invalid simulation configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, SimError>;
