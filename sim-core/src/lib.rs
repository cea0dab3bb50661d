//! Core 2-D gravity and merge-on-contact simulation library.
//!
//! Main components:
//! - [`shape`]: regular-polygon contact shapes and point containment.
//! - [`body`]: simulated bodies with mass-derived radius.
//! - [`gravity`]: pairwise Newtonian gravity with softening.
//! - [`broad_phase`]: sweep-and-prune along the X axis.
//! - [`narrow_phase`]: exact contact test and mass-accreting merge.
//! - [`disjoint_set`]: union-find scratch used by the narrow phase.
//! - [`simulation`]: the owning container and per-tick pipeline.
//! - [`distribution`]: initial placement helpers.
//! - [`config`]: global simulation parameters.
//! - [`error`]: error type returned at the kernel boundary.
//! - [`types`]: shared handles.

pub mod body;
pub mod broad_phase;
pub mod config;
pub mod disjoint_set;
pub mod distribution;
pub mod error;
pub mod gravity;
pub mod narrow_phase;
pub mod shape;
pub mod simulation;
pub mod types;

pub use body::Body;
pub use config::{ContactTest, MergePolicy, SimConfig};
pub use error::{Result, SimError};
pub use simulation::Simulation;
pub use types::BodyId;
