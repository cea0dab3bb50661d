use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Number of polygon vertices used for new bodies unless configured otherwise.
pub const DEFAULT_VERTEX_COUNT: usize = 30;

/// Exact contact test used by the narrow phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactTest {
    /// One body's polygon must contain at least one vertex of the other's.
    #[default]
    PolygonSampling,
    /// Centre distance no larger than the sum of radii.
    CenterDistance,
}

/// What the surviving body of a merge does with its own kinematic state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The heaviest body keeps its position and velocity and only gains mass.
    #[default]
    KeepWinner,
    /// The survivor moves to the mass-weighted centroid of its set and takes
    /// the mass-weighted mean velocity.
    ConserveMomentum,
}

/// Global simulation parameters.
///
/// ### Fields
/// - `gravity` - Gravitational coefficient `G`.
/// - `softening` - Floor applied to the squared distance in the force law.
/// - `vertex_count` - Vertices of each body's contact polygon.
/// - `contact` - Exact contact test for the narrow phase.
/// - `merge` - Kinematic policy for merged bodies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub gravity: f32,
    pub softening: f32,
    pub vertex_count: usize,
    pub contact: ContactTest,
    pub merge: MergePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            softening: 0.01,
            vertex_count: DEFAULT_VERTEX_COUNT,
            contact: ContactTest::default(),
            merge: MergePolicy::default(),
        }
    }
}

impl SimConfig {
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_softening(mut self, softening: f32) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    pub fn with_contact(mut self, contact: ContactTest) -> Self {
        self.contact = contact;
        self
    }

    pub fn with_merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    /// Checks that every field is usable by the kernel.
    ///
    /// ### Returns
    /// - `Ok(())` if the configuration is valid.
    /// - `Err(SimError::InvalidConfig)` for a non-finite `gravity` or a
    ///   `softening` that is not strictly positive.
    /// - `Err(SimError::InvalidVertexCount)` for fewer than three vertices.
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.softening.is_finite() && self.softening > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "softening must be finite and > 0, got {}",
                self.softening
            )));
        }
        if self.vertex_count < 3 {
            return Err(SimError::InvalidVertexCount(self.vertex_count));
        }
        Ok(())
    }
}
