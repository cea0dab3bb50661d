//! Direct-sum Newtonian gravity with a softening floor.

use glam::Vec2;

use crate::{body::Body, config::SimConfig};

/// Pairwise gravity between all active bodies.
///
/// ### Fields
/// - `gravity` - Gravitational coefficient `G`.
/// - `softening` - Lower bound on the squared distance used in the force
///   law. It only limits the magnitude at short range, never the direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceField {
    pub gravity: f32,
    pub softening: f32,
}

impl ForceField {
    pub fn new(gravity: f32, softening: f32) -> Self {
        Self { gravity, softening }
    }

    pub fn from_config(cfg: &SimConfig) -> Self {
        Self::new(cfg.gravity, cfg.softening)
    }

    /// Unit-mass field that a body at `to` exerts on a body at `from`:
    /// `G * diff / (max(|diff|², ε) * |diff|)` with `diff = to - from`.
    ///
    /// The acceleration of the body at `from` is this value times the mass
    /// at `to`. Coincident positions give `Vec2::ZERO`, since there is no
    /// direction to pull in.
    #[inline]
    pub fn field_between(&self, from: Vec2, to: Vec2) -> Vec2 {
        let diff = to - from;
        let d2 = diff.length_squared();
        if d2 == 0.0 {
            return Vec2::ZERO;
        }
        let d = d2.sqrt();
        self.gravity * diff / (d2.max(self.softening) * d)
    }

    /// Adds the gravitational acceleration of every active pair into the
    /// bodies' accumulated accelerations.
    ///
    /// Each unordered pair `(i, j)` is visited once: body `i` gains
    /// `m_j * f` and body `j` loses `m_i * f`, so the two contributions are
    /// equal and opposite up to the mass factors. Inactive bodies neither
    /// exert nor receive force. Existing accelerations are added to, not
    /// replaced.
    pub fn accumulate(&self, bodies: &mut [Body]) {
        let n = bodies.len();
        for i in 0..n {
            if !bodies[i].is_active() {
                continue;
            }
            let pos_i = bodies[i].position();
            let mass_i = bodies[i].mass();
            let mut acc_i = Vec2::ZERO;

            for j in (i + 1)..n {
                let bj = &mut bodies[j];
                if !bj.is_active() {
                    continue;
                }
                let f = self.field_between(pos_i, bj.position());
                acc_i += bj.mass() * f;
                bj.set_acceleration(bj.acceleration() - mass_i * f);
            }

            let bi = &mut bodies[i];
            bi.set_acceleration(bi.acceleration() + acc_i);
        }
    }
}
