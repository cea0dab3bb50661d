//! Exact contact test and merge inside one broad-phase cluster.
//!
//! For a cluster handed over by [`crate::broad_phase::sweep`]:
//! 1. Every pair `(i, j)`, `i < j`, is tested with the configured
//!    [`ContactTest`]. A hit unions the two sets; the root whose body is
//!    heavier becomes the representative, and on an exact tie the root of
//!    `j` wins.
//! 2. Masses are summed per set into the representative. Every other body
//!    of the set is deactivated.
//! 3. A representative whose mass changed gets the sum, which also resizes
//!    its radius and contact polygon. Its position and velocity are then
//!    left alone or blended, depending on the [`MergePolicy`].

use glam::Vec2;
use log::debug;

use crate::{
    body::Body,
    config::{ContactTest, MergePolicy},
    disjoint_set::DisjointSet,
};

/// Outcome of resolving one or more clusters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Bodies deactivated because they were absorbed.
    pub absorbed: usize,
    /// Bodies that absorbed at least one other body.
    pub survivors: usize,
}

impl MergeReport {
    pub fn combine(self, other: MergeReport) -> MergeReport {
        MergeReport {
            absorbed: self.absorbed + other.absorbed,
            survivors: self.survivors + other.survivors,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct SetSum {
    members: usize,
    mass: f32,
    moment: Vec2,
    momentum: Vec2,
}

/// Scratch state for the narrow phase, reused across clusters and ticks.
#[derive(Debug, Default)]
pub struct NarrowPhase {
    sets: DisjointSet,
    sums: Vec<SetSum>,
}

impl NarrowPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests, clusters and merges the bodies of one cluster in place.
    ///
    /// ### Parameters
    /// - `cluster` - The bodies of one broad-phase cluster.
    /// - `test` - Exact contact test to apply to each pair.
    /// - `policy` - What survivors do with their position and velocity.
    ///
    /// ### Returns
    /// How many bodies were absorbed and how many absorbed something.
    ///
    /// ### Panics
    /// Panics if `cluster` is empty; the broad phase never produces one.
    pub fn resolve(
        &mut self,
        cluster: &mut [Body],
        test: ContactTest,
        policy: MergePolicy,
    ) -> MergeReport {
        assert!(!cluster.is_empty(), "narrow phase received an empty cluster");

        let n = cluster.len();
        self.sets.reset(n);

        for i in 0..n {
            for j in (i + 1)..n {
                if self.sets.same_set(i, j) || !cluster[i].intersects_with(&cluster[j], test) {
                    continue;
                }
                let root_i = self.sets.find(i);
                let root_j = self.sets.find(j);
                if cluster[root_i].mass() > cluster[root_j].mass() {
                    self.sets.link(root_j, root_i);
                } else {
                    self.sets.link(root_i, root_j);
                }
            }
        }

        self.sums.clear();
        self.sums.resize(n, SetSum::default());

        let mut report = MergeReport::default();
        for (i, body) in cluster.iter_mut().enumerate() {
            let root = self.sets.find(i);
            let sum = &mut self.sums[root];
            sum.members += 1;
            sum.mass += body.mass();
            sum.moment += body.mass() * body.position();
            sum.momentum += body.mass() * body.velocity();

            if root != i {
                body.deactivate();
                report.absorbed += 1;
            }
        }

        for (root, sum) in self.sums.iter().enumerate() {
            if sum.members < 2 {
                continue;
            }
            let survivor = &mut cluster[root];
            if survivor.mass() != sum.mass {
                survivor.apply_mass(sum.mass);
            }
            if policy == MergePolicy::ConserveMomentum {
                survivor.set_position(sum.moment / sum.mass);
                survivor.set_velocity(sum.momentum / sum.mass);
            }
            report.survivors += 1;

            debug!(
                "body {:?} absorbed {} bodies, mass now {:.3}",
                survivor.id(),
                sum.members - 1,
                sum.mass
            );
        }

        report
    }
}
