//! Sweep-and-prune over the X axis.
//!
//! The broad phase runs in three steps:
//! 1. [`compact`]: drop bodies a previous merge deactivated.
//! 2. [`sort_by_projection`]: order the survivors by the lower bound of
//!    their X projection.
//! 3. [`sweep`]: walk the sorted slice and cut it into maximal runs whose
//!    projections chain-overlap.
//!
//! Two bodies in different runs cannot touch, so the narrow phase only has
//! to look inside each run. [`detect`] chains all three steps.

use std::ops::Range;

use crate::body::Body;

/// Removes every inactive body, keeping the relative order of the rest.
///
/// This is the only place deactivated bodies leave the collection.
///
/// ### Returns
/// The number of bodies removed.
pub fn compact(bodies: &mut Vec<Body>) -> usize {
    let before = bodies.len();
    bodies.retain(Body::is_active);
    before - bodies.len()
}

/// Stable sort by the lower end of each body's X projection.
pub fn sort_by_projection(bodies: &mut [Body]) {
    bodies.sort_by(|a, b| a.projection_on_axis().0.total_cmp(&b.projection_on_axis().0));
}

/// Splits a projection-sorted slice into candidate collision clusters.
///
/// The sweep keeps the upper bound `hi` of the open cluster. A body whose
/// lower bound is at most `hi` joins the cluster and raises `hi` to its own
/// upper bound if larger; the first body starting beyond `hi` closes the
/// cluster and opens the next one. The last open cluster is flushed at the
/// end, and single-body clusters are kept.
///
/// ### Parameters
/// - `bodies` - Bodies sorted with [`sort_by_projection`].
///
/// ### Returns
/// Contiguous, non-empty index ranges that together cover `bodies` exactly
/// once, in order. Empty input gives no ranges.
pub fn sweep(bodies: &[Body]) -> Vec<Range<usize>> {
    let mut clusters = Vec::new();
    let Some(first) = bodies.first() else {
        return clusters;
    };

    let mut start = 0;
    let mut hi = first.projection_on_axis().1;
    for (i, body) in bodies.iter().enumerate().skip(1) {
        let (lo_b, hi_b) = body.projection_on_axis();
        if lo_b <= hi {
            hi = hi.max(hi_b);
        } else {
            clusters.push(start..i);
            start = i;
            hi = hi_b;
        }
    }
    clusters.push(start..bodies.len());
    clusters
}

/// Compacts, sorts and sweeps `bodies` in place.
///
/// ### Returns
/// The cluster ranges over the reordered `bodies`, see [`sweep`].
pub fn detect(bodies: &mut Vec<Body>) -> Vec<Range<usize>> {
    compact(bodies);
    sort_by_projection(bodies);
    sweep(bodies)
}
