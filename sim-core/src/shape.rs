use glam::Vec2;

use crate::error::{Result, SimError};

/// Regular polygon approximating a body's circular extent.
///
/// Vertices are stored relative to the shape centre, so moving the shape is
/// a single `center` update and resizing only rebuilds the local loop.
/// Vertex `i` sits at angle `i / vertex_count * 360° - 90°` on the circle of
/// radius `radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactShape {
    center: Vec2,
    radius: f32,
    local: Vec<Vec2>,
}

impl ContactShape {
    /// Builds a polygon of `vertex_count` vertices circumscribed at `radius`
    /// and centred at the origin.
    ///
    /// ### Returns
    /// - `Ok(shape)` on success.
    /// - `Err(SimError::InvalidVertexCount)` if `vertex_count < 3`.
    pub fn new(radius: f32, vertex_count: usize) -> Result<Self> {
        if vertex_count < 3 {
            return Err(SimError::InvalidVertexCount(vertex_count));
        }
        let mut shape = Self {
            center: Vec2::ZERO,
            radius,
            local: Vec::with_capacity(vertex_count),
        };
        shape.rebuild(vertex_count);
        Ok(shape)
    }

    fn rebuild(&mut self, vertex_count: usize) {
        self.local.clear();
        self.local
            .extend((0..vertex_count).map(|i| Self::vertex_at(i, vertex_count, self.radius)));
    }

    fn vertex_at(index: usize, vertex_count: usize, radius: f32) -> Vec2 {
        let degrees = index as f32 / vertex_count as f32 * 360.0 - 90.0;
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2::new(radius * cos, radius * sin)
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn vertex_count(&self) -> usize {
        self.local.len()
    }

    /// Vertices relative to the shape centre.
    pub fn vertices(&self) -> &[Vec2] {
        &self.local
    }

    /// Vertices in world space, in loop order.
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.local.iter().map(move |&v| self.center + v)
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Resizes the polygon, keeping its centre and vertex count.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        let n = self.local.len();
        self.rebuild(n);
    }

    /// Rebuilds the polygon with a different number of vertices.
    ///
    /// ### Returns
    /// `Err(SimError::InvalidVertexCount)` if `vertex_count < 3`; the shape
    /// is left untouched in that case.
    pub fn set_vertex_count(&mut self, vertex_count: usize) -> Result<()> {
        if vertex_count < 3 {
            return Err(SimError::InvalidVertexCount(vertex_count));
        }
        self.rebuild(vertex_count);
        Ok(())
    }

    /// Even-odd ray casting test for a world-space point.
    ///
    /// A ray is cast from `p` towards `+x`. Every edge whose Y span straddles
    /// `p.y` (half-open, so a vertex shared by two edges is counted once)
    /// toggles the parity when `p.x` is at or before the edge's crossing.
    /// An exactly horizontal edge toggles when `p` lies on it. The point is
    /// inside iff the parity ends up odd.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let Some(&last) = self.local.last() else {
            return false;
        };

        let mut inside = false;
        let mut a = self.center + last;
        for &local in &self.local {
            let b = self.center + local;
            if a.y == b.y {
                if p.y == a.y && p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) {
                    inside = !inside;
                }
            } else if p.y >= a.y.min(b.y) && p.y < a.y.max(b.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x <= cross_x {
                    inside = !inside;
                }
            }
            a = b;
        }
        inside
    }

    /// Returns `true` if any world vertex of `other` lies inside `self`.
    ///
    /// Only `other`'s vertices are sampled, so the test is not symmetric and
    /// can miss overlaps where no vertex of `other` falls inside `self`.
    /// For near-equal regular polygons this is close enough.
    pub fn intersects(&self, other: &ContactShape) -> bool {
        other.world_vertices().any(|v| self.contains_point(v))
    }
}
