use std::f32::consts::PI;

use glam::Vec2;

use crate::{
    config::ContactTest,
    error::{Result, SimError},
    shape::ContactShape,
    types::BodyId,
};

/// A simulated particle: a point mass with a circular contact extent.
///
/// The radius is always `sqrt(mass / π)` and the contact polygon is always
/// centred on `position` with that radius; the setters keep both in sync.
#[derive(Clone, Debug)]
pub struct Body {
    id: BodyId,
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    mass: f32,
    radius: f32,
    active: bool,
    shape: ContactShape,
}

/// Radius of a body of mass `mass` (unit surface density).
#[inline]
pub fn radius_for_mass(mass: f32) -> f32 {
    (mass / PI).sqrt()
}

fn check_mass(mass: f32) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidMass(mass))
    }
}

impl Body {
    /// Creates an active body.
    ///
    /// ### Parameters
    /// - `id` - Handle assigned by the owning simulation.
    /// - `position`, `velocity`, `acceleration` - Initial kinematic state.
    /// - `mass` - Must be finite and strictly positive.
    /// - `vertex_count` - Vertices of the contact polygon (at least 3).
    ///
    /// ### Returns
    /// - `Err(SimError::InvalidMass)` for a non-positive or non-finite mass.
    /// - `Err(SimError::InvalidVertexCount)` for fewer than three vertices.
    pub fn new(
        id: BodyId,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        acceleration: Vec2,
        vertex_count: usize,
    ) -> Result<Self> {
        check_mass(mass)?;
        let radius = radius_for_mass(mass);
        let mut shape = ContactShape::new(radius, vertex_count)?;
        shape.set_center(position);

        Ok(Self {
            id,
            position,
            velocity,
            acceleration,
            mass,
            radius,
            active: true,
            shape,
        })
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn shape(&self) -> &ContactShape {
        &self.shape
    }

    /// Contact polygon vertices in world space, for drawing.
    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.shape.world_vertices()
    }

    /// Sets a new mass, recomputing the radius and resizing the polygon.
    ///
    /// ### Returns
    /// `Err(SimError::InvalidMass)` if `mass` is not finite and positive;
    /// the body is left untouched in that case.
    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        check_mass(mass)?;
        self.apply_mass(mass);
        Ok(())
    }

    /// Mass update for values the kernel already knows to be positive
    /// (sums of live masses).
    pub(crate) fn apply_mass(&mut self, mass: f32) {
        debug_assert!(mass > 0.0);
        self.mass = mass;
        self.radius = radius_for_mass(mass);
        self.shape.set_radius(self.radius);
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.shape.set_center(position);
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    pub fn set_vertex_count(&mut self, vertex_count: usize) -> Result<()> {
        self.shape.set_vertex_count(vertex_count)
    }

    /// Soft-deletes the body. There is no way back.
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// Explicit Euler step, then clears the accumulated acceleration.
    ///
    /// Does nothing for an inactive body.
    pub fn integrate(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.velocity += self.acceleration * dt;
        self.set_position(self.position + self.velocity * dt);
        self.acceleration = Vec2::ZERO;
    }

    /// Interval covered by the body on the X axis, as `(lo, hi)`.
    pub fn projection_on_axis(&self) -> (f32, f32) {
        (self.position.x - self.radius, self.position.x + self.radius)
    }

    /// Polygon contact test: does this body's polygon contain any vertex of
    /// `other`'s polygon?
    ///
    /// Always `false` when `self` is inactive.
    pub fn intersects(&self, other: &Body) -> bool {
        self.active && self.shape.intersects(&other.shape)
    }

    /// Contact test selected by `test`. Always `false` when `self` is inactive.
    pub fn intersects_with(&self, other: &Body, test: ContactTest) -> bool {
        match test {
            ContactTest::PolygonSampling => self.intersects(other),
            ContactTest::CenterDistance => {
                self.active
                    && self.position.distance(other.position) <= self.radius + other.radius
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body_at(x: f32, y: f32, mass: f32) -> Body {
        Body::new(BodyId(0), Vec2::new(x, y), Vec2::ZERO, mass, Vec2::ZERO, 30).unwrap()
    }

    #[test]
    fn radius_is_derived_from_mass() {
        let b = body_at(0.0, 0.0, PI * 4.0);
        assert_relative_eq!(b.radius(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(b.shape().radius(), 2.0, epsilon = 1e-6);
        assert!(b.is_active());
    }

    #[test]
    fn new_rejects_non_positive_mass() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let r = Body::new(BodyId(0), Vec2::ZERO, Vec2::ZERO, bad, Vec2::ZERO, 30);
            assert!(matches!(r, Err(SimError::InvalidMass(_))), "accepted {bad}");
        }
    }

    #[test]
    fn set_mass_resizes_shape_and_rejects_invalid_values() {
        let mut b = body_at(1.0, 2.0, 1.0);
        b.set_mass(PI * 9.0).unwrap();

        assert_relative_eq!(b.radius(), 3.0, epsilon = 1e-5);
        assert_relative_eq!(b.shape().radius(), 3.0, epsilon = 1e-5);
        assert_eq!(b.shape().center(), Vec2::new(1.0, 2.0));

        assert_eq!(b.set_mass(0.0), Err(SimError::InvalidMass(0.0)));
        assert_relative_eq!(b.mass(), PI * 9.0);
    }

    #[test]
    fn set_position_moves_the_shape() {
        let mut b = body_at(0.0, 0.0, 1.0);
        b.set_position(Vec2::new(4.0, -3.0));

        assert_eq!(b.shape().center(), Vec2::new(4.0, -3.0));
        for v in b.world_vertices() {
            assert_relative_eq!(v.distance(Vec2::new(4.0, -3.0)), b.radius(), epsilon = 1e-5);
        }
    }

    #[test]
    fn integrate_is_explicit_euler_and_clears_acceleration() {
        let mut b = Body::new(
            BodyId(0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 0.0),
            1.0,
            Vec2::new(0.0, 4.0),
            30,
        )
        .unwrap();

        b.integrate(0.5);

        // v = (2, 0) + (0, 4) * 0.5 = (2, 2); p = (1, 1) + (2, 2) * 0.5 = (2, 2)
        assert_eq!(b.velocity(), Vec2::new(2.0, 2.0));
        assert_eq!(b.position(), Vec2::new(2.0, 2.0));
        assert_eq!(b.acceleration(), Vec2::ZERO);
        assert_eq!(b.shape().center(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn integrate_is_a_no_op_when_inactive() {
        let mut b = Body::new(
            BodyId(0),
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            1.0,
            Vec2::new(1.0, 1.0),
            30,
        )
        .unwrap();
        b.deactivate();
        b.integrate(1.0);

        assert_eq!(b.position(), Vec2::ZERO);
        assert_eq!(b.velocity(), Vec2::new(1.0, 0.0));
        assert_eq!(b.acceleration(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn projection_spans_one_radius_each_side() {
        let b = body_at(5.0, -2.0, PI);
        let (lo, hi) = b.projection_on_axis();
        assert_relative_eq!(lo, 4.0, epsilon = 1e-6);
        assert_relative_eq!(hi, 6.0, epsilon = 1e-6);
    }

    #[test]
    fn inactive_body_never_intersects() {
        let mut a = body_at(0.0, 0.0, 1.0);
        let b = body_at(0.1, 0.0, 1.0);
        assert!(a.intersects(&b));

        a.deactivate();
        assert!(!a.intersects(&b));
        assert!(!a.intersects_with(&b, ContactTest::CenterDistance));
    }

    #[test]
    fn center_distance_test_touches_at_sum_of_radii() {
        let a = body_at(0.0, 0.0, PI);
        let touching = body_at(2.0, 0.0, PI);
        let apart = body_at(2.1, 0.0, PI);

        assert!(a.intersects_with(&touching, ContactTest::CenterDistance));
        assert!(!a.intersects_with(&apart, ContactTest::CenterDistance));
    }
}
