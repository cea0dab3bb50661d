//! The owning container and per-tick pipeline.
//!
//! One call to [`Simulation::advance`] runs:
//! 1. [`Simulation::resolve_collisions`]: broad phase, then the narrow
//!    phase on every cluster. Absorbed bodies are deactivated and the
//!    survivors gain their mass.
//! 2. [`Simulation::accumulate_gravity`]: pairwise gravity over the bodies
//!    that are still active.
//! 3. Integration: every active body takes an explicit Euler step and its
//!    acceleration is cleared.
//!
//! Merges therefore settle before forces are computed, and the bodies they
//! deactivate are purged at the start of the next collision pass.

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use crate::{
    body::Body,
    broad_phase,
    config::SimConfig,
    distribution::{self, BodySeed, DiskSpawn},
    error::Result,
    gravity::ForceField,
    narrow_phase::{MergeReport, NarrowPhase},
    types::BodyId,
};

/// A population of gravitating, merging bodies.
#[derive(Debug)]
pub struct Simulation {
    bodies: Vec<Body>,
    cfg: SimConfig,
    next_id: u64,
    narrow: NarrowPhase,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::with_config_unchecked(SimConfig::default())
    }
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// ### Returns
    /// The error from [`SimConfig::validate`] if `cfg` is unusable.
    pub fn new(cfg: SimConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::with_config_unchecked(cfg))
    }

    fn with_config_unchecked(cfg: SimConfig) -> Self {
        Self {
            bodies: Vec::new(),
            cfg,
            next_id: 0,
            narrow: NarrowPhase::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Replaces the configuration.
    ///
    /// A changed vertex count is applied to every existing body.
    pub fn set_config(&mut self, cfg: SimConfig) -> Result<()> {
        cfg.validate()?;
        if cfg.vertex_count != self.cfg.vertex_count {
            self.set_vertex_count(cfg.vertex_count)?;
        }
        self.cfg = cfg;
        Ok(())
    }

    /// Adds a body with zero starting acceleration.
    ///
    /// ### Returns
    /// The new body's handle, or `SimError::InvalidMass` for a mass that is
    /// not finite and positive.
    pub fn create_body(&mut self, position: Vec2, velocity: Vec2, mass: f32) -> Result<BodyId> {
        self.create_body_with(position, velocity, mass, Vec2::ZERO)
    }

    /// Adds a body with an explicit starting acceleration.
    pub fn create_body_with(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        mass: f32,
        acceleration: Vec2,
    ) -> Result<BodyId> {
        let id = BodyId(self.next_id);
        let body = Body::new(
            id,
            position,
            velocity,
            mass,
            acceleration,
            self.cfg.vertex_count,
        )?;
        self.next_id += 1;
        self.bodies.push(body);
        Ok(id)
    }

    /// Adds one body per seed.
    ///
    /// ### Returns
    /// The handles of the new bodies in seed order. Stops at the first seed
    /// with an invalid mass; bodies added before it stay.
    pub fn spawn(&mut self, seeds: &[BodySeed]) -> Result<Vec<BodyId>> {
        self.bodies.reserve(seeds.len());
        seeds
            .iter()
            .map(|s| self.create_body(s.position, s.velocity, s.mass))
            .collect()
    }

    /// Scatters bodies in a disk around the origin, see
    /// [`distribution::scatter_in_disk`].
    pub fn spawn_disk(&mut self, disk: &DiskSpawn, rng: &mut impl Rng) -> Result<Vec<BodyId>> {
        let seeds = distribution::scatter_in_disk(disk, rng);
        debug!(
            "spawning {} bodies in a disk of radius {}",
            seeds.len(),
            disk.max_radius
        );
        self.spawn(&seeds)
    }

    /// Scatters `count` unit-mass bodies in a centre-heavy cloud, see
    /// [`distribution::scatter_clustered`].
    pub fn spawn_clustered(&mut self, count: usize, rng: &mut impl Rng) -> Result<Vec<BodyId>> {
        let seeds = distribution::scatter_clustered(count, rng);
        debug!("spawning {} bodies in a clustered cloud", seeds.len());
        self.spawn(&seeds)
    }

    /// Removes every body. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    /// Rebuilds every contact polygon with `vertex_count` vertices and uses
    /// it for bodies created later.
    pub fn set_vertex_count(&mut self, vertex_count: usize) -> Result<()> {
        self.cfg.with_vertex_count(vertex_count).validate()?;
        for body in &mut self.bodies {
            body.set_vertex_count(vertex_count)?;
        }
        self.cfg.vertex_count = vertex_count;
        Ok(())
    }

    /// Number of active bodies.
    pub fn count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_active()).count()
    }

    /// Number of stored bodies, including absorbed ones that have not been
    /// purged yet.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Active bodies in storage order.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(|b| b.is_active())
    }

    /// Looks up a body by handle. Absorbed bodies stay visible (inactive)
    /// until the next collision pass purges them.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    /// Sum of the masses of all active bodies.
    pub fn total_mass(&self) -> f32 {
        self.bodies().map(Body::mass).sum()
    }

    /// Runs one tick: collisions, gravity, integration.
    ///
    /// An empty simulation is left as is.
    pub fn advance(&mut self, dt: f32) {
        if self.bodies.is_empty() {
            return;
        }
        self.resolve_collisions();
        self.accumulate_gravity();
        for body in &mut self.bodies {
            body.integrate(dt);
        }
    }

    /// Broad phase plus narrow phase over the whole population.
    ///
    /// Purges previously absorbed bodies, re-sorts the rest along X, and
    /// merges every set of touching bodies into its heaviest member.
    pub fn resolve_collisions(&mut self) -> MergeReport {
        let clusters = broad_phase::detect(&mut self.bodies);

        let mut report = MergeReport::default();
        for range in &clusters {
            let cluster = &mut self.bodies[range.clone()];
            report = report.combine(self.narrow.resolve(cluster, self.cfg.contact, self.cfg.merge));
        }

        trace!(
            "collision pass: {} clusters, {} absorbed, {} bodies left",
            clusters.len(),
            report.absorbed,
            self.bodies.len() - report.absorbed
        );
        report
    }

    /// Adds pairwise gravity into the accelerations of all active bodies.
    pub fn accumulate_gravity(&mut self) {
        ForceField::from_config(&self.cfg).accumulate(&mut self.bodies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn new_validates_config() {
        let bad = SimConfig::default().with_softening(-1.0);
        assert!(matches!(Simulation::new(bad), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn create_body_assigns_increasing_ids_and_uses_vertex_count() {
        let mut sim = Simulation::new(SimConfig::default().with_vertex_count(9)).unwrap();

        let a = sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap();
        let b = sim.create_body(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0).unwrap();

        assert_eq!(a, BodyId(0));
        assert_eq!(b, BodyId(1));
        assert_eq!(sim.count(), 2);
        assert_eq!(sim.body(b).unwrap().shape().vertex_count(), 9);
    }

    #[test]
    fn create_body_rejects_bad_mass_without_consuming_an_id() {
        let mut sim = Simulation::default();

        assert_eq!(
            sim.create_body(Vec2::ZERO, Vec2::ZERO, -2.0),
            Err(SimError::InvalidMass(-2.0))
        );
        assert!(sim.is_empty());
        assert_eq!(sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0), Ok(BodyId(0)));
    }

    #[test]
    fn advance_on_empty_simulation_is_a_no_op() {
        let mut sim = Simulation::default();
        sim.advance(0.1);
        assert_eq!(sim.count(), 0);
    }

    #[test]
    fn handles_survive_resorting() {
        let mut sim = Simulation::default();
        let right = sim.create_body(Vec2::new(50.0, 0.0), Vec2::ZERO, 1.0).unwrap();
        let left = sim.create_body(Vec2::new(-50.0, 0.0), Vec2::ZERO, 1.0).unwrap();

        sim.resolve_collisions();

        assert_eq!(sim.body(left).unwrap().position().x, -50.0);
        assert_eq!(sim.body(right).unwrap().position().x, 50.0);
    }

    #[test]
    fn absorbed_bodies_linger_until_the_next_collision_pass() {
        let mut sim = Simulation::default();
        let a = sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap();
        let b = sim.create_body(Vec2::new(0.2, 0.0), Vec2::ZERO, 3.0).unwrap();

        sim.advance(0.01);
        assert_eq!(sim.count(), 1);
        assert_eq!(sim.len(), 2);
        assert!(!sim.body(a).unwrap().is_active());
        assert_relative_eq!(sim.body(b).unwrap().mass(), 4.0);

        sim.advance(0.01);
        assert_eq!(sim.len(), 1);
        assert!(sim.body(a).is_none());
    }

    #[test]
    fn set_vertex_count_updates_every_body() {
        let mut sim = Simulation::default();
        sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap();
        sim.create_body(Vec2::new(9.0, 0.0), Vec2::ZERO, 1.0).unwrap();

        sim.set_vertex_count(6).unwrap();
        assert!(sim.bodies().all(|b| b.shape().vertex_count() == 6));
        assert_eq!(sim.config().vertex_count, 6);

        assert_eq!(sim.set_vertex_count(2), Err(SimError::InvalidVertexCount(2)));
        assert_eq!(sim.config().vertex_count, 6);
    }

    #[test]
    fn set_config_applies_new_vertex_count() {
        let mut sim = Simulation::default();
        sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap();

        sim.set_config(SimConfig::default().with_vertex_count(5).with_gravity(2.0))
            .unwrap();

        assert_eq!(sim.config().gravity, 2.0);
        assert!(sim.bodies().all(|b| b.shape().vertex_count() == 5));
    }

    #[test]
    fn spawn_disk_adds_requested_bodies() {
        let mut sim = Simulation::default();
        let mut rng = StdRng::seed_from_u64(1);

        let ids = sim.spawn_disk(&DiskSpawn::new(64, 100.0), &mut rng).unwrap();

        assert_eq!(ids.len(), 64);
        assert_eq!(sim.count(), 64);
        assert_relative_eq!(sim.total_mass(), 64.0);
    }

    #[test]
    fn spawn_clustered_adds_unit_mass_bodies() {
        let mut sim = Simulation::default();
        let mut rng = StdRng::seed_from_u64(4);

        let ids = sim.spawn_clustered(49, &mut rng).unwrap();

        assert_eq!(ids.len(), 49);
        assert_eq!(sim.count(), 49);
        assert_relative_eq!(sim.total_mass(), 49.0);
        assert!(sim.bodies().all(|b| b.position().length() <= 70.0 + 1e-3));
    }

    #[test]
    fn mass_is_conserved_over_many_ticks() {
        let mut sim = Simulation::default();
        let mut rng = StdRng::seed_from_u64(42);
        sim.spawn_disk(&DiskSpawn::new(300, 30.0), &mut rng).unwrap();
        let before = sim.total_mass();

        for _ in 0..50 {
            sim.advance(0.05);
        }

        assert!(sim.count() < 300);
        assert_relative_eq!(sim.total_mass(), before, max_relative = 1e-4);
    }

    #[test]
    fn clear_empties_but_keeps_ids_unique() {
        let mut sim = Simulation::default();
        sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap();
        sim.clear();

        assert_eq!(sim.count(), 0);
        assert_eq!(sim.create_body(Vec2::ZERO, Vec2::ZERO, 1.0), Ok(BodyId(1)));
    }
}
