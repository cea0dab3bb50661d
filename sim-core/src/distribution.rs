use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Initial state for one body, ready for
/// [`crate::simulation::Simulation::create_body`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySeed {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

/// Parameters for [`scatter_in_disk`].
///
/// ### Fields
/// - `count` - Number of bodies to create.
/// - `max_radius` - Radius of the disk around the origin.
/// - `mass` - Mass of every body.
/// - `speed` - Magnitude of the tangential start velocity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskSpawn {
    pub count: usize,
    pub max_radius: f32,
    pub mass: f32,
    pub speed: f32,
}

impl Default for DiskSpawn {
    fn default() -> Self {
        Self {
            count: 2000,
            max_radius: 250.0,
            mass: 1.0,
            speed: 1.0,
        }
    }
}

impl DiskSpawn {
    pub fn new(count: usize, max_radius: f32) -> Self {
        Self {
            count,
            max_radius,
            ..Default::default()
        }
    }
}

fn tangential_seed(angle: f32, radius: f32, speed: f32, mass: f32) -> BodySeed {
    let (sin, cos) = angle.sin_cos();
    BodySeed {
        position: Vec2::new(cos, sin) * radius,
        velocity: Vec2::new(sin, -cos) * speed,
        mass,
    }
}

/// Scatters bodies inside a disk centred on the origin.
///
/// Each body gets a uniform random angle and a distance drawn uniformly
/// from `[0, max_radius)`, so the cloud is denser towards the centre. The
/// start velocity is tangential, `(sin θ, -cos θ) * speed`, which sets the
/// whole cloud spinning in one direction.
pub fn scatter_in_disk(disk: &DiskSpawn, rng: &mut impl Rng) -> Vec<BodySeed> {
    (0..disk.count)
        .map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let radius = rng.random::<f32>() * disk.max_radius;
            tangential_seed(angle, radius, disk.speed, disk.mass)
        })
        .collect()
}

/// Scatters `count` unit-mass bodies in a cloud whose extent grows with
/// `sqrt(count)`.
///
/// The distance from the origin is `sqrt(count) * 10 * |s / 3 - 1|` where
/// `s` is the sum of six uniform samples, which clusters bodies near the
/// origin with a soft tail. Velocities are tangential with unit speed.
pub fn scatter_clustered(count: usize, rng: &mut impl Rng) -> Vec<BodySeed> {
    let extent = (count as f32).sqrt() * 10.0;
    (0..count)
        .map(|_| {
            let angle = rng.random::<f32>() * TAU;
            let s: f32 = (0..6).map(|_| rng.random::<f32>()).sum();
            let radius = extent * (s / 3.0 - 1.0).abs();
            tangential_seed(angle, radius, 1.0, 1.0)
        })
        .collect()
}

/// Random start velocity with each component in `[-max_speed, max_speed)`.
///
/// A `max_speed` that is not positive (NaN included) gives a body at rest.
pub fn random_launch_velocity(rng: &mut impl Rng, max_speed: f32) -> Vec2 {
    if max_speed.is_nan() || max_speed <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-max_speed..max_speed),
        rng.random_range(-max_speed..max_speed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn disk_seeds_stay_inside_the_disk() {
        let mut rng = StdRng::seed_from_u64(7);
        let disk = DiskSpawn::new(500, 40.0);

        let seeds = scatter_in_disk(&disk, &mut rng);

        assert_eq!(seeds.len(), 500);
        for s in &seeds {
            assert!(s.position.length() <= 40.0 + 1e-3);
            assert_eq!(s.mass, 1.0);
        }
    }

    #[test]
    fn disk_velocity_is_tangential_with_requested_speed() {
        let mut rng = StdRng::seed_from_u64(11);
        let disk = DiskSpawn {
            count: 100,
            max_radius: 10.0,
            mass: 2.0,
            speed: 3.0,
        };

        for s in scatter_in_disk(&disk, &mut rng) {
            assert_relative_eq!(s.velocity.length(), 3.0, epsilon = 1e-4);
            assert_relative_eq!(s.velocity.dot(s.position), 0.0, epsilon = 1e-3);
            // Clockwise spin: position x velocity has a negative z component.
            if s.position.length() > 1e-3 {
                assert!(s.position.perp_dot(s.velocity) < 0.0);
            }
            assert_eq!(s.mass, 2.0);
        }
    }

    #[test]
    fn same_seed_gives_same_cloud() {
        let disk = DiskSpawn::new(10, 5.0);
        let a = scatter_in_disk(&disk, &mut StdRng::seed_from_u64(3));
        let b = scatter_in_disk(&disk, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn clustered_cloud_is_bounded_by_its_extent() {
        let mut rng = StdRng::seed_from_u64(5);
        let seeds = scatter_clustered(100, &mut rng);

        assert_eq!(seeds.len(), 100);
        // |s / 3 - 1| <= 1, so no body is further than sqrt(100) * 10.
        for s in &seeds {
            assert!(s.position.length() <= 100.0 + 1e-3);
            assert_relative_eq!(s.velocity.length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn launch_velocity_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let v = random_launch_velocity(&mut rng, 30.0);
            assert!((-30.0..30.0).contains(&v.x));
            assert!((-30.0..30.0).contains(&v.y));
        }
        assert_eq!(random_launch_velocity(&mut rng, 0.0), Vec2::ZERO);
    }

    #[test]
    fn launch_velocity_is_zero_for_unusable_speeds() {
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(random_launch_velocity(&mut rng, -3.0), Vec2::ZERO);
        assert_eq!(random_launch_velocity(&mut rng, f32::NAN), Vec2::ZERO);
    }
}
