//! Common test utilities for integration tests.
#![allow(dead_code)]

use bevy::math::DVec2;
use orbit_planner::body::PointMass;
use orbit_planner::path::PathConfig;
use orbit_planner::types::SUN_SGP;

/// The Sun as a fixed point mass at the origin.
pub fn sun() -> PointMass {
    PointMass::new(DVec2::ZERO, SUN_SGP)
}

/// Circular orbit state on the positive x-axis, travelling clockwise.
pub fn circular_orbit(radius: f64) -> (DVec2, DVec2) {
    let v = (SUN_SGP / radius).sqrt();
    (DVec2::new(radius, 0.0), DVec2::new(0.0, -v))
}

/// Elliptical orbit state at perihelion, travelling clockwise.
pub fn elliptical_orbit(perihelion: f64, eccentricity: f64) -> (DVec2, DVec2) {
    let a = perihelion / (1.0 - eccentricity);
    let v = (SUN_SGP * (2.0 / perihelion - 1.0 / a)).sqrt();
    (DVec2::new(perihelion, 0.0), DVec2::new(0.0, -v))
}

/// Compute specific orbital energy.
pub fn orbital_energy(pos: DVec2, vel: DVec2) -> f64 {
    0.5 * vel.length_squared() - SUN_SGP / pos.length()
}

/// Path settings small enough for quick tests.
pub fn short_config(num_samples: usize) -> PathConfig {
    PathConfig {
        num_samples,
        ..Default::default()
    }
}

/// Simulate using Velocity Verlet for a given duration.
pub fn simulate_verlet(
    mut pos: DVec2,
    mut vel: DVec2,
    duration: f64,
    num_steps: usize,
) -> (DVec2, DVec2) {
    let dt = duration / num_steps as f64;

    for _ in 0..num_steps {
        let r = pos.length();
        let acc = -SUN_SGP / (r * r * r) * pos;

        let new_pos = pos + vel * dt + acc * (0.5 * dt * dt);
        let new_r = new_pos.length();
        let new_acc = -SUN_SGP / (new_r * new_r * new_r) * new_pos;
        let new_vel = vel + (acc + new_acc) * (0.5 * dt);

        pos = new_pos;
        vel = new_vel;
    }

    (pos, vel)
}
