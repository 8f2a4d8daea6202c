//! Test utilities for orbit and path tests.
//!
//! Provides fixtures for creating start states around the Sun and
//! assertions for the invariants paths and orbits should keep.

use bevy::math::DVec2;

use crate::types::SUN_SGP;

/// Fixtures for creating test states. All distances in km.
pub mod fixtures {
    use super::*;
    use crate::body::PointMass;

    /// The Sun as a fixed point mass at the origin.
    pub fn sun() -> PointMass {
        PointMass::new(DVec2::ZERO, SUN_SGP)
    }

    /// Circular orbit state on the positive x-axis, travelling clockwise.
    pub fn circular_orbit(radius: f64) -> (DVec2, DVec2) {
        // Circular orbit velocity: v = sqrt(GM/r)
        let v = (SUN_SGP / radius).sqrt();
        (DVec2::new(radius, 0.0), DVec2::new(0.0, -v))
    }

    /// State at perihelion on the positive x-axis, travelling clockwise.
    pub fn elliptical_orbit(perihelion: f64, eccentricity: f64) -> (DVec2, DVec2) {
        assert!(
            (0.0..1.0).contains(&eccentricity),
            "Eccentricity must be in [0, 1) for elliptical orbit"
        );
        let a = perihelion / (1.0 - eccentricity);
        // Vis-viva at perihelion
        let v = (SUN_SGP * (2.0 / perihelion - 1.0 / a)).sqrt();
        (DVec2::new(perihelion, 0.0), DVec2::new(0.0, -v))
    }

    /// State moving at 1.1x escape velocity.
    pub fn escape_trajectory(radius: f64) -> (DVec2, DVec2) {
        let v_esc = (2.0 * SUN_SGP / radius).sqrt();
        (DVec2::new(radius, 0.0), DVec2::new(0.0, v_esc * 1.1))
    }
}

/// Assertions for verifying orbit and path invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy: E = v²/2 - GM/r
    pub fn orbital_energy(pos: DVec2, vel: DVec2) -> f64 {
        0.5 * vel.length_squared() - SUN_SGP / pos.length()
    }

    /// Specific angular momentum (z-component of r × v).
    pub fn angular_momentum(pos: DVec2, vel: DVec2) -> f64 {
        pos.perp_dot(vel)
    }

    /// Assert two vectors agree to within `tolerance` relative to `a`.
    ///
    /// # Panics
    /// Panics if `|a - b| > tolerance * |a|`.
    pub fn assert_vec_close(a: DVec2, b: DVec2, tolerance: f64) {
        let err = (a - b).length();
        assert!(
            err <= tolerance * a.length(),
            "Vectors differ: a={a:?}, b={b:?}, error={err:.6e}, tolerance={tolerance:.1e}"
        );
    }

    /// Assert every sample from `index` on repeats the sample at `index`.
    ///
    /// # Panics
    /// Panics if any later sample differs.
    pub fn assert_frozen_from(samples: &[DVec2], index: usize) {
        let frozen = samples[index];
        if let Some(offset) = samples[index..].iter().position(|s| *s != frozen) {
            panic!(
                "Sample {} moved after freezing at {}: {:?} vs {:?}",
                index + offset,
                index,
                samples[index + offset],
                frozen
            );
        }
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::{Orbit, Sense};
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_orbit_has_correct_velocity() {
        let (pos, vel) = fixtures::circular_orbit(1.5e8);
        let orbit = Orbit::from_state_vectors(SUN_SGP, pos, vel);
        assert_relative_eq!(orbit.eccentricity(), 0.0, epsilon = 1e-9);
        assert_eq!(orbit.sense(), Sense::Clockwise);
    }

    #[test]
    fn test_elliptical_orbit_perigee() {
        let (pos, vel) = fixtures::elliptical_orbit(1.0e8, 0.4);
        let orbit = Orbit::from_state_vectors(SUN_SGP, pos, vel);
        assert_relative_eq!(orbit.eccentricity(), 0.4, epsilon = 1e-9);
        assert_relative_eq!(orbit.perigee(), 1.0e8, max_relative = 1e-9);
        assert!(assertions::orbital_energy(pos, vel) < 0.0);
    }

    #[test]
    fn test_escape_trajectory_is_unbound() {
        let (pos, vel) = fixtures::escape_trajectory(1.5e8);
        assert!(assertions::orbital_energy(pos, vel) > 0.0);
        assert!(!Orbit::from_state_vectors(SUN_SGP, pos, vel).is_valid());
    }

    #[test]
    fn test_angular_momentum_sign_follows_sense() {
        let (pos, vel) = fixtures::circular_orbit(1.5e8);
        assert!(assertions::angular_momentum(pos, vel) < 0.0);
        assert!(assertions::angular_momentum(pos, -vel) > 0.0);
    }

    #[test]
    #[should_panic(expected = "moved after freezing")]
    fn test_frozen_assertion_catches_motion() {
        let samples = [DVec2::ZERO, DVec2::X, DVec2::X, DVec2::Y];
        assertions::assert_frozen_from(&samples, 1);
    }
}
