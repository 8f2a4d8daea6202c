//! Gravitating and orbiting bodies.

use std::f64::consts::{FRAC_PI_2, PI};

use bevy::log::warn;
use bevy::math::DVec2;
use bevy::prelude::Component;

use crate::geometry::{polar, rotated, with_length};
use crate::orbit::Orbit;

/// Read-only view of a body something can orbit.
///
/// Paths and orbiting bodies re-read the position on every recompute, so
/// the source is free to move between calls.
pub trait GravitySource {
    /// Current position (km).
    fn position(&self) -> DVec2;
    /// Standard gravitational parameter (km³/s²).
    fn sgp(&self) -> f64;
}

/// A bare point mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMass {
    pub position: DVec2,
    pub sgp: f64,
}

impl PointMass {
    pub fn new(position: DVec2, sgp: f64) -> Self {
        Self { position, sgp }
    }
}

impl GravitySource for PointMass {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn sgp(&self) -> f64 {
        self.sgp
    }
}

/// A body in the simulation: either a fixed attractor (the Sun) or
/// something on a Keplerian orbit around another body.
#[derive(Component, Clone, Debug, Default)]
pub struct Body {
    /// Position (km)
    pub pos: DVec2,
    /// Velocity (km/s)
    pub vel: DVec2,
    /// Only relevant if something orbits this body. Zero otherwise.
    pub sgp: f64,
    /// Orbit relative to the body this one orbits. Invalid for attractors.
    pub orbit: Orbit,
}

impl GravitySource for Body {
    fn position(&self) -> DVec2 {
        self.pos
    }

    fn sgp(&self) -> f64 {
        self.sgp
    }
}

impl Body {
    /// A stationary gravitating body.
    pub fn attractor(sgp: f64, pos: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            sgp,
            orbit: Orbit::default(),
        }
    }

    /// A body at `pos` moving with `vel`, orbiting `source`.
    pub fn orbiting(source: &impl GravitySource, pos: DVec2, vel: DVec2) -> Self {
        let orbit = Orbit::from_state_vectors(source.sgp(), pos - source.position(), vel);
        if !orbit.is_valid() {
            warn!("Body at {:?} km with velocity {:?} km/s is not on a bound orbit", pos, vel);
        }
        Self {
            pos,
            vel,
            sgp: 0.0,
            orbit,
        }
    }

    /// A body placed at apogee of its orbit around `source`.
    ///
    /// # Arguments
    /// * `apogee_dist` - Distance from `source` at apogee (km)
    /// * `apogee_speed` - Orbital speed at apogee (km/s)
    /// * `arg_periapsis` - Argument of periapsis (radians). Apogee lies opposite.
    pub fn from_apogee(
        source: &impl GravitySource,
        apogee_dist: f64,
        apogee_speed: f64,
        arg_periapsis: f64,
    ) -> Self {
        let offset = polar(apogee_dist, arg_periapsis - PI);
        let pos = offset + source.position();

        // At an apsis the velocity is perpendicular to the radius
        let vel = with_length(rotated(offset, -FRAC_PI_2), apogee_speed);

        Self::orbiting(source, pos, vel)
    }

    /// A body that adopts `orbit` around `source` and sits at true anomaly `theta`.
    pub fn on_orbit(source: &impl GravitySource, orbit: Orbit, theta: f64) -> Self {
        Self {
            pos: orbit.position_at(theta) + source.position(),
            vel: orbit.velocity_at(theta),
            sgp: 0.0,
            orbit,
        }
    }

    /// Mark this body as a gravity source with the given SGP.
    pub fn with_sgp(mut self, sgp: f64) -> Self {
        self.sgp = sgp;
        self
    }

    /// Advance `seconds` under the gravity of `source`.
    ///
    /// Explicit Euler: the gravity impulse goes into the velocity first, then
    /// the velocity moves the position.
    pub fn tick(&mut self, source: &impl GravitySource, seconds: f64) {
        let toward = source.position() - self.pos;
        let dist_sq = toward.length_squared();
        if dist_sq <= 0.0 {
            return;
        }
        self.vel += with_length(toward, seconds * source.sgp() / dist_sq);
        self.pos += self.vel * seconds;
    }

    /// Something external changed position or velocity: re-derive the orbit.
    pub fn recalc_orbit(&mut self, source: &impl GravitySource) {
        self.orbit = Orbit::from_state_vectors(source.sgp(), self.pos - source.position(), self.vel);
    }
}
