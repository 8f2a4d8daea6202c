//! Closed-form Keplerian ellipses around a gravitating body at the origin.
//!
//! An [`Orbit`] is derived once, from elements, from a state vector, or from
//! an apogee/perigee pair, and is immutable afterwards. Escape trajectories
//! and other degenerate inputs are not errors: they produce an orbit whose
//! [`Orbit::is_valid`] is false and whose queries all return zero.

mod outline;
#[cfg(test)]
mod proptest_orbit;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use bevy::math::DVec2;
use wide::f64x4;

use crate::geometry::{angle_diff, near, polar};

pub use outline::{EllipseOutline, MAX_HALF_POINTS};

/// Angular steps per revolution used by [`Orbit::deviance_from`] (a quarter degree).
pub const DEVIANCE_STEPS: usize = 1440;

/// Tolerance (radians) for apogee and perigee points to count as opposed.
pub const OPPOSITION_TOLERANCE: f64 = 0.01;

/// Direction of travel around the focus, in a y-up frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sense {
    /// Negative angular momentum. This is the sense planets are given
    /// when an orbit is built from elements.
    #[default]
    Clockwise,
    /// Positive angular momentum.
    CounterClockwise,
}

impl Sense {
    /// Sense of travel for a body at `pos` moving with `vel`.
    pub fn of(pos: DVec2, vel: DVec2) -> Self {
        if pos.perp_dot(vel) > 0.0 {
            Sense::CounterClockwise
        } else {
            Sense::Clockwise
        }
    }

    /// Rotation from the inward focal bisector to the direction of travel.
    fn tangent_offset(self) -> f64 {
        match self {
            Sense::Clockwise => FRAC_PI_2,
            Sense::CounterClockwise => -FRAC_PI_2,
        }
    }
}

/// A Keplerian ellipse with its first focus fixed at the origin.
///
/// Every descriptor is computed at construction. The apogee lies along `w`,
/// as do the ellipse centre and the second focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    u: f64,
    e: f64,
    a: f64,
    b: f64,
    f: f64,
    w: f64,
    energy: f64,
    apogee: f64,
    perigee: f64,
    area: f64,
    center: DVec2,
    f2: DVec2,
    sense: Sense,
    valid: bool,
}

impl Default for Orbit {
    fn default() -> Self {
        Self::invalid(0.0)
    }
}

impl Orbit {
    fn invalid(sgp: f64) -> Self {
        Self {
            u: sgp,
            e: 0.0,
            a: 0.0,
            b: 0.0,
            f: 0.0,
            w: 0.0,
            energy: 0.0,
            apogee: 0.0,
            perigee: 0.0,
            area: 0.0,
            center: DVec2::ZERO,
            f2: DVec2::ZERO,
            sense: Sense::default(),
            valid: false,
        }
    }

    /// Build an orbit from its key elements.
    ///
    /// # Arguments
    /// * `sgp` - Standard gravitational parameter of the focus (km³/s²)
    /// * `e` - Eccentricity, `0 ≤ e < 1`
    /// * `a` - Semi-major axis (km). This is NOT the apogee distance.
    /// * `w` - Angle of the major axis, which is also the angle of apogee
    pub fn from_elements(sgp: f64, e: f64, a: f64, w: f64) -> Self {
        if !(0.0..1.0).contains(&e) || !(a > 0.0) || !a.is_finite() {
            return Self::invalid(sgp);
        }

        // e = f/a
        let f = e * a;
        // f² = a² - b²
        let b = (a * a - f * f).sqrt();
        let energy = -sgp / (2.0 * a);
        if !(energy < 0.0) {
            return Self::invalid(sgp);
        }

        Self {
            u: sgp,
            e,
            a,
            b,
            f,
            w,
            energy,
            apogee: a + f,
            perigee: a - f,
            area: PI * a * b,
            center: polar(f, w),
            f2: polar(2.0 * f, w),
            sense: Sense::default(),
            valid: true,
        }
    }

    /// Derive the orbit of a body at `pos` moving with `vel`, both relative
    /// to the focus.
    ///
    /// The second focus is found geometrically: it lies `2a - r` away from
    /// the body, and the velocity bisects the exterior angle between the two
    /// focal radii.
    pub fn from_state_vectors(sgp: f64, pos: DVec2, vel: DVec2) -> Self {
        let r = pos.length();
        let v = vel.length();
        if !(r > 0.0) || !(v > 0.0) {
            return Self::invalid(sgp);
        }

        // Purely radial motion has no ellipse to speak of
        if pos.perp_dot(vel).abs() <= f64::EPSILON * r * v {
            return Self::invalid(sgp);
        }

        let energy = v * v / 2.0 - sgp / r;
        if !(energy < 0.0) {
            return Self::invalid(sgp);
        }

        let a = -sgp / (2.0 * energy);

        // Distance from the body to the second focus
        let d = 2.0 * a - r;

        let vel_angle = vel.to_angle();
        let theta = angle_diff(vel_angle, (-pos).to_angle());
        let phi = PI - theta;

        let f2 = pos + polar(d, vel_angle + phi);
        let w = f2.to_angle();
        let f = f2.length() / 2.0;

        Self {
            sense: Sense::of(pos, vel),
            ..Self::from_elements(sgp, f / a, a, w)
        }
    }

    /// Build an orbit from its apogee and perigee points.
    ///
    /// The points must sit on opposite sides of the focus (within
    /// [`OPPOSITION_TOLERANCE`]), otherwise the orbit is invalid.
    pub fn from_apogee_perigee(sgp: f64, apogee_pt: DVec2, perigee_pt: DVec2) -> Self {
        let separation = angle_diff(apogee_pt.to_angle(), perigee_pt.to_angle()).abs();
        if !near(separation, PI, OPPOSITION_TOLERANCE) {
            return Self::invalid(sgp);
        }

        let apogee = apogee_pt.length();
        let perigee = perigee_pt.length();
        let a = (apogee + perigee) / 2.0;
        let e = (apogee - perigee) / (apogee + perigee);

        Self::from_elements(sgp, e, a, apogee_pt.to_angle())
    }

    /// Same orbit travelled in the given sense.
    pub fn with_sense(self, sense: Sense) -> Self {
        Self { sense, ..self }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Standard gravitational parameter of the focus.
    pub fn sgp(&self) -> f64 {
        self.u
    }

    pub fn eccentricity(&self) -> f64 {
        self.e
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.a
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.b
    }

    /// Distance from the centre to either focus.
    pub fn focal_distance(&self) -> f64 {
        self.f
    }

    /// Angle of the major axis, pointing at apogee.
    pub fn apogee_angle(&self) -> f64 {
        self.w
    }

    /// Specific orbital energy (km²/s²).
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn apogee(&self) -> f64 {
        self.apogee
    }

    pub fn perigee(&self) -> f64 {
        self.perigee
    }

    /// Area enclosed by the ellipse (km²).
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// The empty focus. The occupied focus is always the origin.
    pub fn second_focus(&self) -> DVec2 {
        self.f2
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Orbital period in seconds, or 0 for an invalid orbit.
    pub fn period(&self) -> f64 {
        if !self.valid {
            return 0.0;
        }
        TAU * (self.a.powi(3) / self.u).sqrt()
    }

    /// Distance from the focus at true anomaly `theta`.
    pub fn radius_at(&self, theta: f64) -> f64 {
        if !self.valid {
            return 0.0;
        }
        let numerator = self.a * (1.0 - self.e * self.e);
        let denominator = 1.0 - self.e * (theta - self.w).cos();
        numerator / denominator
    }

    /// Position relative to the focus at true anomaly `theta`.
    pub fn position_at(&self, theta: f64) -> DVec2 {
        polar(self.radius_at(theta), theta)
    }

    /// Velocity of the orbiting body at true anomaly `theta`.
    ///
    /// Speed follows from vis-viva. The direction is perpendicular to the
    /// bisector of the lines from the body to the two foci.
    pub fn velocity_at(&self, theta: f64) -> DVec2 {
        if !self.valid {
            return DVec2::ZERO;
        }

        let pos = self.position_at(theta);
        let r = pos.length();

        // energy = v²/2 - u/r
        let speed = (2.0 * (self.energy + self.u / r)).max(0.0).sqrt();

        let to_f1 = (-pos).to_angle();
        let to_f2 = (self.f2 - pos).to_angle();
        let bisector = to_f1 + angle_diff(to_f1, to_f2) / 2.0;

        polar(speed, bisector + self.sense.tangent_offset())
    }

    /// Area-based measure of how much two orbits differ.
    ///
    /// Nested orbits (one apogee inside the other's perigee) return the
    /// exact difference of their areas. Otherwise the polar sector areas are
    /// compared over [`DEVIANCE_STEPS`] slices of one revolution. The sweep
    /// is resolution-bounded, so the result is only meaningful for comparing
    /// candidates against each other, not as an absolute area.
    pub fn deviance_from(&self, other: &Orbit) -> f64 {
        if !self.valid || !other.valid {
            return 0.0;
        }

        if self.apogee < other.perigee || other.apogee < self.perigee {
            return (other.area - self.area).abs();
        }

        let step = TAU / DEVIANCE_STEPS as f64;
        let half_step = f64x4::splat(0.5 * step);
        let mut total = f64x4::splat(0.0);

        for k in (0..DEVIANCE_STEPS).step_by(4) {
            let thetas = [k, k + 1, k + 2, k + 3].map(|i| i as f64 * step);
            let r_this = self.radii(thetas);
            let r_other = other.radii(thetas);
            // r²·dθ/2 per slice
            total = total + (r_this * r_this - r_other * r_other).abs() * half_step;
        }

        total.to_array().iter().sum()
    }

    /// `radius_at` for four angles at once.
    fn radii(&self, thetas: [f64; 4]) -> f64x4 {
        let cos = f64x4::new(thetas.map(|t| (t - self.w).cos()));
        let numerator = f64x4::splat(self.a * (1.0 - self.e * self.e));
        numerator / (f64x4::splat(1.0) - f64x4::splat(self.e) * cos)
    }

    /// Points approximating the ellipse, roughly `spacing` km apart along
    /// the major axis. Empty for an invalid orbit.
    pub fn outline(&self, spacing: f64) -> EllipseOutline {
        EllipseOutline::new(self, spacing)
    }
}
