//! Physical constants for the inner solar system planner.
//!
//! All values use kilometres, seconds and radians. SGPs are in km³/s².

/// Seconds per day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// Sun standard gravitational parameter (km³/s²)
pub const SUN_SGP: f64 = 132_712_440_018.0;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Radians to degrees conversion factor
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Speed of light in km/s, used for light-time readouts.
pub const LIGHT_SPEED_KM_S: f64 = 300_000.0;

/// Mars solar day in seconds.
pub const MARS_SOL_SECONDS: f64 = 88_775.244_09;

/// Apogee distance, apogee speed and argument of periapsis for a planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetElements {
    /// Distance from the Sun at apogee (km)
    pub apogee: f64,
    /// Orbital speed at apogee (km/s)
    pub apogee_speed: f64,
    /// Argument of periapsis (radians)
    pub arg_periapsis: f64,
}

/// Venus: aop 54.9 degrees.
pub const VENUS: PlanetElements = PlanetElements {
    apogee: 108_942_109.0,
    apogee_speed: 35.02,
    arg_periapsis: 0.9581,
};

/// Earth: aop 114.20783 degrees.
pub const EARTH: PlanetElements = PlanetElements {
    apogee: 152_098_232.0,
    apogee_speed: 29.3,
    arg_periapsis: 1.99330,
};

/// Mars: aop 286.4623 degrees.
pub const MARS: PlanetElements = PlanetElements {
    apogee: 249_209_300.0,
    apogee_speed: 21.97,
    arg_periapsis: 4.9997,
};

/// J2000-frame angles of each planet on July 7, 2035.
pub mod epoch_2035 {
    pub const VENUS_ANGLE: f64 = 1.462_392_749_8;
    pub const EARTH_ANGLE: f64 = 4.974_587_552_2;
    pub const MARS_ANGLE: f64 = 5.442_957_552_2;
}
