//! Planar vector helpers on top of `DVec2`.

use std::f64::consts::{PI, TAU};

use bevy::math::DVec2;

/// Signed angle required to turn FROM `from` TO `to`, in (-π, π].
#[inline]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(TAU);
    if d > PI { d - TAU } else { d }
}

/// Vector of length `r` at angle `theta`.
#[inline]
pub fn polar(r: f64, theta: f64) -> DVec2 {
    DVec2::from_angle(theta) * r
}

/// Rescale `v` to `len`, keeping its direction. A zero vector stays zero.
#[inline]
pub fn with_length(v: DVec2, len: f64) -> DVec2 {
    v.normalize_or_zero() * len
}

/// Rotate `v` by `angle` radians (counter-clockwise in a y-up frame).
#[inline]
pub fn rotated(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

/// Approximate equality within `slop`.
#[inline]
pub fn near(a: f64, b: f64, slop: f64) -> bool {
    (a - b).abs() < slop
}
