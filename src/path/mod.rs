//! Fixed-step trajectories under one gravitating body plus scheduled thrust.
//!
//! A [`Path`] is a start state, a set of [`Maneuver`]s and the sample array
//! derived from them. Every mutation recomputes the whole array from the
//! start state, so the samples are always a pure function of
//! (start state, maneuvers, gravity source, config).
//!
//! The integrator is first-order explicit Euler with one step per sample:
//!
//! 1. Velocity gains the gravity impulse `step · sgp / r²` toward the source.
//! 2. Velocity gains `thrust · step`, where the thrust direction is the
//!    gravity direction seen from the *previous* sample, rotated by the
//!    active maneuver's angle. This one-step lag is part of the model.
//! 3. A Redirect maneuver at exactly this index swings the velocity onto the
//!    thrust direction, keeping its speed.
//! 4. Position advances by `velocity · step`.
//!
//! Once a sample comes within `fatal_approach` of the source the path halts
//! and every later sample repeats the halt position.

pub mod maneuver;
#[cfg(test)]
mod proptest_path;

use std::f64::consts::FRAC_PI_2;

use bevy::log::{debug, warn};
use bevy::math::{DVec2, IVec2};
use bevy::prelude::Resource;

use crate::body::GravitySource;
use crate::geometry::{angle_diff, rotated, with_length};
use crate::orbit::Orbit;
use crate::persistence::PathRecord;
use crate::types::SECONDS_PER_DAY;
use crate::view::ViewTransform;

pub use maneuver::{Maneuver, ManeuverKind, ManeuverSet};

/// Configuration for path integration and picking.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PathConfig {
    /// Time between samples (seconds).
    pub step_seconds: f64,
    /// Number of samples in every path, including the start.
    pub num_samples: usize,
    /// Distance from the source (km) at which a path halts.
    pub fatal_approach: f64,
    /// Thrust (km/s²) given to a new thrusting path.
    pub default_acceleration: f64,
    /// Maximum pixel distance for picking samples and maneuvers.
    pub pick_radius_px: i32,
    /// Length of a drawn thrust indicator (pixels).
    pub thrust_line_px: i32,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            step_seconds: SECONDS_PER_DAY,
            num_samples: 900,
            fatal_approach: 35_000_000.0,
            default_acceleration: 2.0e-6,
            // A little beyond the thrust indicator so its tip is grabbable
            pick_radius_px: 55,
            thrust_line_px: 50,
        }
    }
}

/// A maneuvered trajectory around a single gravity source.
#[derive(Clone, Debug)]
pub struct Path {
    start_pos: DVec2,
    start_vel: DVec2,
    samples: Vec<DVec2>,
    maneuvers: ManeuverSet,
    halt_index: Option<usize>,
    config: PathConfig,
}

impl Path {
    fn empty(start_pos: DVec2, start_vel: DVec2, maneuvers: ManeuverSet, config: PathConfig) -> Self {
        let len = config.num_samples.max(1);
        Self {
            start_pos,
            start_vel,
            samples: vec![start_pos; len],
            maneuvers,
            halt_index: None,
            config,
        }
    }

    /// A path with no maneuvers: it simply follows gravity.
    pub fn coasting(
        source: &impl GravitySource,
        start_pos: DVec2,
        start_vel: DVec2,
        config: PathConfig,
    ) -> Self {
        let mut path = Self::empty(start_pos, start_vel, ManeuverSet::new(), config);
        path.recompute(source);
        path
    }

    /// A path thrusting from the first sample, perpendicular to gravity at
    /// the configured default acceleration.
    pub fn thrusting(
        source: &impl GravitySource,
        start_pos: DVec2,
        start_vel: DVec2,
        config: PathConfig,
    ) -> Self {
        let first = Maneuver::new(0).with_thrust(FRAC_PI_2, config.default_acceleration);
        let maneuvers = std::iter::once(first).collect();
        let mut path = Self::empty(start_pos, start_vel, maneuvers, config);
        path.recompute(source);
        path
    }

    /// A coasting path starting on `orbit` at the given J2000 ecliptic
    /// longitude.
    ///
    /// Longitudes run the other way round from model angles, and zero points
    /// down the screen, hence `θ = -π/2 - longitude`.
    pub fn from_orbit_angle(
        source: &impl GravitySource,
        orbit: &Orbit,
        j2000_angle: f64,
        config: PathConfig,
    ) -> Self {
        let theta = -FRAC_PI_2 - j2000_angle;
        Self::coasting(
            source,
            orbit.position_at(theta) + source.position(),
            orbit.velocity_at(theta),
            config,
        )
    }

    /// Rebuild a path from a saved record.
    ///
    /// Maneuvers at indices beyond the sample count are dropped.
    pub fn restore(source: &impl GravitySource, record: &PathRecord, config: PathConfig) -> Self {
        let len = config.num_samples.max(1);
        let (kept, dropped): (Vec<Maneuver>, Vec<Maneuver>) =
            record.maneuvers.iter().partition(|m| m.index < len);
        if !dropped.is_empty() {
            warn!(
                "Dropping {} saved maneuver(s) beyond sample {}",
                dropped.len(),
                len - 1
            );
        }

        let mut path = Self::empty(
            record.start_pos,
            record.start_vel,
            kept.into_iter().collect(),
            config,
        );
        path.ensure_baseline();
        path.recompute(source);
        path
    }

    /// Snapshot of the inputs that define this path.
    pub fn record(&self) -> PathRecord {
        PathRecord {
            start_pos: self.start_pos,
            start_vel: self.start_vel,
            maneuvers: self.maneuvers.iter().copied().collect(),
        }
    }

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn start_pos(&self) -> DVec2 {
        self.start_pos
    }

    pub fn start_vel(&self) -> DVec2 {
        self.start_vel
    }

    pub fn maneuvers(&self) -> &ManeuverSet {
        &self.maneuvers
    }

    pub fn samples(&self) -> &[DVec2] {
        &self.samples
    }

    pub fn sample(&self, index: usize) -> Option<DVec2> {
        self.samples.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: a path holds at least its start sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First sample that came within the fatal approach distance.
    pub fn halt_index(&self) -> Option<usize> {
        self.halt_index
    }

    /// Last meaningful sample: the first StopTrace maneuver, or the end.
    pub fn stop_index(&self) -> usize {
        let last = self.samples.len() - 1;
        self.maneuvers
            .first_stop_trace()
            .map_or(last, |m| m.index.min(last))
    }

    /// Time elapsed at `index` (seconds).
    pub fn elapsed_at(&self, index: usize) -> f64 {
        index as f64 * self.config.step_seconds
    }

    /// Recompute every sample from the start state.
    pub fn recompute(&mut self, source: &impl GravitySource) {
        let center = source.position();
        let sgp = source.sgp();
        let dt = self.config.step_seconds;
        let stop = self.stop_index();

        let mut pos = self.start_pos;
        let mut vel = self.start_vel;
        self.samples[0] = pos;
        self.halt_index = None;

        for i in 1..=stop {
            if self.halt_index.is_some() {
                self.samples[i] = self.samples[i - 1];
                continue;
            }

            let toward = center - pos;
            let dist_sq = toward.length_squared();
            if dist_sq > 0.0 {
                vel += with_length(toward, dt * sgp / dist_sq);
            }

            vel += self.thrust_toward(i, center) * dt;

            let redirect = self.maneuvers.at(i).filter(|m| m.kind == ManeuverKind::Redirect);
            if let Some(m) = redirect {
                let heading = rotated(self.gravity_toward(i, center), m.angle);
                vel = with_length(heading, vel.length());
            }

            pos += vel * dt;
            self.samples[i] = pos;

            if pos.distance(center) < self.config.fatal_approach {
                self.halt_index = Some(i);
            }
        }

        let last = self.samples[stop];
        self.samples[stop + 1..].fill(last);

        debug!(
            "Path recomputed: {} maneuver(s), stop {}, halt {:?}",
            self.maneuvers.len(),
            stop,
            self.halt_index
        );
    }

    /// Vector toward the source as seen from the sample before `index`
    /// (from the start position at index 0). Not normalised.
    pub fn gravity_direction_at(&self, index: usize, source: &impl GravitySource) -> DVec2 {
        self.gravity_toward(index, source.position())
    }

    /// Thrust acceleration applied during step `index` (km/s²). Zero when
    /// no maneuver is active there or `index` is past the end.
    pub fn thrust_at(&self, index: usize, source: &impl GravitySource) -> DVec2 {
        if index >= self.samples.len() {
            return DVec2::ZERO;
        }
        self.thrust_toward(index, source.position())
    }

    fn gravity_toward(&self, index: usize, center: DVec2) -> DVec2 {
        let from = match index {
            0 => self.start_pos,
            i => self.samples[(i - 1).min(self.samples.len() - 1)],
        };
        center - from
    }

    fn thrust_toward(&self, index: usize, center: DVec2) -> DVec2 {
        match self.maneuvers.active_at(index) {
            Some(m) => with_length(rotated(self.gravity_toward(index, center), m.angle), m.magnitude),
            None => DVec2::ZERO,
        }
    }

    /// Keep a zero-thrust maneuver at index 0 once any maneuver exists.
    fn ensure_baseline(&mut self) {
        if !self.maneuvers.is_empty() && self.maneuvers.at(0).is_none() {
            self.maneuvers.insert(Maneuver::new(0));
        }
    }

    /// Schedule a maneuver at `index`, continuing whatever thrust was already
    /// active there so the trajectory does not change.
    ///
    /// Returns the existing maneuver if one is already at `index`, and `None`
    /// if `index` is out of range.
    pub fn add_maneuver(&mut self, source: &impl GravitySource, index: usize) -> Option<Maneuver> {
        if index >= self.samples.len() {
            return None;
        }
        if let Some(existing) = self.maneuvers.at(index) {
            return Some(*existing);
        }

        let mut maneuver = Maneuver::new(index);
        if let Some(active) = self.maneuvers.active_at(index) {
            maneuver = maneuver.with_thrust(angle_diff(0.0, active.angle), active.magnitude);
        }

        self.maneuvers.insert(maneuver);
        self.ensure_baseline();
        self.recompute(source);
        Some(maneuver)
    }

    /// Remove the maneuver at `index`. The maneuver at index 0 stays.
    pub fn remove_maneuver(&mut self, source: &impl GravitySource, index: usize) -> Option<Maneuver> {
        let removed = self.maneuvers.remove(index)?;
        self.recompute(source);
        Some(removed)
    }

    /// Point the maneuver at `index` toward `target` (model space) and set
    /// its magnitude.
    pub fn adjust_maneuver(
        &mut self,
        source: &impl GravitySource,
        index: usize,
        target: DVec2,
        magnitude: f64,
    ) -> Option<Maneuver> {
        let gravity = self.gravity_toward(index, source.position());
        let origin = self.sample(index)?;
        let maneuver = self.maneuvers.at_mut(index)?;

        maneuver.angle = angle_diff(gravity.to_angle(), (target - origin).to_angle());
        maneuver.magnitude = magnitude.max(0.0);
        let updated = *maneuver;

        self.recompute(source);
        Some(updated)
    }

    /// Change only the magnitude of the maneuver at `index`.
    pub fn set_maneuver_magnitude(
        &mut self,
        source: &impl GravitySource,
        index: usize,
        magnitude: f64,
    ) -> Option<Maneuver> {
        self.modify_maneuver(source, index, |m| m.magnitude = magnitude.max(0.0))
    }

    pub fn toggle_stop_trace(&mut self, source: &impl GravitySource, index: usize) -> Option<Maneuver> {
        self.modify_maneuver(source, index, Maneuver::toggle_stop_trace)
    }

    pub fn toggle_redirect(&mut self, source: &impl GravitySource, index: usize) -> Option<Maneuver> {
        self.modify_maneuver(source, index, Maneuver::toggle_redirect)
    }

    fn modify_maneuver(
        &mut self,
        source: &impl GravitySource,
        index: usize,
        change: impl FnOnce(&mut Maneuver),
    ) -> Option<Maneuver> {
        let maneuver = self.maneuvers.at_mut(index)?;
        change(&mut *maneuver);
        let updated = *maneuver;
        self.recompute(source);
        Some(updated)
    }

    /// Move the start state and recompute.
    pub fn set_start(&mut self, source: &impl GravitySource, pos: DVec2, vel: DVec2) {
        self.start_pos = pos;
        self.start_vel = vel;
        self.recompute(source);
    }

    /// Move the start state to true anomaly `theta` on `orbit` around `source`.
    pub fn set_start_on_orbit(&mut self, source: &impl GravitySource, orbit: &Orbit, theta: f64) {
        self.set_start(
            source,
            orbit.position_at(theta) + source.position(),
            orbit.velocity_at(theta),
        );
    }

    /// Sample closest to `point` in view space, no further than the pick
    /// radius, up to the stop index. The lowest index wins ties.
    pub fn nearest_sample_index(&self, view: &ViewTransform, point: IVec2) -> Option<usize> {
        let target = point.as_dvec2();
        let max_sq = f64::from(self.config.pick_radius_px).powi(2);

        let mut best: Option<(usize, f64)> = None;
        for (i, sample) in self.samples[..=self.stop_index()].iter().enumerate() {
            let dist_sq = view.model_to_view(*sample).as_dvec2().distance_squared(target);
            if dist_sq < max_sq && best.is_none_or(|(_, b)| dist_sq < b) {
                best = Some((i, dist_sq));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Maneuver closest to `point` in view space, no further than the pick
    /// radius. Maneuvers after the first StopTrace are not considered.
    pub fn nearest_maneuver(&self, view: &ViewTransform, point: IVec2) -> Option<Maneuver> {
        let target = point.as_dvec2();
        let max_sq = f64::from(self.config.pick_radius_px).powi(2);

        let mut best: Option<(Maneuver, f64)> = None;
        for m in self.maneuvers.visible() {
            let Some(at) = self.sample(m.index) else {
                continue;
            };
            let dist_sq = view.model_to_view(at).as_dvec2().distance_squared(target);
            if dist_sq < max_sq && best.is_none_or(|(_, b)| dist_sq < b) {
                best = Some((*m, dist_sq));
            }
        }
        best.map(|(m, _)| m)
    }

    /// View-space segment showing the thrust direction at a maneuver, or
    /// `None` if nothing thrusts there.
    pub fn thrust_line(
        &self,
        source: &impl GravitySource,
        view: &ViewTransform,
        index: usize,
    ) -> Option<(IVec2, IVec2)> {
        let thrust = self.thrust_at(index, source);
        if thrust == DVec2::ZERO {
            return None;
        }
        let start = view.model_to_view(self.sample(index)?);
        let tip = with_length(thrust, f64::from(self.config.thrust_line_px));
        Some((start, start + IVec2::new(tip.x as i32, tip.y as i32)))
    }
}
