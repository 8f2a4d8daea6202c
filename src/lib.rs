//! Orbit Planner - two-body orbit determination and trajectory planning
//!
//! A library crate for deriving Keplerian orbits from state vectors and
//! planning fixed-step, maneuvered trajectories around a single attractor.

pub mod body;
pub mod geometry;
pub mod orbit;
pub mod path;
pub mod persistence;
pub mod plugin;
pub mod scenario;
pub mod types;
pub mod view;

#[cfg(test)]
pub mod test_utils;
