//! Property-based tests for path integration using proptest.

use bevy::math::DVec2;
use proptest::prelude::*;
use std::f64::consts::TAU;

use super::{ManeuverKind, Path, PathConfig};
use crate::body::PointMass;
use crate::geometry::polar;
use crate::types::SUN_SGP;

fn short_config() -> PathConfig {
    PathConfig {
        num_samples: 120,
        ..Default::default()
    }
}

fn start_state(r: f64, angle: f64, speed_factor: f64) -> (DVec2, DVec2) {
    let pos = polar(r, angle);
    let vel = polar((SUN_SGP / r).sqrt() * speed_factor, angle - TAU / 4.0);
    (pos, vel)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Two paths built from the same inputs are bit-for-bit identical.
    #[test]
    fn prop_recompute_is_deterministic(
        r in 6.0e7f64..4.0e8,
        angle in 0.0f64..TAU,
        speed_factor in 0.3f64..1.3,
    ) {
        let sun = PointMass::new(DVec2::ZERO, SUN_SGP);
        let (pos, vel) = start_state(r, angle, speed_factor);

        let first = Path::thrusting(&sun, pos, vel, short_config());
        let second = Path::thrusting(&sun, pos, vel, short_config());
        prop_assert_eq!(first.samples(), second.samples());
        prop_assert_eq!(first.halt_index(), second.halt_index());
    }

    /// Adding a maneuver continues the active thrust, so adding and then
    /// removing it leaves the trajectory untouched.
    #[test]
    fn prop_add_then_remove_is_identity(
        r in 6.0e7f64..4.0e8,
        angle in 0.0f64..TAU,
        index in 1usize..120,
    ) {
        let sun = PointMass::new(DVec2::ZERO, SUN_SGP);
        let (pos, vel) = start_state(r, angle, 1.0);
        let mut path = Path::thrusting(&sun, pos, vel, short_config());
        let before = path.samples().to_vec();

        prop_assert!(path.add_maneuver(&sun, index).is_some());
        prop_assert_eq!(path.samples(), before.as_slice());
        prop_assert!(path.remove_maneuver(&sun, index).is_some());
        prop_assert_eq!(path.samples(), before.as_slice());
        prop_assert_eq!(path.maneuvers().len(), 1);
    }

    /// Nothing moves after the stop index or the halt index.
    #[test]
    fn prop_tail_is_frozen(
        r in 6.0e7f64..4.0e8,
        angle in 0.0f64..TAU,
        speed_factor in 0.1f64..1.3,
        stop in 1usize..120,
    ) {
        let sun = PointMass::new(DVec2::ZERO, SUN_SGP);
        let (pos, vel) = start_state(r, angle, speed_factor);
        let mut path = Path::coasting(&sun, pos, vel, short_config());
        path.add_maneuver(&sun, stop);
        let toggled = path.toggle_stop_trace(&sun, stop);
        prop_assert_eq!(toggled.map(|m| m.kind), Some(ManeuverKind::StopTrace));
        prop_assert_eq!(path.stop_index(), stop);

        let last = path.samples()[stop];
        prop_assert!(path.samples()[stop..].iter().all(|s| *s == last));

        if let Some(halt) = path.halt_index() {
            prop_assert!(halt <= stop);
            let frozen = path.samples()[halt];
            prop_assert!(frozen.length() < path.config().fatal_approach);
            prop_assert!(path.samples()[halt..].iter().all(|s| *s == frozen));
        }
    }
}
