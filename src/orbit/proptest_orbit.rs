//! Property-based tests for orbit determination using proptest.

use proptest::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use super::{Orbit, Sense};
use crate::geometry::polar;
use crate::types::SUN_SGP;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A state vector turned into an orbit and sampled back at the same
    /// true anomaly gives the same position and velocity, in both senses.
    #[test]
    fn prop_state_vector_round_trip(
        r in 5.0e7f64..5.0e8,
        pos_angle in 0.0f64..TAU,
        speed_factor in 0.5f64..1.3,
        flight_angle in -1.0f64..1.0,
        clockwise in any::<bool>(),
    ) {
        let pos = polar(r, pos_angle);
        let circular = (SUN_SGP / r).sqrt();
        let tangent = if clockwise { -FRAC_PI_2 } else { FRAC_PI_2 };
        let vel = polar(circular * speed_factor, pos_angle + tangent + flight_angle);

        let orbit = Orbit::from_state_vectors(SUN_SGP, pos, vel);
        prop_assert!(orbit.is_valid());
        let expected_sense = if clockwise { Sense::Clockwise } else { Sense::CounterClockwise };
        prop_assert_eq!(orbit.sense(), expected_sense);

        let back_pos = orbit.position_at(pos_angle);
        let back_vel = orbit.velocity_at(pos_angle);

        let pos_err = (back_pos - pos).length() / r;
        let vel_err = (back_vel - vel).length() / vel.length();
        prop_assert!(pos_err < 1e-6, "position error {} at e={}", pos_err, orbit.eccentricity());
        prop_assert!(vel_err < 1e-6, "velocity error {} at e={}", vel_err, orbit.eccentricity());
    }

    /// Apsides and area agree with the elements.
    #[test]
    fn prop_element_identities(
        e in 0.0f64..0.99,
        a in 1.0e6f64..1.0e9,
        w in -PI..PI,
    ) {
        let orbit = Orbit::from_elements(SUN_SGP, e, a, w);
        prop_assert!(orbit.is_valid());

        let tol = a * 1e-12;
        prop_assert!((orbit.apogee() + orbit.perigee() - 2.0 * a).abs() < tol);
        prop_assert!((orbit.apogee() - orbit.perigee() - 2.0 * orbit.focal_distance()).abs() < tol);
        prop_assert!((orbit.focal_distance() / a - e).abs() < 1e-12);

        let ab = PI * a * orbit.semi_minor_axis();
        prop_assert!((orbit.area() - ab).abs() <= ab * 1e-12);
    }

    /// A circular orbit has the same radius everywhere.
    #[test]
    fn prop_circular_radius_is_constant(
        a in 1.0e6f64..1.0e9,
        theta in -10.0f64..10.0,
    ) {
        let orbit = Orbit::from_elements(SUN_SGP, 0.0, a, 0.3);
        prop_assert_eq!(orbit.radius_at(theta), a);
    }

    /// Deviance is zero against itself and the same in both directions.
    #[test]
    fn prop_deviance_reflexive_and_symmetric(
        e1 in 0.0f64..0.9,
        a1 in 5.0e7f64..5.0e8,
        w1 in -PI..PI,
        e2 in 0.0f64..0.9,
        a2 in 5.0e7f64..5.0e8,
        w2 in -PI..PI,
    ) {
        let first = Orbit::from_elements(SUN_SGP, e1, a1, w1);
        let second = Orbit::from_elements(SUN_SGP, e2, a2, w2);

        prop_assert_eq!(first.deviance_from(&first), 0.0);
        prop_assert_eq!(first.deviance_from(&second), second.deviance_from(&first));
        prop_assert!(first.deviance_from(&second) >= 0.0);
    }
}
