//! Orbit Planner - headless inner solar system planner
//!
//! Builds the default Venus/Earth/Mars scenario, optionally replaces the
//! Earth, Mars and ship paths from a save file given as the first argument,
//! runs one update and logs a summary.

use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use orbit_planner::body::Body;
use orbit_planner::path::PathConfig;
use orbit_planner::plugin::{OrbitPlannerPlugin, PlannedPath};
use orbit_planner::scenario::{SolarScenario, light_time};
use orbit_planner::types::SECONDS_PER_DAY;
use orbit_planner::view::ViewTransform;

fn main() -> ExitCode {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), OrbitPlannerPlugin));

    let config = app.world().resource::<PathConfig>().clone();
    let view = *app.world().resource::<ViewTransform>();
    let mut scenario = SolarScenario::new(config, view);

    if let Some(file) = std::env::args().nth(1) {
        if let Err(e) = scenario.load(&file) {
            error!("Could not load {}: {}", file, e);
            return ExitCode::FAILURE;
        }
    }

    let world = app.world_mut();
    let sun = world.spawn((Name::new("Sun"), scenario.sun.clone())).id();
    for (name, body) in [
        ("Venus", &scenario.venus),
        ("Earth", &scenario.earth),
        ("Mars", &scenario.mars),
    ] {
        world.spawn((Name::new(name), body.clone()));
    }
    for (name, path) in [
        ("Venus path", &scenario.venus_path),
        ("Earth path", &scenario.earth_path),
        ("Mars path", &scenario.mars_path),
        ("Ship", &scenario.ship),
    ] {
        world.spawn((Name::new(name), PlannedPath::new(path.clone(), sun)));
    }

    app.update();

    let mut bodies = app.world_mut().query::<(&Name, &Body)>();
    for (name, body) in bodies.iter(app.world()) {
        if !body.orbit.is_valid() {
            continue;
        }
        info!(
            "{}: a={:.0} km, e={:.5}, apogee={:.0} km, perigee={:.0} km, period={:.1} days",
            name,
            body.orbit.semi_major_axis(),
            body.orbit.eccentricity(),
            body.orbit.apogee(),
            body.orbit.perigee(),
            body.orbit.period() / SECONDS_PER_DAY
        );
    }

    let mut paths = app.world_mut().query::<(&Name, &PlannedPath)>();
    for (name, planned) in paths.iter(app.world()) {
        info!(
            "{}: {} maneuver(s), stop index {}, halt index {:?}",
            name,
            planned.path.maneuvers().len(),
            planned.path.stop_index(),
            planned.path.halt_index()
        );
    }

    let stop = scenario.ship.stop_index();
    if let Some(separations) = scenario.separations(stop) {
        let (minutes, seconds) = light_time(separations.earth_mars);
        let clock = scenario.mission_clock(stop);
        info!(
            "Day {}: Earth-Mars {:.0} km ({}m {}s light time), ship-Mars {:.0} km",
            clock.day, separations.earth_mars, minutes, seconds, separations.mars_ship
        );
    }

    ExitCode::SUCCESS
}
