//! The default inner-solar-system planning scenario.
//!
//! The Sun sits fixed at the origin. Venus, Earth and Mars get orbits from
//! their apogee elements and coasting paths starting at their July 2035
//! positions. The ship starts where Earth does, thrusting prograde.

use bevy::log::info;

use crate::body::Body;
use crate::path::{Path, PathConfig};
use crate::persistence::{self, PathFileError, PathRecord};
use crate::types::{
    EARTH, LIGHT_SPEED_KM_S, MARS, MARS_SOL_SECONDS, PlanetElements, SECONDS_PER_DAY, SUN_SGP,
    VENUS, epoch_2035,
};
use crate::view::ViewTransform;

/// Mission day on which sols start being counted.
pub const FIRST_SOL_DAY: u32 = 133;

/// Paths stored in a save file, in order: Earth, Mars, ship.
pub const SAVED_PATHS: usize = 3;

/// Planets, their paths and the ship's path.
#[derive(Clone, Debug)]
pub struct SolarScenario {
    pub sun: Body,
    pub venus: Body,
    pub earth: Body,
    pub mars: Body,
    pub venus_path: Path,
    pub earth_path: Path,
    pub mars_path: Path,
    pub ship: Path,
    pub view: ViewTransform,
    pub config: PathConfig,
}

impl Default for SolarScenario {
    fn default() -> Self {
        Self::new(PathConfig::default(), ViewTransform::default())
    }
}

/// Pairwise distances (km) between Earth, Mars and the ship at one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separations {
    pub earth_mars: f64,
    pub earth_ship: f64,
    pub mars_ship: f64,
}

/// Mission time at a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissionClock {
    /// 1-based day number.
    pub day: u32,
    /// Sols elapsed, once the sol count has started.
    pub sol: Option<u32>,
}

impl SolarScenario {
    pub fn new(config: PathConfig, view: ViewTransform) -> Self {
        let sun = Body::attractor(SUN_SGP, bevy::math::DVec2::ZERO);
        let planet = |elements: PlanetElements| {
            Body::from_apogee(
                &sun,
                elements.apogee,
                elements.apogee_speed,
                elements.arg_periapsis,
            )
        };
        let venus = planet(VENUS);
        let earth = planet(EARTH);
        let mars = planet(MARS);

        let venus_path =
            Path::from_orbit_angle(&sun, &venus.orbit, epoch_2035::VENUS_ANGLE, config.clone());
        let earth_path =
            Path::from_orbit_angle(&sun, &earth.orbit, epoch_2035::EARTH_ANGLE, config.clone());
        let mars_path =
            Path::from_orbit_angle(&sun, &mars.orbit, epoch_2035::MARS_ANGLE, config.clone());
        let ship = Path::thrusting(
            &sun,
            earth_path.start_pos(),
            earth_path.start_vel(),
            config.clone(),
        );

        info!(
            "Solar scenario ready: {} samples of {} s, Earth e={:.4}, Mars e={:.4}",
            config.num_samples,
            config.step_seconds,
            earth.orbit.eccentricity(),
            mars.orbit.eccentricity()
        );

        Self {
            sun,
            venus,
            earth,
            mars,
            venus_path,
            earth_path,
            mars_path,
            ship,
            view,
            config,
        }
    }

    pub fn recompute_all(&mut self) {
        for path in [
            &mut self.venus_path,
            &mut self.earth_path,
            &mut self.mars_path,
            &mut self.ship,
        ] {
            path.recompute(&self.sun);
        }
    }

    /// Records in save-file order.
    pub fn records(&self) -> Vec<PathRecord> {
        vec![
            self.earth_path.record(),
            self.mars_path.record(),
            self.ship.record(),
        ]
    }

    /// Replace the Earth, Mars and ship paths with saved ones.
    pub fn apply_records(&mut self, records: &[PathRecord]) -> Result<(), PathFileError> {
        let [earth, mars, ship] = records else {
            return Err(PathFileError::PathCount {
                expected: SAVED_PATHS,
                found: records.len(),
            });
        };
        self.earth_path = Path::restore(&self.sun, earth, self.config.clone());
        self.mars_path = Path::restore(&self.sun, mars, self.config.clone());
        self.ship = Path::restore(&self.sun, ship, self.config.clone());
        Ok(())
    }

    pub fn save(&self, file: impl AsRef<std::path::Path>) -> Result<(), PathFileError> {
        persistence::save(file, &self.records())
    }

    /// Load a save file. On error the scenario is left as it was.
    pub fn load(&mut self, file: impl AsRef<std::path::Path>) -> Result<(), PathFileError> {
        let records = persistence::load(file)?;
        self.apply_records(&records)
    }

    /// Move Mars' starting point to true anomaly `theta` on its orbit.
    pub fn set_mars_start(&mut self, theta: f64) {
        self.mars_path
            .set_start_on_orbit(&self.sun, &self.mars.orbit, theta);
    }

    pub fn separations(&self, index: usize) -> Option<Separations> {
        Some(Separations {
            earth_mars: separation(&self.earth_path, &self.mars_path, index)?,
            earth_ship: separation(&self.earth_path, &self.ship, index)?,
            mars_ship: separation(&self.mars_path, &self.ship, index)?,
        })
    }

    pub fn mission_clock(&self, index: usize) -> MissionClock {
        mission_clock(self.ship.elapsed_at(index))
    }
}

/// Distance between two paths at the same sample.
pub fn separation(a: &Path, b: &Path, index: usize) -> Option<f64> {
    Some(a.sample(index)?.distance(b.sample(index)?))
}

/// One-way light time over `distance_km`, as whole minutes and the
/// remaining whole seconds.
pub fn light_time(distance_km: f64) -> (u32, u32) {
    let seconds = (distance_km.max(0.0) / LIGHT_SPEED_KM_S) as u32;
    (seconds / 60, seconds % 60)
}

/// Day and sol count after `elapsed` seconds of mission time.
pub fn mission_clock(elapsed: f64) -> MissionClock {
    let day = ((elapsed / SECONDS_PER_DAY) as u32).saturating_add(1);
    let sol = (day >= FIRST_SOL_DAY).then(|| {
        let since = f64::from(day - (FIRST_SOL_DAY - 1)) * SECONDS_PER_DAY;
        (since / MARS_SOL_SECONDS) as u32
    });
    MissionClock { day, sol }
}
