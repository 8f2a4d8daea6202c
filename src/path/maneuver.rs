//! Scheduled thrust events along a path.

use std::collections::BTreeMap;

/// How a maneuver affects the trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ManeuverKind {
    /// Continuous thrust from this sample until the next maneuver.
    #[default]
    Normal,
    /// Thrust as Normal, and at this sample the velocity is swung onto the
    /// thrust direction without changing speed.
    Redirect,
    /// The trace is not computed or shown beyond this sample.
    StopTrace,
}

impl ManeuverKind {
    /// Stable numeric code used in save files.
    pub fn code(self) -> u32 {
        match self {
            ManeuverKind::Normal => 0,
            ManeuverKind::Redirect => 1,
            ManeuverKind::StopTrace => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ManeuverKind::Normal),
            1 => Some(ManeuverKind::Redirect),
            2 => Some(ManeuverKind::StopTrace),
            _ => None,
        }
    }
}

/// A thrust event that takes effect at sample `index`.
///
/// `angle` is measured from the direction toward the gravitating body, as
/// seen from the sample *before* `index`. It is not an inertial angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Maneuver {
    pub index: usize,
    pub kind: ManeuverKind,
    /// Offset from the gravity direction (radians).
    pub angle: f64,
    /// Acceleration (km/s²), never negative.
    pub magnitude: f64,
}

impl Maneuver {
    /// A Normal maneuver with no thrust.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            kind: ManeuverKind::Normal,
            angle: 0.0,
            magnitude: 0.0,
        }
    }

    pub fn with_thrust(mut self, angle: f64, magnitude: f64) -> Self {
        self.angle = angle;
        self.magnitude = magnitude.max(0.0);
        self
    }

    pub fn with_kind(mut self, kind: ManeuverKind) -> Self {
        self.kind = kind;
        self
    }

    /// Normal ↔ StopTrace. Redirects are left alone.
    pub fn toggle_stop_trace(&mut self) {
        self.kind = match self.kind {
            ManeuverKind::Normal => ManeuverKind::StopTrace,
            ManeuverKind::StopTrace => ManeuverKind::Normal,
            other => other,
        };
    }

    /// Normal ↔ Redirect. Stop traces are left alone.
    pub fn toggle_redirect(&mut self) {
        self.kind = match self.kind {
            ManeuverKind::Normal => ManeuverKind::Redirect,
            ManeuverKind::Redirect => ManeuverKind::Normal,
            other => other,
        };
    }
}

/// Maneuvers keyed by sample index. At most one maneuver per index, and the
/// one at index 0 can never be removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ManeuverSet {
    by_index: BTreeMap<usize, Maneuver>,
}

impl ManeuverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// The maneuver scheduled exactly at `index`.
    pub fn at(&self, index: usize) -> Option<&Maneuver> {
        self.by_index.get(&index)
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut Maneuver> {
        self.by_index.get_mut(&index)
    }

    /// The maneuver in effect at `index`: the latest one not after it.
    pub fn active_at(&self, index: usize) -> Option<&Maneuver> {
        self.by_index.range(..=index).next_back().map(|(_, m)| m)
    }

    /// Insert or replace the maneuver at `maneuver.index`, returning the one
    /// it replaced.
    pub fn insert(&mut self, maneuver: Maneuver) -> Option<Maneuver> {
        self.by_index.insert(maneuver.index, maneuver)
    }

    /// Remove the maneuver at `index`. The index-0 maneuver stays.
    pub fn remove(&mut self, index: usize) -> Option<Maneuver> {
        if index == 0 {
            return None;
        }
        self.by_index.remove(&index)
    }

    pub fn first_stop_trace(&self) -> Option<&Maneuver> {
        self.iter().find(|m| m.kind == ManeuverKind::StopTrace)
    }

    /// All maneuvers in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Maneuver> {
        self.by_index.values()
    }

    /// Maneuvers up to and including the first stop trace.
    pub fn visible(&self) -> impl Iterator<Item = &Maneuver> {
        let mut done = false;
        self.iter().take_while(move |m| {
            if done {
                return false;
            }
            done = m.kind == ManeuverKind::StopTrace;
            true
        })
    }
}

impl FromIterator<Maneuver> for ManeuverSet {
    /// Later maneuvers win when indices collide.
    fn from_iter<I: IntoIterator<Item = Maneuver>>(iter: I) -> Self {
        let mut set = Self::new();
        for m in iter {
            set.insert(m);
        }
        set
    }
}
