//! Bevy integration: resources and the path recompute system.

use bevy::prelude::*;

use crate::body::Body;
use crate::path::{Path, PathConfig};
use crate::view::ViewTransform;

/// Registers planner resources and keeps [`PlannedPath`]s in step with
/// their gravity sources.
pub struct OrbitPlannerPlugin;

impl Plugin for OrbitPlannerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PathConfig>()
            .init_resource::<ViewTransform>()
            .add_systems(Update, recompute_paths);
    }
}

/// A path attached to an entity, integrated around the [`Body`] on `source`.
#[derive(Component, Clone, Debug)]
pub struct PlannedPath {
    pub path: Path,
    pub source: Entity,
    /// Set to force a recompute on the next update.
    pub dirty: bool,
}

impl PlannedPath {
    pub fn new(path: Path, source: Entity) -> Self {
        Self {
            path,
            source,
            dirty: false,
        }
    }
}

/// Recompute every path whose source body changed or that was marked dirty.
pub fn recompute_paths(mut paths: Query<&mut PlannedPath>, bodies: Query<Ref<Body>>) {
    for mut planned in &mut paths {
        let Ok(source) = bodies.get(planned.source) else {
            continue;
        };
        if !source.is_changed() && !planned.dirty {
            continue;
        }

        let planned = &mut *planned;
        planned.path.recompute(&*source);
        planned.dirty = false;
    }
}
