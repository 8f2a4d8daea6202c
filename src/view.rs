//! Model (km) to view (pixel) coordinate mapping.
//!
//! Rendering and input live outside this crate, but picking maneuvers and
//! samples happens in pixel distance, so the mapping is passed in wherever
//! a query needs it.

use bevy::math::{DVec2, IVec2};
use bevy::prelude::Resource;

use crate::types::MARS;

/// Default square screen edge in pixels.
pub const DEFAULT_SCREEN_SIZE: i32 = 768;

/// Scale and translation between model and view space.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Model point shown at the centre of the screen.
    pub center: DVec2,
    /// Kilometres per pixel.
    pub km_per_pixel: f64,
    /// Screen size in pixels.
    pub screen: IVec2,
}

impl Default for ViewTransform {
    /// Fits the orbit of Mars, with a 5% margin, across the screen width.
    fn default() -> Self {
        Self::fit_radius(
            MARS.apogee * 1.05,
            IVec2::splat(DEFAULT_SCREEN_SIZE),
        )
    }
}

impl ViewTransform {
    /// Centre on the origin and scale so a circle of `radius` km spans the
    /// screen width.
    pub fn fit_radius(radius: f64, screen: IVec2) -> Self {
        Self {
            center: DVec2::ZERO,
            km_per_pixel: (radius * 2.0) / screen.x.max(1) as f64,
            screen,
        }
    }

    /// Model point to pixel, truncating toward zero before centring.
    pub fn model_to_view(&self, model: DVec2) -> IVec2 {
        let scaled = (model - self.center) / self.km_per_pixel;
        IVec2::new(scaled.x as i32, scaled.y as i32) + self.screen / 2
    }

    /// Pixel back to the model point it represents.
    pub fn view_to_model(&self, view: IVec2) -> DVec2 {
        (view - self.screen / 2).as_dvec2() * self.km_per_pixel + self.center
    }

    /// Model-space distance between outline points: two pixels.
    pub fn outline_spacing(&self) -> f64 {
        2.0 * self.km_per_pixel
    }
}
