//! Ellipse outline sampling for line drawing.
//!
//! Walks x along the major axis from perigee side to apogee side, taking
//! y = sqrt(b²(1 - x²/a²)) for the upper half and the negated value for the
//! lower half. Points come out in one direction around the curve: upper
//! half forward, then lower half backward.

use bevy::math::{DVec2, IVec2};

use super::Orbit;
use crate::geometry::rotated;
use crate::view::ViewTransform;

/// Upper bound on points per half of an outline. Finer spacings are
/// widened to meet it.
pub const MAX_HALF_POINTS: usize = 1 << 16;

/// Lazy, restartable sequence of model-space points around an [`Orbit`].
///
/// Clone it to restart. The length is known up front.
#[derive(Clone, Debug)]
pub struct EllipseOutline {
    a: f64,
    b: f64,
    w: f64,
    center: DVec2,
    step: f64,
    /// Points per half, including both ends of the major axis.
    half_len: usize,
    cursor: usize,
}

impl EllipseOutline {
    pub(super) fn new(orbit: &Orbit, spacing: f64) -> Self {
        let step = spacing.max(2.0 * orbit.a / MAX_HALF_POINTS as f64);
        let half_len = if orbit.is_valid() && spacing > 0.0 && spacing.is_finite() {
            // Every x strictly below +a, plus the clamped final point at +a
            ((2.0 * orbit.a / step).ceil() as usize).min(MAX_HALF_POINTS) + 1
        } else {
            0
        };

        Self {
            a: orbit.a,
            b: orbit.b,
            w: orbit.w,
            center: orbit.center,
            step,
            half_len,
            cursor: 0,
        }
    }

    fn x_at(&self, k: usize) -> f64 {
        if k + 1 >= self.half_len {
            self.a
        } else {
            (-self.a + k as f64 * self.step).min(self.a)
        }
    }

    fn point(&self, x: f64, upper: bool) -> DVec2 {
        let alpha = 1.0 - (x * x) / (self.a * self.a);
        let y = (self.b * self.b * alpha).max(0.0).sqrt();
        let local = DVec2::new(x, if upper { y } else { -y });
        rotated(local, self.w) + self.center
    }

    /// Map every point into view space.
    ///
    /// # Panics
    /// Panics if the number of produced points disagrees with the size
    /// computed up front, which would mean the sampling logic is broken.
    pub fn to_view(&self, view: &ViewTransform) -> Vec<IVec2> {
        let expected = self.len();
        let mut points = Vec::with_capacity(expected);
        points.extend(self.clone().map(|p| view.model_to_view(p)));
        assert_eq!(points.len(), expected, "ellipse outline point count mismatch");
        points
    }
}

impl Iterator for EllipseOutline {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        let total = 2 * self.half_len;
        if self.cursor >= total {
            return None;
        }
        let i = self.cursor;
        self.cursor += 1;

        Some(if i < self.half_len {
            self.point(self.x_at(i), true)
        } else {
            self.point(self.x_at(total - 1 - i), false)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = 2 * self.half_len - self.cursor;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for EllipseOutline {}

impl Orbit {
    /// Outline sampled every two pixels at the view's scale, in view space.
    pub fn view_outline(&self, view: &ViewTransform) -> Vec<IVec2> {
        self.outline(view.outline_spacing()).to_view(view)
    }
}
