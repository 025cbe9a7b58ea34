#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orthographic framing for an overhead camera looking down on the maze.
//!
//! The maze spans `x: [0, columns]` and `z: [0, rows]` in world units; the
//! frustum is expressed relative to the maze center.

use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

/// World units of margin kept around the maze on every side.
pub const FRAME_PADDING: f32 = 0.9;

const MAX_DIMENSION: f32 = 5000.0;
const ASPECT_RANGE: (f32, f32) = (0.1, 10.0);
const ZOOM_RANGE: (f32, f32) = (1.0, 10.0);

/// Extents of an orthographic view volume centered on the maze.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrthoFrustum {
    /// Left plane.
    pub left: f32,
    /// Right plane.
    pub right: f32,
    /// Top plane.
    pub top: f32,
    /// Bottom plane.
    pub bottom: f32,
}

impl OrthoFrustum {
    /// Horizontal span.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical span.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width() / self.height()
    }

    /// Half of the width and height.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.right, self.top)
    }

    /// Right-handed orthographic projection for the frustum.
    #[must_use]
    pub fn projection(&self, near: f32, far: f32) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, near, far)
    }
}

/// Point the frustum is centered on, in world units.
///
/// Dimensions are sanitized the same way as in [`compute_frustum`].
#[must_use]
pub fn maze_center(columns: f32, rows: f32) -> Vec2 {
    Vec2::new(
        clamp_or_min(columns, 1.0, MAX_DIMENSION).floor(),
        clamp_or_min(rows, 1.0, MAX_DIMENSION).floor(),
    ) / 2.0
}

/// Fits a frustum around a `columns` x `rows` maze for a viewport of the given aspect.
///
/// Inputs are sanitized first: dimensions are floored into `[1, 5000]`, the
/// aspect into `[0.1, 10]` and the zoom into `[1, 10]`; non-finite values take
/// the lower bound. The result always covers the padded maze on both axes and
/// its width over height equals the sanitized aspect.
#[must_use]
pub fn compute_frustum(columns: f32, rows: f32, aspect: f32, zoom: f32) -> OrthoFrustum {
    let columns = clamp_or_min(columns, 1.0, MAX_DIMENSION).floor();
    let rows = clamp_or_min(rows, 1.0, MAX_DIMENSION).floor();
    let aspect = clamp_or_min(aspect, ASPECT_RANGE.0, ASPECT_RANGE.1);
    let zoom = clamp_or_min(zoom, ZOOM_RANGE.0, ZOOM_RANGE.1);

    let mut half = Vec2::new(columns / 2.0 + FRAME_PADDING, rows / 2.0 + FRAME_PADDING) * zoom;
    if aspect >= half.x / half.y {
        half.x = half.y * aspect;
    } else {
        half.y = half.x / aspect;
    }

    OrthoFrustum {
        left: -half.x,
        right: half.x,
        top: half.y,
        bottom: -half.y,
    }
}

fn clamp_or_min(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.max(min).min(max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPECTS: [f32; 5] = [16.0 / 9.0, 4.0 / 3.0, 1.0, 3.0 / 4.0, 9.0 / 16.0];

    #[test]
    fn width_over_height_matches_the_viewport() {
        for (columns, rows) in [(10.0, 10.0), (30.0, 8.0), (5.0, 40.0)] {
            for aspect in ASPECTS {
                let frustum = compute_frustum(columns, rows, aspect, 1.0);
                assert!(
                    (frustum.aspect() - aspect).abs() < 1.0e-4,
                    "{columns}x{rows} at {aspect}: got {}",
                    frustum.aspect()
                );
            }
        }
    }

    #[test]
    fn frustum_covers_the_whole_maze() {
        for (columns, rows) in [(10.0, 10.0), (30.0, 8.0), (5.0, 40.0), (1.0, 1.0)] {
            for aspect in ASPECTS {
                let frustum = compute_frustum(columns, rows, aspect, 1.0);
                assert!(frustum.right >= columns / 2.0 && frustum.left <= -columns / 2.0);
                assert!(frustum.top >= rows / 2.0 && frustum.bottom <= -rows / 2.0);
            }
        }
    }

    #[test]
    fn output_is_symmetric() {
        let frustum = compute_frustum(12.0, 7.0, 1.6, 1.5);
        assert_eq!(frustum.left, -frustum.right);
        assert_eq!(frustum.bottom, -frustum.top);
        assert_eq!(frustum.half_extents(), Vec2::new(frustum.right, frustum.top));
    }

    #[test]
    fn zoom_below_one_is_the_same_as_one() {
        assert_eq!(
            compute_frustum(10.0, 10.0, 1.5, 0.25),
            compute_frustum(10.0, 10.0, 1.5, 1.0)
        );
    }

    #[test]
    fn zoom_out_grows_both_extents() {
        let base = compute_frustum(10.0, 6.0, 4.0 / 3.0, 1.0);
        let zoomed = compute_frustum(10.0, 6.0, 4.0 / 3.0, 2.0);
        assert!(zoomed.width() > base.width());
        assert!(zoomed.height() > base.height());
    }

    #[test]
    fn square_maze_in_square_viewport() {
        let frustum = compute_frustum(10.0, 10.0, 1.0, 1.0);
        assert!((frustum.right - 5.9).abs() < 1.0e-5);
        assert!((frustum.top - 5.9).abs() < 1.0e-5);
    }

    #[test]
    fn garbage_inputs_produce_finite_frusta() {
        let inputs = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -3.0, 0.0, 1.0e12];
        for value in inputs {
            let frustum = compute_frustum(value, value, value, value);
            for plane in [frustum.left, frustum.right, frustum.top, frustum.bottom] {
                assert!(plane.is_finite(), "{value} produced {frustum:?}");
            }
            assert!(frustum.width() > 0.0 && frustum.height() > 0.0);
        }
    }

    #[test]
    fn dimensions_are_floored() {
        assert_eq!(
            compute_frustum(10.9, 4.2, 1.0, 1.0),
            compute_frustum(10.0, 4.0, 1.0, 1.0)
        );
    }

    #[test]
    fn projection_maps_planes_to_clip_edges() {
        let frustum = compute_frustum(8.0, 8.0, 1.0, 1.0);
        let projection = frustum.projection(0.1, 100.0);
        let corner = projection.project_point3(glam::Vec3::new(frustum.right, frustum.top, -1.0));
        assert!((corner.x - 1.0).abs() < 1.0e-5);
        assert!((corner.y - 1.0).abs() < 1.0e-5);
        assert_eq!(maze_center(8.0, 6.0), Vec2::new(4.0, 3.0));
        assert_eq!(maze_center(f32::NAN, 7.5), Vec2::new(0.5, 3.5));
    }
}
