//! Maps board-surface coordinates (0–1000 on each axis) into screen space.
//!
//! The mapping is a bilinear blend over the detected quadrilateral: exact for
//! parallelograms, approximate for perspective trapezoids.

use crate::models::{BoardCorners, Point};

/// Extent of the normalized board-surface axes.
pub const BOARD_EXTENT: f64 = 1000.0;

/// Projects `(u, v)` onto the quadrilateral. Out-of-range inputs extrapolate.
pub fn project(u: f64, v: f64, corners: &BoardCorners) -> Point {
    let u = u / BOARD_EXTENT;
    let v = v / BOARD_EXTENT;
    let top = corners.top_left.lerp(corners.top_right, u);
    let bottom = corners.bottom_left.lerp(corners.bottom_right, u);
    top.lerp(bottom, v)
}

/// Convenience for projecting a board-surface point.
pub fn project_point(point: Point, corners: &BoardCorners) -> Point {
    project(point.x, point.y, corners)
}
