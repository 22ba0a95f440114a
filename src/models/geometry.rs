use serde::{Deserialize, Serialize};

/// Two scalars. Used both for board-surface coordinates (0–1000 on each axis)
/// and for screen pixels; the field or argument name says which.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`; `t` outside [0, 1] extrapolates.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }
}

/// Screen-space corners of the detected board quadrilateral.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardCorners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl BoardCorners {
    /// Corners in outline drawing order (clockwise from top-left).
    pub fn outline(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// Board footprint in the frame an analysis was computed from. There is no
/// tracking between frames; a new analysis brings a new pose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoardPose {
    pub corners: BoardCorners,
    pub confidence: f64,
}
