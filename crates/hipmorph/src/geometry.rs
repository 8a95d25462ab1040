//! Planar distance, angle and line primitives.
//!
//! All angles are returned in degrees.

use serde::{Deserialize, Serialize};

use crate::MorphError;

/// Euclidean distance between two points.
pub fn dist_2_points(p0: [f64; 2], p1: [f64; 2]) -> f64 {
    (p1[0] - p0[0]).hypot(p1[1] - p0[1])
}

/// Perpendicular distance from `p` to the line `y = slope·x + intercept`.
pub fn perp_dist_line(p: [f64; 2], slope: f64, intercept: f64) -> f64 {
    (slope * p[0] - p[1] + intercept).abs() / slope.hypot(1.0)
}

/// Perpendicular distance from `p` to the line through `p1` and `p2`.
pub fn perp_dist_two_points(p: [f64; 2], p1: [f64; 2], p2: [f64; 2]) -> Result<f64, MorphError> {
    let d = [p2[0] - p1[0], p2[1] - p1[1]];
    let len = d[0].hypot(d[1]);
    if !(len > 0.0) {
        return Err(MorphError::CoincidentPoints);
    }
    let v = [p[0] - p1[0], p[1] - p1[1]];
    Ok((d[0] * v[1] - d[1] * v[0]).abs() / len)
}

/// Angle `p0 – vertex – p2` in degrees, in `[0, 180]`.
///
/// Without `p2` the angle is measured against the image x axis through the
/// vertex, i.e. `p2 = vertex + (1, 0)`.
pub fn angle_3_points(p0: [f64; 2], vertex: [f64; 2], p2: Option<[f64; 2]>) -> f64 {
    let p2 = p2.unwrap_or([vertex[0] + 1.0, vertex[1]]);
    let v0 = [p0[0] - vertex[0], p0[1] - vertex[1]];
    let v1 = [p2[0] - vertex[0], p2[1] - vertex[1]];
    let cross = v0[0] * v1[1] - v0[1] * v1[0];
    let dot = v0[0] * v1[0] + v0[1] * v1[1];
    cross.abs().atan2(dot).to_degrees()
}

/// Non-vertical line `y = slope·x + intercept` in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Line with the given slope through `p`.
    pub fn through_point(p: [f64; 2], slope: f64) -> Result<Self, MorphError> {
        if !slope.is_finite() {
            return Err(MorphError::VerticalLine);
        }
        Ok(Self {
            slope,
            intercept: p[1] - slope * p[0],
        })
    }

    /// Line through two points.
    pub fn through_points(p1: [f64; 2], p2: [f64; 2]) -> Result<Self, MorphError> {
        let dx = p2[0] - p1[0];
        if dx == 0.0 {
            return Err(if p2[1] == p1[1] {
                MorphError::CoincidentPoints
            } else {
                MorphError::VerticalLine
            });
        }
        Self::through_point(p1, (p2[1] - p1[1]) / dx)
    }

    /// Line through `p` perpendicular to this one.
    pub fn perpendicular_through(&self, p: [f64; 2]) -> Result<Self, MorphError> {
        if self.slope == 0.0 {
            return Err(MorphError::VerticalLine);
        }
        Self::through_point(p, -1.0 / self.slope)
    }

    /// `y` at abscissa `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Perpendicular distance from `p`.
    pub fn distance(&self, p: [f64; 2]) -> f64 {
        perp_dist_line(p, self.slope, self.intercept)
    }
}
