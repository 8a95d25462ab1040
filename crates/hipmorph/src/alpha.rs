//! Alpha point search: where the head/neck contour leaves the head circle.
//!
//! Landmarks are first classified against an inflated circle
//! (`radius × point_margin`) to find the discrete transition landmark. The
//! contour spline is then resampled around that landmark and the first sample
//! at or beyond `radius × spline_margin` is reported.

use serde::{Deserialize, Serialize};

use crate::circle::Circle;
use crate::spline::{BoundarySpline, SplineDegree};
use crate::MorphError;

/// Configuration for [`find_alpha_point`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    /// Landmarks at or beyond `radius × point_margin` count as outside.
    pub point_margin: f64,
    /// Resampled points at or beyond `radius × spline_margin` count as outside.
    pub spline_margin: f64,
    /// Step in y used to resample the contour spline.
    pub sample_step: f64,
    /// Interpolation used for the contour spline.
    pub degree: SplineDegree,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            point_margin: 1.04,
            spline_margin: 1.0,
            sample_step: 0.01,
            degree: SplineDegree::Linear,
        }
    }
}

/// Located alpha point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaPoint {
    /// Alpha point `[x, y]`.
    pub point: [f64; 2],
    /// Index of the discrete transition landmark in the input boundary.
    pub transition_index: usize,
    /// `true` when the point comes from the resampled spline, `false` when
    /// no sample crossed the margin and the landmark itself is returned.
    pub refined: bool,
}

/// Locate the alpha point on an ordered head/neck boundary.
///
/// Returns `Ok(None)` when no landmark lies outside the inflated circle.
pub fn find_alpha_point(
    boundary: &[[f64; 2]],
    circle: &Circle,
    config: &AlphaConfig,
) -> Result<Option<AlphaPoint>, MorphError> {
    if boundary.len() < 2 {
        return Err(MorphError::TooFewPoints {
            needed: 2,
            got: boundary.len(),
        });
    }

    let point_limit = circle.radius * config.point_margin;
    let outside: Vec<usize> = boundary
        .iter()
        .enumerate()
        .filter(|(_, &p)| circle.center_distance(p) >= point_limit)
        .map(|(i, _)| i)
        .collect();
    let Some(transition) = transition_index(&outside) else {
        tracing::debug!(point_limit, "head/neck boundary stays inside the head circle");
        return Ok(None);
    };

    let (lo, hi) = neighborhood_range(boundary, transition);
    tracing::debug!(transition, lo, hi, "alpha transition landmark");

    let spline = BoundarySpline::through_boundary(boundary, config.degree)?;
    let spline_limit = circle.radius * config.spline_margin;
    let crossing = spline
        .sample(lo, hi, config.sample_step)?
        .into_iter()
        .find(|&p| circle.center_distance(p) >= spline_limit);

    let alpha = match crossing {
        Some(point) => AlphaPoint {
            point,
            transition_index: transition,
            refined: true,
        },
        None => {
            tracing::debug!(transition, "no resampled crossing, using landmark");
            AlphaPoint {
                point: boundary[transition],
                transition_index: transition,
                refined: false,
            }
        }
    };
    Ok(Some(alpha))
}

/// Transition landmark from the ascending list of outside indices.
///
/// Walks the list alongside its positions. At the first position `i` whose
/// entry is not `i` itself, the entry before it is the transition; a mismatch
/// at position 0 wraps around to the last entry. Without a mismatch the last
/// entry is used.
pub(crate) fn transition_index(outside: &[usize]) -> Option<usize> {
    let last = *outside.last()?;
    let transition = match outside.iter().enumerate().position(|(i, &idx)| idx != i) {
        Some(0) | None => last,
        Some(i) => outside[i - 1],
    };
    Some(transition)
}

/// Half-open y range `[lo, hi)` searched around the transition landmark.
pub(crate) fn neighborhood_range(boundary: &[[f64; 2]], index: usize) -> (f64, f64) {
    let n = boundary.len();
    let y = |k: usize| boundary[k][1];
    let last = n - 1;

    if index == 0 {
        if n > 2 && y(2) < y(0) {
            (y(2), y(0))
        } else {
            (y(1), y(0))
        }
    } else if index == last {
        if n > 2 && y(last) < y(last - 2) {
            (y(last), y(last - 2))
        } else {
            (y(last), y(last - 1))
        }
    } else if y(index + 1) < y(index - 1) {
        (y(index + 1), y(index - 1))
    } else {
        (y(index + 1), y(index))
    }
}
