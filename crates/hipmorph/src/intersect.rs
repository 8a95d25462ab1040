//! Interpolated boundary point closest to a line.

use serde::{Deserialize, Serialize};

use crate::geometry::Line;
use crate::spline::{BoundarySpline, SplineDegree};
use crate::MorphError;

/// Configuration for [`find_closest_to_line`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionConfig {
    /// Step in y used to resample the boundary spline.
    pub sample_step: f64,
    /// Interpolation used for the boundary spline.
    pub degree: SplineDegree,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            sample_step: 0.01,
            degree: SplineDegree::Linear,
        }
    }
}

/// Point on the interpolated boundary with the smallest distance to `line`.
///
/// The two landmarks nearest to the line bracket the search: the spline is
/// resampled over `[y_lo, y_hi)` between them. Landmarks at equal distance
/// keep their boundary order.
pub fn find_closest_to_line(
    boundary: &[[f64; 2]],
    line: &Line,
    config: &IntersectionConfig,
) -> Result<[f64; 2], MorphError> {
    if boundary.len() < 2 {
        return Err(MorphError::TooFewPoints {
            needed: 2,
            got: boundary.len(),
        });
    }

    let mut order: Vec<usize> = (0..boundary.len()).collect();
    order.sort_by(|&a, &b| line.distance(boundary[a]).total_cmp(&line.distance(boundary[b])));
    let (ya, yb) = (boundary[order[0]][1], boundary[order[1]][1]);
    if ya == yb {
        return Err(MorphError::EmptyRange { y: ya });
    }
    let (lo, hi) = if ya < yb { (ya, yb) } else { (yb, ya) };

    let spline = BoundarySpline::through_boundary(boundary, config.degree)?;
    let samples = spline.sample(lo, hi, config.sample_step)?;
    let best = samples
        .into_iter()
        .min_by(|&a, &b| line.distance(a).total_cmp(&line.distance(b)))
        .ok_or(MorphError::EmptyRange { y: lo })?;

    tracing::debug!(
        x = best[0],
        y = best[1],
        distance = line.distance(best),
        "closest boundary point to line"
    );
    Ok(best)
}
