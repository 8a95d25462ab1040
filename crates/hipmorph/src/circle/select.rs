//! Best-circle selection over nine trimmed candidate subsets.
//!
//! The outermost femoral head landmarks are the least reliably placed, so the
//! ordered subset is refit with up to two points removed from either end and
//! the candidate with the smallest combined error/radius rank wins.

use super::fit_circle_hyper;
use super::types::{CandidateFit, Circle, CircleSelection, SelectionConfig};
use crate::MorphError;

/// Fixed `(start_trim, end_trim)` candidate table, in tie-break order.
pub const TRIM_CANDIDATES: [(usize, usize); 9] = [
    (0, 0),
    (1, 0),
    (0, 1),
    (0, 2),
    (2, 0),
    (1, 1),
    (1, 2),
    (2, 1),
    (2, 2),
];

/// Minimum subset size: every trimmed candidate keeps at least 4 points.
pub const MIN_SELECTION_POINTS: usize = 6;

/// Select the best-fitting circle through the landmarks addressed by
/// `indices`, taken in the given order from `points`.
pub fn select_best_circle(
    indices: &[usize],
    points: &[[f64; 2]],
    config: &SelectionConfig,
) -> Result<CircleSelection, MorphError> {
    let subset = gather_points(indices, points)?;
    select_best_circle_from_points(&subset, config)
}

/// Select the best-fitting circle over an already ordered point subset.
///
/// All nine candidates of [`TRIM_CANDIDATES`] are fitted. Errors and radii
/// are ranked independently (ascending, values within `rank_tolerance` tie),
/// and the smallest rank sum is selected. Equal sums resolve to the candidate
/// listed first, i.e. towards the least trimmed subset.
///
/// Candidates whose fit fails are reported without ranks and never selected.
pub fn select_best_circle_from_points(
    points: &[[f64; 2]],
    config: &SelectionConfig,
) -> Result<CircleSelection, MorphError> {
    let n = points.len();
    if n < MIN_SELECTION_POINTS {
        return Err(MorphError::InsufficientPoints {
            needed: MIN_SELECTION_POINTS,
            got: n,
        });
    }

    let mut candidates = Vec::with_capacity(TRIM_CANDIDATES.len());
    let mut first_err = None;
    for &(start_trim, end_trim) in &TRIM_CANDIDATES {
        let slice = &points[start_trim..n - end_trim];
        let circle = match fit_circle_hyper(slice, &config.fit) {
            Ok(c) => {
                tracing::trace!(
                    start_trim,
                    end_trim,
                    radius = c.radius,
                    rms = c.rms_error,
                    "candidate fit"
                );
                Some(c)
            }
            Err(e) => {
                tracing::warn!(start_trim, end_trim, "candidate fit failed: {}", e);
                first_err.get_or_insert(e);
                None
            }
        };
        candidates.push(CandidateFit {
            start_trim,
            end_trim,
            circle,
            error_rank: None,
            radius_rank: None,
        });
    }

    let fitted: Vec<(usize, Circle)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.circle.map(|circle| (i, circle)))
        .collect();
    if fitted.is_empty() {
        return Err(first_err.unwrap_or(MorphError::NonCircularFit));
    }

    let errors: Vec<f64> = fitted.iter().map(|(_, c)| c.rms_error).collect();
    let radii: Vec<f64> = fitted.iter().map(|(_, c)| c.radius).collect();
    let error_ranks = tolerant_ranks(&errors, config.rank_tolerance);
    let radius_ranks = tolerant_ranks(&radii, config.rank_tolerance);

    let mut best: Option<(usize, usize)> = None;
    for (k, &(i, _)) in fitted.iter().enumerate() {
        candidates[i].error_rank = Some(error_ranks[k]);
        candidates[i].radius_rank = Some(radius_ranks[k]);
        let sum = error_ranks[k] + radius_ranks[k];
        // Strict comparison keeps the earliest candidate on ties.
        if best.map_or(true, |(_, best_sum)| sum < best_sum) {
            best = Some((i, sum));
        }
    }

    let (chosen, rank_sum) = best.ok_or(MorphError::NonCircularFit)?;
    let circle = candidates[chosen]
        .circle
        .ok_or(MorphError::NonCircularFit)?;
    let (start_trim, end_trim) = TRIM_CANDIDATES[chosen];
    tracing::debug!(
        chosen,
        start_trim,
        end_trim,
        rank_sum,
        radius = circle.radius,
        rms = circle.rms_error,
        "selected femoral head circle"
    );

    Ok(CircleSelection {
        circle,
        points: points[start_trim..n - end_trim].to_vec(),
        chosen,
        candidates,
    })
}

/// Collect `points[i]` for each `i` in `indices`, preserving order.
pub fn gather_points(indices: &[usize], points: &[[f64; 2]]) -> Result<Vec<[f64; 2]>, MorphError> {
    indices
        .iter()
        .map(|&index| {
            points.get(index).copied().ok_or(MorphError::IndexOutOfBounds {
                index,
                len: points.len(),
            })
        })
        .collect()
}

/// Ascending ranks where near-equal values share the lower rank.
///
/// The rank of `v[i]` is the number of values smaller than `v[i]` by more than
/// `rel_tol * max(|v[i]|, |v[j]|, 1)`. For distinct values this equals the
/// position in the sorted order.
fn tolerant_ranks(values: &[f64], rel_tol: f64) -> Vec<usize> {
    values
        .iter()
        .map(|&vi| {
            values
                .iter()
                .filter(|&&vj| {
                    let tol = rel_tol * vi.abs().max(vj.abs()).max(1.0);
                    vj < vi - tol
                })
                .count()
        })
        .collect()
}
