//! Interpolating splines through ordered boundary landmarks.
//!
//! The femoral head/neck contour is sampled by a handful of landmarks. To
//! search it at sub-landmark resolution the contour is treated as a function
//! `x(y)`, which holds for the lateral head/neck boundary between its
//! superior-most and inferior-most points.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::MorphError;

/// Polynomial degree of the interpolating spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineDegree {
    /// Piecewise linear interpolation (degree 1).
    #[default]
    Linear,
    /// C² cubic interpolation with not-a-knot end conditions.
    Cubic,
}

impl SplineDegree {
    /// Minimum number of knots needed for this degree.
    pub fn min_knots(self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Cubic => 4,
        }
    }
}

/// Interpolating spline `x = f(y)` over strictly increasing knots.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySpline {
    degree: SplineDegree,
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivatives at the knots (cubic only).
    moments: Vec<f64>,
}

impl BoundarySpline {
    /// Build the spline through an ordered boundary.
    ///
    /// The sequence is reversed when its first point lies below its last one
    /// (larger y), then cut after the first occurrence of the maximum y.
    /// Points past the inferior-most landmark are not part of the contour.
    pub fn through_boundary(points: &[[f64; 2]], degree: SplineDegree) -> Result<Self, MorphError> {
        let kept = ascending_prefix(points);
        let (ys, xs): (Vec<f64>, Vec<f64>) = kept.iter().map(|p| (p[1], p[0])).unzip();
        Self::from_knots(ys, xs, degree)
    }

    /// Build the spline from knot abscissae `ys` and values `xs`.
    ///
    /// `ys` must be strictly increasing.
    pub fn from_knots(ys: Vec<f64>, xs: Vec<f64>, degree: SplineDegree) -> Result<Self, MorphError> {
        let n = ys.len().min(xs.len());
        if n < degree.min_knots() {
            return Err(MorphError::TooFewPoints {
                needed: degree.min_knots(),
                got: n,
            });
        }
        // Written negated so NaN knots fail too.
        if let Some(index) = (1..n).find(|&i| !(ys[i] > ys[i - 1])) {
            return Err(MorphError::NotStrictlyIncreasing { index });
        }

        let moments = match degree {
            SplineDegree::Linear => Vec::new(),
            SplineDegree::Cubic => not_a_knot_moments(&ys[..n], &xs[..n])?,
        };
        Ok(Self {
            degree,
            knots: ys[..n].to_vec(),
            values: xs[..n].to_vec(),
            moments,
        })
    }

    /// Spline degree.
    pub fn degree(&self) -> SplineDegree {
        self.degree
    }

    /// Fitted domain `[y_min, y_max]`.
    pub fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Knots as `[x, y]` points, in ascending y.
    pub fn knot_points(&self) -> Vec<[f64; 2]> {
        self.values
            .iter()
            .zip(&self.knots)
            .map(|(&x, &y)| [x, y])
            .collect()
    }

    /// Evaluate `x(y)`. Fails outside of [`domain`](Self::domain).
    pub fn eval(&self, y: f64) -> Result<f64, MorphError> {
        let (min, max) = self.domain();
        if !(y >= min && y <= max) {
            return Err(MorphError::OutOfRange { value: y, min, max });
        }

        let n = self.knots.len();
        let i = self
            .knots
            .partition_point(|&k| k <= y)
            .saturating_sub(1)
            .min(n - 2);
        let (y0, y1) = (self.knots[i], self.knots[i + 1]);
        let (x0, x1) = (self.values[i], self.values[i + 1]);
        let h = y1 - y0;

        let x = match self.degree {
            SplineDegree::Linear => x0 + (x1 - x0) * (y - y0) / h,
            SplineDegree::Cubic => {
                let (m0, m1) = (self.moments[i], self.moments[i + 1]);
                let a = y1 - y;
                let b = y - y0;
                m0 * a * a * a / (6.0 * h)
                    + m1 * b * b * b / (6.0 * h)
                    + (x0 / h - m0 * h / 6.0) * a
                    + (x1 / h - m1 * h / 6.0) * b
            }
        };
        Ok(x)
    }

    /// Densely resample the spline over the half-open range `[start, stop)`.
    ///
    /// Returns `[x, y]` points; empty when `stop <= start`.
    pub fn sample(&self, start: f64, stop: f64, step: f64) -> Result<Vec<[f64; 2]>, MorphError> {
        arange(start, stop, step)?
            .into_iter()
            .map(|y| Ok([self.eval(y)?, y]))
            .collect()
    }
}

/// Reverse the boundary if needed so y starts ascending, then keep the
/// prefix up to and including the first maximum-y point.
pub fn ascending_prefix(points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    let mut seq = points.to_vec();
    if let (Some(first), Some(last)) = (seq.first(), seq.last()) {
        if first[1] > last[1] {
            seq.reverse();
        }
    }
    let mut arg_max = 0usize;
    for (i, p) in seq.iter().enumerate() {
        if p[1] > seq[arg_max][1] {
            arg_max = i;
        }
    }
    seq.truncate((arg_max + 1).min(seq.len()));
    seq
}

/// Largest number of samples [`arange`] produces.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Evenly spaced values `start + i·step` in the half-open range `[start, stop)`.
///
/// The count is `ceil((stop − start) / step)`, which matches the usual
/// numerical-array convention. Counts above [`MAX_SAMPLES`] fail with
/// [`MorphError::TooManySamples`].
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, MorphError> {
    if !(step > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Ok(Vec::new());
    }
    let count = ((stop - start) / step).ceil();
    if !(count > 0.0) {
        return Ok(Vec::new());
    }
    if count > MAX_SAMPLES as f64 {
        return Err(MorphError::TooManySamples {
            requested: count,
            max: MAX_SAMPLES,
        });
    }
    Ok((0..count as usize)
        .map(|i| start + i as f64 * step)
        .collect())
}

/// Knot second derivatives of the not-a-knot cubic interpolant.
fn not_a_knot_moments(t: &[f64], v: &[f64]) -> Result<Vec<f64>, MorphError> {
    let n = t.len();
    let h: Vec<f64> = t.windows(2).map(|w| w[1] - w[0]).collect();

    let mut a = DMatrix::<f64>::zeros(n, n);
    let mut rhs = DVector::<f64>::zeros(n);

    // Third derivative continuous across the second and the second-to-last knot.
    a[(0, 0)] = h[1];
    a[(0, 1)] = -(h[0] + h[1]);
    a[(0, 2)] = h[0];
    a[(n - 1, n - 3)] = h[n - 2];
    a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
    a[(n - 1, n - 1)] = h[n - 3];

    for i in 1..n - 1 {
        a[(i, i - 1)] = h[i - 1];
        a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
        a[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * ((v[i + 1] - v[i]) / h[i] - (v[i] - v[i - 1]) / h[i - 1]);
    }

    let m = a
        .lu()
        .solve(&rhs)
        .ok_or(MorphError::SingularSystem("cubic spline moments"))?;
    Ok(m.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arange_half_open() {
        let v = arange(0.0, 0.03, 0.01).expect("arange");
        assert_eq!(v.len(), 3);
        assert_relative_eq!(v[2], 0.02, epsilon = 1e-15);

        assert_eq!(arange(1.0, 1.25, 0.1).expect("arange").len(), 3);
        assert!(arange(2.0, 1.0, 0.01).expect("arange").is_empty());
        assert!(arange(1.0, 1.0, 0.01).expect("arange").is_empty());
        assert!(arange(0.0, 1.0, 0.0).expect("arange").is_empty());
    }

    #[test]
    fn test_arange_rejects_oversized_requests() {
        // Power-of-two step keeps the counts exact.
        let step = 0.0009765625;
        let at_limit = arange(0.0, 976.5625, step).expect("at the limit");
        assert_eq!(at_limit.len(), MAX_SAMPLES);
        assert!(arange(0.0, 976.5625 + step, step).is_err());

        let err = arange(0.0, 100.0, 1e-12).unwrap_err();
        assert!(matches!(err, MorphError::TooManySamples { max: MAX_SAMPLES, .. }));
        assert_eq!(err.kind(), crate::ErrorKind::DegenerateInput);

        let spl = BoundarySpline::from_knots(vec![0.0, 100.0], vec![0.0, 1.0], SplineDegree::Linear)
            .expect("spline");
        assert!(spl.sample(0.0, 100.0, 1e-12).is_err());
    }

    #[test]
    fn test_prefix_reverses_descending_input() {
        let pts = [[4.0, 50.0], [3.0, 40.0], [2.0, 30.0], [1.0, 20.0]];
        let kept = ascending_prefix(&pts);
        assert_eq!(kept, vec![[1.0, 20.0], [2.0, 30.0], [3.0, 40.0], [4.0, 50.0]]);
    }

    #[test]
    fn test_prefix_truncates_at_max() {
        // Increasing then decreasing y.
        let pts = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 2.5]];
        let kept = ascending_prefix(&pts);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[3], [3.0, 3.0]);

        // Repeated maximum keeps only its first occurrence.
        let pts = [[0.0, 0.0], [1.0, 2.0], [2.0, 2.0], [3.0, 1.0]];
        assert_eq!(ascending_prefix(&pts).len(), 2);
    }

    #[test]
    fn test_truncated_range_rejects_queries_beyond() {
        let pts = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 2.5]];
        let spl = BoundarySpline::through_boundary(&pts, SplineDegree::Linear).expect("spline");
        assert_eq!(spl.domain(), (0.0, 3.0));
        assert_relative_eq!(spl.eval(2.5).expect("inside"), 2.5);

        let err = spl.eval(3.2).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::OutOfRange);
        assert!(spl.eval(-0.1).is_err());
        assert!(spl.eval(f64::NAN).is_err());
    }

    #[test]
    fn test_linear_interpolation() {
        let spl = BoundarySpline::from_knots(
            vec![0.0, 1.0, 3.0],
            vec![10.0, 12.0, 8.0],
            SplineDegree::Linear,
        )
        .expect("spline");
        assert_relative_eq!(spl.eval(0.5).unwrap(), 11.0);
        assert_relative_eq!(spl.eval(2.0).unwrap(), 10.0);
        assert_relative_eq!(spl.eval(3.0).unwrap(), 8.0);
        assert_relative_eq!(spl.eval(0.0).unwrap(), 10.0);
    }

    #[test]
    fn test_cubic_reproduces_cubic_polynomial() {
        let f = |y: f64| 0.5 * y * y * y - 2.0 * y * y + y + 3.0;
        let ys = vec![0.0, 0.7, 1.5, 2.0, 3.1, 4.0];
        let xs: Vec<f64> = ys.iter().map(|&y| f(y)).collect();
        let spl = BoundarySpline::from_knots(ys, xs, SplineDegree::Cubic).expect("spline");
        for i in 0..=40 {
            let y = 0.1 * i as f64;
            assert_relative_eq!(spl.eval(y).unwrap(), f(y), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cubic_with_four_knots() {
        let f = |y: f64| y * y * y - y;
        let ys = vec![-1.0, 0.0, 0.5, 2.0];
        let xs: Vec<f64> = ys.iter().map(|&y| f(y)).collect();
        let spl = BoundarySpline::from_knots(ys, xs, SplineDegree::Cubic).expect("spline");
        assert_relative_eq!(spl.eval(1.2).unwrap(), f(1.2), epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_non_monotonic_and_short() {
        let err = BoundarySpline::from_knots(vec![0.0, 1.0, 1.0], vec![0.0; 3], SplineDegree::Linear)
            .unwrap_err();
        assert_eq!(err, MorphError::NotStrictlyIncreasing { index: 2 });

        let err = BoundarySpline::from_knots(vec![0.0], vec![0.0], SplineDegree::Linear).unwrap_err();
        assert_eq!(err, MorphError::TooFewPoints { needed: 2, got: 1 });

        let err = BoundarySpline::from_knots(vec![0.0, 1.0, 2.0], vec![0.0; 3], SplineDegree::Cubic)
            .unwrap_err();
        assert_eq!(err, MorphError::TooFewPoints { needed: 4, got: 3 });

        // A dip before the maximum survives truncation and is rejected.
        let pts = [[0.0, 5.0], [1.0, 3.0], [2.0, 8.0], [3.0, 9.0]];
        assert!(BoundarySpline::through_boundary(&pts, SplineDegree::Linear).is_err());
    }

    #[test]
    fn test_sample_returns_xy_points() {
        let spl = BoundarySpline::from_knots(vec![0.0, 1.0], vec![0.0, 2.0], SplineDegree::Linear)
            .expect("spline");
        let pts = spl.sample(0.0, 1.0, 0.25).expect("sample");
        assert_eq!(pts.len(), 4);
        assert_relative_eq!(pts[3][0], 1.5);
        assert_relative_eq!(pts[3][1], 0.75);
        assert!(spl.sample(0.5, 1.5, 0.25).is_err());
    }
}
