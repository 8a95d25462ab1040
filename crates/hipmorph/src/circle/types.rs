//! Circle value types and fitting/selection configuration.

use serde::{Deserialize, Serialize};

// ── Types ──────────────────────────────────────────────────────────────────

/// Geometric circle with the RMS residual of the fit that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius, always > 0 for fitted circles.
    pub radius: f64,
    /// Root mean square of `|dist(p, center) − radius|` over the fitted points.
    pub rms_error: f64,
}

impl Circle {
    /// Circle without fit residual information.
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            rms_error: 0.0,
        }
    }

    /// Center as `[x, y]`.
    pub fn center(&self) -> [f64; 2] {
        [self.cx, self.cy]
    }

    /// Euclidean distance from `p` to the center.
    pub fn center_distance(&self, p: [f64; 2]) -> f64 {
        (p[0] - self.cx).hypot(p[1] - self.cy)
    }

    /// Unsigned geometric distance from `p` to the circle boundary.
    pub fn boundary_distance(&self, p: [f64; 2]) -> f64 {
        (self.center_distance(p) - self.radius).abs()
    }

    /// Check basic validity: positive radius, finite values.
    pub fn is_valid(&self) -> bool {
        self.radius > 0.0
            && self.radius.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.rms_error.is_finite()
            && self.rms_error >= 0.0
    }

    /// Sample `n` points on the circle, counter-clockwise from angle `start`
    /// over an arc of `span` radians (`span = 2π` for the full circle).
    pub fn sample_arc(&self, n: usize, start: f64, span: f64) -> Vec<[f64; 2]> {
        let full = (span.abs() - std::f64::consts::TAU).abs() < 1e-12;
        let denom = if full || n < 2 { n as f64 } else { (n - 1) as f64 };
        (0..n)
            .map(|i| {
                let t = start + span * (i as f64) / denom.max(1.0);
                [self.cx + self.radius * t.cos(), self.cy + self.radius * t.sin()]
            })
            .collect()
    }
}

/// RMS of the unsigned point-to-circle distances.
pub fn rms_circle_residual(points: &[[f64; 2]], center: [f64; 2], radius: f64) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = points
        .iter()
        .map(|p| {
            let e = (p[0] - center[0]).hypot(p[1] - center[1]) - radius;
            e * e
        })
        .sum();
    (sum_sq / points.len() as f64).sqrt()
}

/// Configuration for the hyper circle fit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleFitConfig {
    /// Smallest singular value below which the design matrix is treated as
    /// exactly rank deficient and the null vector is used directly.
    pub tolerance: f64,
}

impl Default for CircleFitConfig {
    fn default() -> Self {
        Self { tolerance: 1e-12 }
    }
}

/// Configuration for nine-candidate circle selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Per-candidate fit settings.
    pub fit: CircleFitConfig,
    /// Relative tolerance under which two errors (or radii) share a rank.
    ///
    /// The absolute threshold is `rank_tolerance * max(|a|, |b|, 1)`.
    pub rank_tolerance: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fit: CircleFitConfig::default(),
            rank_tolerance: 1e-9,
        }
    }
}

/// Fit outcome for one trimmed candidate subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFit {
    /// Points removed from the start of the ordered subset.
    pub start_trim: usize,
    /// Points removed from the end of the ordered subset.
    pub end_trim: usize,
    /// Fitted circle, `None` when this subset could not be fitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<Circle>,
    /// Rank of the fit error among fitted candidates (0 = smallest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_rank: Option<usize>,
    /// Rank of the radius among fitted candidates (0 = smallest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_rank: Option<usize>,
}

impl CandidateFit {
    /// Combined rank used for selection.
    pub fn rank_sum(&self) -> Option<usize> {
        Some(self.error_rank? + self.radius_rank?)
    }
}

/// Result of [`select_best_circle`](super::select_best_circle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleSelection {
    /// Selected circle.
    pub circle: Circle,
    /// Points the selected circle was fitted to.
    pub points: Vec<[f64; 2]>,
    /// Position of the selected candidate in [`TRIM_CANDIDATES`](super::TRIM_CANDIDATES).
    pub chosen: usize,
    /// All nine candidates in fixed order.
    pub candidates: Vec<CandidateFit>,
}
