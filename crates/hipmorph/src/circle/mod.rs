//! Femoral head circle fitting primitives.
//!
//! Implements:
//! - Algebraic hyper fit (Al-Sharadqah & Chernov, "Error analysis for circle
//!   fitting algorithms", 2009): SVD of the design matrix plus a symmetric
//!   eigenproblem for the bias correction.
//! - Nine-candidate trimmed-subset selection ranked by fit error and radius.

mod fit;
mod select;
mod types;

pub use fit::fit_circle_hyper;
pub use select::{
    gather_points, select_best_circle, select_best_circle_from_points, MIN_SELECTION_POINTS,
    TRIM_CANDIDATES,
};
pub use types::{
    rms_circle_residual, CandidateFit, Circle, CircleFitConfig, CircleSelection, SelectionConfig,
};
