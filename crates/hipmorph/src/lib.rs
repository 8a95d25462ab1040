//! hipmorph: radiographic hip morphology from anatomical landmarks.
//!
//! Measurements are computed from landmark points placed on an AP pelvis or
//! hip radiograph. The pipeline stages are:
//!
//! 1. **Circle** – algebraic hyper circle fit of the femoral head landmarks,
//!    repeated over nine trimmed subsets; the subset with the best combined
//!    error/radius rank wins.
//! 2. **Spline** – interpolation of the head/neck boundary as `x(y)`.
//! 3. **Alpha** – first point where the head/neck boundary leaves the head
//!    circle (cam deformity).
//! 4. **Intersect** – boundary point closest to a line (triangular index).
//! 5. **Measure** – angles, ratios and indices built on the above.
//!
//! # Public API
//! - [`measure_hip`] with [`HipLandmarks`] and [`MeasureConfig`] for one case
//! - [`pelvic_horizontal_angle`] for the pelvis-level reference line
//! - the stage functions ([`select_best_circle`], [`find_alpha_point`],
//!   [`find_closest_to_line`], ...) for callers driving stages themselves
//!
//! All functions are pure. Coordinates are image pixels (y down) and all
//! angles are in degrees.

mod alpha;
mod circle;
mod config;
mod error;
mod geometry;
mod hip;
mod intersect;
mod measure;
mod spline;

#[cfg(test)]
pub(crate) mod test_utils;

pub use alpha::{find_alpha_point, AlphaConfig, AlphaPoint};
pub use circle::{
    fit_circle_hyper, gather_points, rms_circle_residual, select_best_circle,
    select_best_circle_from_points, CandidateFit, Circle, CircleFitConfig, CircleSelection,
    SelectionConfig, MIN_SELECTION_POINTS, TRIM_CANDIDATES,
};
pub use config::MeasureConfig;
pub use error::{ErrorKind, MorphError};
pub use geometry::{angle_3_points, dist_2_points, perp_dist_line, perp_dist_two_points, Line};
pub use hip::{measure_hip, AcetabularLandmarks, HipLandmarks, HipReport, Measurement};
pub use intersect::{find_closest_to_line, IntersectionConfig};
pub use measure::{
    acetabular_depth_ratio, acetabular_index, alpha_angle, center_edge_angle, extrusion_index,
    neck_axis, neck_center, neck_shaft_angle, pelvic_horizontal_angle, superior_prefix,
    triangular_index, AlphaAngle, ExtrusionIndex, HipSide, NeckAxis, TriangularIndex,
};
pub use spline::{arange, ascending_prefix, BoundarySpline, SplineDegree, MAX_SAMPLES};
