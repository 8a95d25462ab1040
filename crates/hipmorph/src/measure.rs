//! Radiographic hip measurements built on the circle and boundary searches.
//!
//! Coordinates are image pixels with y pointing down. Angles are in degrees.

use serde::{Deserialize, Serialize};

use crate::alpha::{find_alpha_point, AlphaConfig, AlphaPoint};
use crate::circle::Circle;
use crate::geometry::{angle_3_points, dist_2_points, perp_dist_two_points, Line};
use crate::intersect::{find_closest_to_line, IntersectionConfig};
use crate::MorphError;

/// Which hip is measured. Decides the lateral direction in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HipSide {
    /// Patient's right hip, displayed on the image's left: lateral is −x.
    #[default]
    Right,
    /// Patient's left hip: lateral is +x.
    Left,
}

impl HipSide {
    /// Sign of the x direction pointing laterally.
    pub fn lateral_sign(self) -> f64 {
        match self {
            Self::Right => -1.0,
            Self::Left => 1.0,
        }
    }

    /// `true` if `x` lies strictly lateral of `reference_x`.
    pub fn is_lateral(self, x: f64, reference_x: f64) -> bool {
        (x - reference_x) * self.lateral_sign() > 0.0
    }
}

/// Longitudinal femoral neck axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeckAxis {
    /// Femoral neck center.
    pub center: [f64; 2],
    /// Line through the head center and the neck center.
    pub line: Line,
}

/// Alpha angle and the point it was measured at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaAngle {
    pub angle: f64,
    pub alpha_point: AlphaPoint,
}

/// Triangular index with its construction points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangularIndex {
    /// Distance from the head center to `s`.
    pub ti: f64,
    /// Point at half the radius from the head center along the neck axis.
    pub h: [f64; 2],
    /// Boundary point on the perpendicular to the neck axis through `h`.
    pub s: [f64; 2],
}

/// Extrusion index and the x positions it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionIndex {
    /// Percentage of the head width lying lateral of the acetabular edge.
    pub ei: f64,
    pub lateral_head_x: f64,
    pub edge_x: f64,
    pub medial_head_x: f64,
}

/// Prefix of a head/neck boundary up to and including its first
/// superior-most (minimum y) point.
pub fn superior_prefix(points: &[[f64; 2]]) -> &[[f64; 2]] {
    let mut arg_min = 0usize;
    for (i, p) in points.iter().enumerate() {
        if p[1] < points[arg_min][1] {
            arg_min = i;
        }
    }
    &points[..(arg_min + 1).min(points.len())]
}

/// Femoral neck center: the mean of the midpoints of every lateral/medial
/// pair of neck landmarks.
pub fn neck_center(lateral_neck: &[[f64; 2]], medial_neck: &[[f64; 2]]) -> Result<[f64; 2], MorphError> {
    let pairs = lateral_neck.len() * medial_neck.len();
    if pairs == 0 {
        return Err(MorphError::TooFewPoints {
            needed: 1,
            got: lateral_neck.len().min(medial_neck.len()),
        });
    }

    let mut sum = [0.0f64; 2];
    for l in lateral_neck {
        for m in medial_neck {
            sum[0] += 0.5 * (l[0] + m[0]);
            sum[1] += 0.5 * (l[1] + m[1]);
        }
    }
    Ok([sum[0] / pairs as f64, sum[1] / pairs as f64])
}

/// Neck axis from lateral and medial neck landmarks.
///
/// Fails with [`MorphError::VerticalLine`] when the neck center lies straight
/// above or below the head center.
pub fn neck_axis(
    lateral_neck: &[[f64; 2]],
    medial_neck: &[[f64; 2]],
    head_center: [f64; 2],
) -> Result<NeckAxis, MorphError> {
    let center = neck_center(lateral_neck, medial_neck)?;
    let line = Line::through_points(head_center, center)?;
    tracing::debug!(
        cx = center[0],
        cy = center[1],
        slope = line.slope,
        "femoral neck axis"
    );
    Ok(NeckAxis { center, line })
}

/// Alpha angle between the alpha point and the neck center, seen from the
/// head center. `None` when the head/neck boundary never leaves the circle.
pub fn alpha_angle(
    head_neck: &[[f64; 2]],
    circle: &Circle,
    neck_center: [f64; 2],
    config: &AlphaConfig,
) -> Result<Option<AlphaAngle>, MorphError> {
    let boundary = superior_prefix(head_neck);
    let Some(alpha_point) = find_alpha_point(boundary, circle, config)? else {
        return Ok(None);
    };
    let angle = angle_3_points(alpha_point.point, circle.center(), Some(neck_center));
    Ok(Some(AlphaAngle { angle, alpha_point }))
}

/// Triangular index: distance from the head center to the boundary point on
/// the perpendicular to the neck axis at half the radius.
pub fn triangular_index(
    head_neck: &[[f64; 2]],
    circle: &Circle,
    neck: &NeckAxis,
    config: &IntersectionConfig,
) -> Result<TriangularIndex, MorphError> {
    let boundary = superior_prefix(head_neck);
    let c = circle.center();
    let len = dist_2_points(c, neck.center);
    if !(len > 0.0) {
        return Err(MorphError::CoincidentPoints);
    }
    let scale = 0.5 * circle.radius / len;
    let h = [
        c[0] + scale * (neck.center[0] - c[0]),
        c[1] + scale * (neck.center[1] - c[1]),
    ];

    let perpendicular = neck.line.perpendicular_through(h)?;
    let s = find_closest_to_line(boundary, &perpendicular, config)?;
    Ok(TriangularIndex {
        ti: dist_2_points(s, c),
        h,
        s,
    })
}

/// Neck shaft angle from the slopes of the shaft and neck axes.
pub fn neck_shaft_angle(shaft_slope: f64, neck_slope: f64) -> f64 {
    let t = ((neck_slope - shaft_slope) / (1.0 + shaft_slope * neck_slope)).abs();
    180.0 - t.atan().to_degrees()
}

/// Center edge angle between the vertical through the head center and the
/// acetabular edge. Negative when the edge lies medial of the center.
///
/// The sign depends only on lateral/medial, so a left hip and its mirrored
/// right hip agree. Tools that key the sign on image x for both sides report
/// the opposite sign for left hips.
pub fn center_edge_angle(center: [f64; 2], edge: [f64; 2], side: HipSide) -> f64 {
    let up = [center[0], center[1] - 1.0];
    let angle = angle_3_points(up, center, Some(edge));
    if side.is_lateral(edge[0], center[0]) {
        angle
    } else {
        -angle
    }
}

/// Acetabular index at the triradiate cartilage.
///
/// `horizontal` is a point on the pelvic horizontal through `triradiate`;
/// without it the image x axis is used, pointing laterally. Negative when the
/// acetabular edge lies below the triradiate point.
pub fn acetabular_index(
    edge: [f64; 2],
    triradiate: [f64; 2],
    horizontal: Option<[f64; 2]>,
    side: HipSide,
) -> f64 {
    let reference = horizontal.unwrap_or([
        triradiate[0] + 10.0 * side.lateral_sign(),
        triradiate[1],
    ]);
    let angle = angle_3_points(edge, triradiate, Some(reference));
    if edge[1] > triradiate[1] {
        -angle
    } else {
        angle
    }
}

/// Acetabular depth-width ratio (‰): depth of the sourcil below the
/// edge–teardrop line over the edge–teardrop distance.
pub fn acetabular_depth_ratio(
    sourcil: [f64; 2],
    edge: [f64; 2],
    teardrop: [f64; 2],
) -> Result<f64, MorphError> {
    let depth = perp_dist_two_points(sourcil, edge, teardrop)?;
    Ok(depth / dist_2_points(edge, teardrop) * 1000.0)
}

/// Extrusion index (%) from lateral/medial head landmarks and the edge.
pub fn extrusion_index(
    lateral_head: &[[f64; 2]],
    medial_head: &[[f64; 2]],
    edge: [f64; 2],
    side: HipSide,
) -> Result<ExtrusionIndex, MorphError> {
    // Most lateral of the lateral points, most medial of the medial points.
    let sign = side.lateral_sign();
    let lateral_head_x = lateral_head
        .iter()
        .map(|p| p[0])
        .max_by(|a, b| (a * sign).total_cmp(&(b * sign)))
        .ok_or(MorphError::TooFewPoints { needed: 1, got: 0 })?;
    let medial_head_x = medial_head
        .iter()
        .map(|p| p[0])
        .min_by(|a, b| (a * sign).total_cmp(&(b * sign)))
        .ok_or(MorphError::TooFewPoints { needed: 1, got: 0 })?;

    let width = medial_head_x - lateral_head_x;
    if width == 0.0 {
        return Err(MorphError::CoincidentPoints);
    }
    Ok(ExtrusionIndex {
        ei: (edge[0] - lateral_head_x) / width * 100.0,
        lateral_head_x,
        edge_x: edge[0],
        medial_head_x,
    })
}

/// Angle of the pelvic horizontal reference line from paired left/right hip
/// landmarks (typically the caudal ischium and the superolateral obturator
/// foramen corners).
///
/// Each pair gives the angle of the line from the right landmark to the left
/// one against the image x axis. It is negative when the right landmark lies
/// higher in the image than the left one. The result is the mean over pairs.
pub fn pelvic_horizontal_angle(
    left_points: &[[f64; 2]],
    right_points: &[[f64; 2]],
) -> Result<f64, MorphError> {
    if left_points.len() != right_points.len() {
        return Err(MorphError::MismatchedPairs {
            left: left_points.len(),
            right: right_points.len(),
        });
    }
    if left_points.is_empty() {
        return Err(MorphError::TooFewPoints { needed: 1, got: 0 });
    }

    let sum: f64 = left_points
        .iter()
        .zip(right_points)
        .map(|(&left, &right)| {
            let angle = angle_3_points(left, right, None);
            if left[1] > right[1] {
                -angle
            } else {
                angle
            }
        })
        .sum();
    let angle = sum / left_points.len() as f64;
    tracing::debug!(angle, pairs = left_points.len(), "pelvic horizontal");
    Ok(angle)
}
