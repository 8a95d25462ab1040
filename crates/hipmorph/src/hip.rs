//! End-to-end measurement of one hip from its landmark set.

use serde::{Deserialize, Serialize};

use crate::circle::{gather_points, select_best_circle, CircleSelection};
use crate::config::MeasureConfig;
use crate::measure::{
    acetabular_depth_ratio, acetabular_index, alpha_angle, center_edge_angle, extrusion_index,
    neck_axis, neck_center, neck_shaft_angle, triangular_index, AlphaAngle, ExtrusionIndex,
    HipSide, NeckAxis, TriangularIndex,
};
use crate::{ErrorKind, MorphError};

/// Acetabular landmarks, each optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcetabularLandmarks {
    /// Most lateral bony point of the acetabulum.
    pub edge: Option<[f64; 2]>,
    /// Most medial point of the acetabular sourcil.
    pub sourcil_medial: Option<[f64; 2]>,
    /// Most inferior point of the teardrop.
    pub teardrop: Option<[f64; 2]>,
    /// Most lateral point of the triradiate cartilage.
    pub triradiate: Option<[f64; 2]>,
    /// Point on the pelvic horizontal through the triradiate point.
    pub horizontal: Option<[f64; 2]>,
}

/// Landmarks of one hip.
///
/// Index lists address `points` and are taken in the given order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HipLandmarks {
    #[serde(default)]
    pub side: HipSide,
    /// All landmark coordinates.
    pub points: Vec<[f64; 2]>,
    /// Femoral head landmarks used for the circle fit.
    pub head: Vec<usize>,
    /// Lateral head/neck boundary, from the inferior neck towards the
    /// superior head.
    pub head_neck: Vec<usize>,
    pub lateral_neck: Vec<usize>,
    pub medial_neck: Vec<usize>,
    /// Lateral femoral head landmarks, for the extrusion index.
    #[serde(default)]
    pub lateral_head: Vec<usize>,
    /// Medial femoral head landmarks, for the extrusion index.
    #[serde(default)]
    pub medial_head: Vec<usize>,
    #[serde(default)]
    pub acetabulum: AcetabularLandmarks,
    /// Slope of the femoral shaft axis, when known.
    #[serde(default)]
    pub shaft_slope: Option<f64>,
}

/// Outcome of one optional measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Measurement<T> {
    /// Measured value.
    Measured { value: T },
    /// The feature the measurement looks for is absent (e.g. no cam bump).
    NotFound,
    /// The measurement could not be computed for this case.
    Failed { kind: ErrorKind, message: String },
}

impl<T> Measurement<T> {
    fn from_result(result: Result<T, MorphError>) -> Self {
        match result {
            Ok(value) => Self::Measured { value },
            Err(e) => Self::failed(e),
        }
    }

    fn failed(e: MorphError) -> Self {
        Self::Failed {
            kind: e.kind(),
            message: e.to_string(),
        }
    }

    /// Measured value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Measured { value } => Some(value),
            _ => None,
        }
    }
}

/// All measurements of one hip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HipReport {
    pub side: HipSide,
    /// Femoral head circle with all nine candidate fits.
    pub head: CircleSelection,
    /// Femoral neck center, the vertex reference of the alpha angle.
    pub neck_center: [f64; 2],
    /// Fails when the neck center lies straight below the head center.
    pub neck_axis: Measurement<NeckAxis>,
    pub alpha_angle: Measurement<AlphaAngle>,
    pub triangular_index: Measurement<TriangularIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neck_shaft_angle: Option<Measurement<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_edge_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acetabular_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acetabular_depth_ratio: Option<Measurement<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extrusion_index: Option<Measurement<ExtrusionIndex>>,
}

/// Measure one hip.
///
/// The head circle and the neck center are prerequisites of everything else,
/// so their failures abort the case. Later measurements fail individually and
/// are reported as [`Measurement::Failed`]. A neck axis without finite slope
/// only fails the measurements built on it.
pub fn measure_hip(landmarks: &HipLandmarks, config: &MeasureConfig) -> Result<HipReport, MorphError> {
    let config = config.normalized();
    let points = &landmarks.points;
    let side = landmarks.side;

    let head = select_best_circle(&landmarks.head, points, &config.selection)?;
    let circle = head.circle;
    let lateral_neck = gather_points(&landmarks.lateral_neck, points)?;
    let medial_neck = gather_points(&landmarks.medial_neck, points)?;
    let neck_mid = neck_center(&lateral_neck, &medial_neck)?;
    let neck = neck_axis(&lateral_neck, &medial_neck, circle.center());
    let head_neck = gather_points(&landmarks.head_neck, points)?;

    let alpha = match alpha_angle(&head_neck, &circle, neck_mid, &config.alpha) {
        Ok(Some(value)) => Measurement::Measured { value },
        Ok(None) => Measurement::NotFound,
        Err(e) => Measurement::failed(e),
    };
    let ti = Measurement::from_result(neck.clone().and_then(|axis| {
        triangular_index(&head_neck, &circle, &axis, &config.intersection)
    }));

    let acetabulum = &landmarks.acetabulum;
    let cea = acetabulum
        .edge
        .map(|edge| center_edge_angle(circle.center(), edge, side));
    let ai = acetabulum.edge.zip(acetabulum.triradiate).map(|(edge, tc)| {
        acetabular_index(edge, tc, acetabulum.horizontal, side)
    });
    let adr = match (acetabulum.sourcil_medial, acetabulum.edge, acetabulum.teardrop) {
        (Some(sourcil), Some(edge), Some(teardrop)) => Some(Measurement::from_result(
            acetabular_depth_ratio(sourcil, edge, teardrop),
        )),
        _ => None,
    };
    let ei = match acetabulum.edge {
        Some(edge) if !landmarks.lateral_head.is_empty() || !landmarks.medial_head.is_empty() => {
            Some(Measurement::from_result(
                gather_points(&landmarks.lateral_head, points).and_then(|lateral| {
                    let medial = gather_points(&landmarks.medial_head, points)?;
                    extrusion_index(&lateral, &medial, edge, side)
                }),
            ))
        }
        _ => None,
    };

    let nsa = landmarks.shaft_slope.map(|shaft| {
        Measurement::from_result(
            neck.clone()
                .map(|axis| neck_shaft_angle(shaft, axis.line.slope)),
        )
    });

    tracing::info!(
        radius = circle.radius,
        alpha = alpha.value().map(|a| a.angle),
        ti = ti.value().map(|t| t.ti),
        "hip measured"
    );

    Ok(HipReport {
        side,
        head,
        neck_center: neck_mid,
        neck_axis: Measurement::from_result(neck),
        alpha_angle: alpha,
        triangular_index: ti,
        neck_shaft_angle: nsa,
        center_edge_angle: cea,
        acetabular_index: ai,
        acetabular_depth_ratio: adr,
        extrusion_index: ei,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{head_arc, head_neck_boundary, HEAD};
    use approx::assert_relative_eq;

    /// Landmarks of a right hip: 9 head points, a 7-point head/neck boundary
    /// with a bump at its inferior end, 2 + 2 neck points.
    fn case(bump: f64) -> HipLandmarks {
        let mut points = head_arc(9);
        let head: Vec<usize> = (0..9).collect();

        let mut factors = [0.98; 7];
        factors[0] = bump;
        let head_neck: Vec<usize> = (points.len()..points.len() + 7).collect();
        points.extend(head_neck_boundary(&factors));

        let neck_start = points.len();
        points.extend([[150.0, 130.0], [154.0, 134.0], [140.0, 160.0], [146.0, 162.0]]);

        HipLandmarks {
            side: HipSide::Right,
            points,
            head,
            head_neck,
            lateral_neck: vec![neck_start, neck_start + 1],
            medial_neck: vec![neck_start + 2, neck_start + 3],
            lateral_head: Vec::new(),
            medial_head: Vec::new(),
            acetabulum: AcetabularLandmarks::default(),
            shaft_slope: None,
        }
    }

    #[test]
    fn test_measure_core_case() {
        let report = measure_hip(&case(1.12), &MeasureConfig::default()).expect("report");
        assert_relative_eq!(report.head.circle.radius, HEAD.radius, epsilon = 1e-6);
        assert_relative_eq!(report.neck_center[0], 147.5);
        assert!(report.neck_axis.value().is_some());

        let alpha = report.alpha_angle.value().expect("alpha measured");
        assert!(alpha.alpha_point.refined);
        assert!(alpha.angle > 0.0);

        let ti = report.triangular_index.value().expect("ti measured");
        assert!(ti.ti > 45.0 && ti.ti <= 50.0);

        assert!(report.center_edge_angle.is_none());
        assert!(report.extrusion_index.is_none());
    }

    #[test]
    fn test_round_head_has_no_alpha_point() {
        let report = measure_hip(&case(0.98), &MeasureConfig::default()).expect("report");
        assert_eq!(report.alpha_angle, Measurement::NotFound);
    }

    #[test]
    fn test_optional_measurements() {
        let mut lm = case(1.12);
        lm.acetabulum = AcetabularLandmarks {
            edge: Some([40.0, 55.0]),
            sourcil_medial: Some([70.0, 70.0]),
            teardrop: Some([110.0, 150.0]),
            triradiate: Some([120.0, 110.0]),
            horizontal: None,
        };
        lm.lateral_head = vec![3, 4];
        lm.medial_head = vec![0];
        lm.shaft_slope = Some(-8.0);

        let report = measure_hip(&lm, &MeasureConfig::default()).expect("report");
        assert!(report.center_edge_angle.expect("cea") > 0.0);
        assert!(report.acetabular_index.expect("ai") > 0.0);
        assert!(report
            .acetabular_depth_ratio
            .as_ref()
            .and_then(Measurement::value)
            .is_some());
        assert!(report
            .extrusion_index
            .as_ref()
            .and_then(Measurement::value)
            .is_some());
        let nsa = *report
            .neck_shaft_angle
            .as_ref()
            .and_then(Measurement::value)
            .expect("nsa");
        assert!(nsa > 90.0 && nsa <= 180.0);
    }

    #[test]
    fn test_failures() {
        let mut lm = case(1.12);
        lm.head.truncate(5);
        let err = measure_hip(&lm, &MeasureConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientPoints);

        let mut lm = case(1.12);
        lm.lateral_neck.push(999);
        assert!(matches!(
            measure_hip(&lm, &MeasureConfig::default()),
            Err(MorphError::IndexOutOfBounds { index: 999, .. })
        ));
    }

    #[test]
    fn test_vertical_neck_axis_keeps_alpha() {
        let mut lm = case(1.12);
        let config = MeasureConfig::default();
        let cx = select_best_circle(&lm.head, &lm.points, &config.selection)
            .expect("head")
            .circle
            .cx;
        // One lateral and one medial point with x equal to the fitted center.
        let n = lm.points.len();
        lm.points[n - 4] = [cx, 130.0];
        lm.points[n - 2] = [cx, 160.0];
        lm.lateral_neck = vec![n - 4];
        lm.medial_neck = vec![n - 2];
        lm.shaft_slope = Some(-8.0);

        let report = measure_hip(&lm, &config).expect("report");
        assert_eq!(report.neck_center, [cx, 145.0]);
        assert!(matches!(
            report.neck_axis,
            Measurement::Failed {
                kind: ErrorKind::DegenerateInput,
                ..
            }
        ));
        assert!(report.alpha_angle.value().is_some());
        assert!(matches!(report.triangular_index, Measurement::Failed { .. }));
        assert!(matches!(
            report.neck_shaft_angle,
            Some(Measurement::Failed { .. })
        ));
    }

    #[test]
    fn test_oversized_resampling_fails_per_measurement() {
        let mut config = MeasureConfig::default();
        config.set_sample_step(1e-12);
        let report = measure_hip(&case(1.12), &config).expect("report");
        assert!(matches!(
            report.alpha_angle,
            Measurement::Failed {
                kind: ErrorKind::DegenerateInput,
                ..
            }
        ));
        assert!(matches!(
            report.triangular_index,
            Measurement::Failed {
                kind: ErrorKind::DegenerateInput,
                ..
            }
        ));
    }

    #[test]
    fn test_report_json() {
        let lm = case(1.12);
        let json = serde_json::to_string(&lm).expect("serialize landmarks");
        let back: HipLandmarks = serde_json::from_str(&json).expect("parse landmarks");
        assert_eq!(back.points, lm.points);

        let report = measure_hip(&back, &MeasureConfig::default()).expect("report");
        let out = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(out["alpha_angle"]["status"], "measured");
        assert!(out.get("center_edge_angle").is_none());
    }
}
