use crate::alpha::AlphaConfig;
use crate::circle::SelectionConfig;
use crate::intersect::IntersectionConfig;
use crate::spline::SplineDegree;

/// Top-level configuration for measuring one hip.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Femoral head circle fit and nine-candidate selection.
    pub selection: SelectionConfig,
    /// Alpha point search on the head/neck boundary.
    pub alpha: AlphaConfig,
    /// Triangular-index intersection search.
    pub intersection: IntersectionConfig,
}

impl MeasureConfig {
    /// Use the same spline degree for every boundary search.
    pub fn set_spline_degree(&mut self, degree: SplineDegree) {
        self.alpha.degree = degree;
        self.intersection.degree = degree;
    }

    /// Use the same resampling step (pixels in y) for every boundary search.
    pub fn set_sample_step(&mut self, step: f64) {
        self.alpha.sample_step = step;
        self.intersection.sample_step = step;
    }

    /// Return a copy where every non-finite or non-positive margin, step and
    /// tolerance is replaced by its default.
    pub fn normalized(self) -> Self {
        let mut out = self;
        out.normalize_in_place();
        out
    }

    fn normalize_in_place(&mut self) {
        let defaults = MeasureConfig::default();
        let fix = |value: &mut f64, default: f64| {
            if !(value.is_finite() && *value > 0.0) {
                *value = default;
            }
        };
        fix(
            &mut self.selection.fit.tolerance,
            defaults.selection.fit.tolerance,
        );
        fix(
            &mut self.selection.rank_tolerance,
            defaults.selection.rank_tolerance,
        );
        fix(&mut self.alpha.point_margin, defaults.alpha.point_margin);
        fix(&mut self.alpha.spline_margin, defaults.alpha.spline_margin);
        fix(&mut self.alpha.sample_step, defaults.alpha.sample_step);
        fix(
            &mut self.intersection.sample_step,
            defaults.intersection.sample_step,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let cfg = MeasureConfig::default();
        assert!((cfg.alpha.point_margin - 1.04).abs() < 1e-12);
        assert!((cfg.alpha.spline_margin - 1.0).abs() < 1e-12);
        assert!((cfg.alpha.sample_step - 0.01).abs() < 1e-12);
        assert!((cfg.intersection.sample_step - 0.01).abs() < 1e-12);
        assert!((cfg.selection.fit.tolerance - 1e-12).abs() < 1e-24);
        assert_eq!(cfg.alpha.degree, SplineDegree::Linear);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: MeasureConfig =
            serde_json::from_str(r#"{"alpha": {"point_margin": 1.1, "spline_margin": 1.0, "sample_step": 0.05, "degree": "cubic"}}"#)
                .expect("parse");
        assert!((cfg.alpha.point_margin - 1.1).abs() < 1e-12);
        assert_eq!(cfg.alpha.degree, SplineDegree::Cubic);
        assert!((cfg.intersection.sample_step - 0.01).abs() < 1e-12);
    }

    #[test]
    fn normalized_repairs_bad_values() {
        let mut cfg = MeasureConfig::default();
        cfg.set_sample_step(-1.0);
        cfg.alpha.point_margin = f64::NAN;
        cfg.set_spline_degree(SplineDegree::Cubic);
        let n = cfg.normalized();
        assert!((n.alpha.sample_step - 0.01).abs() < 1e-12);
        assert!((n.intersection.sample_step - 0.01).abs() < 1e-12);
        assert!((n.alpha.point_margin - 1.04).abs() < 1e-12);
        assert_eq!(n.intersection.degree, SplineDegree::Cubic);
    }
}
