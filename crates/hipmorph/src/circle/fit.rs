//! Algebraic "hyper" circle fit (Al-Sharadqah & Chernov, 2009).

use nalgebra::{DMatrix, Matrix4, SymmetricEigen, Vector4};

use super::types::{rms_circle_residual, Circle, CircleFitConfig};
use crate::MorphError;

/// Relative size of the quadratic coefficient below which the fit is a line.
const LINE_COEFF_EPS: f64 = 1e-12;

/// Fit a circle to a set of 2D points with the hyper fit.
///
/// The circle is represented algebraically as
/// `A₀(x² + y²) + A₁x + A₂y + A₃ = 0` in centroid-translated coordinates.
/// The parameter vector minimizes `|Z A|²` subject to the hyper constraint
/// `Aᵀ H A = 1`, which removes the essential bias of the plain Kåsa/Pratt
/// fits. When the design matrix is (numerically) rank deficient the points
/// lie exactly on a circle and its null vector is the answer.
///
/// Requires at least 4 points.
pub fn fit_circle_hyper(
    points: &[[f64; 2]],
    config: &CircleFitConfig,
) -> Result<Circle, MorphError> {
    let n = points.len();
    if n < 4 {
        return Err(MorphError::TooFewPoints { needed: 4, got: n });
    }

    let [mean_x, mean_y] = centroid(points);

    // Design matrix Z = [x² + y², x, y, 1] for centered coords, plus the
    // column means needed for H.
    let mut z = DMatrix::<f64>::zeros(n, 4);
    let mut col_sum = [0.0f64; 3];
    for (i, &[px, py]) in points.iter().enumerate() {
        let x = px - mean_x;
        let y = py - mean_y;
        let zz = x * x + y * y;
        z[(i, 0)] = zz;
        z[(i, 1)] = x;
        z[(i, 2)] = y;
        z[(i, 3)] = 1.0;
        col_sum[0] += zz;
        col_sum[1] += x;
        col_sum[2] += y;
    }
    let inv_n = 1.0 / n as f64;
    let means = [col_sum[0] * inv_n, col_sum[1] * inv_n, col_sum[2] * inv_n];

    let svd = z.svd(false, true);
    let v_t = svd
        .v_t
        .as_ref()
        .ok_or(MorphError::SingularSystem("SVD of the design matrix failed"))?;
    let v_t = Matrix4::from_fn(|r, c| v_t[(r, c)]);
    let s = Vector4::from_iterator(svd.singular_values.iter().copied());

    let (i_min, s_min) = s
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or(MorphError::SingularSystem("no singular values"))?;

    let params = if s_min < config.tolerance {
        tracing::trace!(s_min, "design matrix rank deficient, using null vector");
        v_t.row(i_min).transpose()
    } else {
        hyper_params(&v_t, &s, means)?
    };

    let (cx, cy, radius) = circle_from_params(&params, mean_x, mean_y)?;
    let rms_error = rms_circle_residual(points, [cx, cy], radius);

    let circle = Circle {
        cx,
        cy,
        radius,
        rms_error,
    };
    if !circle.is_valid() {
        return Err(MorphError::NonCircularFit);
    }
    Ok(circle)
}

/// Centroid of a point set.
fn centroid(points: &[[f64; 2]]) -> [f64; 2] {
    let n = points.len().max(1) as f64;
    let sx: f64 = points.iter().map(|p| p[0]).sum();
    let sy: f64 = points.iter().map(|p| p[1]).sum();
    [sx / n, sy / n]
}

/// Bias-corrected parameter vector from the SVD `Z = U Σ Vᵀ`.
///
/// With `W = V Σ Vᵀ` the constrained problem `ZᵀZ A = η H A` turns into the
/// symmetric eigenproblem `W H⁻¹ W A* = η A*` with `A = W⁻¹ A*`.
fn hyper_params(
    v_t: &Matrix4<f64>,
    s: &Vector4<f64>,
    means: [f64; 3],
) -> Result<Vector4<f64>, MorphError> {
    let [zm, xm, ym] = means;
    let v = v_t.transpose();
    let w = v * Matrix4::from_diagonal(s) * v_t;
    let w_inv = v * Matrix4::from_diagonal(&s.map(|si| 1.0 / si)) * v_t;

    #[rustfmt::skip]
    let h = Matrix4::new(
        8.0 * zm, 4.0 * xm, 4.0 * ym, 2.0,
        4.0 * xm, 1.0,      0.0,      0.0,
        4.0 * ym, 0.0,      1.0,      0.0,
        2.0,      0.0,      0.0,      0.0,
    );
    let h_inv = h
        .try_inverse()
        .ok_or(MorphError::SingularSystem("hyper constraint matrix"))?;

    let m = w * h_inv * w;
    let m = (m + m.transpose()) * 0.5;
    let eig = SymmetricEigen::new(m);

    // H has one negative eigenvalue, so by inertia W H⁻¹ W has exactly one
    // negative eigenvalue; the smallest positive one is the second smallest.
    // Near-exact data pushes it to ±0, which is why the order is used rather
    // than the sign.
    let mut order = [0usize, 1, 2, 3];
    order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
    let k = order[1];
    tracing::trace!(
        eta = eig.eigenvalues[k],
        eta_min = eig.eigenvalues[order[0]],
        "hyper fit eigenpair"
    );

    let a_star = eig.eigenvectors.column(k).into_owned();
    let params = w_inv * a_star;
    if params.iter().any(|v| !v.is_finite()) {
        return Err(MorphError::SingularSystem("hyper fit parameters"));
    }
    Ok(params)
}

/// Convert `A₀(x² + y²) + A₁x + A₂y + A₃ = 0` (centered frame) to center and
/// radius in the input frame.
fn circle_from_params(
    a: &Vector4<f64>,
    mean_x: f64,
    mean_y: f64,
) -> Result<(f64, f64, f64), MorphError> {
    let norm = a.norm();
    if !norm.is_finite() || norm == 0.0 {
        return Err(MorphError::NonCircularFit);
    }
    if a[0].abs() <= LINE_COEFF_EPS * norm {
        return Err(MorphError::LineLikeFit);
    }

    let cx = -a[1] / (2.0 * a[0]) + mean_x;
    let cy = -a[2] / (2.0 * a[0]) + mean_y;
    let disc = a[1] * a[1] + a[2] * a[2] - 4.0 * a[0] * a[3];
    if disc <= 0.0 {
        return Err(MorphError::NonCircularFit);
    }
    let radius = disc.sqrt() / (2.0 * a[0].abs());
    Ok((cx, cy, radius))
}
