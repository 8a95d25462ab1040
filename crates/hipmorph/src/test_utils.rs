//! Shared synthetic landmark fixtures for unit tests.

use rand::Rng;

use crate::circle::Circle;

/// Reference femoral head used by the fixtures: r = 50 around (100, 100).
pub(crate) const HEAD: Circle = Circle {
    cx: 100.0,
    cy: 100.0,
    radius: 50.0,
    rms_error: 0.0,
};

/// `n` landmarks on the reference head over a 200° arc passing over the
/// superior pole (y down).
pub(crate) fn head_arc(n: usize) -> Vec<[f64; 2]> {
    let span = 200f64.to_radians();
    HEAD.sample_arc(n, 100f64.to_radians(), span)
}

/// Lateral head/neck boundary around the reference head.
///
/// Point `i` sits at angle `60° − i·150°/(n−1)` (image coordinates, y down)
/// and at `radius_factors[i] · r` from the center, so the sequence runs from
/// the inferior neck (largest y) to the superior head (smallest y).
pub(crate) fn head_neck_boundary(radius_factors: &[f64]) -> Vec<[f64; 2]> {
    let n = radius_factors.len();
    let step = if n > 1 { 150.0 / (n - 1) as f64 } else { 0.0 };
    radius_factors
        .iter()
        .enumerate()
        .map(|(i, &k)| {
            let t = (60.0 - step * i as f64).to_radians();
            let r = HEAD.radius * k;
            [HEAD.cx + r * t.cos(), HEAD.cy + r * t.sin()]
        })
        .collect()
}

/// Add uniform noise in `[-amp, amp]` to both coordinates.
pub(crate) fn jitter(points: &mut [[f64; 2]], rng: &mut impl Rng, amp: f64) {
    for p in points {
        p[0] += rng.gen_range(-amp..amp);
        p[1] += rng.gen_range(-amp..amp);
    }
}
