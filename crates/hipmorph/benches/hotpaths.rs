use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hipmorph::{
    find_alpha_point, find_closest_to_line, fit_circle_hyper, select_best_circle_from_points,
    AlphaConfig, Circle, CircleFitConfig, IntersectionConfig, Line, SelectionConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_head_points(n: usize) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(12345);
    Circle::new(412.0, 388.0, 46.0)
        .sample_arc(n, 0.55 * PI, 1.1 * PI)
        .into_iter()
        .map(|[x, y]| {
            [
                x + rng.gen_range(-0.8f64..0.8f64),
                y + rng.gen_range(-0.8f64..0.8f64),
            ]
        })
        .collect()
}

/// Head/neck boundary bulging out of the head circle at its inferior end.
fn make_head_neck(n: usize) -> (Circle, Vec<[f64; 2]>) {
    let head = Circle::new(412.0, 388.0, 46.0);
    let pts = (0..n)
        .map(|i| {
            let u = i as f64 / (n - 1) as f64;
            let t = (60.0 - 150.0 * u).to_radians();
            let r = head.radius * (1.0 + 0.15 * (1.0 - u).powi(3));
            [head.cx + r * t.cos(), head.cy + r * t.sin()]
        })
        .collect();
    (head, pts)
}

fn bench_circle_fit(c: &mut Criterion) {
    let points = make_head_points(12);
    let config = CircleFitConfig::default();
    c.bench_function("hyper_fit_12pts", |b| {
        b.iter(|| {
            let fit = fit_circle_hyper(black_box(&points), &config)
                .expect("deterministic fixture should always fit");
            black_box(fit)
        })
    });
}

fn bench_selection(c: &mut Criterion) {
    let points = make_head_points(12);
    let config = SelectionConfig::default();
    c.bench_function("select_best_circle_12pts", |b| {
        b.iter(|| {
            let sel = select_best_circle_from_points(black_box(&points), &config)
                .expect("deterministic fixture should always select");
            black_box(sel.chosen)
        })
    });
}

fn bench_alpha_point(c: &mut Criterion) {
    let (head, boundary) = make_head_neck(9);
    let config = AlphaConfig::default();
    c.bench_function("alpha_point_9pts", |b| {
        b.iter(|| {
            let alpha = find_alpha_point(black_box(&boundary), &head, &config)
                .expect("deterministic fixture should always search");
            black_box(alpha)
        })
    });
}

fn bench_closest_to_line(c: &mut Criterion) {
    let (head, boundary) = make_head_neck(9);
    let line = Line::through_point([head.cx + 20.0, head.cy + 20.0], -1.0)
        .expect("finite slope");
    let config = IntersectionConfig::default();
    c.bench_function("closest_to_line_9pts", |b| {
        b.iter(|| {
            let s = find_closest_to_line(black_box(&boundary), &line, &config)
                .expect("deterministic fixture should always intersect");
            black_box(s)
        })
    });
}

criterion_group!(
    hotpaths,
    bench_circle_fit,
    bench_selection,
    bench_alpha_point,
    bench_closest_to_line
);
criterion_main!(hotpaths);
