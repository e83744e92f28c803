use contour_bool::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
	let config = BooleanConfig::default();

	let crossing_a = CubicCurve::from_coordinates(458.37027, 572.165771, 428.525848, 486.720093, 368.618805, 467.485992, 273., 476.);
	let crossing_b = CubicCurve::from_coordinates(273., 490., 419., 463., 481.741198, 514.692273, 481.333333, 768.);
	c.bench_function("curve_intersection_crossing", |b| b.iter(|| find_curve_intersections(black_box(&crossing_a), black_box(&crossing_b), &config)));

	let arch = CubicCurve::from_coordinates(0., 0., 30., 100., 70., 100., 100., 0.);
	let line = CubicCurve::from_line(Point::new(-10., 50.), Point::new(110., 50.));
	c.bench_function("curve_intersection_two_crossings", |b| b.iter(|| find_curve_intersections(black_box(&arch), black_box(&line), &config)));

	let circle_a = Shape::circle(Point::new(0., 0.), 200.);
	let circle_b = Shape::circle(Point::new(150., 0.), 200.);
	c.bench_function("shape_intersections_circles", |b| b.iter(|| find_shape_intersections(black_box(&circle_a), black_box(&circle_b), &config)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
