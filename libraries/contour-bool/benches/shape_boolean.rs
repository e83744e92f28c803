use contour_bool::*;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
	let config = BooleanConfig::default();

	let circle_a = Shape::circle(Point::new(0., 0.), 200.);
	let circle_b = Shape::circle(Point::new(150., 0.), 200.);
	c.bench_function("circles_union", |b| b.iter(|| union(black_box(&circle_a), black_box(&circle_b), &config)));
	c.bench_function("circles_intersection", |b| b.iter(|| intersection(black_box(&circle_a), black_box(&circle_b), &config)));

	let mut contours = Shape::circle(Point::ZERO, 200.).into_contours();
	contours.extend(Shape::circle(Point::ZERO, 100.).iter().map(Contour::reversed));
	let ring = Shape::new(contours);
	let bite = Shape::circle(Point::new(0., 150.), 60.);
	c.bench_function("ring_union", |b| b.iter(|| union(black_box(&ring), black_box(&bite), &config)));

	let far = Shape::circle(Point::new(1000., 0.), 200.);
	c.bench_function("disjoint_union", |b| b.iter(|| union(black_box(&circle_a), black_box(&far), &config)));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
