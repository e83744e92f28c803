use crate::config::BooleanConfig;
use crate::consts::BISECTION_MAX_ITERATIONS;
use crate::cubic::CubicCurve;
use crate::polynomial::Polynomial;
use crate::shape::{Contour, Shape};
use crate::vector::Point;

/// Where a contour lies relative to another shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Containment {
	Inside,
	Outside,
	/// The contour is one of the other shape's contours, up to the choice of starting curve.
	Coincident,
}

/// The `y` where an x-monotonic `piece` crosses the vertical line through `x`.
///
/// Crossings are half-open (`min <= x < max`) so a vertex shared by two pieces is counted once, and vertical pieces never cross.
/// The parameter comes from Newton-Raphson, falling back to bisection when it diverges or leaves `[0, 1]`.
pub fn crossing_y(piece: &CubicCurve, x: f64, config: &BooleanConfig) -> Option<f64> {
	let (x0, x3) = (piece.start.x, piece.end.x);
	if x0 == x3 || x < x0.min(x3) || x >= x0.max(x3) {
		return None;
	}

	let mut coeffs = *piece.x_polynomial().coeffs();
	coeffs[0] -= x;
	let shifted = Polynomial::new(coeffs);

	let t = match shifted.solve_newton(config.newton_initial_guess, config.newton_tolerance, config.newton_max_iterations) {
		Ok(t) if (0. ..=1.).contains(&t) => t,
		result => {
			log::debug!("Falling back to bisection for x = {x} ({result:?})");
			bisect_monotonic(&shifted, x3 > x0)
		}
	};

	Some(piece.evaluate(t).y)
}

/// Root of a polynomial that is monotonic on `[0, 1]` and changes sign there.
fn bisect_monotonic(polynomial: &Polynomial<4>, increasing: bool) -> f64 {
	let (mut low, mut high) = (0., 1.);
	for _ in 0..BISECTION_MAX_ITERATIONS {
		let middle = (low + high) / 2.;
		if (polynomial.eval(middle) < 0.) == increasing {
			low = middle;
		} else {
			high = middle;
		}
	}
	(low + high) / 2.
}

/// Even-odd test: casts a ray from `point` towards positive y and counts the contour crossings on it.
pub fn is_inside(point: Point, contour: &Contour, config: &BooleanConfig) -> bool {
	if !contour.bounding_box().is_some_and(|bounding_box| bounding_box.contains_point(point)) {
		return false;
	}

	let crossings = contour
		.iter()
		.flat_map(CubicCurve::x_monotonic_pieces)
		.filter_map(|piece| crossing_y(&piece, point.x, config))
		.filter(|&y| y > point.y)
		.count();

	crossings % 2 == 1
}

/// Even-odd test over all contours of `shape`, so a point in the hole of a ring is outside.
pub fn is_inside_shape(point: Point, shape: &Shape, config: &BooleanConfig) -> bool {
	shape.iter().filter(|contour| is_inside(point, contour, config)).count() % 2 == 1
}

/// Classifies a contour that does not cross `other` by testing the midpoints of its curves.
///
/// A contour may still touch `other` where a crossing was dropped as tangential, and a midpoint sitting on that
/// contact says nothing, so the majority of midpoints decides.
pub fn classify_contour(contour: &Contour, other: &Shape, config: &BooleanConfig) -> Containment {
	if other.iter().any(|candidate| contour.coincides_with(candidate)) {
		return Containment::Coincident;
	}

	let inside = contour.iter().filter(|curve| is_inside_shape(curve.evaluate(0.5), other, config)).count();
	if 2 * inside > contour.len() { Containment::Inside } else { Containment::Outside }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> BooleanConfig {
		BooleanConfig::default()
	}

	fn first_contour(shape: Shape) -> Contour {
		shape.into_contours().remove(0)
	}

	#[test]
	fn square() {
		let square = first_contour(Shape::rectangle(Point::new(50., 50.), 100., 100.));

		assert!(is_inside(Point::new(50., 50.), &square, &config()));
		assert!(is_inside(Point::new(1., 99.), &square, &config()));
		assert!(!is_inside(Point::new(150., 50.), &square, &config()));
		assert!(!is_inside(Point::new(50., -1.), &square, &config()));
		assert!(!is_inside(Point::new(50., 101.), &square, &config()));
	}

	#[test]
	fn ray_through_a_vertex_counts_once() {
		let diamond = first_contour(Shape::polygon(&[Point::new(0., -10.), Point::new(10., 0.), Point::new(0., 10.), Point::new(-10., 0.)]));

		// The upward ray from these points passes through the top vertex
		assert!(is_inside(Point::new(0., 0.), &diamond, &config()));
		assert!(!is_inside(Point::new(0., -20.), &diamond, &config()));
	}

	#[test]
	fn circle() {
		let circle = first_contour(Shape::circle(Point::ZERO, 200.));

		assert!(is_inside(Point::ZERO, &circle, &config()));
		assert!(is_inside(Point::new(199., 0.), &circle, &config()));
		assert!(is_inside(Point::new(-140., 140.), &circle, &config()));
		assert!(!is_inside(Point::new(201., 0.), &circle, &config()));
		assert!(!is_inside(Point::new(142., 142.), &circle, &config()));
	}

	#[test]
	fn curve_that_turns_back_in_x() {
		// x(t) = 90 t (1 - t) peaks at 22.5; at x = 20 the arch passes y = 10 and y = 20
		let arch = CubicCurve::from_coordinates(0., 0., 30., 10., 30., 20., 0., 30.);
		let closing = CubicCurve::from_line(Point::new(0., 30.), Point::new(0., 0.));
		let contour = Contour::new(vec![arch, closing]).unwrap();

		assert!(is_inside(Point::new(20., 15.), &contour, &config()));
		assert!(!is_inside(Point::new(20., 5.), &contour, &config()));
		assert!(!is_inside(Point::new(20., 25.), &contour, &config()));
		assert!(!is_inside(Point::new(25., 15.), &contour, &config()));
	}

	#[test]
	fn newton_failure_falls_back_to_bisection() {
		// x(t) = 4 (t - 0.5)^3 + 0.5 has zero slope at the initial guess; y(t) = 30 t
		let piece = CubicCurve::from_coordinates(0., 0., 1., 10., 0., 20., 1., 30.);
		let expected_t = 0.5 - (1_f64 / 16.).cbrt();

		let y = crossing_y(&piece, 0.25, &config()).unwrap();
		assert!((y - 30. * expected_t).abs() < 1e-6);
	}

	#[test]
	fn vertical_and_out_of_range_pieces_do_not_cross() {
		let vertical = CubicCurve::from_line(Point::new(5., 0.), Point::new(5., 10.));
		let horizontal = CubicCurve::from_line(Point::new(0., 0.), Point::new(10., 0.));

		assert_eq!(crossing_y(&vertical, 5., &config()), None);
		assert_eq!(crossing_y(&horizontal, 10., &config()), None);
		assert_eq!(crossing_y(&horizontal, 0., &config()), Some(0.));
	}

	#[test]
	fn holes_use_even_odd() {
		let mut contours = Shape::circle(Point::ZERO, 200.).into_contours();
		contours.push(first_contour(Shape::circle(Point::ZERO, 100.)).reversed());
		let ring = Shape::new(contours);

		assert!(!is_inside_shape(Point::ZERO, &ring, &config()));
		assert!(is_inside_shape(Point::new(150., 0.), &ring, &config()));
		assert!(!is_inside_shape(Point::new(250., 0.), &ring, &config()));
	}

	#[test]
	fn contour_classification() {
		let circle = Shape::circle(Point::ZERO, 200.);
		let inner = first_contour(Shape::rectangle(Point::ZERO, 100., 80.));
		let far = first_contour(Shape::circle(Point::new(1000., 0.), 50.));

		assert_eq!(classify_contour(&inner, &circle, &config()), Containment::Inside);
		assert_eq!(classify_contour(&far, &circle, &config()), Containment::Outside);
		assert_eq!(classify_contour(&circle.contours()[0], &circle, &config()), Containment::Coincident);
	}

	#[test]
	fn contour_touching_at_a_midpoint_is_outside() {
		// x(t) = 10 - 20 t + 20 t^2 bottoms out at x = 5 for t = 0.5, on the right edge of the square
		let square = Shape::rectangle(Point::ZERO, 10., 10.);
		let bulge = CubicCurve::from_coordinates(10., -5., 10. / 3., -5., 10. / 3., 5., 10., 5.);
		let closing = CubicCurve::from_line(Point::new(10., 5.), Point::new(10., -5.));
		let contour = Contour::new(vec![bulge, closing]).unwrap();

		assert!(bulge.evaluate(0.5).distance(Point::new(5., 0.)) < 1e-12);
		assert_eq!(classify_contour(&contour, &square, &config()), Containment::Outside);
	}
}
