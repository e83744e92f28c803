use crate::aabb::{Aabb, merge_bounding_boxes};
use crate::consts::{DEFAULT_CIRCLE_DETAIL, MAX_ABSOLUTE_DIFFERENCE};
use crate::cubic::CubicCurve;
use crate::error::BooleanError;
use crate::vector::{Point, vectors_equal};

use std::f64::consts::TAU;

/// A closed loop of cubic curves. Each curve starts where the previous one ends and the last one ends where the first starts.
/// Curve order is the winding direction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
	curves: Vec<CubicCurve>,
}

impl Contour {
	/// Validates that the curves form a non-empty closed loop.
	pub fn new(curves: Vec<CubicCurve>) -> Result<Self, BooleanError> {
		if curves.is_empty() {
			return Err(BooleanError::DegenerateInput { reason: "contour has no curves".to_string() });
		}
		if let Some(curve) = first_open_joint(&curves) {
			return Err(BooleanError::OpenContour { curve });
		}
		Ok(Self { curves })
	}

	/// For producers that guarantee closure by construction (chopping, stitching, primitive constructors).
	pub(crate) fn from_curves_unchecked(curves: Vec<CubicCurve>) -> Self {
		Self { curves }
	}

	pub fn curves(&self) -> &[CubicCurve] {
		&self.curves
	}

	pub fn len(&self) -> usize {
		self.curves.len()
	}

	pub fn is_empty(&self) -> bool {
		self.curves.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, CubicCurve> {
		self.curves.iter()
	}

	pub fn into_curves(self) -> Vec<CubicCurve> {
		self.curves
	}

	pub fn is_closed(&self) -> bool {
		!self.curves.is_empty() && first_open_joint(&self.curves).is_none()
	}

	/// Same curves in the same cyclic order, possibly starting at a different curve.
	pub fn coincides_with(&self, other: &Contour) -> bool {
		let count = self.len();
		if count != other.len() || count == 0 {
			return false;
		}
		(0..count).any(|offset| (0..count).all(|index| self.curves[index].abs_diff_eq(&other.curves[(index + offset) % count], MAX_ABSOLUTE_DIFFERENCE)))
	}

	pub fn translate(&self, offset: Point) -> Contour {
		Contour::from_curves_unchecked(self.curves.iter().map(|curve| curve.translate(offset)).collect())
	}

	/// The same loop traversed in the opposite direction.
	pub fn reversed(&self) -> Contour {
		Contour::from_curves_unchecked(self.curves.iter().rev().map(CubicCurve::reverse).collect())
	}

	/// Curve-by-curve interpolation towards `other`. Both contours need the same number of curves.
	pub fn lerp(&self, other: &Contour, t: f64) -> Result<Contour, BooleanError> {
		if self.len() != other.len() {
			return Err(BooleanError::MismatchedTopology {
				expected: self.len(),
				found: other.len(),
			});
		}
		Ok(Contour::from_curves_unchecked(self.curves.iter().zip(other.iter()).map(|(a, b)| a.lerp(b, t)).collect()))
	}

	/// Positive when the contour winds counter-clockwise in y-up axes.
	pub fn signed_area(&self) -> f64 {
		self.curves.iter().map(CubicCurve::signed_area).sum()
	}

	pub fn area(&self) -> f64 {
		self.signed_area().abs()
	}

	pub fn bounding_box(&self) -> Option<Aabb> {
		self.curves.iter().fold(None, |bounding_box, curve| Some(merge_bounding_boxes(bounding_box, &curve.control_bounding_box())))
	}
}

impl<'a> IntoIterator for &'a Contour {
	type Item = &'a CubicCurve;
	type IntoIter = std::slice::Iter<'a, CubicCurve>;

	fn into_iter(self) -> Self::IntoIter {
		self.curves.iter()
	}
}

fn first_open_joint(curves: &[CubicCurve]) -> Option<usize> {
	let count = curves.len();
	(0..count).find(|&index| {
		let previous = &curves[(index + count - 1) % count];
		!vectors_equal(previous.end, curves[index].start, MAX_ABSOLUTE_DIFFERENCE)
	})
}

/// A filled region bounded by any number of contours, e.g. a letter "O" with an outer and an inner contour.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
	contours: Vec<Contour>,
}

impl Shape {
	pub fn new(contours: Vec<Contour>) -> Self {
		Self { contours }
	}

	pub fn contours(&self) -> &[Contour] {
		&self.contours
	}

	pub fn len(&self) -> usize {
		self.contours.len()
	}

	pub fn is_empty(&self) -> bool {
		self.contours.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
		self.contours.iter()
	}

	pub fn into_contours(self) -> Vec<Contour> {
		self.contours
	}

	/// Eight-arc circle approximation starting at angle zero and winding counter-clockwise in y-up axes.
	pub fn circle(center: Point, radius: f64) -> Self {
		Self::circle_with_detail(center, radius, DEFAULT_CIRCLE_DETAIL)
	}

	/// Circle approximation with `detail` cubic arcs (at least one).
	pub fn circle_with_detail(center: Point, radius: f64, detail: usize) -> Self {
		let detail = detail.max(1);
		let step = TAU / detail as f64;
		// https://stackoverflow.com/a/27863181
		let handle_length = (4. / 3.) * (step / 4.).tan() * radius;

		let on_circle = |index: usize| {
			let angle = step * (index % detail) as f64;
			let direction = Point::from_angle(angle);
			(center + direction * radius, direction.perp())
		};

		let curves = (0..detail)
			.map(|index| {
				let (start, start_tangent) = on_circle(index);
				let (end, end_tangent) = on_circle(index + 1);
				CubicCurve::new(start, start + start_tangent * handle_length, end - end_tangent * handle_length, end)
			})
			.collect();

		Self::new(vec![Contour::from_curves_unchecked(curves)])
	}

	/// Axis-aligned rectangle of straight cubic edges.
	pub fn rectangle(center: Point, width: f64, height: f64) -> Self {
		let half = Point::new(width, height) / 2.;
		let (min, max) = (center - half, center + half);
		Self::polygon(&[min, Point::new(max.x, min.y), max, Point::new(min.x, max.y)])
	}

	/// Rectangle whose corners are replaced by quarter-circle arcs of `radius`, clamped to half the shorter side.
	pub fn rounded_rectangle(center: Point, width: f64, height: f64, radius: f64) -> Self {
		let radius = radius.clamp(0., width.min(height) / 2.);
		if radius <= MAX_ABSOLUTE_DIFFERENCE {
			return Self::rectangle(center, width, height);
		}

		let half = Point::new(width, height) / 2.;
		let (min, max) = (center - half, center + half);
		let handle_length = (4. / 3.) * (TAU / 16.).tan() * radius;

		// Corners in winding order, each with the direction of the edge arriving at it and the edge leaving it
		let corners = [
			(Point::new(max.x, min.y), Point::X, Point::Y),
			(max, Point::Y, Point::NEG_X),
			(Point::new(min.x, max.y), Point::NEG_X, Point::NEG_Y),
			(min, Point::NEG_Y, Point::X),
		];

		let mut curves = Vec::with_capacity(8);
		for (index, &(corner, incoming, outgoing)) in corners.iter().enumerate() {
			let arc_start = corner - incoming * radius;
			let arc_end = corner + outgoing * radius;
			curves.push(CubicCurve::new(arc_start, arc_start + incoming * handle_length, arc_end - outgoing * handle_length, arc_end));

			let (next_corner, next_incoming, _) = corners[(index + 1) % corners.len()];
			curves.push(CubicCurve::from_line(arc_end, next_corner - next_incoming * radius));
		}

		Self::new(vec![Contour::from_curves_unchecked(curves)])
	}

	/// Closed polygon through `points` with straight cubic edges. Fewer than two points yield an empty shape.
	pub fn polygon(points: &[Point]) -> Self {
		if points.len() < 2 {
			return Self::default();
		}
		let curves = points.iter().zip(points.iter().cycle().skip(1)).map(|(&start, &end)| CubicCurve::from_line(start, end)).collect();
		Self::new(vec![Contour::from_curves_unchecked(curves)])
	}

	pub fn translate(&self, offset: Point) -> Shape {
		Shape::new(self.contours.iter().map(|contour| contour.translate(offset)).collect())
	}

	/// Contour-by-contour interpolation towards `other`, the building block of morphing animations.
	pub fn lerp(&self, other: &Shape, t: f64) -> Result<Shape, BooleanError> {
		if self.len() != other.len() {
			return Err(BooleanError::MismatchedTopology {
				expected: self.len(),
				found: other.len(),
			});
		}
		let contours = self.contours.iter().zip(other.iter()).map(|(a, b)| a.lerp(b, t)).collect::<Result<Vec<_>, _>>()?;
		Ok(Shape::new(contours))
	}

	/// Sum of the unsigned contour areas.
	pub fn area(&self) -> f64 {
		self.contours.iter().map(Contour::area).sum()
	}

	pub fn bounding_box(&self) -> Option<Aabb> {
		self.contours.iter().filter_map(Contour::bounding_box).fold(None, |bounding_box, contour_box| Some(merge_bounding_boxes(bounding_box, &contour_box)))
	}
}

impl From<Contour> for Shape {
	fn from(contour: Contour) -> Self {
		Shape::new(vec![contour])
	}
}

impl FromIterator<Contour> for Shape {
	fn from_iter<I: IntoIterator<Item = Contour>>(iter: I) -> Self {
		Shape::new(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Shape {
	type Item = &'a Contour;
	type IntoIter = std::slice::Iter<'a, Contour>;

	fn into_iter(self) -> Self::IntoIter {
		self.contours.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::f64::consts::PI;

	#[test]
	fn contour_validation() {
		let a = Point::new(0., 0.);
		let b = Point::new(10., 0.);
		let c = Point::new(0., 10.);

		assert!(matches!(Contour::new(vec![]), Err(BooleanError::DegenerateInput { .. })));
		assert_eq!(Contour::new(vec![CubicCurve::from_line(a, b), CubicCurve::from_line(b, c)]), Err(BooleanError::OpenContour { curve: 0 }));

		let triangle = Contour::new(vec![CubicCurve::from_line(a, b), CubicCurve::from_line(b, c), CubicCurve::from_line(c, a)]).unwrap();
		assert!(triangle.is_closed());
		assert!((triangle.signed_area() - 50.).abs() < 1e-9);
	}

	#[test]
	fn primitives_are_closed() {
		let shapes = [
			Shape::circle(Point::new(5., -3.), 200.),
			Shape::circle_with_detail(Point::ZERO, 10., 3),
			Shape::rectangle(Point::ZERO, 100., 80.),
			Shape::rounded_rectangle(Point::ZERO, 100., 80., 20.),
			Shape::polygon(&[Point::new(0., 0.), Point::new(10., 0.), Point::new(5., 8.)]),
		];

		for shape in &shapes {
			assert_eq!(shape.len(), 1);
			assert!(shape.contours()[0].is_closed(), "{shape:?}");
		}
	}

	#[test]
	fn circle_area_is_close_to_exact() {
		let circle = Shape::circle(Point::ZERO, 200.);
		let exact = PI * 200. * 200.;

		assert_eq!(circle.contours()[0].len(), 8);
		assert!((circle.area() - exact).abs() / exact < 1e-4);
		assert!(circle.contours()[0].signed_area() > 0.);
	}

	#[test]
	fn rectangle_area_and_bounds() {
		let rectangle = Shape::rectangle(Point::new(10., 20.), 100., 80.);

		assert!((rectangle.area() - 8000.).abs() < 1e-9);
		// Handles of straight edges sit at thirds, so the box is only exact up to rounding
		let bounding_box = rectangle.bounding_box().unwrap();
		assert!(bounding_box.abs_diff_eq(&Aabb { top: -20., right: 60., bottom: 60., left: -40. }, MAX_ABSOLUTE_DIFFERENCE), "{bounding_box:?}");
	}

	#[test]
	fn rounded_rectangle_is_smaller_than_rectangle() {
		let radius = 20.;
		let rounded = Shape::rounded_rectangle(Point::ZERO, 100., 80., radius);
		// Each corner loses a square minus a quarter circle
		let expected = 8000. - (4. - PI) * radius * radius;

		assert_eq!(rounded.contours()[0].len(), 8);
		assert!((rounded.area() - expected).abs() < 1.);
	}

	#[test]
	fn coincidence_ignores_start_curve() {
		let contour = Shape::circle(Point::ZERO, 50.).into_contours().remove(0);
		let mut rotated = contour.curves().to_vec();
		rotated.rotate_left(3);
		let rotated = Contour::new(rotated).unwrap();

		assert!(contour.coincides_with(&rotated));
		assert!(!contour.coincides_with(&contour.translate(Point::new(0.5, 0.))));
		assert!(!contour.coincides_with(&contour.reversed()));
	}

	#[test]
	fn reversed_flips_winding() {
		let contour = Shape::circle(Point::ZERO, 50.).into_contours().remove(0);
		let reversed = contour.reversed();

		assert!(reversed.is_closed());
		assert!((reversed.signed_area() + contour.signed_area()).abs() < 1e-6);
	}

	#[test]
	fn morphing() {
		let from = Shape::circle(Point::ZERO, 100.);
		let to = Shape::circle(Point::new(50., 0.), 200.);

		let halfway = from.lerp(&to, 0.5).unwrap();
		let expected = Shape::circle(Point::new(25., 0.), 150.);
		for (a, b) in halfway.contours()[0].iter().zip(expected.contours()[0].iter()) {
			assert!(a.abs_diff_eq(b, 1e-9));
		}

		let square = Shape::rectangle(Point::ZERO, 10., 10.);
		assert_eq!(from.lerp(&square, 0.5), Err(BooleanError::MismatchedTopology { expected: 8, found: 4 }));
		assert_eq!(from.lerp(&Shape::default(), 0.5), Err(BooleanError::MismatchedTopology { expected: 1, found: 0 }));
	}

	#[test]
	fn translation() {
		let shape = Shape::rectangle(Point::ZERO, 10., 10.).translate(Point::new(100., -5.));
		let bounding_box = shape.bounding_box().unwrap();
		assert!(bounding_box.abs_diff_eq(&Aabb { top: -10., right: 105., bottom: 0., left: 95. }, MAX_ABSOLUTE_DIFFERENCE), "{bounding_box:?}");
	}
}
