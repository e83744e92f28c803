use crate::aabb::{Aabb, bounding_boxes_overlap};
use crate::consts::{MAX_ABSOLUTE_DIFFERENCE, STRICT_MAX_ABSOLUTE_DIFFERENCE};
use crate::polynomial::Polynomial;
use crate::vector::{Point, vectors_equal};

use std::fmt::{Debug, Formatter, Result};

/// One cubic Bézier segment. Every transform returns a new curve; nothing mutates in place.
#[derive(Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicCurve {
	/// Start point of the curve.
	pub start: Point,
	/// Control point associated with the start point.
	pub handle_start: Point,
	/// Control point associated with the end point.
	pub handle_end: Point,
	/// End point of the curve.
	pub end: Point,
}

impl Debug for CubicCurve {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		f.debug_struct("CubicCurve")
			.field("start", &self.start)
			.field("handle_start", &self.handle_start)
			.field("handle_end", &self.handle_end)
			.field("end", &self.end)
			.finish()
	}
}

/// Constructors and comparisons.
impl CubicCurve {
	pub fn new(start: Point, handle_start: Point, handle_end: Point, end: Point) -> Self {
		Self { start, handle_start, handle_end, end }
	}

	pub fn from_points([start, handle_start, handle_end, end]: [Point; 4]) -> Self {
		Self { start, handle_start, handle_end, end }
	}

	#[allow(clippy::too_many_arguments)]
	pub fn from_coordinates(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> Self {
		Self::new(Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3), Point::new(x4, y4))
	}

	/// A straight segment with its handles at one and two thirds, so `x(t)` and `y(t)` stay linear.
	pub fn from_line(start: Point, end: Point) -> Self {
		Self::new(start, start.lerp(end, 1. / 3.), start.lerp(end, 2. / 3.), end)
	}

	/// Exact degree elevation of a quadratic segment, as emitted by TrueType outlines.
	pub fn from_quadratic(start: Point, handle: Point, end: Point) -> Self {
		// C1 = Q0 + (2/3) (Q1 - Q0)
		// C2 = Q2 + (2/3) (Q1 - Q2)
		Self::new(start, start + (2. / 3.) * (handle - start), end + (2. / 3.) * (handle - end), end)
	}

	pub fn points(&self) -> [Point; 4] {
		[self.start, self.handle_start, self.handle_end, self.end]
	}

	/// Returns true if the corresponding control points of the two curves are within `max_abs_diff` of each other.
	pub fn abs_diff_eq(&self, other: &CubicCurve, max_abs_diff: f64) -> bool {
		self.points().into_iter().zip(other.points()).all(|(a, b)| vectors_equal(a, b, max_abs_diff))
	}

	/// Returns true if the start, end and handles are all at the same location.
	pub fn is_point(&self) -> bool {
		self.points().into_iter().all(|point| vectors_equal(point, self.start, MAX_ABSOLUTE_DIFFERENCE))
	}

	/// Same geometry traversed in either direction.
	pub fn coincides_with(&self, other: &CubicCurve, max_abs_diff: f64) -> bool {
		self.abs_diff_eq(other, max_abs_diff) || self.abs_diff_eq(&other.reverse(), max_abs_diff)
	}
}

/// Evaluation and subdivision.
impl CubicCurve {
	/// Cubic Bernstein form at `t`. Not clamped, so any real `t` extrapolates the polynomial.
	pub fn evaluate(&self, t: f64) -> Point {
		let one_minus_t = 1. - t;
		let a = one_minus_t * one_minus_t * one_minus_t;
		let b = 3. * one_minus_t * one_minus_t * t;
		let c = 3. * one_minus_t * t * t;
		let d = t * t * t;
		a * self.start + b * self.handle_start + c * self.handle_end + d * self.end
	}

	/// First derivative `B'(t)`, not normalized.
	pub fn derivative_at(&self, t: f64) -> Point {
		let one_minus_t = 1. - t;
		3. * one_minus_t * one_minus_t * (self.handle_start - self.start) + 6. * one_minus_t * t * (self.handle_end - self.handle_start) + 3. * t * t * (self.end - self.handle_end)
	}

	/// De Casteljau subdivision into the curves covering `[0, t]` and `[t, 1]`.
	pub fn split(&self, t: f64) -> [CubicCurve; 2] {
		let p01 = self.start.lerp(self.handle_start, t);
		let p12 = self.handle_start.lerp(self.handle_end, t);
		let p23 = self.handle_end.lerp(self.end, t);
		let p012 = p01.lerp(p12, t);
		let p123 = p12.lerp(p23, t);
		let p = p012.lerp(p123, t);

		[CubicCurve::new(self.start, p01, p012, p), CubicCurve::new(p, p123, p23, self.end)]
	}

	/// The segment over `[t1, t2]`, found by splitting at `t2` and then splitting the first half at `t1 / t2`.
	/// Expects `0 <= t1 < t2 <= 1`.
	pub fn sub_curve(&self, t1: f64, t2: f64) -> CubicCurve {
		let [head, _] = self.split(t2);
		if t1 <= 0. || t2.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
			return head;
		}
		let [_, tail] = head.split(t1 / t2);
		tail
	}

	pub fn reverse(&self) -> CubicCurve {
		CubicCurve::new(self.end, self.handle_end, self.handle_start, self.start)
	}

	/// Moves the start point to `point`, carrying the start handle along so the tangent direction is kept.
	pub fn with_start(&self, point: Point) -> CubicCurve {
		let delta = point - self.start;
		CubicCurve::new(point, self.handle_start + delta, self.handle_end, self.end)
	}

	/// Moves the end point to `point`, carrying the end handle along.
	pub fn with_end(&self, point: Point) -> CubicCurve {
		let delta = point - self.end;
		CubicCurve::new(self.start, self.handle_start, self.handle_end + delta, point)
	}

	pub fn translate(&self, offset: Point) -> CubicCurve {
		CubicCurve::from_points(self.points().map(|point| point + offset))
	}

	/// Pointwise interpolation of the control points, used for morphing.
	pub fn lerp(&self, other: &CubicCurve, t: f64) -> CubicCurve {
		CubicCurve::new(
			self.start.lerp(other.start, t),
			self.handle_start.lerp(other.handle_start, t),
			self.handle_end.lerp(other.handle_end, t),
			self.end.lerp(other.end, t),
		)
	}
}

/// Bounds, power-basis forms and measurements.
impl CubicCurve {
	/// Box around the four control points. The curve lies in their convex hull, so this encloses it.
	pub fn control_bounding_box(&self) -> Aabb {
		let min = self.start.min(self.end).min(self.handle_start).min(self.handle_end);
		let max = self.start.max(self.end).max(self.handle_start).max(self.handle_end);
		Aabb {
			top: min.y,
			right: max.x,
			bottom: max.y,
			left: min.x,
		}
	}

	/// Conservative overlap test between the control-point boxes of two curves.
	/// A `false` result proves the curves are disjoint; `true` proves nothing.
	pub fn bounding_boxes_overlap(&self, other: &CubicCurve) -> bool {
		bounding_boxes_overlap(&self.control_bounding_box(), &other.control_bounding_box())
	}

	/// `x(t)` in ascending power order.
	pub fn x_polynomial(&self) -> Polynomial<4> {
		power_basis(self.start.x, self.handle_start.x, self.handle_end.x, self.end.x)
	}

	/// `y(t)` in ascending power order.
	pub fn y_polynomial(&self) -> Polynomial<4> {
		power_basis(self.start.y, self.handle_start.y, self.handle_end.y, self.end.y)
	}

	/// Parameters in `(0, 1)` where `x'(t) = 0`, sorted ascending.
	pub fn x_extrema(&self) -> impl Iterator<Item = f64> {
		let d0 = self.handle_start.x - self.start.x;
		let d1 = self.handle_end.x - self.handle_start.x;
		let d2 = self.end.x - self.handle_end.x;
		// x'(t) / 3 = a t^2 + b t + c
		let a = d0 - 2. * d1 + d2;
		let b = 2. * (d1 - d0);
		let c = d0;

		let mut roots = [None; 2];
		if a.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
			if b.abs() > STRICT_MAX_ABSOLUTE_DIFFERENCE {
				roots[0] = Some(-c / b);
			}
		} else {
			let discriminant = b * b - 4. * a * c;
			if discriminant >= 0. {
				let root_discriminant = discriminant.sqrt();
				let first = (-b - root_discriminant) / (2. * a);
				let second = (-b + root_discriminant) / (2. * a);
				roots = [Some(first.min(second)), Some(first.max(second))];
			}
		}

		roots.into_iter().flatten().filter(|&t| t > 0. && t < 1.)
	}

	/// Splits the curve at its x-extrema so each piece has a monotonic `x(t)`.
	pub fn x_monotonic_pieces(&self) -> smallvec::SmallVec<[CubicCurve; 3]> {
		let mut pieces = smallvec::SmallVec::new();
		let mut previous = 0.;
		for t in self.x_extrema().chain(std::iter::once(1.)) {
			if t - previous > STRICT_MAX_ABSOLUTE_DIFFERENCE {
				pieces.push(self.sub_curve(previous, t));
			}
			previous = t;
		}
		pieces
	}

	/// This curve's contribution to a closed contour's signed area (Green's theorem); positive for counter-clockwise in y-up axes.
	pub fn signed_area(&self) -> f64 {
		let [p0, p1, p2, p3] = self.points();
		(p0.x * (6. * p1.y + 3. * p2.y + p3.y) + 3. * (p1.x * (-2. * p0.y + p2.y + p3.y) - p2.x * (p0.y + p1.y - 2. * p3.y)) - p3.x * (p0.y + 3. * p1.y + 6. * p2.y)) / 20.
	}
}

fn power_basis(p0: f64, p1: f64, p2: f64, p3: f64) -> Polynomial<4> {
	Polynomial::new([p0, 3. * (p1 - p0), 3. * (p0 - 2. * p1 + p2), -p0 + 3. * p1 - 3. * p2 + p3])
}
