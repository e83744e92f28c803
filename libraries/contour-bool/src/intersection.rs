use crate::aabb::bounding_boxes_overlap;
use crate::config::BooleanConfig;
use crate::consts::{MAX_ABSOLUTE_DIFFERENCE, STRICT_MAX_ABSOLUTE_DIFFERENCE};
use crate::cubic::CubicCurve;
use crate::shape::{Contour, Shape};
use crate::vector::Point;

/// One crossing between two curves.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveIntersection {
	pub t_a: f64,
	pub t_b: f64,
	/// Midpoint of the two curves' evaluated positions.
	pub point: Point,
}

/// A [`CurveIntersection`] tagged with the index of the curve on each contour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourIntersection {
	pub curve_a: usize,
	pub curve_b: usize,
	pub intersection: CurveIntersection,
}

/// Which operand of a Boolean operation a contour belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeSide {
	A,
	B,
}

impl ShapeSide {
	pub fn other(self) -> ShapeSide {
		match self {
			ShapeSide::A => ShapeSide::B,
			ShapeSide::B => ShapeSide::A,
		}
	}
}

/// Position of a curve inside a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveRef {
	pub contour: usize,
	pub curve: usize,
}

impl CurveRef {
	pub fn new(contour: usize, curve: usize) -> Self {
		Self { contour, curve }
	}
}

/// A crossing between a curve of shape A and a curve of shape B. Its index in the list returned by
/// [`find_shape_intersections`] is its identity for the rest of the operation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectionRecord {
	pub a: CurveRef,
	pub b: CurveRef,
	pub t_a: f64,
	pub t_b: f64,
	pub point: Point,
}

impl IntersectionRecord {
	pub fn curve_ref(&self, side: ShapeSide) -> CurveRef {
		match side {
			ShapeSide::A => self.a,
			ShapeSide::B => self.b,
		}
	}

	pub fn t(&self, side: ShapeSide) -> f64 {
		match side {
			ShapeSide::A => self.t_a,
			ShapeSide::B => self.t_b,
		}
	}
}

#[derive(Clone, Copy)]
struct IntersectionSegment {
	curve: CubicCurve,
	start_param: f64,
	end_param: f64,
}

impl IntersectionSegment {
	fn new(curve: &CubicCurve, [start_param, end_param]: [f64; 2]) -> Self {
		Self {
			curve: curve.sub_curve(start_param, end_param),
			start_param,
			end_param,
		}
	}

	fn width(&self) -> f64 {
		self.end_param - self.start_param
	}

	fn mid_param(&self) -> f64 {
		(self.start_param + self.end_param) / 2.
	}

	fn subdivide(&self) -> [IntersectionSegment; 2] {
		let [first, second] = self.curve.split(0.5);
		let mid_param = self.mid_param();
		[
			IntersectionSegment {
				curve: first,
				start_param: self.start_param,
				end_param: mid_param,
			},
			IntersectionSegment {
				curve: second,
				start_param: mid_param,
				end_param: self.end_param,
			},
		]
	}
}

/// All crossings of two curves over their full parameter ranges.
pub fn find_curve_intersections(a: &CubicCurve, b: &CubicCurve, config: &BooleanConfig) -> Vec<CurveIntersection> {
	find_curve_intersections_in_ranges(a, b, [0., 1.], [0., 1.], config)
}

/// Bisects both parameter ranges until the sub-curve boxes stop overlapping or both ranges are narrower than
/// `min_parameter_gap`. The surviving leaves are clustered so a single crossing is reported once, and each cluster's
/// best leaf is polished with Newton's method. Crossings at a curve's endpoints are reported too; the contour-level
/// search settles them onto the shared vertex.
///
/// Degenerate curves and coincident curve pairs have no isolated crossings, so they return nothing.
pub fn find_curve_intersections_in_ranges(a: &CubicCurve, b: &CubicCurve, range_a: [f64; 2], range_b: [f64; 2], config: &BooleanConfig) -> Vec<CurveIntersection> {
	if a.is_point() || b.is_point() {
		log::debug!("Skipping intersection search with a degenerate curve: {a:?} x {b:?}");
		return Vec::new();
	}
	if a.coincides_with(b, MAX_ABSOLUTE_DIFFERENCE) {
		return Vec::new();
	}

	let mut pairs = vec![(IntersectionSegment::new(a, range_a), IntersectionSegment::new(b, range_b))];
	let mut leaves = Vec::new();
	let mut examined = 0;

	while let Some((segment_a, segment_b)) = pairs.pop() {
		examined += 1;
		if examined > config.max_subdivision_pairs {
			log::warn!("Curve intersection search gave up after {} subdivision pairs, keeping {} leaves", config.max_subdivision_pairs, leaves.len());
			break;
		}

		if !segment_a.curve.bounding_boxes_overlap(&segment_b.curve) {
			continue;
		}

		if segment_a.width() < config.min_parameter_gap && segment_b.width() < config.min_parameter_gap {
			leaves.push([segment_a.mid_param(), segment_b.mid_param()]);
			continue;
		}

		let halves_b = segment_b.subdivide();
		for half_a in segment_a.subdivide() {
			for half_b in halves_b {
				pairs.push((half_a, half_b));
			}
		}
	}

	let intersections = cluster_leaves(&mut leaves, config.merge_epsilon)
		.into_iter()
		.filter_map(|cluster| {
			// The leaf whose two evaluated points agree best stands in for the cluster
			cluster.into_iter().min_by(|&[a0, b0], &[a1, b1]| {
				let gap = |t_a, t_b| a.evaluate(t_a).distance_squared(b.evaluate(t_b));
				gap(a0, b0).total_cmp(&gap(a1, b1))
			})
		})
		.map(|leaf| {
			let [t_a, t_b] = refine_intersection(a, b, leaf, config);
			CurveIntersection {
				t_a,
				t_b,
				point: a.evaluate(t_a).lerp(b.evaluate(t_b), 0.5),
			}
		})
		.collect::<Vec<_>>();

	log::trace!("Examined {examined} subdivision pairs, found {} leaves and {} intersections", leaves.len(), intersections.len());

	intersections
}

/// Newton's method on `a(t_a) - b(t_b) = 0`, starting from a leaf.
///
/// The leaf is kept as is when the Jacobian is singular, which happens at tangent contacts, or when the iteration
/// leaves the leaf's cluster or ends further from a crossing than it started.
fn refine_intersection(a: &CubicCurve, b: &CubicCurve, leaf: [f64; 2], config: &BooleanConfig) -> [f64; 2] {
	let residual = |[t_a, t_b]: [f64; 2]| a.evaluate(t_a) - b.evaluate(t_b);
	let initial_error = residual(leaf).length_squared();

	let mut params = leaf;
	let mut difference = residual(params);
	for _ in 0..config.newton_max_iterations {
		if difference.length() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
			break;
		}

		// Solves [a'(t_a) -b'(t_b)] step = difference by Cramer's rule
		let (column_a, column_b) = (a.derivative_at(params[0]), -b.derivative_at(params[1]));
		let determinant = column_a.perp_dot(column_b);
		if determinant.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
			return leaf;
		}
		params[0] -= difference.perp_dot(column_b) / determinant;
		params[1] -= column_a.perp_dot(difference) / determinant;
		difference = residual(params);
	}

	let wandered = params.iter().zip(leaf).any(|(t, start)| !t.is_finite() || (t - start).abs() > config.merge_epsilon);
	let params = params.map(|t| t.clamp(0., 1.));
	if wandered || residual(params).length_squared() > initial_error {
		return leaf;
	}
	params
}

/// Groups leaves transitively: two leaves share a cluster when both of their parameters differ by at most `merge_epsilon`.
fn cluster_leaves(leaves: &mut [[f64; 2]], merge_epsilon: f64) -> Vec<Vec<[f64; 2]>> {
	leaves.sort_by(|a, b| a[0].total_cmp(&b[0]));

	let mut assigned = vec![false; leaves.len()];
	let mut clusters = Vec::new();

	for seed in 0..leaves.len() {
		if assigned[seed] {
			continue;
		}
		assigned[seed] = true;

		let mut cluster = vec![leaves[seed]];
		let mut stack = vec![seed];
		while let Some(current) = stack.pop() {
			let [t_a, t_b] = leaves[current];
			let first = leaves.partition_point(|leaf| leaf[0] < t_a - merge_epsilon);
			for candidate in first..leaves.len() {
				if leaves[candidate][0] > t_a + merge_epsilon {
					break;
				}
				if !assigned[candidate] && (leaves[candidate][1] - t_b).abs() <= merge_epsilon {
					assigned[candidate] = true;
					cluster.push(leaves[candidate]);
					stack.push(candidate);
				}
			}
		}

		clusters.push(cluster);
	}

	clusters
}

/// Every crossing between a curve of `a` and a curve of `b`.
///
/// A crossing within `endpoint_epsilon` of a curve's end is moved onto the vertex and attributed to the curve that starts
/// there, with `t = 0`, and its point becomes that vertex. All other crossings have parameters strictly inside `(0, 1)`.
/// A crossing seen by both curves next to a vertex is reported once.
pub fn find_contour_intersections(a: &Contour, b: &Contour, config: &BooleanConfig) -> Vec<ContourIntersection> {
	let mut intersections: Vec<ContourIntersection> = Vec::new();
	for (index_a, a_curve) in a.iter().enumerate() {
		for (index_b, b_curve) in b.iter().enumerate() {
			for found in find_curve_intersections(a_curve, b_curve, config) {
				let (curve_a, t_a) = settle_on_vertex(a, index_a, found.t_a, config.endpoint_epsilon);
				let (curve_b, t_b) = settle_on_vertex(b, index_b, found.t_b, config.endpoint_epsilon);
				let point = match (t_a <= 0., t_b <= 0.) {
					(true, _) => a.curves()[curve_a].start,
					(false, true) => b.curves()[curve_b].start,
					(false, false) => found.point,
				};

				let duplicate = intersections.iter().any(|existing| {
					contour_parameter_distance(a.len(), (existing.curve_a, existing.intersection.t_a), (curve_a, t_a)) <= config.merge_epsilon
						&& contour_parameter_distance(b.len(), (existing.curve_b, existing.intersection.t_b), (curve_b, t_b)) <= config.merge_epsilon
				});
				if duplicate {
					log::trace!("Merging the crossing at {point} into one already found next to it");
					continue;
				}

				intersections.push(ContourIntersection {
					curve_a,
					curve_b,
					intersection: CurveIntersection { t_a, t_b, point },
				});
			}
		}
	}
	intersections
}

/// Moves a parameter near either end of curve `curve` onto the vertex, as `t = 0` of the curve starting there.
fn settle_on_vertex(contour: &Contour, curve: usize, t: f64, epsilon: f64) -> (usize, f64) {
	if t >= 1. - epsilon {
		((curve + 1) % contour.len(), 0.)
	} else if t <= epsilon {
		(curve, 0.)
	} else {
		(curve, t)
	}
}

/// Distance between two positions on a closed contour of `len` curves, measured in whole-contour parameter `curve + t`.
fn contour_parameter_distance(len: usize, (curve, t): (usize, f64), (other_curve, other_t): (usize, f64)) -> f64 {
	let len = len as f64;
	let distance = ((curve as f64 + t) - (other_curve as f64 + other_t)).abs() % len;
	distance.min(len - distance)
}

/// Every crossing between the contours of `a` and the contours of `b`, each tagged with its position on both sides.
pub fn find_shape_intersections(a: &Shape, b: &Shape, config: &BooleanConfig) -> Vec<IntersectionRecord> {
	let mut records = Vec::new();
	for (contour_a, a_contour) in a.iter().enumerate() {
		for (contour_b, b_contour) in b.iter().enumerate() {
			// Coincident contours share every vertex but never cross; they are kept or dropped as a whole
			if a_contour.coincides_with(b_contour) {
				continue;
			}
			if let (Some(a_box), Some(b_box)) = (a_contour.bounding_box(), b_contour.bounding_box()) {
				if !bounding_boxes_overlap(&a_box, &b_box) {
					continue;
				}
			}

			records.extend(find_contour_intersections(a_contour, b_contour, config).into_iter().map(|found| IntersectionRecord {
				a: CurveRef::new(contour_a, found.curve_a),
				b: CurveRef::new(contour_b, found.curve_b),
				t_a: found.intersection.t_a,
				t_b: found.intersection.t_b,
				point: found.intersection.point,
			}));
		}
	}

	log::debug!("Found {} intersections between shapes of {} and {} contours", records.len(), a.len(), b.len());

	records
}
