use crate::chop::{chop_shape, remap_records};
use crate::config::BooleanConfig;
use crate::containment::{Containment, classify_contour, is_inside_shape};
use crate::error::BooleanError;
use crate::intersection::{CurveRef, IntersectionRecord, ShapeSide, find_shape_intersections};
use crate::shape::{Contour, Shape};

use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOperation {
	Union,
	Intersection,
}

impl BooleanOperation {
	/// Whether a contour of `side` that crosses nothing belongs to the result.
	/// Coincident contours are kept once, from shape A.
	fn keeps_disjoint(self, side: ShapeSide, containment: Containment) -> bool {
		match (self, containment) {
			(_, Containment::Coincident) => side == ShapeSide::A,
			(BooleanOperation::Union, Containment::Outside) | (BooleanOperation::Intersection, Containment::Inside) => true,
			(BooleanOperation::Union, Containment::Inside) | (BooleanOperation::Intersection, Containment::Outside) => false,
		}
	}

	/// The side to walk first out of an intersection, given whether B's outgoing curve runs inside A.
	///
	/// A union follows the boundary that leaves the other shape, an intersection the one that enters it.
	fn start_side(self, b_enters_a: bool) -> ShapeSide {
		match (self, b_enters_a) {
			(BooleanOperation::Union, true) | (BooleanOperation::Intersection, false) => ShapeSide::A,
			(BooleanOperation::Union, false) | (BooleanOperation::Intersection, true) => ShapeSide::B,
		}
	}
}

pub fn union(a: &Shape, b: &Shape, config: &BooleanConfig) -> Result<Shape, BooleanError> {
	shape_boolean(a, b, BooleanOperation::Union, config)
}

pub fn intersection(a: &Shape, b: &Shape, config: &BooleanConfig) -> Result<Shape, BooleanError> {
	shape_boolean(a, b, BooleanOperation::Intersection, config)
}

/// Computes the union or intersection of two shapes.
///
/// Both shapes are chopped at their intersections and the pieces are stitched into new contours by walking
/// along one shape and switching to the other at every intersection. Intersections where the boundaries only
/// touch are ignored. Contours that cross nothing are kept or dropped as a whole based on whether they lie inside
/// the other shape. The inputs are never modified, so on error the caller still holds them unchanged.
pub fn shape_boolean(a: &Shape, b: &Shape, operation: BooleanOperation, config: &BooleanConfig) -> Result<Shape, BooleanError> {
	let records = find_shape_intersections(a, b, config);

	let (chopped_a, maps_a) = chop_shape(a, &records, ShapeSide::A);
	let (chopped_b, maps_b) = chop_shape(b, &records, ShapeSide::B);
	let records = remap_records(&records, &maps_a, &maps_b).ok_or(BooleanError::GeometryInconsistency { steps: 0 })?;

	// The chop points of touching records stay behind as plain vertices of the chopped contours
	let records = crossing_records(records, a, &chopped_b, config)?;
	check_crossing_parity(&records)?;

	let mut contours = Vec::new();
	for (side, shape, other) in [(ShapeSide::A, a, b), (ShapeSide::B, b, a)] {
		for (index, contour) in shape.iter().enumerate() {
			if records.iter().any(|record| record.curve_ref(side).contour == index) {
				continue;
			}
			let containment = classify_contour(contour, other, config);
			if operation.keeps_disjoint(side, containment) {
				contours.push(contour.clone());
			}
		}
	}
	let kept = contours.len();

	let mut stitcher = Stitcher::new([&chopped_a, &chopped_b], &records);
	for start in 0..records.len() {
		if stitcher.is_visited(start) {
			continue;
		}
		let side = stitcher.start_side(start, operation, config)?;
		contours.push(stitcher.trace(start, side)?);
	}

	log::debug!(
		"{operation:?} of {} and {} contours: {} intersections, kept {kept} whole contours and stitched {}",
		a.len(),
		b.len(),
		records.len(),
		contours.len() - kept
	);

	Ok(Shape::new(contours))
}

/// Keeps the records where B's boundary passes from one side of A to the other.
///
/// The chopped curves of B arriving at and leaving an intersection cross nothing in between, so sampling one point on
/// each tells which side of A they run on. When both are on the same side the shapes only touch there.
fn crossing_records(records: Vec<IntersectionRecord>, a: &Shape, chopped_b: &Shape, config: &BooleanConfig) -> Result<Vec<IntersectionRecord>, BooleanError> {
	let mut crossings = Vec::with_capacity(records.len());
	for record in records {
		let contour = chopped_b.contours().get(record.b.contour).ok_or(BooleanError::GeometryInconsistency { steps: 0 })?;
		let outgoing = contour.curves().get(record.b.curve).ok_or(BooleanError::GeometryInconsistency { steps: 0 })?;
		let incoming = &contour.curves()[(record.b.curve + contour.len() - 1) % contour.len()];

		let leaves_inside = is_inside_shape(outgoing.evaluate(config.stitch_sample_t), a, config);
		let arrives_inside = is_inside_shape(incoming.evaluate(1. - config.stitch_sample_t), a, config);
		if leaves_inside == arrives_inside {
			log::debug!("Ignoring the intersection at {} where the shapes touch without crossing", record.point);
			continue;
		}
		crossings.push(record);
	}
	Ok(crossings)
}

/// Two closed boundaries cross an even number of times, so an odd count for a pair of contours means a crossing was lost.
fn check_crossing_parity(records: &[IntersectionRecord]) -> Result<(), BooleanError> {
	let mut counts = FxHashMap::<(usize, usize), usize>::default();
	for record in records {
		*counts.entry((record.a.contour, record.b.contour)).or_default() += 1;
	}

	match counts.into_iter().find(|(_, count)| count % 2 == 1) {
		Some(((contour_a, contour_b), count)) => {
			log::warn!("Contour {contour_a} of A and contour {contour_b} of B cross {count} times");
			Err(BooleanError::GeometryInconsistency { steps: 0 })
		}
		None => Ok(()),
	}
}

/// Walks the chopped shapes from intersection to intersection.
struct Stitcher<'a> {
	shapes: [&'a Shape; 2],
	records: &'a [IntersectionRecord],
	lookup: FxHashMap<(ShapeSide, CurveRef), usize>,
	visited: Vec<bool>,
	step_bound: usize,
}

impl<'a> Stitcher<'a> {
	fn new(shapes: [&'a Shape; 2], records: &'a [IntersectionRecord]) -> Self {
		let lookup = records
			.iter()
			.enumerate()
			.flat_map(|(index, record)| [((ShapeSide::A, record.a), index), ((ShapeSide::B, record.b), index)])
			.collect();
		let step_bound = shapes.iter().flat_map(|shape| shape.iter()).map(Contour::len).sum();

		Self {
			shapes,
			records,
			lookup,
			visited: vec![false; records.len()],
			step_bound,
		}
	}

	fn shape(&self, side: ShapeSide) -> &'a Shape {
		match side {
			ShapeSide::A => self.shapes[0],
			ShapeSide::B => self.shapes[1],
		}
	}

	fn contour(&self, side: ShapeSide, position: CurveRef) -> Result<&'a Contour, BooleanError> {
		self.shape(side).contours().get(position.contour).ok_or(BooleanError::GeometryInconsistency { steps: 0 })
	}

	fn is_visited(&self, record: usize) -> bool {
		self.visited.get(record).copied().unwrap_or(true)
	}

	fn visit(&mut self, record: usize) {
		if let Some(visited) = self.visited.get_mut(record) {
			*visited = true;
		}
	}

	/// Samples B's curve leaving the intersection and tests it against A.
	fn start_side(&self, record: usize, operation: BooleanOperation, config: &BooleanConfig) -> Result<ShapeSide, BooleanError> {
		let position = self.records[record].b;
		let outgoing = self.contour(ShapeSide::B, position)?.curves().get(position.curve).ok_or(BooleanError::GeometryInconsistency { steps: 0 })?;
		let b_enters_a = is_inside_shape(outgoing.evaluate(config.stitch_sample_t), self.shape(ShapeSide::A), config);
		Ok(operation.start_side(b_enters_a))
	}

	/// Collects curves from `start` until the walk returns to it, switching sides at every other intersection it meets.
	///
	/// The walk must arrive back on the other shape than it left on, since the boundary of the result changes shape at
	/// every intersection.
	fn trace(&mut self, start: usize, mut side: ShapeSide) -> Result<Contour, BooleanError> {
		let first_side = side;
		self.visit(start);
		let mut position = self.records[start].curve_ref(side);
		let mut curves = Vec::new();

		loop {
			if curves.len() >= self.step_bound {
				log::warn!("Stitching from intersection {start} did not close after {} curves", curves.len());
				return Err(BooleanError::GeometryInconsistency { steps: curves.len() });
			}

			let contour = self.contour(side, position)?;
			let curve = contour.curves().get(position.curve).ok_or(BooleanError::GeometryInconsistency { steps: curves.len() })?;
			curves.push(*curve);
			position.curve = (position.curve + 1) % contour.len();

			match self.lookup.get(&(side, position)) {
				None => {}
				Some(&record) if record == start => {
					if side == first_side {
						log::warn!("Stitching from intersection {start} came back to it without changing shapes");
						return Err(BooleanError::GeometryInconsistency { steps: curves.len() });
					}
					break;
				}
				Some(&record) => {
					self.visit(record);
					side = side.other();
					position = self.records[record].curve_ref(side);
				}
			}
		}

		Ok(Contour::from_curves_unchecked(curves))
	}
}
