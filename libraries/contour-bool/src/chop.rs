use crate::intersection::{IntersectionRecord, ShapeSide};
use crate::shape::{Contour, Shape};
use crate::vector::Point;

use rustc_hash::FxHashMap;

/// Maps an intersection record index to the index of the chopped curve that starts at that intersection.
pub type IndexMap = FxHashMap<usize, usize>;

/// A request to split one curve of a contour at `t`, on behalf of intersection record `record`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChopPoint {
	pub record: usize,
	pub curve: usize,
	pub t: f64,
	/// Where the new vertex is placed. Both shapes snap to this same point so stitched contours close exactly.
	pub point: Point,
}

/// Splits the curves of `contour` at every chop point, keeping curve order.
///
/// Each curve becomes one more piece than it has chop points inside `(0, 1)`. A chop point at `t = 0` sits on the
/// vertex where its curve starts, so it adds no piece; the curves meeting there are snapped to its point instead.
/// The returned map gives, for every chop point's record, the index of the piece that begins at that chop point.
pub fn chop_at_intersections(contour: &Contour, chop_points: &[ChopPoint]) -> (Contour, IndexMap) {
	let mut by_curve = vec![Vec::new(); contour.len()];
	for chop_point in chop_points {
		if let Some(points) = by_curve.get_mut(chop_point.curve) {
			points.push(*chop_point);
		}
	}

	let mut curves = Vec::with_capacity(contour.len() + chop_points.len());
	let mut index_map = IndexMap::default();
	let mut vertices = Vec::new();

	for (curve, mut points) in contour.iter().zip(by_curve) {
		if points.is_empty() {
			curves.push(*curve);
			continue;
		}
		points.sort_by(|a, b| a.t.total_cmp(&b.t));

		let mut previous_t = 0.;
		let mut previous_point = None;
		for chop_point in &points {
			if chop_point.t <= 0. {
				index_map.insert(chop_point.record, curves.len());
				vertices.push((curves.len(), chop_point.point));
				continue;
			}

			let mut piece = curve.sub_curve(previous_t, chop_point.t);
			if let Some(start) = previous_point {
				piece = piece.with_start(start);
			}
			curves.push(piece.with_end(chop_point.point));
			index_map.insert(chop_point.record, curves.len());

			previous_t = chop_point.t;
			previous_point = Some(chop_point.point);
		}

		let tail = match previous_point {
			Some(start) => curve.sub_curve(previous_t, 1.).with_start(start),
			None => *curve,
		};
		curves.push(tail);
	}

	let count = curves.len();
	for (index, point) in vertices {
		curves[index] = curves[index].with_start(point);
		let previous = (index + count - 1) % count;
		curves[previous] = curves[previous].with_end(point);
	}

	(Contour::from_curves_unchecked(curves), index_map)
}

/// The chop points `records` place on contour `contour` of the given side.
pub fn chop_points_for(records: &[IntersectionRecord], side: ShapeSide, contour: usize) -> Vec<ChopPoint> {
	records
		.iter()
		.enumerate()
		.filter(|(_, record)| record.curve_ref(side).contour == contour)
		.map(|(index, record)| ChopPoint {
			record: index,
			curve: record.curve_ref(side).curve,
			t: record.t(side),
			point: record.point,
		})
		.collect()
}

/// Chops every contour of `shape` at the records' intersections on `side`. Returns one index map per contour.
pub fn chop_shape(shape: &Shape, records: &[IntersectionRecord], side: ShapeSide) -> (Shape, Vec<IndexMap>) {
	let (contours, index_maps): (Vec<_>, Vec<_>) = shape
		.iter()
		.enumerate()
		.map(|(contour_index, contour)| chop_at_intersections(contour, &chop_points_for(records, side, contour_index)))
		.unzip();
	(Shape::new(contours), index_maps)
}

/// New records whose curve references point into the chopped shapes. Record indices stay the same.
///
/// Returns `None` if some record has no entry in the index map of its contour.
pub fn remap_records(records: &[IntersectionRecord], maps_a: &[IndexMap], maps_b: &[IndexMap]) -> Option<Vec<IntersectionRecord>> {
	records
		.iter()
		.enumerate()
		.map(|(index, record)| {
			let mut remapped = *record;
			remapped.a.curve = *maps_a.get(record.a.contour)?.get(&index)?;
			remapped.b.curve = *maps_b.get(record.b.contour)?.get(&index)?;
			Some(remapped)
		})
		.collect()
}
