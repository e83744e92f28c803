use crate::vector::Point;

/// Axis-aligned bounding box. `top` is the smaller y value.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
	pub left: f64,
}

impl Aabb {
	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	pub fn height(&self) -> f64 {
		self.bottom - self.top
	}

	pub fn max_extent(&self) -> f64 {
		self.width().max(self.height())
	}

	pub fn contains_point(&self, point: Point) -> bool {
		point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
	}

	/// Returns true if every side is within `max_abs_diff` of the same side of `other`.
	pub fn abs_diff_eq(&self, other: &Aabb, max_abs_diff: f64) -> bool {
		[(self.top, other.top), (self.right, other.right), (self.bottom, other.bottom), (self.left, other.left)]
			.into_iter()
			.all(|(a, b)| (a - b).abs() <= max_abs_diff)
	}
}

pub fn bounding_boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
	a.left <= b.right && b.left <= a.right && a.top <= b.bottom && b.top <= a.bottom
}

pub fn merge_bounding_boxes(a: Option<Aabb>, b: &Aabb) -> Aabb {
	match a {
		Some(a) => Aabb {
			top: a.top.min(b.top),
			right: a.right.max(b.right),
			bottom: a.bottom.max(b.bottom),
			left: a.left.min(b.left),
		},
		None => *b,
	}
}
