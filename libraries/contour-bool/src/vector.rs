use glam::DVec2;

pub type Point = DVec2;

pub fn vectors_equal(a: Point, b: Point, eps: f64) -> bool {
	a.abs_diff_eq(b, eps)
}
