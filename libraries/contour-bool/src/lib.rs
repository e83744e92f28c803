//! Contour-bool: Boolean union and intersection of multi-contour cubic Bézier shapes
mod aabb;
mod boolean;
mod chop;
mod config;
pub mod consts;
mod containment;
mod cubic;
mod error;
mod intersection;
mod path_data;
mod polynomial;
mod shape;
mod vector;

pub use aabb::Aabb;
pub use boolean::{BooleanOperation, intersection, shape_boolean, union};
pub use chop::{ChopPoint, IndexMap, chop_at_intersections, chop_points_for, chop_shape, remap_records};
pub use config::BooleanConfig;
pub use containment::{Containment, classify_contour, crossing_y, is_inside, is_inside_shape};
pub use cubic::CubicCurve;
pub use error::BooleanError;
pub use intersection::{
	ContourIntersection, CurveIntersection, CurveRef, IntersectionRecord, ShapeSide, find_contour_intersections, find_curve_intersections, find_curve_intersections_in_ranges,
	find_shape_intersections,
};
#[cfg(feature = "parsing")]
pub use path_data::shape_from_path_data;
pub use polynomial::{Polynomial, solve_for_t};
pub use shape::{Contour, Shape};
pub use vector::Point;
