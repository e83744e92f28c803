// Comparison tolerances
/// Absolute tolerance used when comparing points and curve control points.
pub const MAX_ABSOLUTE_DIFFERENCE: f64 = 1e-6;
/// Tighter tolerance used to decide whether a polynomial coefficient or derivative is effectively zero.
pub const STRICT_MAX_ABSOLUTE_DIFFERENCE: f64 = 1e-12;

// Intersection search
pub const DEFAULT_MIN_PARAMETER_GAP: f64 = 1e-4;
pub const DEFAULT_MERGE_EPSILON: f64 = 1e-3;
pub const DEFAULT_ENDPOINT_EPSILON: f64 = 1e-4;
pub const DEFAULT_MAX_SUBDIVISION_PAIRS: usize = 1 << 20;

// Newton-Raphson
pub const DEFAULT_NEWTON_INITIAL_GUESS: f64 = 0.5;
pub const DEFAULT_NEWTON_TOLERANCE: f64 = 1e-5;
pub const DEFAULT_NEWTON_MAX_ITERATIONS: usize = 30;
pub const BISECTION_MAX_ITERATIONS: usize = 64;

// Stitching
pub const DEFAULT_STITCH_SAMPLE_T: f64 = 0.5;

// Primitives
pub const DEFAULT_CIRCLE_DETAIL: usize = 8;

// SVG path data
pub const SVG_ARG_MOVE: &str = "M";
pub const SVG_ARG_CUBIC: &str = "C";
pub const SVG_ARG_CLOSE: &str = "Z";
