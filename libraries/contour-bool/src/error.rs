use thiserror::Error;

/// The error type used by the contour Boolean operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BooleanError {
	#[error("Degenerate input geometry: {reason}")]
	DegenerateInput { reason: String },

	#[error("Contour is not closed: curve {curve} does not start where the previous curve ends")]
	OpenContour { curve: usize },

	#[error("Newton-Raphson did not converge after {iterations} iterations (residual {residual})")]
	RootSolverDivergence { iterations: usize, residual: f64 },

	#[error("Stitching did not return to its starting intersection within {steps} steps")]
	GeometryInconsistency { steps: usize },

	#[error("Cannot interpolate between shapes of different topology: expected {expected} elements, found {found}")]
	MismatchedTopology { expected: usize, found: usize },

	#[error("Failed to parse path data:\n{0}")]
	PathData(String),
}
