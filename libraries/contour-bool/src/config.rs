use crate::consts::*;

/// Numeric tolerances and work budgets for one Boolean operation.
///
/// The defaults suit shapes in the hundreds-of-units range produced by the primitive constructors and glyph outlines.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BooleanConfig {
	/// Parameter-range width below which a pair of overlapping sub-curves is reported as one intersection.
	pub min_parameter_gap: f64,
	/// Leaf records closer than this on both parameters are linked into the same cluster.
	pub merge_epsilon: f64,
	/// Crossings whose parameter lies this close to 0 or 1 are moved onto the vertex between the two curves.
	pub endpoint_epsilon: f64,
	/// Upper bound on the number of sub-curve pairs examined for a single curve pair.
	pub max_subdivision_pairs: usize,
	pub newton_initial_guess: f64,
	pub newton_tolerance: f64,
	pub newton_max_iterations: usize,
	/// Parameter on the outgoing chopped curve where the start-side sample point is taken.
	pub stitch_sample_t: f64,
}

impl Default for BooleanConfig {
	fn default() -> Self {
		Self {
			min_parameter_gap: DEFAULT_MIN_PARAMETER_GAP,
			merge_epsilon: DEFAULT_MERGE_EPSILON,
			endpoint_epsilon: DEFAULT_ENDPOINT_EPSILON,
			max_subdivision_pairs: DEFAULT_MAX_SUBDIVISION_PAIRS,
			newton_initial_guess: DEFAULT_NEWTON_INITIAL_GUESS,
			newton_tolerance: DEFAULT_NEWTON_TOLERANCE,
			newton_max_iterations: DEFAULT_NEWTON_MAX_ITERATIONS,
			stitch_sample_t: DEFAULT_STITCH_SAMPLE_T,
		}
	}
}
