use crate::consts::STRICT_MAX_ABSOLUTE_DIFFERENCE;
use crate::error::BooleanError;

/// Polynomial with coefficients stored in ascending power order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Polynomial<const N: usize> {
	coeffs: [f64; N],
}

impl<const N: usize> Polynomial<N> {
	pub fn new(value: [f64; N]) -> Polynomial<N> {
		Polynomial { coeffs: value }
	}

	pub fn coeffs(&self) -> &[f64; N] {
		&self.coeffs
	}

	pub fn eval(&self, value: f64) -> f64 {
		self.coeffs.iter().rev().copied().fold(0., |acc, x| acc * value + x)
	}

	pub fn derivative_mut(&mut self) {
		self.coeffs.iter_mut().enumerate().for_each(|(index, x)| *x *= index as f64);
		self.coeffs.rotate_left(1);
	}

	pub fn derivative(&self) -> Polynomial<N> {
		let mut ans = *self;
		ans.derivative_mut();
		ans
	}

	/// Newton-Raphson iteration `t := t - f(t) / f'(t)` starting from `initial_guess`, stopping once `|f(t)| < tolerance`.
	///
	/// The root is not range-checked: on a polynomial with several real roots this may land on any of them.
	/// Fails when the derivative vanishes, the iterate leaves the finite numbers, or `max_iterations` steps pass without converging.
	pub fn solve_newton(&self, initial_guess: f64, tolerance: f64, max_iterations: usize) -> Result<f64, BooleanError> {
		let derivative = self.derivative();

		let mut root = initial_guess;
		let mut residual = self.eval(root);
		let mut iterations = 0;

		while residual.is_nan() || residual.abs() >= tolerance {
			let slope = derivative.eval(root);
			if iterations >= max_iterations || !slope.is_finite() || slope.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
				return Err(BooleanError::RootSolverDivergence { iterations, residual });
			}

			root -= residual / slope;
			residual = self.eval(root);
			iterations += 1;

			if !root.is_finite() {
				return Err(BooleanError::RootSolverDivergence { iterations, residual });
			}
		}

		Ok(root)
	}
}

/// Find `t` such that the cubic with ascending-order `coeffs` evaluates to zero, using Newton-Raphson.
pub fn solve_for_t(coeffs: [f64; 4], initial_guess: f64, tolerance: f64, max_iterations: usize) -> Result<f64, BooleanError> {
	Polynomial::new(coeffs).solve_newton(initial_guess, tolerance, max_iterations)
}
