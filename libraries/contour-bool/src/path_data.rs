use crate::consts::{SVG_ARG_CLOSE, SVG_ARG_CUBIC, SVG_ARG_MOVE};
use crate::shape::{Contour, Shape};

#[cfg(feature = "parsing")]
pub use parsing::shape_from_path_data;

impl Contour {
	/// `M x,y C x1,y1 x2,y2 x,y ... Z`, the move-to and cubic-curve-to commands a renderer draws a contour with.
	pub fn to_path_data(&self) -> String {
		let Some(first) = self.curves().first() else {
			return String::new();
		};

		let mut path = format!("{SVG_ARG_MOVE} {},{}", first.start.x, first.start.y);
		for curve in self {
			path.push_str(&format!(
				" {SVG_ARG_CUBIC} {},{} {},{} {},{}",
				curve.handle_start.x, curve.handle_start.y, curve.handle_end.x, curve.handle_end.y, curve.end.x, curve.end.y
			));
		}
		path.push(' ');
		path.push_str(SVG_ARG_CLOSE);
		path
	}
}

impl Shape {
	/// One closed subpath per contour.
	pub fn to_path_data(&self) -> String {
		self.iter().map(Contour::to_path_data).filter(|path| !path.is_empty()).collect::<Vec<_>>().join(" ")
	}
}

#[cfg(feature = "parsing")]
mod parsing {
	use crate::consts::MAX_ABSOLUTE_DIFFERENCE;
	use crate::cubic::CubicCurve;
	use crate::error::BooleanError;
	use crate::shape::{Contour, Shape};
	use crate::vector::{Point, vectors_equal};

	use regex::Regex;
	use std::sync::LazyLock;

	const TOKEN_PATTERN: &str = r"[MmLlHhVvCcQqZz]|[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

	/// Compiled once per process and shared by every parse.
	static TOKEN_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(TOKEN_PATTERN));

	#[derive(Clone, Copy, Debug, PartialEq)]
	enum Token {
		Command(char),
		Number(f64),
	}

	fn path_data_error(message: impl Into<String>) -> BooleanError {
		BooleanError::PathData(message.into())
	}

	fn tokenize(data: &str) -> Result<Vec<Token>, BooleanError> {
		let token_regex = TOKEN_REGEX.as_ref().map_err(|error| path_data_error(error.to_string()))?;

		let is_separator = |text: &str| text.chars().all(|character| character.is_whitespace() || character == ',');
		let mut tokens = Vec::new();
		let mut previous_end = 0;

		for found in token_regex.find_iter(data) {
			if !is_separator(&data[previous_end..found.start()]) {
				return Err(path_data_error(format!("Unexpected {:?} at byte {previous_end}", data[previous_end..found.start()].trim())));
			}
			previous_end = found.end();

			let text = found.as_str();
			let token = match text.chars().next() {
				Some(letter) if letter.is_ascii_alphabetic() => Token::Command(letter),
				_ => Token::Number(text.parse().map_err(|_| path_data_error(format!("Invalid number {text:?}")))?),
			};
			tokens.push(token);
		}

		if !is_separator(&data[previous_end..]) {
			return Err(path_data_error(format!("Unexpected {:?} at byte {previous_end}", data[previous_end..].trim())));
		}

		Ok(tokens)
	}

	#[derive(Default)]
	struct ContourBuilder {
		contours: Vec<Contour>,
		curves: Vec<CubicCurve>,
		start: Point,
		current: Point,
	}

	impl ContourBuilder {
		fn move_to(&mut self, point: Point) -> Result<(), BooleanError> {
			self.close()?;
			self.start = point;
			self.current = point;
			Ok(())
		}

		fn push(&mut self, curve: CubicCurve) {
			self.current = curve.end;
			self.curves.push(curve);
		}

		fn line_to(&mut self, point: Point) {
			self.push(CubicCurve::from_line(self.current, point));
		}

		/// Ends the current subpath with a straight edge back to its start if it does not already return there.
		fn close(&mut self) -> Result<(), BooleanError> {
			if !self.curves.is_empty() {
				if vectors_equal(self.current, self.start, MAX_ABSOLUTE_DIFFERENCE) {
					if let Some(last) = self.curves.last_mut() {
						*last = last.with_end(self.start);
					}
				} else {
					self.line_to(self.start);
				}
				self.contours.push(Contour::new(std::mem::take(&mut self.curves))?);
			}
			self.current = self.start;
			Ok(())
		}

		fn finish(mut self) -> Result<Shape, BooleanError> {
			self.close()?;
			Ok(Shape::new(self.contours))
		}
	}

	struct TokenStream {
		tokens: Vec<Token>,
		position: usize,
	}

	impl TokenStream {
		fn peek(&self) -> Option<Token> {
			self.tokens.get(self.position).copied()
		}

		fn number(&mut self, command: char) -> Result<f64, BooleanError> {
			match self.peek() {
				Some(Token::Number(value)) => {
					self.position += 1;
					Ok(value)
				}
				_ => Err(path_data_error(format!("Missing number for command '{command}'"))),
			}
		}

		fn point(&mut self, command: char, base: Point) -> Result<Point, BooleanError> {
			Ok(base + Point::new(self.number(command)?, self.number(command)?))
		}
	}

	/// Parses SVG path data made of `M`, `L`, `H`, `V`, `C`, `Q` and `Z` commands, absolute or relative.
	///
	/// Lines and quadratics become cubic curves and every subpath becomes one closed contour, with a straight edge
	/// added when it does not end where it started.
	pub fn shape_from_path_data(data: &str) -> Result<Shape, BooleanError> {
		let mut tokens = TokenStream { tokens: tokenize(data)?, position: 0 };
		let mut builder = ContourBuilder::default();
		let mut repeated: Option<char> = None;

		while let Some(token) = tokens.peek() {
			let command = match token {
				Token::Command(command) => {
					tokens.position += 1;
					command
				}
				Token::Number(value) => repeated.ok_or_else(|| path_data_error(format!("Number {value} without a command")))?,
			};

			if repeated.is_none() && !matches!(command, 'M' | 'm') {
				return Err(path_data_error(format!("Path data must start with a move command, found '{command}'")));
			}

			let base = if command.is_ascii_lowercase() { builder.current } else { Point::ZERO };
			let current = builder.current;

			repeated = Some(command);
			match command.to_ascii_uppercase() {
				'M' => {
					let point = tokens.point(command, base)?;
					builder.move_to(point)?;
					// Coordinate pairs after a move are implicit line commands
					repeated = Some(if command == 'm' { 'l' } else { 'L' });
				}
				'L' => {
					let point = tokens.point(command, base)?;
					builder.line_to(point);
				}
				'H' => {
					let x = tokens.number(command)? + base.x;
					builder.line_to(Point::new(x, current.y));
				}
				'V' => {
					let y = tokens.number(command)? + base.y;
					builder.line_to(Point::new(current.x, y));
				}
				'C' => {
					let handle_start = tokens.point(command, base)?;
					let handle_end = tokens.point(command, base)?;
					let end = tokens.point(command, base)?;
					builder.push(CubicCurve::new(current, handle_start, handle_end, end));
				}
				'Q' => {
					let handle = tokens.point(command, base)?;
					let end = tokens.point(command, base)?;
					builder.push(CubicCurve::from_quadratic(current, handle, end));
				}
				'Z' => {
					builder.close()?;
					// Only a new command may follow a close
					repeated = Some('z');
					if let Some(Token::Number(value)) = tokens.peek() {
						return Err(path_data_error(format!("Unexpected number {value} after close command")));
					}
				}
				_ => return Err(path_data_error(format!("Unsupported command '{command}'"))),
			}
		}

		builder.finish()
	}

	#[cfg(test)]
	mod tests {
		use super::*;
		use pretty_assertions::assert_eq;

		#[test]
		fn token_pattern_compiles_once() {
			assert!(TOKEN_REGEX.is_ok());
			assert_eq!(tokenize("M 1,2").unwrap(), tokenize("M1 2").unwrap());
			assert_eq!(tokenize("z").unwrap(), vec![Token::Command('z')]);
		}

		#[test]
		fn triangle() {
			let shape = shape_from_path_data("M 0,0 L 10,0 L 0,10 Z").unwrap();

			assert_eq!(shape.len(), 1);
			assert_eq!(shape.contours()[0].len(), 3);
			assert!((shape.contours()[0].signed_area() - 50.).abs() < 1e-9);
		}

		#[test]
		fn relative_and_axis_commands() {
			let shape = shape_from_path_data("m 10 10 h 20 v 20 h -20 z").unwrap();

			assert_eq!(shape.contours()[0].len(), 4);
			assert_eq!(shape.contours()[0].curves()[1].end, Point::new(30., 30.));
			assert!((shape.area() - 400.).abs() < 1e-9);
		}

		#[test]
		fn implicit_commands_and_compact_numbers() {
			let shape = shape_from_path_data("M0,0 10,0 10,10 0,10z").unwrap();
			assert_eq!(shape.contours()[0].len(), 4);

			let shape = shape_from_path_data("M1e1,0L-5.5e-1.5-1,-1Z").unwrap();
			let points = shape.contours()[0].iter().map(|curve| curve.start).collect::<Vec<_>>();
			assert_eq!(points, vec![Point::new(10., 0.), Point::new(-0.55, 0.5), Point::new(-1., -1.)]);
		}

		#[test]
		fn relative_commands_after_close_start_from_the_subpath_start() {
			let shape = shape_from_path_data("M 10,10 l 10,0 l 0,10 z m 5,0 l 1,0 l 0,1 z").unwrap();

			assert_eq!(shape.len(), 2);
			assert_eq!(shape.contours()[1].curves()[0].start, Point::new(15., 10.));
		}

		#[test]
		fn unclosed_subpaths_are_closed() {
			let shape = shape_from_path_data("M 0 0 L 10 0 L 0 10 M 20 20 L 30 20 L 20 30").unwrap();

			assert_eq!(shape.len(), 2);
			for contour in &shape {
				assert_eq!(contour.len(), 3);
				assert!(contour.is_closed());
			}
		}

		#[test]
		fn curves() {
			let shape = shape_from_path_data("M0,0 Q50,100 100,0 C 100,-50 0,-50 0,0 Z").unwrap();
			let contour = &shape.contours()[0];

			assert_eq!(contour.len(), 2);
			assert!(vectors_equal(contour.curves()[0].evaluate(0.5), Point::new(50., 50.), 1e-9));
			assert_eq!(contour.curves()[1], CubicCurve::from_coordinates(100., 0., 100., -50., 0., -50., 0., 0.));
		}

		#[test]
		fn empty_input() {
			assert!(shape_from_path_data("").unwrap().is_empty());
			assert!(shape_from_path_data("M 5,5 Z").unwrap().is_empty());
		}

		#[test]
		fn malformed_input() {
			assert!(matches!(shape_from_path_data("L 10 10"), Err(BooleanError::PathData(_))));
			assert!(matches!(shape_from_path_data("10 10"), Err(BooleanError::PathData(_))));
			assert!(matches!(shape_from_path_data("M 0,0 X 5"), Err(BooleanError::PathData(_))));
			assert!(matches!(shape_from_path_data("M 0,0 A 5 5 0 0 1 10 10"), Err(BooleanError::PathData(_))));
			assert!(matches!(shape_from_path_data("M 0"), Err(BooleanError::PathData(_))));
			assert!(matches!(shape_from_path_data("M 0,0 L 1,1 Z 4"), Err(BooleanError::PathData(_))));
		}

		#[test]
		fn output_parses_back() {
			let circle = Shape::circle(Point::new(3., -7.), 200.);
			let parsed = shape_from_path_data(&circle.to_path_data()).unwrap();

			assert_eq!(parsed.len(), 1);
			for (a, b) in parsed.contours()[0].iter().zip(circle.contours()[0].iter()) {
				assert!(a.abs_diff_eq(b, 1e-9));
			}
		}
	}
}
