use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use contour_bool::{BooleanConfig, BooleanOperation, find_shape_intersections, shape_boolean, shape_from_path_data};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Operation {
	/// Region covered by either shape
	Union,
	/// Region covered by both shapes
	Intersection,
}

impl From<Operation> for BooleanOperation {
	fn from(operation: Operation) -> Self {
		match operation {
			Operation::Union => BooleanOperation::Union,
			Operation::Intersection => BooleanOperation::Intersection,
		}
	}
}

#[derive(Parser)]
#[command(name = "contour-bool-cli")]
#[command(about = "Combine two shapes given as SVG path data (M, L, H, V, C, Q, Z commands)")]
struct Args {
	/// Boolean operation to apply
	#[arg(value_enum)]
	operation: Operation,

	/// Path data of shape A
	path_a: String,

	/// Path data of shape B
	path_b: String,

	/// RON file overriding the default tolerances, e.g. `(merge_epsilon: 0.01)`
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Print the intersection records instead of the resulting path data
	#[arg(short, long)]
	intersections: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<BooleanConfig> {
	let Some(path) = path else {
		return Ok(BooleanConfig::default());
	};
	let text = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
	ron::from_str(&text).with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn main() -> Result<()> {
	env_logger::init();
	let args = Args::parse();

	let config = load_config(args.config.as_ref())?;
	log::debug!("Using {config:?}");

	let a = shape_from_path_data(&args.path_a).context("Invalid path data for shape A")?;
	let b = shape_from_path_data(&args.path_b).context("Invalid path data for shape B")?;

	if args.intersections {
		for (index, record) in find_shape_intersections(&a, &b, &config).iter().enumerate() {
			println!(
				"{index}: A contour {} curve {} t={:.6}, B contour {} curve {} t={:.6}, at {},{}",
				record.a.contour, record.a.curve, record.t_a, record.b.contour, record.b.curve, record.t_b, record.point.x, record.point.y
			);
		}
		return Ok(());
	}

	let result = shape_boolean(&a, &b, args.operation.into(), &config).with_context(|| format!("{:?} failed", args.operation))?;
	println!("{}", result.to_path_data());

	Ok(())
}
