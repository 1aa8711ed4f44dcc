//! Fill command
//!
//! Paint-bucket fill from a seed point.

use crate::FillArgs;
use anyhow::Result;
use pixpaint_core::Point;
use pixpaint_ops::{flood, EngineConfig};
use tracing::{info, trace};

pub fn run(args: FillArgs, config: &EngineConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), x = args.x, y = args.y, "fill::run");

    let mut image = super::load_image(&args.input)?;
    let seed = Point::new(args.x, args.y);
    let reference = args.reference.unwrap_or_else(|| config.fill_reference());

    let stats = flood::fill_canvas(&mut image, seed, args.color, reference);
    info!(%seed, %reference, painted = stats.painted, "Flood fill");

    if verbose > 0 {
        match stats.bounds {
            Some(bounds) => println!("Filled {} pixels in {}", stats.painted, bounds),
            None => println!("Nothing to fill at {seed}"),
        }
    }

    super::save_image(&args.output, &image)
}
