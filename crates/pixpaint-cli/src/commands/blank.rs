//! Blank command
//!
//! Writes a solid canvas (white unless told otherwise).

use crate::BlankArgs;
use anyhow::{ensure, Result};
use pixpaint_core::PixelBuffer;
use tracing::trace;

pub fn run(args: BlankArgs, verbose: u8) -> Result<()> {
    trace!(output = %args.output.display(), w = args.width, h = args.height, "blank::run");
    ensure!(args.width > 0 && args.height > 0, "canvas must be at least 1x1");

    let mut canvas = PixelBuffer::blank(args.width, args.height);
    canvas.clear(args.color);
    super::save_image(&args.output, &canvas)?;

    if verbose > 0 {
        println!("Created {}x{} canvas {}", args.width, args.height, args.output.display());
    }
    Ok(())
}
