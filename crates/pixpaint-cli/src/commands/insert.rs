//! Insert command
//!
//! Composites a second image centered on the base canvas.

use crate::InsertArgs;
use anyhow::Result;
use pixpaint_ops::insert_centered;
use tracing::{info, trace};

pub fn run(args: InsertArgs, verbose: u8) -> Result<()> {
    trace!(base = %args.base.display(), overlay = %args.overlay.display(), "insert::run");

    let mut canvas = super::load_image(&args.base)?;
    let overlay = super::load_image(&args.overlay)?;
    let placed = insert_centered(&mut canvas, &overlay);
    info!(?placed, overlay = ?overlay.dimensions(), "Insert");

    if verbose > 0 {
        match placed {
            Some(area) => println!("Inserted {} at {}", args.overlay.display(), area),
            None => println!("Nothing to insert, image unchanged"),
        }
    }

    super::save_image(&args.output, &canvas)
}
