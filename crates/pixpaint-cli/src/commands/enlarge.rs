//! Enlarge command
//!
//! Replays a select-and-release gesture on the enlarge tool.

use crate::EnlargeArgs;
use anyhow::Result;
use pixpaint_ops::{EngineConfig, EnlargeTool};
use tracing::{info, trace};

pub fn run(args: EnlargeArgs, config: &EngineConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), from = %args.from, to = %args.to, "enlarge::run");

    let mut tool = match args.scale {
        Some(scale) => EnlargeTool::new(scale)?,
        None => config.enlarge_tool()?,
    };
    let mut image = super::load_image(&args.input)?;

    tool.pointer_down(args.from, &image);
    tool.pointer_move(args.to);
    let selection = tool.pointer_up(args.to, &mut image)?;
    info!(?selection, scale = tool.scale(), "Enlarge");

    if verbose > 0 {
        match selection {
            Some(sel) => println!("Enlarged {} by {}", sel, tool.scale()),
            None => println!("Selection is empty, image unchanged"),
        }
    }

    super::save_image(&args.output, &image)
}
