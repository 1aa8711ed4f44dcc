//! Denoise command
//!
//! Runs the bilateral filter one or more times. Flags override the
//! `filter` section of the config file.

use crate::DenoiseArgs;
use anyhow::Result;
use pixpaint_ops::bilateral;
use pixpaint_ops::{CancelToken, EngineConfig};
use tracing::{info, trace};

pub fn run(args: DenoiseArgs, config: &EngineConfig, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), passes = args.passes, serial = args.serial, "denoise::run");

    let mut cfg = *config;
    if let Some(d) = args.diameter {
        cfg.filter.diameter = d;
    }
    if let Some(s) = args.sigma_color {
        cfg.filter.sigma_color = s;
    }
    if let Some(s) = args.sigma_space {
        cfg.filter.sigma_space = s;
    }
    let params = cfg.filter_params()?;

    let image = super::load_image(&args.input)?;
    info!(
        w = image.width(),
        h = image.height(),
        diameter = params.diameter(),
        sigma_color = params.sigma_color(),
        sigma_space = params.sigma_space(),
        passes = args.passes,
        "Applying bilateral filter"
    );

    if verbose > 0 {
        println!(
            "Denoising {} (d={}, sigma_color={}, sigma_space={}, passes={})",
            args.input.display(),
            params.diameter(),
            params.sigma_color(),
            params.sigma_space(),
            args.passes
        );
    }

    let token = CancelToken::new();
    let output = if args.serial {
        let mut current = image;
        for _ in 0..args.passes {
            current = bilateral::apply_cancellable(&current, &params, &token)?;
        }
        current
    } else {
        bilateral::apply_passes(&image, &params, args.passes, &token)?
    };

    super::save_image(&args.output, &output)?;

    if verbose > 0 {
        println!("Done.");
    }

    Ok(())
}
