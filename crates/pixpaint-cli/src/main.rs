//! pixpaint - headless front end for the pixpaint engines
//!
//! Reads a PNG canvas, runs one tool on it and writes the result.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pixpaint_core::{Point, Rgba8};
use pixpaint_ops::FillPattern;
use std::path::PathBuf;

mod codec;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "pixpaint")]
#[command(author, version, about = "Denoise, fill and draw on PNG canvases")]
#[command(long_about = "
Runs the pixpaint tools on PNG images without a window.

Examples:
  pixpaint blank canvas.png --width 640 --height 480
  pixpaint denoise photo.png -o smooth.png --diameter 9
  pixpaint fill canvas.png -o out.png --x 10 --y 10 --color '#ff0000'
  pixpaint rect canvas.png -o out.png --from 20,20 --to 200,120 --pattern horizontal
  pixpaint circle canvas.png -o out.png --center 100,100 --to 140,90 -w 3
  pixpaint enlarge photo.png -o zoom.png --from 50,50 --to 250,200 --scale 2
  pixpaint insert canvas.png logo.png -o out.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Engine settings file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Edge-preserving bilateral denoise
    #[command(visible_alias = "d")]
    Denoise(DenoiseArgs),

    /// Paint-bucket flood fill
    #[command(visible_alias = "f")]
    Fill(FillArgs),

    /// Draw a rectangle
    Rect(RectArgs),

    /// Draw a circle
    Circle(CircleArgs),

    /// Magnify the center of a selection into the selection
    Enlarge(EnlargeArgs),

    /// Composite a second image centered on the canvas
    Insert(InsertArgs),

    /// Create a white canvas
    Blank(BlankArgs),
}

#[derive(Args)]
struct DenoiseArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Window diameter (odd)
    #[arg(long)]
    diameter: Option<u32>,

    /// Color sigma
    #[arg(long)]
    sigma_color: Option<f64>,

    /// Spatial sigma
    #[arg(long)]
    sigma_space: Option<f64>,

    /// Number of filter passes
    #[arg(short, long, default_value = "2")]
    passes: u32,

    /// Run on the calling thread only
    #[arg(long)]
    serial: bool,
}

#[derive(Args)]
struct FillArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Seed column
    #[arg(long, allow_hyphen_values = true)]
    x: i32,

    /// Seed row
    #[arg(long, allow_hyphen_values = true)]
    y: i32,

    /// Fill color (#rrggbb, #rrggbbaa or r,g,b)
    #[arg(short, long, default_value = "#ff0000")]
    color: Rgba8,

    /// Where the target color is sampled (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    reference: Option<Point>,
}

/// Stroke settings shared by the shape commands.
#[derive(Args)]
struct StrokeArgs {
    /// Stroke color (#rrggbb, #rrggbbaa or r,g,b)
    #[arg(short, long, default_value = "#000000")]
    color: Rgba8,

    /// Outline width in pixels
    #[arg(short, long, default_value = "1")]
    width: u32,

    /// Interior pattern: none, horizontal, vertical
    #[arg(short, long, default_value = "none")]
    pattern: FillPattern,

    /// Distance between pattern lines
    #[arg(long)]
    spacing: Option<u32>,
}

#[derive(Args)]
struct RectArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// First corner (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    from: Point,

    /// Opposite corner (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    to: Point,

    #[command(flatten)]
    stroke: StrokeArgs,
}

#[derive(Args)]
struct CircleArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Center (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    center: Point,

    /// Drag end point (X,Y); the radius is the larger axis offset
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    to: Point,

    #[command(flatten)]
    stroke: StrokeArgs,
}

#[derive(Args)]
struct EnlargeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Selection corner (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    from: Point,

    /// Opposite selection corner (X,Y)
    #[arg(long, value_parser = commands::parse_point, allow_hyphen_values = true)]
    to: Point,

    /// Magnification
    #[arg(short, long)]
    scale: Option<f64>,
}

#[derive(Args)]
struct InsertArgs {
    /// Base canvas
    base: PathBuf,

    /// Image placed on top, shrunk to the canvas if larger
    overlay: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct BlankArgs {
    /// Output image
    output: PathBuf,

    /// Canvas width
    #[arg(long, default_value = "800")]
    width: u32,

    /// Canvas height
    #[arg(long, default_value = "600")]
    height: u32,

    /// Canvas color
    #[arg(short, long, default_value = "#ffffff")]
    color: Rgba8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Denoise(args) => commands::denoise::run(args, &config, cli.verbose),
        Commands::Fill(args) => commands::fill::run(args, &config, cli.verbose),
        Commands::Rect(args) => commands::shape::run_rect(args, &config, cli.verbose),
        Commands::Circle(args) => commands::shape::run_circle(args, &config, cli.verbose),
        Commands::Enlarge(args) => commands::enlarge::run(args, &config, cli.verbose),
        Commands::Insert(args) => commands::insert::run(args, cli.verbose),
        Commands::Blank(args) => commands::blank::run(args, cli.verbose),
    }
}
