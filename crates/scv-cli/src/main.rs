//! scv - pixel-matrix operations on image files
//!
//! Each subcommand reads an image, applies one operation and writes the
//! result.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "scv")]
#[command(author, version, about = "Pixel-matrix image operations")]
#[command(long_about = "
Applies one pixel-matrix operation to a PNG or JPEG file.

Examples:
  scv info photo.jpg                        # Size and encoding
  scv resize photo.jpg -o small.png -w 320  # Keep aspect ratio
  scv resize photo.jpg -o half.png -s 0.5
  scv blur photo.jpg -o soft.png -k 5 --sigma 1.5
  scv rotate photo.jpg -o tilted.png --angle 30
  scv flip photo.jpg -o mirror.png --axis lr
  scv crop photo.jpg -o face.png 40 20 128 128
  scv convert photo.jpg -o gray.png --to gray
  scv temperature photo.jpg -o warm.png --kelvin 3200 --strength 0.5
  scv dump tiny.png                         # Matrix as JSON
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
}

#[derive(Subcommand)]
enum Commands {
    /// Display image size and encoding
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Resize by width, height or scale
    #[command(visible_alias = "r")]
    Resize(ResizeArgs),

    /// Gaussian blur
    Blur(BlurArgs),

    /// Rotate about the image center
    Rotate(RotateArgs),

    /// Mirror horizontally or vertically
    Flip(FlipArgs),

    /// Copy out a rectangle
    Crop(CropArgs),

    /// Convert between Gray, BGR and BGRA
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Shift colors toward a color temperature
    Temperature(TemperatureArgs),

    /// Print the decoded matrix as JSON
    Dump(DumpArgs),
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input images
    #[arg(required = true)]
    input: Vec<PathBuf>,
}

/// Arguments for the `resize` command.
#[derive(Args)]
#[command(group(clap::ArgGroup::new("size").required(true).args(["width", "height", "scale"])))]
struct ResizeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Target width
    #[arg(short, long)]
    width: Option<i64>,

    /// Target height
    #[arg(short = 'H', long)]
    height: Option<i64>,

    /// Scale factor
    #[arg(short, long)]
    scale: Option<f64>,
}

/// Arguments for the `blur` command.
#[derive(Args)]
struct BlurArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Kernel size (odd)
    #[arg(short = 'k', long, default_value = "3")]
    kernel: i64,

    /// Gaussian sigma (0 = derived from the kernel size)
    #[arg(long, default_value = "0")]
    sigma: f64,
}

/// Arguments for the `rotate` command.
#[derive(Args)]
struct RotateArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Rotation angle in degrees (counter-clockwise)
    #[arg(short, long, allow_negative_numbers = true)]
    angle: f64,
}

/// Flip direction.
#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    /// Left-right (mirror columns)
    Lr,
    /// Up-down (mirror rows)
    Ud,
}

/// Arguments for the `flip` command.
#[derive(Args)]
struct FlipArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Flip axis
    #[arg(long, value_enum, default_value = "lr")]
    axis: Axis,
}

/// Arguments for the `crop` command.
#[derive(Args)]
struct CropArgs {
    /// Input image
    input: PathBuf,

    /// Left column
    x: f64,

    /// Top row
    y: f64,

    /// Width
    w: f64,

    /// Height
    h: f64,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

/// Target encoding for `convert`.
#[derive(Clone, Copy, ValueEnum)]
enum Target {
    /// Single channel
    Gray,
    /// Three channels
    Bgr,
    /// Four channels
    Bgra,
}

/// Arguments for the `convert` command.
#[derive(Args)]
struct ConvertArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Target encoding
    #[arg(long)]
    to: Target,
}

/// Arguments for the `temperature` command.
#[derive(Args)]
struct TemperatureArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Color temperature in Kelvin (1000-40000)
    #[arg(short, long, default_value = "6500")]
    kelvin: f64,

    /// Blend strength (0-1)
    #[arg(short, long, default_value = "1")]
    strength: f64,
}

/// Arguments for the `dump` command.
#[derive(Args)]
struct DumpArgs {
    /// Input image
    input: PathBuf,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Resize(args) => commands::resize::run(args, cli.verbose),
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::Rotate(args) => commands::transform::run_rotate(args, cli.verbose),
        Commands::Flip(args) => commands::transform::run_flip(args, cli.verbose),
        Commands::Crop(args) => commands::transform::run_crop(args, cli.verbose),
        Commands::Convert(args) => commands::color::run_convert(args, cli.verbose),
        Commands::Temperature(args) => commands::color::run_temperature(args, cli.verbose),
        Commands::Dump(args) => commands::dump::run(args),
    }
}
