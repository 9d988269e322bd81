//! Blur command
//!
//! Gaussian blur with a square kernel.

use crate::BlurArgs;
use anyhow::Result;
use scv_ops::{BlurOptions, KernelSize};
use tracing::{debug, trace};

pub fn run(args: BlurArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), kernel = args.kernel, sigma = args.sigma, "blur::run");
    let image = super::load_image(&args.input)?;
    let options = BlurOptions {
        kernel_size: KernelSize::Square(args.kernel),
        sigma: Some(args.sigma),
        ..BlurOptions::default()
    };
    debug!(?options, "blur options");
    if verbose > 0 {
        println!("Applying gaussian blur (k={}, sigma={}) to {}", args.kernel, args.sigma, args.input.display());
    }
    let result = image.gaussian_blur(options)?;
    super::save_image(&args.output, &result)
}
