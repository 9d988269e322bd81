//! Resize command

use crate::ResizeArgs;
use anyhow::{Result, bail};
use scv_ops::SizeSpec;
use tracing::info;

fn size_spec(args: &ResizeArgs) -> Result<SizeSpec> {
    Ok(match (args.width, args.height, args.scale) {
        (Some(width), Some(height), _) => SizeSpec::Size { width, height },
        (Some(width), None, _) => SizeSpec::Width(width),
        (None, Some(height), _) => SizeSpec::Height(height),
        (None, None, Some(scale)) => SizeSpec::Scale(scale),
        (None, None, None) => bail!("one of --width, --height or --scale is required"),
    })
}

pub fn run(args: ResizeArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let spec = size_spec(&args)?;
    let result = image.resize(spec)?;
    info!(from = %super::describe(&image), to = %super::describe(&result), "resized");
    if verbose > 0 {
        println!("Resized {} -> {}", super::describe(&image), super::describe(&result));
    }
    super::save_image(&args.output, &result)
}
