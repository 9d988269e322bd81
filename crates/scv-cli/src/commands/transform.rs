//! Geometric commands: rotate, flip and crop.

use crate::{Axis, CropArgs, FlipArgs, RotateArgs};
use anyhow::Result;
use scv_core::Rect;
use scv_ops::RotateSpec;
use tracing::info;

/// Rotates about the image center; uncovered pixels become black.
pub fn run_rotate(args: RotateArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    if verbose > 0 {
        println!("Rotating {} by {}°", super::describe(&image), args.angle);
    }
    let result = image.rotate(RotateSpec::Angle(args.angle))?;
    super::save_image(&args.output, &result)
}

pub fn run_flip(args: FlipArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let result = match args.axis {
        Axis::Lr => image.flip_left_right()?,
        Axis::Ud => image.flip_up_down()?,
    };
    if verbose > 0 {
        println!("Flipped {}", args.input.display());
    }
    super::save_image(&args.output, &result)
}

pub fn run_crop(args: CropArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let rect = Rect::new(args.x, args.y, args.w, args.h);
    info!(?rect, source = %super::describe(&image), "crop");
    if verbose > 0 {
        println!("Cropping {}x{} @ ({},{}) from {}", args.w, args.h, args.x, args.y, super::describe(&image));
    }
    let result = image.crop(rect)?;
    super::save_image(&args.output, &result)
}
