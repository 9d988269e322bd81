//! Image info command.

use crate::InfoArgs;
use anyhow::Result;
use std::fs;

/// Prints size, encoding and file size of every input.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let image = super::load_image(path)?;
        let (w, h) = image.dims();
        println!("{}", path.display());
        println!("  Resolution: {w}x{h}");
        println!("  Encoding:   {}", image.encoding());
        println!("  Channels:   {}", image.channels());
        if verbose > 0 {
            let size = fs::metadata(path)?.len();
            println!("  File size:  {size} bytes");
            println!("  Pixels:     {}", w as u64 * h as u64);
        }
        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}
