//! Prints a decoded image as a JSON matrix record.

use crate::DumpArgs;
use anyhow::Result;
use scv_compute::Matrix;
use serde_json::{Value, json};

/// `{width, height, type, data}` with channel-planar data, the same shape
/// the JSON constructor accepts.
pub fn to_json(m: &Matrix) -> Value {
    let (width, height) = m.dims();
    json!({
        "width": width,
        "height": height,
        "type": m.encoding().name(),
        "data": m.to_vec(),
    })
}

pub fn run(args: DumpArgs) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let value = to_json(&image);
    let text = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{text}");
    Ok(())
}
