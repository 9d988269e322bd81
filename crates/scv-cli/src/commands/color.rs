//! Color commands: encoding conversion and color temperature.

use crate::{ConvertArgs, Target, TemperatureArgs};
use anyhow::{Result, anyhow};
use scv_core::Encoding;
use scv_ops::Conversion;
use tracing::debug;

impl From<Target> for Encoding {
    fn from(t: Target) -> Self {
        match t {
            Target::Gray => Encoding::Gray,
            Target::Bgr => Encoding::Bgr,
            Target::Bgra => Encoding::Bgra,
        }
    }
}

/// Finds the conversion from `from` to `to`; `None` when they are equal.
fn conversion(from: Encoding, to: Encoding) -> Result<Option<Conversion>> {
    if from == to {
        return Ok(None);
    }
    Conversion::ALL
        .into_iter()
        .find(|c| c.source() == from && c.target() == to)
        .map(Some)
        .ok_or_else(|| anyhow!("cannot convert {from} to {to}"))
}

pub fn run_convert(args: ConvertArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let target = Encoding::from(args.to);
    let result = match conversion(image.encoding(), target)? {
        Some(c) => {
            debug!(conversion = %c, "convert");
            image.convert_color(c)?
        }
        None => image,
    };
    if verbose > 0 {
        println!("Converted {} to {}", args.input.display(), result.encoding());
    }
    super::save_image(&args.output, &result)
}

pub fn run_temperature(args: TemperatureArgs, verbose: u8) -> Result<()> {
    let image = super::load_image(&args.input)?;
    if verbose > 0 {
        println!("Applying {}K at strength {} to {}", args.kelvin, args.strength, super::describe(&image));
    }
    let result = image.color_temperature(args.kelvin, args.strength)?;
    super::save_image(&args.output, &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{load_image, testing::sample_png};

    #[test]
    fn test_conversion_lookup() {
        assert_eq!(conversion(Encoding::Bgr, Encoding::Gray).unwrap(), Some(Conversion::BgrToGray));
        assert_eq!(conversion(Encoding::Gray, Encoding::Bgra).unwrap(), Some(Conversion::GrayToBgra));
        assert_eq!(conversion(Encoding::Bgr, Encoding::Bgr).unwrap(), None);
        assert!(conversion(Encoding::Float, Encoding::Gray).is_err());
    }

    #[test]
    fn test_convert_to_gray() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_png(dir.path(), 3, 2);
        let output = dir.path().join("gray.png");
        let args = ConvertArgs {
            input,
            output: output.clone(),
            to: Target::Gray,
        };
        run_convert(args, 0).unwrap();
        let back = load_image(&output).unwrap();
        assert_eq!((back.dims(), back.encoding()), ((3, 2), Encoding::Gray));
    }

    #[test]
    fn test_temperature_range_checked() {
        let dir = tempfile::tempdir().unwrap();
        let input = sample_png(dir.path(), 2, 2);
        let args = TemperatureArgs {
            input,
            output: dir.path().join("warm.png"),
            kelvin: 500.0,
            strength: 1.0,
        };
        let err = run_temperature(args, 0).unwrap_err();
        assert!(err.to_string().contains("1000K"), "{err}");
    }
}
