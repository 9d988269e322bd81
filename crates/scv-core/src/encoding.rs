//! Pixel encodings and channel identities.
//!
//! An [`Encoding`] fixes the channel count and numeric policy of a matrix:
//!
//! | Encoding | Channels | Sample | Id |
//! |----------|----------|--------|----|
//! | Gray     | 1        | `u8`   | 0  |
//! | BGR      | 3        | `u8`   | 16 |
//! | BGRA     | 4        | `u8`   | 24 |
//! | Float    | 1        | `f64`  | 6  |
//!
//! 8-bit encodings store every sample modulo 256; Float stores values as-is.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample layout of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// Single 8-bit channel.
    #[default]
    Gray,
    /// Blue, green, red; 8 bits each.
    #[serde(rename = "BGR", alias = "Bgr")]
    Bgr,
    /// Blue, green, red, alpha; 8 bits each.
    #[serde(rename = "BGRA", alias = "Bgra")]
    Bgra,
    /// Single double-precision channel.
    Float,
}

impl Encoding {
    /// All encodings, in id order of declaration.
    pub const ALL: [Encoding; 4] = [Encoding::Gray, Encoding::Bgr, Encoding::Bgra, Encoding::Float];

    /// Number of interleaved channels per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        match self {
            Encoding::Gray | Encoding::Float => 1,
            Encoding::Bgr => 3,
            Encoding::Bgra => 4,
        }
    }

    /// Returns `true` for the 8-bit encodings.
    #[inline]
    pub const fn is_u8(self) -> bool {
        !matches!(self, Encoding::Float)
    }

    /// Stable numeric identifier.
    pub const fn id(self) -> i64 {
        match self {
            Encoding::Gray => 0,
            Encoding::Float => 6,
            Encoding::Bgr => 16,
            Encoding::Bgra => 24,
        }
    }

    /// Looks an encoding up by numeric identifier.
    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.id() == id)
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Encoding::Gray => "Gray",
            Encoding::Bgr => "BGR",
            Encoding::Bgra => "BGRA",
            Encoding::Float => "Float",
        }
    }

    /// Channel identities in storage order.
    pub fn channel_ids(self) -> &'static [Channel] {
        match self {
            Encoding::Gray => &[Channel::Gray],
            Encoding::Float => &[Channel::Float],
            Encoding::Bgr => &[Channel::Blue, Channel::Green, Channel::Red],
            Encoding::Bgra => &[Channel::Blue, Channel::Green, Channel::Red, Channel::Alpha],
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Encoding::Gray),
            "bgr" => Ok(Encoding::Bgr),
            "bgra" => Ok(Encoding::Bgra),
            "float" => Ok(Encoding::Float),
            _ => Err(Error::validation(format!(
                "unknown encoding '{s}', expected one of [Gray, BGR, BGRA, Float]"
            ))),
        }
    }
}

/// Identity of a single channel in a [`ChannelBuffer`](crate::ChannelBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Gray
    Gray,
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
    /// Alpha
    Alpha,
    /// Float
    Float,
}

impl Channel {
    /// Stable numeric identifier.
    pub const fn id(self) -> u8 {
        match self {
            Channel::Gray => 0,
            Channel::Red => 1,
            Channel::Green => 2,
            Channel::Blue => 3,
            Channel::Alpha => 4,
            Channel::Float => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        assert_eq!(Encoding::Gray.channels(), 1);
        assert_eq!(Encoding::Bgr.channels(), 3);
        assert_eq!(Encoding::Bgra.channels(), 4);
        assert_eq!(Encoding::Float.channels(), 1);
        assert!(!Encoding::Float.is_u8());
    }

    #[test]
    fn test_ids_round_trip() {
        for e in Encoding::ALL {
            assert_eq!(Encoding::from_id(e.id()), Some(e));
        }
        assert_eq!(Encoding::from_id(1), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("bgra".parse::<Encoding>().unwrap(), Encoding::Bgra);
        assert_eq!("Gray".parse::<Encoding>().unwrap(), Encoding::Gray);
        assert!("rgb".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Encoding::Bgr).unwrap(), "\"BGR\"");
        let e: Encoding = serde_json::from_str("\"Float\"").unwrap();
        assert_eq!(e, Encoding::Float);
    }

    #[test]
    fn test_channel_ids() {
        let ids: Vec<u8> = Encoding::Bgra.channel_ids().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }
}
