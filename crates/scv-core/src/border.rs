//! Out-of-bounds sampling policies.
//!
//! ```text
//! Replicate:  aaaaaa|abcdefgh|hhhhhhh
//! Reflect:    fedcba|abcdefgh|hgfedcb
//! Reflect101: gfedcb|abcdefgh|gfedcba
//! Wrap:       cdefgh|abcdefgh|abcdefg
//! Constant:   iiiiii|abcdefgh|iiiiiii
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How samples requested outside a matrix are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BorderPolicy {
    /// Clamp to the nearest edge sample.
    #[default]
    Replicate,
    /// Mirror, repeating the edge sample.
    Reflect,
    /// Mirror about the edge sample without repeating it.
    Reflect101,
    /// Periodic continuation.
    Wrap,
    /// Every outside sample reads as the given value.
    Constant(f64),
}

impl BorderPolicy {
    /// Maps coordinate `p` onto `0..len`.
    ///
    /// Returns `None` when the policy is [`BorderPolicy::Constant`] and `p`
    /// is outside, meaning the constant should be used instead.
    ///
    /// ```rust
    /// use scv_core::BorderPolicy;
    ///
    /// assert_eq!(BorderPolicy::Replicate.resolve(-3, 5), Some(0));
    /// assert_eq!(BorderPolicy::Reflect.resolve(-1, 5), Some(0));
    /// assert_eq!(BorderPolicy::Reflect101.resolve(-1, 5), Some(1));
    /// assert_eq!(BorderPolicy::Wrap.resolve(5, 5), Some(0));
    /// assert_eq!(BorderPolicy::Constant(0.0).resolve(5, 5), None);
    /// ```
    pub fn resolve(self, p: i64, len: usize) -> Option<usize> {
        let n = len as i64;
        if (0..n).contains(&p) {
            return Some(p as usize);
        }
        match self {
            BorderPolicy::Replicate => Some(p.clamp(0, n - 1) as usize),
            BorderPolicy::Reflect => {
                let period = 2 * n;
                let q = p.rem_euclid(period);
                Some(if q < n { q } else { period - 1 - q } as usize)
            }
            BorderPolicy::Reflect101 => {
                if n == 1 {
                    return Some(0);
                }
                let period = 2 * n - 2;
                let q = p.rem_euclid(period);
                Some(if q < n { q } else { period - q } as usize)
            }
            BorderPolicy::Wrap => Some(p.rem_euclid(n) as usize),
            BorderPolicy::Constant(_) => None,
        }
    }

    /// Fill value for [`BorderPolicy::Constant`], zero otherwise.
    #[inline]
    pub fn constant(self) -> f64 {
        match self {
            BorderPolicy::Constant(v) => v,
            _ => 0.0,
        }
    }
}

impl FromStr for BorderPolicy {
    type Err = Error;

    /// Parses `replicate`, `reflect`, `reflect101`, `wrap`, `constant` or
    /// `constant:<value>`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        let (name, value) = match lower.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (lower.as_str(), None),
        };
        match (name, value) {
            ("replicate", None) => Ok(BorderPolicy::Replicate),
            ("reflect", None) => Ok(BorderPolicy::Reflect),
            ("reflect101", None) => Ok(BorderPolicy::Reflect101),
            ("wrap", None) => Ok(BorderPolicy::Wrap),
            ("constant", None) => Ok(BorderPolicy::Constant(0.0)),
            ("constant", Some(v)) => v
                .trim()
                .parse::<f64>()
                .map(BorderPolicy::Constant)
                .map_err(|_| Error::validation(format!("invalid border value '{v}'"))),
            _ => Err(Error::validation(format!(
                "unknown border type '{s}', expected one of [replicate, reflect, reflect101, wrap, constant]"
            ))),
        }
    }
}
