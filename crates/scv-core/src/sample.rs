//! Conversions from computed values to stored 8-bit samples.
//!
//! Two policies coexist:
//!
//! - **wraparound** for construction and arithmetic: the value is reduced
//!   modulo 256, so `300` stores as `44` and `-1` as `255`
//! - **saturation** for resampling, filtering and color conversion: the
//!   value is clamped to `0..=255`

/// Truncates toward zero, then wraps modulo 256.
///
/// ```rust
/// use scv_core::sample::wrap_u8;
///
/// assert_eq!(wrap_u8(300.0), 44);
/// assert_eq!(wrap_u8(2.9), 2);
/// assert_eq!(wrap_u8(-1.0), 255);
/// ```
#[inline]
pub fn wrap_u8(v: f64) -> u8 {
    (v.trunc() as i64).rem_euclid(256) as u8
}

/// Rounds to nearest (ties away from zero), then wraps modulo 256.
///
/// ```rust
/// use scv_core::sample::round_wrap_u8;
///
/// assert_eq!(round_wrap_u8(4.5), 5);
/// assert_eq!(round_wrap_u8(255.6), 0);
/// ```
#[inline]
pub fn round_wrap_u8(v: f64) -> u8 {
    (v.round() as i64).rem_euclid(256) as u8
}

/// Rounds to nearest (ties away from zero), then clamps to `0..=255`.
///
/// Used by resampling, filtering and drawing. On non-negative input this is
/// the round-half-up of a fixed-point `(v + half) >> shift`.
///
/// ```rust
/// use scv_core::sample::saturate_u8;
///
/// assert_eq!(saturate_u8(2.5), 3);
/// assert_eq!(saturate_u8(-0.5), 0);
/// ```
#[inline]
pub fn saturate_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Rounds to nearest (ties to even), then clamps to `0..=255`.
///
/// ```rust
/// use scv_core::sample::saturate_even_u8;
///
/// assert_eq!(saturate_even_u8(2.5), 2);
/// assert_eq!(saturate_even_u8(3.5), 4);
/// assert_eq!(saturate_even_u8(300.0), 255);
/// ```
#[inline]
pub fn saturate_even_u8(v: f64) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
