//! Fixed-point sample representation used by decoded frames.
//!
//! Samples are 32-bit signed integers with [`FRAC_BITS`] fractional bits, so
//! [`ONE`] represents full scale. Converting to 16-bit output keeps the top
//! 15 fractional bits and truncates the rest (no rounding).

/// A fixed-point sample.
pub type Fixed = i32;

/// Number of fractional bits in a [`Fixed`] sample.
pub const FRAC_BITS: u32 = 28;

/// Fixed-point representation of 1.0.
pub const ONE: Fixed = 1 << FRAC_BITS;

const SHIFT: u32 = FRAC_BITS - 15;

/// Converts a fixed-point sample to a signed 16-bit sample.
///
/// Values at or above `+1.0` saturate to `32767`, values at or below `-1.0`
/// saturate to `-32767`. Everything in between is truncated toward negative
/// infinity by an arithmetic shift.
#[inline]
pub fn scale(sample: Fixed) -> i16 {
    if sample >= ONE {
        return i16::MAX;
    }
    if sample <= -ONE {
        return -i16::MAX;
    }
    (sample >> SHIFT) as i16
}

/// Converts a float sample in `[-1.0, 1.0]` to fixed point.
///
/// Out-of-range input saturates at the `i32` bounds and then at full scale
/// in [`scale`].
#[inline]
pub fn from_f32(sample: f32) -> Fixed {
    (sample * ONE as f32) as Fixed
}

/// Converts a 16-bit sample to fixed point.
#[inline]
pub fn from_i16(sample: i16) -> Fixed {
    (sample as Fixed) << SHIFT
}
