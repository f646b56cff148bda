//! Fixed-point numeric contract shared by every node.
//!
//! A [`Sample`] is a signed 8-bit value. The range is asymmetric: there is no
//! positive counterpart to [`MAX_NEGATIVE`], so functions that invert a sample
//! must special-case it instead of negating blindly.
//!
//! [`HighRes`] is the extended state type. It carries [`HIGH_RES_SHIFT`]
//! fractional bits below the sample grid, so `sample << 8` places a sample on
//! the extended grid and `state >> 8` projects it back.

/// The unit flowing between nodes and to/from the hardware vectors.
pub type Sample = i8;

/// Extended-resolution accumulator (8 fractional bits below [`Sample`]).
pub type HighRes = i16;

/// Largest representable sample.
pub const MAX_POSITIVE: Sample = i8::MAX;

/// Smallest representable sample. Has no positive counterpart.
pub const MAX_NEGATIVE: Sample = i8::MIN;

/// Level written by boolean-producing nodes for "true".
pub const BINARY_TRUE: Sample = MAX_POSITIVE;

/// Level written by boolean-producing nodes for "false".
pub const BINARY_FALSE: Sample = 0;

/// Fractional bits of [`HighRes`] below the sample grid.
pub const HIGH_RES_SHIFT: u32 = 8;

/// A sample counts as "true" when it is strictly positive.
#[inline]
pub fn is_true(value: Sample) -> bool {
    value > 0
}

/// Maps a boolean back onto the sample range.
#[inline]
pub fn from_bool(value: bool) -> Sample {
    if value {
        BINARY_TRUE
    } else {
        BINARY_FALSE
    }
}

/// Places a sample on the extended grid.
#[inline]
pub fn to_high_res(value: Sample) -> HighRes {
    HighRes::from(value) << HIGH_RES_SHIFT
}

/// Coarse projection of an extended value back onto the sample grid.
#[inline]
pub fn from_high_res(value: HighRes) -> Sample {
    (value >> HIGH_RES_SHIFT) as Sample
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_res_projection_keeps_the_coarse_value() {
        for s in MAX_NEGATIVE..=MAX_POSITIVE {
            assert_eq!(from_high_res(to_high_res(s)), s);
        }
        // fractional bits are dropped, rounding toward negative infinity
        assert_eq!(from_high_res(to_high_res(3) + 255), 3);
        assert_eq!(from_high_res(to_high_res(-3) + 1), -3);
    }

    #[test]
    fn truthiness_is_strictly_positive() {
        assert!(is_true(1));
        assert!(!is_true(0));
        assert!(!is_true(MAX_NEGATIVE));
        assert_eq!(from_bool(true), BINARY_TRUE);
        assert_eq!(from_bool(false), BINARY_FALSE);
    }
}
