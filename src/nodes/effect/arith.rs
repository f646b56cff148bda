//! N-ary folds and the scale node.

use crate::node::ProcessContext;
use crate::sample::{Sample, MAX_NEGATIVE, MAX_POSITIVE};

/// Wrapping sum of every slot in use.
pub(crate) fn sum(ctx: &ProcessContext<'_>) -> Sample {
    ctx.active().fold(0, Sample::wrapping_add)
}

/// Wrapping product, left fold from slot 0.
///
/// Slot 0 is the seed even when no slots are marked in use.
pub(crate) fn multiply(ctx: &ProcessContext<'_>) -> Sample {
    ctx.active()
        .skip(1)
        .fold(ctx.param(0), Sample::wrapping_mul)
}

pub(crate) fn max(ctx: &ProcessContext<'_>) -> Sample {
    ctx.active().fold(MAX_NEGATIVE, Sample::max)
}

pub(crate) fn min(ctx: &ProcessContext<'_>) -> Sample {
    ctx.active().fold(MAX_POSITIVE, Sample::min)
}

/// `a * b / 128`, as a widened multiply and a shift by 7.
///
/// Two corners are answered directly: both inputs at 127 give 127 instead of
/// the rounded-down 126, and both inputs at or below -127 give 127.
pub(crate) fn scale(ctx: &ProcessContext<'_>) -> Sample {
    let a = ctx.param(0);
    let b = ctx.param(1);

    if a == MAX_POSITIVE && b == MAX_POSITIVE {
        return MAX_POSITIVE;
    }
    if a <= MAX_NEGATIVE + 1 && b <= MAX_NEGATIVE + 1 {
        return MAX_POSITIVE;
    }

    let product = i16::from(a) * i16::from(b);
    (product >> (Sample::BITS - 1)) as Sample
}
