use crate::node::ProcessContext;
use crate::sample::{Sample, MAX_NEGATIVE, MAX_POSITIVE};

/// Negate the input. -128 has no positive counterpart and maps to 127.
pub(crate) fn invert(ctx: &ProcessContext<'_>) -> Sample {
    let input = ctx.param(0);
    if input == MAX_NEGATIVE {
        MAX_POSITIVE
    } else {
        -input
    }
}

/// Reflect the input within its own side of zero: 0 becomes 127 and 127
/// becomes 0, -1 becomes -128 and -128 becomes -1. The sign never changes.
pub(crate) fn invert_each_side(ctx: &ProcessContext<'_>) -> Sample {
    let input = i16::from(ctx.param(0));
    let reflected = if input >= 0 {
        i16::from(MAX_POSITIVE) - input
    } else {
        i16::from(MAX_NEGATIVE) - 1 - input
    };
    reflected as Sample
}
