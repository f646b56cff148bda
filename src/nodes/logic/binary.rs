use crate::node::ProcessContext;
use crate::sample::{self, Sample};

/// True when every slot in use is true. No slots in use is true.
pub(crate) fn binary_and(ctx: &ProcessContext<'_>) -> Sample {
    sample::from_bool(ctx.active().all(sample::is_true))
}

/// True when any slot in use is true. No slots in use is false.
pub(crate) fn binary_or(ctx: &ProcessContext<'_>) -> Sample {
    sample::from_bool(ctx.active().any(sample::is_true))
}

/// True when exactly one of slots 0 and 1 is true.
pub(crate) fn binary_xor(ctx: &ProcessContext<'_>) -> Sample {
    sample::from_bool(sample::is_true(ctx.param(0)) != sample::is_true(ctx.param(1)))
}

pub(crate) fn binary_not(ctx: &ProcessContext<'_>) -> Sample {
    sample::from_bool(!sample::is_true(ctx.param(0)))
}
