use crate::node::ProcessContext;
use crate::sample::Sample;

/// Exponential response for positive inputs, 0 for everything else.
pub(crate) fn positive_exp(ctx: &ProcessContext<'_>) -> Sample {
    ctx.table.lookup(ctx.param(0))
}
