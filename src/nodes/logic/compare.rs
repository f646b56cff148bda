use crate::node::ProcessContext;
use crate::sample::{self, Sample};

/// True when slot 0 is strictly greater than slot 1.
pub(crate) fn compare(ctx: &ProcessContext<'_>) -> Sample {
    sample::from_bool(ctx.param(0) > ctx.param(1))
}
