use std::convert::TryFrom;

use crate::node::ProcessContext;
use crate::sample::Sample;

/// Read the hardware input vector at the resolved index.
///
/// Constant indices are range-checked at registration. A referenced index that
/// falls outside the vector at run time reads as 0.
pub(crate) fn input(ctx: &ProcessContext<'_>) -> Sample {
    usize::try_from(ctx.param(0))
        .ok()
        .and_then(|index| ctx.inputs.get(index))
        .copied()
        .unwrap_or(0)
}
