use std::convert::TryFrom;

use crate::node::ProcessContext;
use crate::sample::Sample;

/// Write slot 1 into the hardware output vector at the index in slot 0.
///
/// The node's own result is left unchanged. A referenced index that falls
/// outside the vector at run time writes nothing.
pub(crate) fn output(ctx: &mut ProcessContext<'_>) -> Sample {
    let value = ctx.param(1);
    if let Some(slot) = usize::try_from(ctx.param(0))
        .ok()
        .and_then(|index| ctx.outputs.get_mut(index))
    {
        *slot = value;
    }
    ctx.current()
}
