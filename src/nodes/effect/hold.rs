//! Nodes that pass, hold or gate a value.

use crate::node::ProcessContext;
use crate::sample::{self, Sample};

/// Echo the input.
///
/// Placed after its consumer in the registry, it hands that consumer the
/// value from the previous pass, which is how feedback loops are closed.
pub(crate) fn delay_line(ctx: &ProcessContext<'_>) -> Sample {
    ctx.param(0)
}

/// Sample and hold with set (slot 1) and clear (slot 2). Clear wins.
pub(crate) fn memory(ctx: &ProcessContext<'_>) -> Sample {
    if sample::is_true(ctx.param(2)) {
        0
    } else if sample::is_true(ctx.param(1)) {
        ctx.param(0)
    } else {
        ctx.current()
    }
}

/// Pass slot 0 while the gate in slot 1 is true, otherwise 0.
pub(crate) fn switch(ctx: &ProcessContext<'_>) -> Sample {
    if sample::is_true(ctx.param(1)) {
        ctx.param(0)
    } else {
        0
    }
}
