use crate::node::{NodeState, ProcessContext, StateFlags};
use crate::sample::{self, Sample, MAX_POSITIVE};

/// One-pass pulse on a rising input.
///
/// The first pass with a true input outputs 127 and arms the node; further
/// true passes output 0. A false input disarms it and outputs 0.
pub(crate) fn trigger(state: &mut NodeState, ctx: &ProcessContext<'_>) -> Sample {
    if !sample::is_true(ctx.param(0)) {
        state.flags.remove(StateFlags::ARMED);
        return 0;
    }

    if state.flags.contains(StateFlags::ARMED) {
        0
    } else {
        state.flags.insert(StateFlags::ARMED);
        MAX_POSITIVE
    }
}
