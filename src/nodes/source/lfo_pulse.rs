use crate::node::{NodeState, ProcessContext, StartSide};
use crate::sample::{self, HighRes, Sample};

/// Two-level pulse wave.
///
/// - slot 0: cycle length in passes
/// - slot 1: pulse width in passes
/// - slot 2: trigger, restarts the cycle
/// - slot 3: positive level
/// - slot 4: negative level
///
/// `state.high_res` counts passes since the cycle started. The output flips
/// whenever the counter hits the pulse width or the cycle length; which level
/// it flips to depends only on the sign of the current output.
pub(crate) fn lfo_pulse(start: StartSide, state: &mut NodeState, ctx: &ProcessContext<'_>) -> Sample {
    let cycle_length = HighRes::from(ctx.param(0));
    let pulse_width = HighRes::from(ctx.param(1));
    let positive = ctx.param(3);
    let negative = ctx.param(4);

    if sample::is_true(ctx.param(2)) {
        state.high_res = 0;
        return match start {
            StartSide::Top => positive,
            StartSide::Bottom => negative,
        };
    }

    state.high_res = state.high_res.wrapping_add(1);

    let mut result = ctx.current();
    if state.high_res == pulse_width || state.high_res == cycle_length {
        result = if result > 0 { negative } else { positive };
    }
    if state.high_res == cycle_length {
        state.high_res = 0;
    }
    result
}
