//! Triggered ramp generator.

use crate::node::{Direction, NodeState, ProcessContext, RampMode, StateFlags};
use crate::sample::{self, HighRes, Sample, HIGH_RES_SHIFT};

/// Per-pass step on the extended grid for a timing setting.
fn increment(timing: Sample, direction: Direction) -> i32 {
    let step = i32::from(timing) << HIGH_RES_SHIFT;
    match direction {
        Direction::Up => step,
        Direction::Down => -step,
    }
}

/// Ramp from a start position toward the top (or bottom) of the extended range.
///
/// - slot 0: timing, step per pass in samples
/// - slot 1: trigger, level sensitive: the ramp restarts on every pass it is true
/// - slot 2: start position
///
/// The position only advances while the projection stays inside the 16-bit
/// range (strictly below `i16::MAX` going up). The first step that would cross
/// stops the ramp and, with `reset_on_finish`, snaps it back to the start.
/// `mode.bipolar` is not used.
pub(crate) fn ramp(mode: RampMode, state: &mut NodeState, ctx: &ProcessContext<'_>) -> Sample {
    let start = sample::to_high_res(ctx.param(2));

    if sample::is_true(ctx.param(1)) {
        state.high_res = start;
        state.flags.insert(StateFlags::RUNNING);
        state.flags.remove(StateFlags::FINISHED);
    } else if state.flags.contains(StateFlags::RUNNING) {
        let projected = i32::from(state.high_res) + increment(ctx.param(0), mode.direction);

        let upper_ok = match mode.direction {
            Direction::Up => projected < i32::from(HighRes::MAX),
            Direction::Down => projected <= i32::from(HighRes::MAX),
        };
        let lower_ok = projected >= i32::from(HighRes::MIN);

        if upper_ok && lower_ok {
            state.high_res = projected as HighRes;
        } else {
            state.flags.remove(StateFlags::RUNNING);
            state.flags.insert(StateFlags::FINISHED);
            if mode.reset_on_finish {
                state.high_res = start;
            }
        }
    }

    sample::from_high_res(state.high_res)
}
