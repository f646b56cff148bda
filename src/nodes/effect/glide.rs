//! Glide (slew limiter) for control signals.

use crate::node::ProcessContext;
use crate::sample::{self, Sample};

/// Move toward the target by at most `max step` per pass.
///
/// - slot 0: target
/// - slot 1: max step; negative steps count as 0
/// - slot 2: glide when rising
/// - slot 3: glide when falling
///
/// A move in a direction that is not enabled jumps straight to the target.
pub(crate) fn glide(ctx: &ProcessContext<'_>) -> Sample {
    let target = i16::from(ctx.param(0));
    let max_step = i16::from(ctx.param(1).max(0));
    let glide_up = sample::is_true(ctx.param(2));
    let glide_down = sample::is_true(ctx.param(3));

    let current = i16::from(ctx.current());
    let change = target - current;

    let next = if change > 0 && glide_up {
        current + change.min(max_step)
    } else if change < 0 && glide_down {
        current + change.max(-max_step)
    } else {
        target
    };
    next as Sample
}
