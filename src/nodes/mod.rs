//! The node function catalog.
//!
//! Nodes are organized into four families:
//!
//! ## Sources ([`source`])
//!
//! Produce a signal from internal state or the hardware inputs:
//! - ramp - triggered ramp generator
//! - lfo_pulse - two-level pulse LFO
//! - input - read the hardware input vector
//!
//! ## Effects ([`effect`])
//!
//! Transform their resolved inputs:
//! - sum, multiply, max, min - N-ary folds
//! - scale - `a * b / 128`
//! - invert, invert_each_side
//! - delay_line, memory, switch
//! - glide - slew limited follower
//! - positive_exp - exponential lookup
//!
//! ## Logic ([`logic`])
//!
//! - compare, binary_and, binary_or, binary_xor, binary_not
//! - trigger - one-pass pulse on a rising input
//!
//! ## Sinks ([`sink`])
//!
//! - output - write the hardware output vector
//!
//! Every function returns the node's new result. Quantize and tune are
//! placeholders and return the current result unchanged.

pub(crate) mod effect;
pub(crate) mod logic;
pub(crate) mod sink;
pub(crate) mod source;

use crate::node::{NodeKind, NodeState, ProcessContext};
use crate::sample::Sample;

/// Evaluate one node. `state` is the node's private state, `ctx` resolves its
/// parameters against the result table.
#[inline]
pub(crate) fn process(kind: NodeKind, state: &mut NodeState, ctx: &mut ProcessContext<'_>) -> Sample {
    match kind {
        NodeKind::Sum => effect::sum(ctx),
        NodeKind::Multiply => effect::multiply(ctx),
        NodeKind::Invert => effect::invert(ctx),
        NodeKind::InvertEachSide => effect::invert_each_side(ctx),
        NodeKind::Ramp(mode) => source::ramp(mode, state, ctx),
        NodeKind::LfoPulse(start) => source::lfo_pulse(start, state, ctx),
        NodeKind::DelayLine => effect::delay_line(ctx),
        NodeKind::Memory => effect::memory(ctx),
        NodeKind::Switch => effect::switch(ctx),
        NodeKind::Compare => logic::compare(ctx),
        NodeKind::Max => effect::max(ctx),
        NodeKind::Min => effect::min(ctx),
        NodeKind::Scale => effect::scale(ctx),
        NodeKind::Trigger => logic::trigger(state, ctx),
        NodeKind::BinaryAnd => logic::binary_and(ctx),
        NodeKind::BinaryOr => logic::binary_or(ctx),
        NodeKind::BinaryXor => logic::binary_xor(ctx),
        NodeKind::BinaryNot => logic::binary_not(ctx),
        NodeKind::Input => source::input(ctx),
        NodeKind::Output => sink::output(ctx),
        NodeKind::Glide => effect::glide(ctx),
        NodeKind::PositiveExp => effect::positive_exp(ctx),
        NodeKind::Quantize | NodeKind::Tune => ctx.current(),
    }
}
