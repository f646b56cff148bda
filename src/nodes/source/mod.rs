//! Nodes that generate a signal from internal state or the hardware inputs.

mod input;
mod lfo_pulse;
mod ramp;

pub(crate) use input::input;
pub(crate) use lfo_pulse::lfo_pulse;
pub(crate) use ramp::ramp;
