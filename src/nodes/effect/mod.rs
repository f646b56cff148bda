//! Nodes that transform their resolved inputs.

mod arith;
mod glide;
mod hold;
mod invert;
mod positive_exp;

pub(crate) use arith::{max, min, multiply, scale, sum};
pub(crate) use glide::glide;
pub(crate) use hold::{delay_line, memory, switch};
pub(crate) use invert::{invert, invert_each_side};
pub(crate) use positive_exp::positive_exp;
