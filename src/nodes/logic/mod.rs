//! Comparison, boolean and edge-detecting nodes.
//!
//! Inputs count as true when strictly positive. Outputs use
//! [`BINARY_TRUE`](crate::sample::BINARY_TRUE) and
//! [`BINARY_FALSE`](crate::sample::BINARY_FALSE).

mod binary;
mod compare;
mod trigger;

pub(crate) use binary::{binary_and, binary_not, binary_or, binary_xor};
pub(crate) use compare::compare;
pub(crate) use trigger::trigger;
