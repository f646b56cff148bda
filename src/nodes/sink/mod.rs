//! Nodes with an effect outside the matrix.

mod output;

pub(crate) use output::output;
