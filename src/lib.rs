//! Fixed-point patch matrix.
//!
//! A fixed set of computation nodes wired into a directed graph and
//! re-evaluated once per control cycle, turning a small vector of hardware
//! inputs into a vector of hardware outputs. Everything on the evaluation path
//! is integer arithmetic on 8-bit [`Sample`]s.
//!
//! - [`Node`] - one computation unit: a [`NodeKind`], up to eight [`Param`]
//!   slots (constants or references to other nodes) and private state
//! - [`Registry`] - the ordered, bounded arena; registration order is the
//!   evaluation order
//! - [`Matrix`] - registry, hardware vectors, lookup table and the
//!   per-cycle [`run`](Matrix::run)
//!
//! ```
//! use cvmatrix::{Matrix, Node, NodeKind, Param};
//!
//! let mut matrix = Matrix::default();
//! let sum = matrix.add(
//!     Node::new(NodeKind::Sum).with_params(&[Param::Constant(1), Param::Constant(2), Param::Constant(4)])?,
//! )?;
//! matrix.run()?;
//! assert_eq!(matrix.result(sum), Some(7));
//! # Ok::<(), cvmatrix::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod handoff;
pub mod lookup;
pub mod matrix;
pub mod node;
pub mod sample;

mod nodes;

pub use config::MatrixConfig;
pub use error::{ConfigError, Result};
pub use graph::{Freshness, Registry, Wiring};
pub use handoff::{frame_channel, CompletionFlag, FrameSink, FrameSource};
pub use lookup::ExpTable;
pub use matrix::Matrix;
pub use node::{
    Direction, Node, NodeId, NodeKind, NodeState, Param, RampMode, RawNode, StartSide, StateFlags,
    MAX_PARAMS,
};
pub use sample::{HighRes, Sample, BINARY_FALSE, BINARY_TRUE, MAX_NEGATIVE, MAX_POSITIVE};
