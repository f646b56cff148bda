//! Configuration errors.
//!
//! Everything here is detected while a patch is being set up (registration,
//! raw decoding, parameter edits) and reported to the caller. Nothing in the
//! per-node evaluation path returns an error.

use thiserror::Error;

/// A detected, reportable invalid matrix setup.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("registry is full ({capacity} nodes)")]
    RegistryFull { capacity: usize },

    #[error("parameter slot {slot} references node {index}, capacity is {capacity}")]
    ReferenceOutOfRange {
        slot: usize,
        index: usize,
        capacity: usize,
    },

    #[error("node {index} is referenced but only {registered} nodes are registered")]
    DanglingReference { index: usize, registered: usize },

    #[error("unknown node kind code {0}")]
    UnknownKind(u16),

    #[error("{count} parameters in use, a node has at most 8")]
    TooManyParams { count: usize },

    #[error("parameter slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },

    #[error("constant {value} in slot {slot} is outside the sample range")]
    ConstantOutOfRange { slot: usize, value: i16 },

    #[error("parameter slot {slot} references negative node index {value}")]
    NegativeReference { slot: usize, value: i16 },

    #[error("hardware vector index {index} is out of range (length {len})")]
    IoIndexOutOfRange { index: i16, len: usize },

    #[error("no node registered at index {0}")]
    UnknownNode(usize),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
