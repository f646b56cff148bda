//! High-level matrix API: registration, the per-cycle pass and the hardware
//! vectors.

use std::convert::TryFrom;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::MatrixConfig;
use crate::error::{ConfigError, Result};
use crate::graph::Registry;
use crate::handoff::{CompletionFlag, FrameSink};
use crate::lookup::ExpTable;
use crate::node::{Node, NodeId, NodeKind, Param, RawNode, MAX_PARAMS};
use crate::sample::Sample;

/// The node graph plus its scheduler.
///
/// `Matrix` owns the registry, the hardware input and output vectors, the
/// exponential lookup table and the completion signal. A cycle looks like this:
///
/// 1. the front end writes the input vector ([`inputs_mut`](Self::inputs_mut))
/// 2. [`run`](Self::run) evaluates every node once, in registration order
/// 3. the output stage waits for the [`CompletionFlag`], then reads
///    [`outputs`](Self::outputs)
///
/// ```
/// # use cvmatrix::{Matrix, Node, NodeKind, Param};
/// let mut matrix = Matrix::default();
///
/// let input = matrix.add(Node::new(NodeKind::Input).with_params(&[Param::Constant(0)])?)?;
/// let inverted = matrix.add(Node::new(NodeKind::Invert).with_params(&[input.into()])?)?;
/// matrix.add(Node::new(NodeKind::Output).with_params(&[Param::Constant(1), inverted.into()])?)?;
///
/// matrix.set_input(0, 42)?;
/// matrix.run()?;
///
/// assert!(matrix.completion().take());
/// assert_eq!(matrix.outputs()[1], -42);
/// # Ok::<(), cvmatrix::ConfigError>(())
/// ```
///
/// # Ordering
///
/// A node that references an earlier node sees its result from this pass. A
/// node that references itself or a later node sees the previous pass. See
/// [`Registry::freshness`].
pub struct Matrix {
    config: MatrixConfig,
    registry: Registry,
    inputs: Vec<Sample>,
    outputs: Vec<Sample>,
    table: Arc<ExpTable>,
    completion: Arc<CompletionFlag>,
    frame_sink: Option<FrameSink>,
    passes: u64,
    dropped_frames: u64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::new(MatrixConfig::default())
    }
}

impl Matrix {
    /// Create an empty matrix and build its lookup table.
    pub fn new(config: MatrixConfig) -> Self {
        Self {
            registry: Registry::new(config.capacity),
            inputs: vec![0; config.inputs],
            outputs: vec![0; config.outputs],
            table: Arc::new(ExpTable::new()),
            completion: Arc::new(CompletionFlag::new()),
            frame_sink: None,
            passes: 0,
            dropped_frames: 0,
            config,
        }
    }

    /// Share an existing lookup table instead of building a new one
    /// (builder pattern).
    pub fn with_table(mut self, table: Arc<ExpTable>) -> Self {
        self.table = table;
        self
    }

    /// Push a copy of the output vector into `sink` after every pass
    /// (builder pattern).
    pub fn with_frame_sink(mut self, sink: FrameSink) -> Self {
        if sink.frame_len() != self.outputs.len() {
            warn!(
                frame_len = sink.frame_len(),
                outputs = self.outputs.len(),
                "frame length differs from the output vector, frames will be padded or cut"
            );
        }
        self.frame_sink = Some(sink);
        self
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn table(&self) -> &Arc<ExpTable> {
        &self.table
    }

    /// Check a constant hardware vector index on an input or output node.
    fn check_io(&self, kind: NodeKind, slot: usize, param: Param) -> Result<()> {
        let len = match (kind, slot) {
            (NodeKind::Input, 0) => self.inputs.len(),
            (NodeKind::Output, 0) => self.outputs.len(),
            _ => return Ok(()),
        };
        match param {
            Param::Constant(index) if index < 0 || index as usize >= len => {
                Err(ConfigError::IoIndexOutOfRange {
                    index: i16::from(index),
                    len,
                })
            }
            _ => Ok(()),
        }
    }

    /// Register a node at the end of the evaluation order.
    pub fn add(&mut self, node: Node) -> Result<NodeId> {
        for (slot, param) in node.params().iter().enumerate() {
            self.check_io(node.kind(), slot, *param)?;
        }
        self.registry.push(node)
    }

    /// Decode and register a node in the patch loader's raw format.
    pub fn add_raw(&mut self, raw: RawNode) -> Result<NodeId> {
        let node = Node::try_from(raw).map_err(|e| {
            warn!(kind = raw.kind, error = %e, "rejected raw node");
            e
        })?;
        self.add(node)
    }

    /// Replace one parameter slot of a registered node. Takes effect on the
    /// next pass. The node's kind and slots in use are unchanged.
    pub fn set_param(&mut self, id: NodeId, slot: usize, param: Param) -> Result<()> {
        if slot >= MAX_PARAMS {
            return Err(ConfigError::SlotOutOfRange { slot });
        }
        let kind = self
            .registry
            .node(id)
            .map(Node::kind)
            .ok_or(ConfigError::UnknownNode(id.index()))?;
        self.check_io(kind, slot, param)?;
        self.registry.set_param(id, slot, param)?;
        debug!(index = id.index(), slot, ?param, "parameter changed");
        Ok(())
    }

    /// Remove every node and clear the completion signal and output vector.
    pub fn reset(&mut self) {
        debug!(nodes = self.registry.len(), passes = self.passes, "matrix reset");
        self.registry.clear();
        self.completion.clear();
        self.outputs.iter_mut().for_each(|s| *s = 0);
    }

    /// Evaluate every registered node once, then raise the completion signal.
    ///
    /// Fails without evaluating anything when a node references an index that
    /// was never registered.
    pub fn run(&mut self) -> Result<()> {
        self.registry.check_complete()?;
        self.registry
            .evaluate(&self.inputs, &mut self.outputs, &self.table);

        if let Some(sink) = self.frame_sink.as_mut() {
            if !sink.push(&self.outputs) {
                self.dropped_frames += 1;
            }
        }

        self.passes += 1;
        self.completion.raise();
        Ok(())
    }

    /// One full cycle as the front end drives it: load `inputs`, run, consume
    /// the completion signal and hand back the output vector.
    pub fn cycle(&mut self, inputs: &[Sample]) -> Result<&[Sample]> {
        for (slot, value) in self.inputs.iter_mut().zip(inputs.iter()) {
            *slot = *value;
        }
        self.run()?;
        self.completion.take();
        Ok(&self.outputs)
    }

    /// Shared handle to the completion signal, for an output stage on
    /// another thread.
    pub fn completion(&self) -> Arc<CompletionFlag> {
        Arc::clone(&self.completion)
    }

    pub fn set_input(&mut self, index: usize, value: Sample) -> Result<()> {
        let len = self.inputs.len();
        let slot = self
            .inputs
            .get_mut(index)
            .ok_or(ConfigError::IoIndexOutOfRange {
                index: i16::try_from(index).unwrap_or(i16::MAX),
                len,
            })?;
        *slot = value;
        Ok(())
    }

    pub fn inputs(&self) -> &[Sample] {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut [Sample] {
        &mut self.inputs
    }

    pub fn outputs(&self) -> &[Sample] {
        &self.outputs
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.registry.node(id)
    }

    pub fn result(&self, id: NodeId) -> Option<Sample> {
        self.registry.result(id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Completed passes since the matrix was created.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Frames the attached sink had no room for.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }
}
