//! Node registry - owns nodes and their result table.
//!
//! Registration order is evaluation order, and it is also the dependency rule:
//!
//! - a reference to an **earlier** node sees that node's result from the
//!   current pass ([`Freshness::Current`])
//! - a reference to the node **itself or a later** node sees the result from
//!   the previous pass ([`Freshness::Previous`])
//!
//! The one-pass delay on backward-in-time references is how feedback loops are
//! built; a delay line registered after its consumer carries a value across
//! the boundary.

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace, warn};

use crate::error::{ConfigError, Result};
use crate::lookup::ExpTable;
use crate::node::{Node, NodeId, NodeKind, Param, ProcessContext, MAX_PARAMS};
use crate::nodes;
use crate::sample::Sample;

/// Which pass a reference observes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Freshness {
    /// The referenced node runs first: its result from this pass
    Current,
    /// The referenced node runs at or after the consumer: its result from the
    /// previous pass
    Previous,
}

/// Reference graph of a registry, from source node to consumer node.
pub type Wiring = DiGraph<NodeKind, Freshness>;

/// Bounded, ordered arena of nodes.
pub struct Registry {
    nodes: Vec<Node>,
    results: Vec<Sample>,
    capacity: usize,
    /// Highest node index referenced by any registered node
    highest_reference: Option<usize>,
}

impl Registry {
    /// Create an empty registry; storage for `capacity` nodes is reserved up
    /// front so registration never reallocates.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            results: Vec::with_capacity(capacity),
            capacity,
            highest_reference: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.capacity
    }

    /// Check that a parameter refers to a slot inside the registry's capacity.
    pub(crate) fn check_param(&self, slot: usize, param: Param) -> Result<()> {
        match param {
            Param::Node(id) if id.0 >= self.capacity => Err(ConfigError::ReferenceOutOfRange {
                slot,
                index: id.0,
                capacity: self.capacity,
            }),
            _ => Ok(()),
        }
    }

    /// Append a node. Its position is both its id and its place in the
    /// evaluation order.
    pub fn push(&mut self, node: Node) -> Result<NodeId> {
        if self.is_full() {
            warn!(capacity = self.capacity, kind = %node.kind, "registry full");
            return Err(ConfigError::RegistryFull {
                capacity: self.capacity,
            });
        }
        if node.params_in_use > MAX_PARAMS {
            return Err(ConfigError::TooManyParams {
                count: node.params_in_use,
            });
        }
        for (slot, source) in node.references() {
            self.check_param(slot, Param::Node(source))?;
        }

        let id = NodeId(self.nodes.len());
        for (slot, source) in node.references() {
            if self.freshness(id, source) == Freshness::Previous {
                trace!(consumer = id.0, source = source.0, slot, "reference sees the previous pass");
            }
            self.note_reference(source);
        }

        debug!(index = id.0, kind = %node.kind, "registered node");
        self.results.push(node.initial_result);
        self.nodes.push(node);
        Ok(id)
    }

    fn note_reference(&mut self, source: NodeId) {
        self.highest_reference = Some(match self.highest_reference {
            Some(highest) => highest.max(source.0),
            None => source.0,
        });
    }

    /// Replace one parameter slot of a registered node.
    ///
    /// The highest reference is recomputed from every node, so an edit that
    /// drops a forward reference also drops it from the completeness check.
    pub(crate) fn set_param(&mut self, id: NodeId, slot: usize, param: Param) -> Result<()> {
        if slot >= MAX_PARAMS {
            return Err(ConfigError::SlotOutOfRange { slot });
        }
        self.check_param(slot, param)?;
        self.node_mut(id)?.params[slot] = param;

        self.highest_reference = self
            .nodes
            .iter()
            .flat_map(|node| node.references().map(|(_, source)| source.0))
            .max();
        Ok(())
    }

    /// Fail when a reference names a node that has not been registered.
    #[inline]
    pub fn check_complete(&self) -> Result<()> {
        match self.highest_reference {
            Some(index) if index >= self.nodes.len() => Err(ConfigError::DanglingReference {
                index,
                registered: self.nodes.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Forget every node. All ids handed out so far become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.results.clear();
        self.highest_reference = None;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(ConfigError::UnknownNode(id.0))
    }

    /// Result of the node's last completed evaluation.
    pub fn result(&self, id: NodeId) -> Option<Sample> {
        self.results.get(id.0).copied()
    }

    pub fn results(&self) -> &[Sample] {
        &self.results
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Which pass `consumer` observes when it references `source`.
    pub fn freshness(&self, consumer: NodeId, source: NodeId) -> Freshness {
        if source < consumer {
            Freshness::Current
        } else {
            Freshness::Previous
        }
    }

    /// Build the reference graph. Node weights are kinds, edges run from the
    /// referenced node to its consumer. References to unregistered nodes are
    /// left out.
    pub fn wiring(&self) -> Wiring {
        let mut graph = Wiring::with_capacity(self.nodes.len(), self.nodes.len());
        let indices: Vec<NodeIndex> = self.nodes.iter().map(|n| graph.add_node(n.kind)).collect();

        for (consumer, node) in self.nodes.iter().enumerate() {
            for (_, source) in node.references() {
                if let Some(&from) = indices.get(source.0) {
                    let freshness = self.freshness(NodeId(consumer), source);
                    graph.add_edge(from, indices[consumer], freshness);
                }
            }
        }
        graph
    }

    /// References that observe the previous pass, as `(source, consumer)`.
    pub fn feedback_edges(&self) -> Vec<(NodeId, NodeId)> {
        let wiring = self.wiring();
        wiring
            .edge_indices()
            .filter(|&e| wiring[e] == Freshness::Previous)
            .filter_map(|e| wiring.edge_endpoints(e))
            .map(|(from, to)| (NodeId(from.index()), NodeId(to.index())))
            .collect()
    }

    /// Evaluate every node once, in registration order.
    ///
    /// Each node's new result is written back before the next node runs, so
    /// later nodes see it. The caller has already checked completeness.
    pub(crate) fn evaluate(&mut self, inputs: &[Sample], outputs: &mut [Sample], table: &ExpTable) {
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let mut ctx = ProcessContext {
                results: &self.results,
                params: &node.params,
                params_in_use: node.params_in_use,
                current: self.results[index],
                inputs,
                outputs: &mut *outputs,
                table,
            };
            let result = nodes::process(node.kind, &mut node.state, &mut ctx);
            self.results[index] = result;
        }
    }
}
