//! Node representation, parameter slots and the per-pass context.

use std::convert::TryFrom;
use std::fmt;

use crate::error::{ConfigError, Result};
use crate::lookup::ExpTable;
use crate::sample::{HighRes, Sample};

/// Number of parameter slots on every node.
pub const MAX_PARAMS: usize = 8;

/// Position of a node in the registry.
///
/// Ids are plain indices. They can be created before the node they name has
/// been registered, which is how forward (previous-pass) references are wired.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn new(index: usize) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parameter slot: either a literal sample or a reference to the result of
/// another node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Param {
    Constant(Sample),
    Node(NodeId),
}

impl Default for Param {
    fn default() -> Self {
        Param::Constant(0)
    }
}

impl From<Sample> for Param {
    fn from(value: Sample) -> Self {
        Param::Constant(value)
    }
}

impl From<NodeId> for Param {
    fn from(id: NodeId) -> Self {
        Param::Node(id)
    }
}

/// Ramp travel direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Down,
    Up,
}

/// Mode bits of a ramp node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RampMode {
    /// Snap back to the start position once the boundary is reached
    pub reset_on_finish: bool,
    pub direction: Direction,
    /// Accepted and stored, currently has no effect on the ramp
    pub bipolar: bool,
}

impl Default for RampMode {
    fn default() -> Self {
        Self {
            reset_on_finish: false,
            direction: Direction::Up,
            bipolar: false,
        }
    }
}

impl RampMode {
    const RESET_ON_FINISH: i16 = 0b001;
    const DIRECTION_UP: i16 = 0b010;
    const BIPOLAR: i16 = 0b100;

    /// Decode the packed patch bitfield (B0 reset, B1 direction up, B2 bipolar).
    pub fn from_bits(bits: i16) -> Self {
        Self {
            reset_on_finish: bits & Self::RESET_ON_FINISH != 0,
            direction: if bits & Self::DIRECTION_UP != 0 {
                Direction::Up
            } else {
                Direction::Down
            },
            bipolar: bits & Self::BIPOLAR != 0,
        }
    }
}

/// Which level a pulse LFO outputs right after a trigger.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StartSide {
    Bottom,
    Top,
}

impl StartSide {
    pub fn from_bits(bits: i16) -> Self {
        if bits & 0b1 != 0 {
            StartSide::Top
        } else {
            StartSide::Bottom
        }
    }
}

/// Small per-node flag set used by the state machine nodes.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags(u8);

impl StateFlags {
    /// Ramp is moving
    pub const RUNNING: StateFlags = StateFlags(0b001);
    /// Ramp stopped at its boundary since the last trigger
    pub const FINISHED: StateFlags = StateFlags(0b010);
    /// Trigger has fired and waits for its input to fall
    pub const ARMED: StateFlags = StateFlags(0b100);

    pub fn empty() -> Self {
        StateFlags(0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: StateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: StateFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: StateFlags) {
        self.0 &= !other.0;
    }
}

impl fmt::Debug for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (flag, name) in &[
            (StateFlags::RUNNING, "RUNNING"),
            (StateFlags::FINISHED, "FINISHED"),
            (StateFlags::ARMED, "ARMED"),
        ] {
            if self.contains(*flag) {
                set.entry(name);
            }
        }
        set.finish()
    }
}

/// Numeric kind codes used by the raw patch format.
pub mod kind_code {
    pub const SUM: u16 = 0;
    pub const INVERT: u16 = 1;
    pub const INVERT_EACH_SIDE: u16 = 2;
    pub const RAMP: u16 = 3;
    pub const DELAY_LINE: u16 = 4;
    pub const INPUT: u16 = 5;
    pub const OUTPUT: u16 = 6;
    pub const MULTIPLY: u16 = 7;
    pub const MEMORY: u16 = 8;
    pub const LFO_PULSE: u16 = 9;
    pub const SWITCH: u16 = 10;
    pub const COMPARE: u16 = 11;
    pub const MAX: u16 = 12;
    pub const MIN: u16 = 13;
    pub const SCALE: u16 = 14;
    pub const TRIGGER: u16 = 15;
    pub const BINARY_AND: u16 = 16;
    pub const BINARY_OR: u16 = 17;
    pub const BINARY_XOR: u16 = 18;
    pub const BINARY_NOT: u16 = 19;
    pub const GLIDE: u16 = 20;
    pub const QUANTIZE: u16 = 21;
    pub const TUNE: u16 = 22;
    pub const POSITIVE_EXP: u16 = 23;
}

/// Every node kind the catalog knows how to evaluate.
///
/// Slot layouts (unused slots are ignored):
///
/// | Kind | Slots |
/// |---|---|
/// | `Sum`, `Multiply`, `Max`, `Min`, `BinaryAnd`, `BinaryOr` | `0..params_in_use` |
/// | `Invert`, `InvertEachSide`, `DelayLine`, `Trigger`, `BinaryNot`, `PositiveExp` | 0: input |
/// | `Ramp` | 0: timing, 1: trigger, 2: start position |
/// | `LfoPulse` | 0: cycle length, 1: pulse width, 2: trigger, 3: positive level, 4: negative level |
/// | `Memory` | 0: value, 1: set, 2: clear |
/// | `Switch` | 0: value, 1: gate |
/// | `Compare`, `Scale`, `BinaryXor` | 0: a, 1: b |
/// | `Input` | 0: input vector index |
/// | `Output` | 0: output vector index, 1: value |
/// | `Glide` | 0: target, 1: max step, 2: glide up, 3: glide down |
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    Sum,
    Multiply,
    Invert,
    InvertEachSide,
    Ramp(RampMode),
    LfoPulse(StartSide),
    DelayLine,
    Memory,
    Switch,
    Compare,
    Max,
    Min,
    Scale,
    Trigger,
    BinaryAnd,
    BinaryOr,
    BinaryXor,
    BinaryNot,
    Input,
    Output,
    Glide,
    PositiveExp,
    Quantize,
    Tune,
}

impl NodeKind {
    /// Decode a raw kind code. Ramp and pulse LFO read their mode bits from the
    /// raw parameter slot that carries them in the patch format.
    pub fn from_code(code: u16, raw_params: &[i16; MAX_PARAMS]) -> Result<Self> {
        use kind_code::*;

        let kind = match code {
            SUM => NodeKind::Sum,
            INVERT => NodeKind::Invert,
            INVERT_EACH_SIDE => NodeKind::InvertEachSide,
            RAMP => NodeKind::Ramp(RampMode::from_bits(raw_params[3])),
            DELAY_LINE => NodeKind::DelayLine,
            INPUT => NodeKind::Input,
            OUTPUT => NodeKind::Output,
            MULTIPLY => NodeKind::Multiply,
            MEMORY => NodeKind::Memory,
            LFO_PULSE => NodeKind::LfoPulse(StartSide::from_bits(raw_params[5])),
            SWITCH => NodeKind::Switch,
            COMPARE => NodeKind::Compare,
            MAX => NodeKind::Max,
            MIN => NodeKind::Min,
            SCALE => NodeKind::Scale,
            TRIGGER => NodeKind::Trigger,
            BINARY_AND => NodeKind::BinaryAnd,
            BINARY_OR => NodeKind::BinaryOr,
            BINARY_XOR => NodeKind::BinaryXor,
            BINARY_NOT => NodeKind::BinaryNot,
            GLIDE => NodeKind::Glide,
            QUANTIZE => NodeKind::Quantize,
            TUNE => NodeKind::Tune,
            POSITIVE_EXP => NodeKind::PositiveExp,
            unknown => return Err(ConfigError::UnknownKind(unknown)),
        };
        Ok(kind)
    }

    /// Number of slots a fixed-shape kind reads. `None` for the N-ary folds,
    /// which read `params_in_use` slots.
    pub fn arity(&self) -> Option<usize> {
        match self {
            NodeKind::Sum
            | NodeKind::Multiply
            | NodeKind::Max
            | NodeKind::Min
            | NodeKind::BinaryAnd
            | NodeKind::BinaryOr => None,
            NodeKind::Invert
            | NodeKind::InvertEachSide
            | NodeKind::DelayLine
            | NodeKind::Trigger
            | NodeKind::BinaryNot
            | NodeKind::Input
            | NodeKind::PositiveExp => Some(1),
            NodeKind::Switch
            | NodeKind::Compare
            | NodeKind::Scale
            | NodeKind::BinaryXor
            | NodeKind::Output => Some(2),
            NodeKind::Ramp(_) | NodeKind::Memory => Some(3),
            NodeKind::Glide => Some(4),
            NodeKind::LfoPulse(_) => Some(5),
            NodeKind::Quantize | NodeKind::Tune => Some(0),
        }
    }

    /// Leading slots evaluation actually reads. Multiply always reads slot 0.
    pub fn slots_read(&self, params_in_use: usize) -> usize {
        match (self, self.arity()) {
            (_, Some(arity)) => arity,
            (NodeKind::Multiply, None) => params_in_use.max(1).min(MAX_PARAMS),
            (_, None) => params_in_use.min(MAX_PARAMS),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Sum => "sum",
            NodeKind::Multiply => "multiply",
            NodeKind::Invert => "invert",
            NodeKind::InvertEachSide => "invert_each_side",
            NodeKind::Ramp(_) => "ramp",
            NodeKind::LfoPulse(_) => "lfo_pulse",
            NodeKind::DelayLine => "delay_line",
            NodeKind::Memory => "memory",
            NodeKind::Switch => "switch",
            NodeKind::Compare => "compare",
            NodeKind::Max => "max",
            NodeKind::Min => "min",
            NodeKind::Scale => "scale",
            NodeKind::Trigger => "trigger",
            NodeKind::BinaryAnd => "binary_and",
            NodeKind::BinaryOr => "binary_or",
            NodeKind::BinaryXor => "binary_xor",
            NodeKind::BinaryNot => "binary_not",
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Glide => "glide",
            NodeKind::PositiveExp => "positive_exp",
            NodeKind::Quantize => "quantize",
            NodeKind::Tune => "tune",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable per-node state owned by the scheduler during a pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NodeState {
    pub flags: StateFlags,
    /// Ramp position on the extended grid, or the pulse LFO cycle counter
    pub high_res: HighRes,
}

/// A single computation unit.
///
/// ```
/// # use cvmatrix::{Node, NodeKind, Param};
/// let sum = Node::new(NodeKind::Sum)
///     .with_params(&[Param::Constant(1), Param::Constant(2)])
///     .unwrap();
/// assert_eq!(sum.params_in_use(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) params: [Param; MAX_PARAMS],
    pub(crate) params_in_use: usize,
    pub(crate) initial_result: Sample,
    pub(crate) state: NodeState,
}

impl Node {
    /// A node of `kind` with every slot set to constant 0.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            params: [Param::default(); MAX_PARAMS],
            params_in_use: 0,
            initial_result: 0,
            state: NodeState::default(),
        }
    }

    /// Fill the leading slots and mark them in use.
    pub fn with_params(mut self, params: &[Param]) -> Result<Self> {
        if params.len() > MAX_PARAMS {
            return Err(ConfigError::TooManyParams {
                count: params.len(),
            });
        }
        self.params[..params.len()].copy_from_slice(params);
        self.params_in_use = params.len();
        Ok(self)
    }

    /// Result visible to other nodes before the first pass.
    pub fn with_result(mut self, result: Sample) -> Self {
        self.initial_result = result;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn params(&self) -> &[Param; MAX_PARAMS] {
        &self.params
    }

    pub fn params_in_use(&self) -> usize {
        self.params_in_use
    }

    pub fn state(&self) -> StateFlags {
        self.state.flags
    }

    pub fn high_res_state(&self) -> HighRes {
        self.state.high_res
    }

    /// References this node makes, with the slot each one sits in. Slots the
    /// kind never reads are skipped.
    pub fn references(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        let read = self.kind.slots_read(self.params_in_use);
        self.params[..read].iter().enumerate().filter_map(|(slot, p)| match p {
            Param::Node(id) => Some((slot, *id)),
            Param::Constant(_) => None,
        })
    }
}

/// A node as the patch loader stores it: numeric kind code, raw slot values
/// and a bitmask selecting which slots are constants.
///
/// Slots past what the kind reads (including the Ramp and pulse LFO mode
/// slots) are not decoded and come out as constant 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawNode {
    pub kind: u16,
    pub params: [i16; MAX_PARAMS],
    /// Bit `n` set means slot `n` is a literal, clear means a node index
    pub constant_mask: u8,
    pub params_in_use: u8,
    pub result: i16,
}

impl TryFrom<RawNode> for Node {
    type Error = ConfigError;

    fn try_from(raw: RawNode) -> Result<Self> {
        let kind = NodeKind::from_code(raw.kind, &raw.params)?;

        let params_in_use = usize::from(raw.params_in_use);
        if params_in_use > MAX_PARAMS {
            return Err(ConfigError::TooManyParams {
                count: params_in_use,
            });
        }

        let mut params = [Param::default(); MAX_PARAMS];
        let read = kind.slots_read(params_in_use);
        for (slot, (param, &value)) in params[..read].iter_mut().zip(raw.params.iter()).enumerate() {
            *param = if raw.constant_mask >> slot & 1 == 1 {
                let value = Sample::try_from(value)
                    .map_err(|_| ConfigError::ConstantOutOfRange { slot, value })?;
                Param::Constant(value)
            } else {
                let index = usize::try_from(value)
                    .map_err(|_| ConfigError::NegativeReference { slot, value })?;
                Param::Node(NodeId(index))
            };
        }

        let initial_result = Sample::try_from(raw.result).map_err(|_| {
            ConfigError::ConstantOutOfRange {
                slot: MAX_PARAMS,
                value: raw.result,
            }
        })?;

        Ok(Node {
            kind,
            params,
            params_in_use,
            initial_result,
            state: NodeState::default(),
        })
    }
}

/// Everything a node function can see while it runs.
///
/// Built fresh for each node: `results` is the registry's result table as it
/// stands at this point in the pass (earlier nodes already updated, this node
/// and later ones still holding the previous pass).
pub(crate) struct ProcessContext<'a> {
    pub(crate) results: &'a [Sample],
    pub(crate) params: &'a [Param; MAX_PARAMS],
    pub(crate) params_in_use: usize,
    pub(crate) current: Sample,
    pub(crate) inputs: &'a [Sample],
    pub(crate) outputs: &'a mut [Sample],
    pub(crate) table: &'a ExpTable,
}

impl<'a> ProcessContext<'a> {
    /// Resolve a slot to a sample: the literal, or the referenced node's
    /// current result.
    #[inline]
    pub(crate) fn param(&self, slot: usize) -> Sample {
        match self.params[slot] {
            Param::Constant(value) => value,
            Param::Node(id) => self.results[id.0],
        }
    }

    /// Resolved values of the slots in use, in slot order.
    #[inline]
    pub(crate) fn active(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.params_in_use).map(move |slot| self.param(slot))
    }

    /// This node's own result from its last completed evaluation.
    #[inline]
    pub(crate) fn current(&self) -> Sample {
        self.current
    }
}
