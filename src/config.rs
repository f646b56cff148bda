//! Matrix sizing.

/// Default registry capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Default length of the hardware input and output vectors.
pub const DEFAULT_IO_LEN: usize = 8;

/// Sizing of a [`Matrix`](crate::Matrix): registry capacity and the lengths of
/// the hardware vectors.
///
/// ```
/// # use cvmatrix::MatrixConfig;
/// let config = MatrixConfig::default()
///     .with_capacity(64)
///     .with_outputs(4);
/// assert_eq!(config.capacity, 64);
/// assert_eq!(config.inputs, 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixConfig {
    /// Maximum number of registered nodes
    pub capacity: usize,
    /// Length of the hardware input vector
    pub inputs: usize,
    /// Length of the hardware output vector
    pub outputs: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            inputs: DEFAULT_IO_LEN,
            outputs: DEFAULT_IO_LEN,
        }
    }
}

impl MatrixConfig {
    /// Set the registry capacity (builder pattern).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the input vector length (builder pattern).
    pub fn with_inputs(mut self, inputs: usize) -> Self {
        self.inputs = inputs;
        self
    }

    /// Set the output vector length (builder pattern).
    pub fn with_outputs(mut self, outputs: usize) -> Self {
        self.outputs = outputs;
        self
    }
}
