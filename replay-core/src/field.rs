//! Field descriptors declaring the columns of a replay buffer.
use serde::{Deserialize, Serialize};

/// Name of the observation field.
pub const OBS: &str = "obs";

/// Name of the action field.
pub const ACTIONS: &str = "actions";

/// Name of the reward field.
pub const REWARDS: &str = "rewards";

/// Name of the next-observation field.
pub const NEXT_OBS: &str = "next_obs";

/// Name of the episode-termination field.
pub const DONES: &str = "dones";

/// Numeric kind of a buffer column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dtype {
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// 64-bit signed integer.
    I64,
    /// Boolean flag.
    Bool,
}

/// Declares a named buffer column: per-row shape and numeric kind.
///
/// Descriptors are immutable once registered with a buffer. An empty
/// `shape` declares a scalar-per-row column.
///
/// # Examples
///
/// ```rust
/// use replay_core::{Dtype, ReplayField};
///
/// let log_prob = ReplayField::new("log_prob");
/// let goal = ReplayField::new("goal").shape(&[3]).dtype(Dtype::F64);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayField {
    /// Unique name of the column within a buffer.
    pub name: String,

    /// Per-row shape; the stored column has shape `(capacity,) + shape`.
    pub shape: Vec<usize>,

    /// Numeric kind of the stored values.
    pub dtype: Dtype,
}

impl ReplayField {
    /// Creates a scalar `F32` field with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: vec![],
            dtype: Dtype::F32,
        }
    }

    /// Sets the per-row shape.
    pub fn shape(mut self, shape: &[usize]) -> Self {
        self.shape = shape.to_vec();
        self
    }

    /// Sets the numeric kind.
    pub fn dtype(mut self, dtype: Dtype) -> Self {
        self.dtype = dtype;
        self
    }
}
