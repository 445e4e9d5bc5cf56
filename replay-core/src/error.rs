//! Errors raised by the replay buffer.
use crate::field::Dtype;
use thiserror::Error;

/// Errors raised by the replay buffer.
///
/// Every fallible operation surfaces one of these synchronously at the
/// offending call; nothing is retried internally. Public APIs return
/// [`anyhow::Result`], so callers match on the taxonomy via
/// `err.downcast_ref::<ReplayError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    /// A negative capacity was requested, e.g. through a config file.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(i64),

    /// A field with the same name is already registered.
    #[error("duplicate field: {0:?}")]
    DuplicateField(String),

    /// Field registration was attempted after the buffer accepted writes.
    #[error("cannot register field {0:?}: buffer has already been written")]
    BufferAlreadyWritten(String),

    /// An incoming batch lacks a registered field.
    #[error("missing field: {0:?}")]
    MissingField(String),

    /// A column's shape does not match its field descriptor.
    #[error("shape mismatch for field {field:?}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Name of the offending field.
        field: String,
        /// Shape declared by the field descriptor.
        expected: Vec<usize>,
        /// Shape carried by the incoming column.
        found: Vec<usize>,
    },

    /// A column's dtype does not match its field descriptor.
    #[error("dtype mismatch for field {field:?}: expected {expected:?}, found {found:?}")]
    DtypeMismatch {
        /// Name of the offending field.
        field: String,
        /// Dtype declared by the field descriptor.
        expected: Dtype,
        /// Dtype carried by the incoming column.
        found: Dtype,
    },

    /// A read index is outside `[0, len)`.
    #[error("index {index} out of range for buffer of length {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of valid entries at the time of the call.
        len: usize,
    },

    /// Sampling or statistics were requested on a buffer with no entries.
    #[error("empty buffer: {0}")]
    EmptyBuffer(&'static str),
}
