//! Keyed batches of dense columns exchanged with the training loop.
//!
//! A [`SampleBatch`] is a plain, order-preserving mapping from field name to
//! a dense column whose leading axis is the row axis. It is the only
//! container crossing the buffer boundary in either direction, keeping the
//! buffer decoupled from any particular training framework's batch type.

use crate::field::Dtype;
use ndarray::{Array1, ArrayBase, ArrayD, Axis, Data, Dimension, IxDyn, Slice};
use std::ops::Range;

/// A dense column of rows; the leading axis is the row axis.
///
/// Tagged by [`Dtype`] so heterogeneous columns (float observations,
/// boolean termination flags) live side by side in one batch.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// 32-bit float rows.
    F32(ArrayD<f32>),
    /// 64-bit float rows.
    F64(ArrayD<f64>),
    /// 64-bit signed integer rows.
    I64(ArrayD<i64>),
    /// Boolean rows.
    Bool(ArrayD<bool>),
}

impl ColumnData {
    /// Allocates a zeroed column of shape `(capacity,) + shape`.
    pub fn zeros(dtype: Dtype, capacity: usize, shape: &[usize]) -> Self {
        let mut full = Vec::with_capacity(shape.len() + 1);
        full.push(capacity);
        full.extend_from_slice(shape);
        let dim = IxDyn(&full);
        match dtype {
            Dtype::F32 => ColumnData::F32(ArrayD::from_elem(dim, 0.0)),
            Dtype::F64 => ColumnData::F64(ArrayD::from_elem(dim, 0.0)),
            Dtype::I64 => ColumnData::I64(ArrayD::from_elem(dim, 0)),
            Dtype::Bool => ColumnData::Bool(ArrayD::from_elem(dim, false)),
        }
    }

    /// Returns the numeric kind of this column.
    pub fn dtype(&self) -> Dtype {
        match self {
            ColumnData::F32(_) => Dtype::F32,
            ColumnData::F64(_) => Dtype::F64,
            ColumnData::I64(_) => Dtype::I64,
            ColumnData::Bool(_) => Dtype::Bool,
        }
    }

    /// Returns the full shape, row axis included.
    pub fn shape(&self) -> &[usize] {
        match self {
            ColumnData::F32(a) => a.shape(),
            ColumnData::F64(a) => a.shape(),
            ColumnData::I64(a) => a.shape(),
            ColumnData::Bool(a) => a.shape(),
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// Returns `true` if the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the per-row shape, i.e. the shape with the row axis removed.
    pub fn feature_shape(&self) -> &[usize] {
        let shape = self.shape();
        if shape.is_empty() {
            shape
        } else {
            &shape[1..]
        }
    }

    /// Gathers the rows at the given indices into a new column.
    pub fn select(&self, ixs: &[usize]) -> Self {
        match self {
            ColumnData::F32(a) => ColumnData::F32(a.select(Axis(0), ixs)),
            ColumnData::F64(a) => ColumnData::F64(a.select(Axis(0), ixs)),
            ColumnData::I64(a) => ColumnData::I64(a.select(Axis(0), ixs)),
            ColumnData::Bool(a) => ColumnData::Bool(a.select(Axis(0), ixs)),
        }
    }

    /// Returns the underlying array if this is an `F32` column.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            ColumnData::F32(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the underlying array if this is an `F64` column.
    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            ColumnData::F64(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the underlying array if this is an `I64` column.
    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            ColumnData::I64(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the underlying array if this is a `Bool` column.
    pub fn as_bool(&self) -> Option<&ArrayD<bool>> {
        match self {
            ColumnData::Bool(a) => Some(a),
            _ => None,
        }
    }

    /// Copies `src[src_range]` into `self` starting at row `dst_start`.
    ///
    /// Dtypes and per-row shapes must have been validated by the caller.
    pub(crate) fn copy_rows_from(&mut self, dst_start: usize, src: &Self, src_range: Range<usize>) {
        match (self, src) {
            (ColumnData::F32(dst), ColumnData::F32(src)) => {
                copy_rows(dst, dst_start, src, src_range)
            }
            (ColumnData::F64(dst), ColumnData::F64(src)) => {
                copy_rows(dst, dst_start, src, src_range)
            }
            (ColumnData::I64(dst), ColumnData::I64(src)) => {
                copy_rows(dst, dst_start, src, src_range)
            }
            (ColumnData::Bool(dst), ColumnData::Bool(src)) => {
                copy_rows(dst, dst_start, src, src_range)
            }
            _ => unreachable!("column dtypes are validated before writing"),
        }
    }
}

fn copy_rows<T: Clone>(dst: &mut ArrayD<T>, dst_start: usize, src: &ArrayD<T>, range: Range<usize>) {
    let n = range.len();
    dst.slice_axis_mut(Axis(0), Slice::from(dst_start..dst_start + n))
        .assign(&src.slice_axis(Axis(0), Slice::from(range)));
}

/// Maps a scalar type onto its [`ColumnData`] variant.
///
/// Lets arrays and vectors of any supported element type convert into
/// columns through a single `From` implementation.
pub trait Element: Copy {
    /// Wraps an owned dynamic array into the matching column variant.
    fn into_column(data: ArrayD<Self>) -> ColumnData;
}

impl Element for f32 {
    fn into_column(data: ArrayD<Self>) -> ColumnData {
        ColumnData::F32(data)
    }
}

impl Element for f64 {
    fn into_column(data: ArrayD<Self>) -> ColumnData {
        ColumnData::F64(data)
    }
}

impl Element for i64 {
    fn into_column(data: ArrayD<Self>) -> ColumnData {
        ColumnData::I64(data)
    }
}

impl Element for bool {
    fn into_column(data: ArrayD<Self>) -> ColumnData {
        ColumnData::Bool(data)
    }
}

impl<T, S, D> From<ArrayBase<S, D>> for ColumnData
where
    T: Element,
    S: Data<Elem = T>,
    D: Dimension,
{
    fn from(a: ArrayBase<S, D>) -> Self {
        T::into_column(a.to_owned().into_dyn())
    }
}

/// A `Vec<T>` converts into a column of scalar rows.
impl<T: Element> From<Vec<T>> for ColumnData {
    fn from(v: Vec<T>) -> Self {
        T::into_column(Array1::from(v).into_dyn())
    }
}

/// An order-preserving mapping from field name to column.
///
/// All columns of a well-formed batch share one leading row count;
/// [`crate::ColumnStore`] rejects inconsistent batches before writing.
///
/// # Examples
///
/// ```rust
/// use ndarray::Array2;
/// use replay_core::{SampleBatch, ACTIONS, OBS, REWARDS};
///
/// let batch = SampleBatch::new()
///     .with(OBS, Array2::<f32>::zeros((8, 3)))
///     .with(ACTIONS, Array2::<f32>::zeros((8, 2)))
///     .with(REWARDS, vec![0.0f32; 8]);
/// assert_eq!(batch.len(), 8);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleBatch {
    columns: Vec<(String, ColumnData)>,
}

impl SampleBatch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    /// Inserts a column, replacing any column under the same name.
    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<ColumnData>) {
        let name = name.into();
        let column = column.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, c)) => *c = column,
            None => self.columns.push((name, column)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, column: impl Into<ColumnData>) -> Self {
        self.insert(name, column);
        self
    }

    /// Returns the column under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Returns the column under `name` mutably, if any.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ColumnData> {
        self.columns
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Returns the row count of the first column, or 0 for a batch with
    /// no columns.
    pub fn len(&self) -> usize {
        self.columns.first().map(|(_, c)| c.len()).unwrap_or(0)
    }

    /// Returns `true` if the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over `(name, column)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnData)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }
}
