//! Pre-allocated circular storage for transition columns.
use crate::{ColumnData, ReplayError, ReplayField, SampleBatch};
use anyhow::Result;
use log::trace;

/// Fixed-capacity columnar store with circular-overwrite semantics.
///
/// One zero-initialized dense array of shape `(capacity,) + field.shape`
/// is pre-allocated per registered field. A write cursor advances modulo
/// the capacity, so once the store fills up new rows silently overwrite
/// the oldest ones; that eviction is the retention policy, not an error.
///
/// Logical indices `[0, len)` address the valid entries. Capacity 0 is
/// legal and degenerates to an always-empty store that discards writes.
pub struct ColumnStore {
    /// Maximum number of rows that can be stored.
    capacity: usize,

    /// Next write position, in `[0, capacity)`.
    cursor: usize,

    /// Number of valid rows, capped at `capacity`.
    len: usize,

    /// Whether any write has been accepted; freezes field registration.
    written: bool,

    /// Registered field descriptors, in registration order.
    fields: Vec<ReplayField>,

    /// One column per field, aligned with `fields`.
    columns: Vec<ColumnData>,
}

impl ColumnStore {
    /// Allocates a store for the given fields.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::DuplicateField`] if two descriptors share
    /// a name.
    pub fn new(capacity: usize, fields: Vec<ReplayField>) -> Result<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(ReplayError::DuplicateField(field.name.clone()).into());
            }
        }
        let columns = fields
            .iter()
            .map(|f| ColumnData::zeros(f.dtype, capacity, &f.shape))
            .collect();
        trace!(
            "allocated column store: capacity = {}, fields = {:?}",
            capacity,
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
        );

        Ok(Self {
            capacity,
            cursor: 0,
            len: 0,
            written: false,
            fields,
            columns,
        })
    }

    /// Registers an additional field, allocating its column.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::BufferAlreadyWritten`] once any write has
    /// been accepted, or [`ReplayError::DuplicateField`] on a name clash.
    pub fn add_field(&mut self, field: ReplayField) -> Result<()> {
        if self.written {
            return Err(ReplayError::BufferAlreadyWritten(field.name).into());
        }
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(ReplayError::DuplicateField(field.name).into());
        }
        self.columns
            .push(ColumnData::zeros(field.dtype, self.capacity, &field.shape));
        self.fields.push(field);
        Ok(())
    }

    /// Returns the number of valid rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no valid rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of rows the store can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the registered field descriptors in registration order.
    pub fn fields(&self) -> &[ReplayField] {
        &self.fields
    }

    /// Checks a batch against every registered field without mutating
    /// anything, returning the row count and the source columns aligned
    /// with `self.fields`. Keys matching no registered field are ignored.
    fn validate<'a>(&self, batch: &'a SampleBatch) -> Result<(usize, Vec<&'a ColumnData>)> {
        let mut rows: Option<usize> = None;
        let mut srcs = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let col = batch
                .get(&field.name)
                .ok_or_else(|| ReplayError::MissingField(field.name.clone()))?;
            if col.dtype() != field.dtype {
                return Err(ReplayError::DtypeMismatch {
                    field: field.name.clone(),
                    expected: field.dtype,
                    found: col.dtype(),
                }
                .into());
            }
            if col.feature_shape() != &field.shape[..] {
                return Err(ReplayError::ShapeMismatch {
                    field: field.name.clone(),
                    expected: field.shape.clone(),
                    found: col.feature_shape().to_vec(),
                }
                .into());
            }
            match rows {
                None => rows = Some(col.len()),
                Some(n) if n != col.len() => {
                    // Columns disagreeing on the row count are reported
                    // against the full column shape.
                    let mut expected = vec![n];
                    expected.extend_from_slice(&field.shape);
                    return Err(ReplayError::ShapeMismatch {
                        field: field.name.clone(),
                        expected,
                        found: col.shape().to_vec(),
                    }
                    .into());
                }
                Some(_) => {}
            }
            srcs.push(col);
        }
        Ok((rows.unwrap_or(0), srcs))
    }

    /// Writes a batch of rows at the cursor, wrapping across the capacity
    /// boundary in at most two contiguous slices (tail, then head).
    ///
    /// Equivalent to writing the rows one at a time in input order: a
    /// batch larger than the capacity keeps only its trailing `capacity`
    /// rows. All-or-nothing: the batch is fully validated before any
    /// column is touched.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::MissingField`],
    /// [`ReplayError::ShapeMismatch`] or [`ReplayError::DtypeMismatch`] on
    /// a malformed batch, leaving the store unchanged.
    pub fn write_batch(&mut self, batch: &SampleBatch) -> Result<()> {
        let (rows, srcs) = self.validate(batch)?;
        self.written = true;
        if rows == 0 {
            return Ok(());
        }
        if self.capacity == 0 {
            trace!("discarding {} rows written to a zero-capacity store", rows);
            return Ok(());
        }

        // Rows that would be overwritten within this very batch are
        // skipped instead of copied.
        let skip = rows.saturating_sub(self.capacity);
        let start = (self.cursor + skip) % self.capacity;
        let kept = rows - skip;
        let tail = kept.min(self.capacity - start);
        for (column, src) in self.columns.iter_mut().zip(srcs.into_iter()) {
            column.copy_rows_from(start, src, skip..skip + tail);
            if kept > tail {
                column.copy_rows_from(0, src, skip + tail..rows);
            }
        }

        self.cursor = (self.cursor + rows) % self.capacity;
        self.len = (self.len + rows).min(self.capacity);
        Ok(())
    }

    /// Gathers the rows at the given logical indices into a batch, one
    /// column per registered field.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::IndexOutOfRange`] if any index is
    /// `>= len()`.
    pub fn read(&self, ixs: &[usize]) -> Result<SampleBatch> {
        for &ix in ixs {
            if ix >= self.len {
                return Err(ReplayError::IndexOutOfRange {
                    index: ix,
                    len: self.len,
                }
                .into());
            }
        }
        let mut batch = SampleBatch::new();
        for (field, column) in self.fields.iter().zip(self.columns.iter()) {
            batch.insert(field.name.clone(), column.select(ixs));
        }
        Ok(batch)
    }
}
