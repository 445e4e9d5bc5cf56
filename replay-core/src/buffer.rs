//! Replay buffer with uniform sampling and observation normalization.
use crate::{
    ColumnData, ColumnStore, Dtype, ReplayBufferConfig, ReplayError, ReplayField, SampleBatch,
    ACTIONS, DONES, NEXT_OBS, OBS, REWARDS,
};
use anyhow::Result;
use log::info;
use ndarray::{ArrayD, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Added to the standard deviation before normalizing observations,
/// keeping the division finite when a feature has zero variance.
pub const OBS_STATS_EPSILON: f32 = 1e-7;

/// A fixed-capacity replay buffer over a columnar transition store.
///
/// Holds the five standard transition fields (observation, action, reward,
/// next observation, done) plus any extra fields registered through
/// [`add_fields`](Self::add_fields) before the first write. Rows are
/// appended with [`add`](Self::add); once the buffer is full, new rows
/// silently overwrite the oldest ones.
///
/// Sampling draws indices independently and uniformly with replacement
/// from an owned, explicitly seeded RNG, so a given seed reproduces the
/// same batches regardless of any ambient random state.
///
/// After [`update_obs_stats`](Self::update_obs_stats) has run, every read
/// path returns observation and next-observation columns normalized as
/// `(raw - mean) / (std + 1e-7)` with the statistics frozen at the time of
/// the call.
///
/// All methods take `&self`/`&mut self` and never block; concurrent use
/// requires external serialization.
pub struct ReplayBuffer {
    /// Columnar storage for all fields.
    store: ColumnStore,

    /// Sampling RNG, seeded from the config.
    rng: StdRng,

    /// Frozen observation statistics, set by `update_obs_stats`.
    obs_stats: Option<(ArrayD<f32>, ArrayD<f32>)>,
}

impl ReplayBuffer {
    /// Creates a buffer from a configuration.
    ///
    /// The observation and action fields take their per-row shapes from
    /// the config; rewards are scalar `F32` and dones scalar `Bool`.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::InvalidCapacity`] if the configured
    /// capacity is negative. Capacity 0 is legal and yields an
    /// always-empty buffer.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self> {
        if config.capacity < 0 {
            return Err(ReplayError::InvalidCapacity(config.capacity).into());
        }
        let fields = vec![
            ReplayField::new(OBS).shape(&config.obs_shape),
            ReplayField::new(ACTIONS).shape(&config.act_shape),
            ReplayField::new(REWARDS),
            ReplayField::new(NEXT_OBS).shape(&config.obs_shape),
            ReplayField::new(DONES).dtype(Dtype::Bool),
        ];

        Ok(Self {
            store: ColumnStore::new(config.capacity as usize, fields)?,
            rng: StdRng::seed_from_u64(config.seed),
            obs_stats: None,
        })
    }

    /// Reseeds the sampling RNG in place.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Returns the number of valid transitions.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no transitions are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the maximum number of transitions the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Returns the registered field descriptors in registration order.
    pub fn fields(&self) -> &[ReplayField] {
        self.store.fields()
    }

    /// Returns the frozen observation statistics `(mean, std)`, if
    /// [`update_obs_stats`](Self::update_obs_stats) has run.
    pub fn obs_stats(&self) -> Option<(&ArrayD<f32>, &ArrayD<f32>)> {
        self.obs_stats.as_ref().map(|(m, s)| (m, s))
    }

    /// Registers extra fields, fixing the row width before the first
    /// write. A single row then must carry every registered field.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::BufferAlreadyWritten`] once
    /// [`add`](Self::add) has been called, or
    /// [`ReplayError::DuplicateField`] on a name clash.
    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = ReplayField>) -> Result<()> {
        for field in fields {
            self.store.add_field(field)?;
        }
        Ok(())
    }

    /// Appends a batch of transitions, overwriting the oldest rows once
    /// the buffer is full.
    ///
    /// A single transition is a batch whose columns have one row. The
    /// write is all-or-nothing: a malformed batch leaves the buffer
    /// untouched.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::MissingField`],
    /// [`ReplayError::ShapeMismatch`] or [`ReplayError::DtypeMismatch`].
    pub fn add(&mut self, batch: &SampleBatch) -> Result<()> {
        self.store.write_batch(batch)
    }

    /// Samples `batch_size` transitions independently and uniformly with
    /// replacement, through the normalized read path.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::EmptyBuffer`] if no transitions are
    /// stored.
    pub fn sample(&mut self, batch_size: usize) -> Result<SampleBatch> {
        if self.store.is_empty() {
            return Err(ReplayError::EmptyBuffer("cannot sample").into());
        }
        let len = self.store.len();
        let ixs = (0..batch_size)
            .map(|_| self.rng.gen_range(0..len))
            .collect::<Vec<_>>();
        self.get(&ixs)
    }

    /// Returns the transitions at the given logical indices, observation
    /// fields normalized if statistics have been computed.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::IndexOutOfRange`] if any index is
    /// `>= len()`.
    pub fn get(&self, ixs: &[usize]) -> Result<SampleBatch> {
        let batch = self.store.read(ixs)?;
        Ok(self.normalize(batch))
    }

    /// Returns every valid transition, observation fields normalized if
    /// statistics have been computed.
    pub fn all_samples(&self) -> Result<SampleBatch> {
        let ixs = (0..self.store.len()).collect::<Vec<_>>();
        self.get(&ixs)
    }

    /// Recomputes the observation statistics over all currently valid
    /// rows: elementwise mean and population standard deviation. The
    /// statistics stay frozen until the next call, and every subsequent
    /// read applies them to the observation and next-observation fields.
    ///
    /// # Errors
    ///
    /// Fails with [`ReplayError::EmptyBuffer`] if no transitions are
    /// stored, since mean and std are undefined there.
    pub fn update_obs_stats(&mut self) -> Result<()> {
        if self.store.is_empty() {
            return Err(ReplayError::EmptyBuffer("cannot compute obs stats").into());
        }
        let ixs = (0..self.store.len()).collect::<Vec<_>>();
        let raw = self.store.read(&ixs)?;
        let obs = raw
            .get(OBS)
            .and_then(ColumnData::as_f32)
            .ok_or_else(|| ReplayError::MissingField(OBS.to_string()))?;
        let mean = obs
            .mean_axis(Axis(0))
            .ok_or_else(|| ReplayError::EmptyBuffer("cannot compute obs stats"))?;
        let std = obs.std_axis(Axis(0), 0.0);
        info!(
            "updated observation statistics over {} transitions",
            ixs.len()
        );
        self.obs_stats = Some((mean, std));
        Ok(())
    }

    /// Applies the frozen statistics to the observation fields of a batch
    /// read from the store. A no-op until `update_obs_stats` has run.
    fn normalize(&self, mut batch: SampleBatch) -> SampleBatch {
        if let Some((mean, std)) = &self.obs_stats {
            let denom = std + OBS_STATS_EPSILON;
            for key in [OBS, NEXT_OBS] {
                if let Some(ColumnData::F32(a)) = batch.get_mut(key) {
                    *a = (&*a - mean) / &denom;
                }
            }
        }
        batch
    }
}
