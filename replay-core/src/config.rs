//! Configuration for the replay buffer.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration for [`ReplayBuffer`](crate::ReplayBuffer).
///
/// # Examples
///
/// ```rust
/// use replay_core::ReplayBufferConfig;
///
/// let config = ReplayBufferConfig::default()
///     .capacity(10000)
///     .seed(42)
///     .obs_shape(&[17])
///     .act_shape(&[6]);
/// ```
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ReplayBufferConfig {
    /// Maximum number of transitions that can be stored. Signed so that a
    /// negative value arriving from a config file is rejected at build
    /// time instead of wrapping; 0 yields an always-empty buffer.
    pub capacity: i64,

    /// Seed of the sampling RNG. The same seed reproduces the same
    /// sampled batches.
    pub seed: u64,

    /// Per-row shape of the observation and next-observation fields;
    /// empty for scalar observations.
    pub obs_shape: Vec<usize>,

    /// Per-row shape of the action field; empty for scalar actions.
    pub act_shape: Vec<usize>,
}

impl Default for ReplayBufferConfig {
    /// Capacity 10000, seed 42, scalar observations and actions.
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
            obs_shape: vec![],
            act_shape: vec![],
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity.
    pub fn capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the sampling seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the observation shape.
    pub fn obs_shape(mut self, obs_shape: &[usize]) -> Self {
        self.obs_shape = obs_shape.to_vec();
        self
    }

    /// Sets the action shape.
    pub fn act_shape(mut self, act_shape: &[usize]) -> Self {
        self.act_shape = act_shape.to_vec();
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
