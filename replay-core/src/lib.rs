#![warn(missing_docs)]
//! Replay buffers for model-based reinforcement learning.
//!
//! A [`ReplayBuffer`] is a fixed-capacity circular store of transitions,
//! laid out column-by-column for vectorized writes and sampling:
//!
//! - [`ReplayField`]: declares a named column, its per-row shape and its
//!   [`Dtype`].
//! - [`ColumnStore`]: pre-allocated dense columns with circular-overwrite
//!   semantics; batch writes split into at most two contiguous slices
//!   across the wrap boundary.
//! - [`ReplayBuffer`]: uniform sampling with replacement from an
//!   explicitly seeded RNG, plus optional on-the-fly observation
//!   normalization from frozen mean/std statistics.
//!
//! Batches cross the buffer boundary as [`SampleBatch`], a plain keyed
//! mapping from field name to dense column, so downstream consumers
//! (critic, actor and model learners) stay decoupled from any particular
//! training framework's batch container.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::Array2;
//! use replay_core::{
//!     ReplayBuffer, ReplayBufferConfig, SampleBatch,
//!     ACTIONS, DONES, NEXT_OBS, OBS, REWARDS,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ReplayBufferConfig::default()
//!         .capacity(100)
//!         .seed(42)
//!         .obs_shape(&[3])
//!         .act_shape(&[2]);
//!     let mut buffer = ReplayBuffer::build(&config)?;
//!
//!     let batch = SampleBatch::new()
//!         .with(OBS, Array2::<f32>::zeros((4, 3)))
//!         .with(ACTIONS, Array2::<f32>::zeros((4, 2)))
//!         .with(REWARDS, vec![0.0f32; 4])
//!         .with(NEXT_OBS, Array2::<f32>::zeros((4, 3)))
//!         .with(DONES, vec![false; 4]);
//!     buffer.add(&batch)?;
//!
//!     let samples = buffer.sample(2)?;
//!     assert_eq!(samples.len(), 2);
//!     Ok(())
//! }
//! ```
pub mod error;

mod batch;
mod buffer;
mod column_store;
mod config;
mod field;

pub use batch::{ColumnData, Element, SampleBatch};
pub use buffer::{ReplayBuffer, OBS_STATS_EPSILON};
pub use column_store::ColumnStore;
pub use config::ReplayBufferConfig;
pub use error::ReplayError;
pub use field::{Dtype, ReplayField, ACTIONS, DONES, NEXT_OBS, OBS, REWARDS};
