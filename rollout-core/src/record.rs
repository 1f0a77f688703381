//! Types and traits for recording values obtained during training and evaluation.
//!
//! # Core Components
//!
//! * [`Record`] - A container for key-value pairs of various data types
//! * [`RecordValue`] - Types of values that can be stored
//! * [`Recorder`] - The sink of the per-epoch report rows
//! * [`BufferedRecorder`] - A recorder keeping rows in memory
//! * [`NullRecorder`] - A recorder that discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use rollout_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let epoch = 1;
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("Epoch", RecordValue::Scalar(epoch as f32));
//! record.insert("Reward", RecordValue::Scalar(reward));
//! record.insert("Note", RecordValue::String("warmup".to_string()));
//! ```
//!
//! [`Trainer`](crate::Trainer) writes one [`Record`] per evaluated epoch
//! into a [`Recorder`]. The set of keys of these rows does not change during
//! a run.
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
