//! A row of the training report.
use crate::error::TrainerError;
use std::collections::{hash_map::Keys, HashMap, HashSet};
use xxhash_rust::xxh3::Xxh3Builder;

/// A value in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A scalar, e.g., a counter, a duration or a loss.
    Scalar(f32),

    /// A text value.
    String(String),
}

/// Named values reported together, e.g., the statistics of an epoch.
///
/// # Examples
///
/// ```rust
/// use rollout_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("Loss", 0.5);
/// record.insert("AverageReturn", RecordValue::Scalar(12.0));
///
/// assert_eq!(record.get_scalar("Loss").unwrap(), 0.5);
/// assert!(record.get_scalar("Epoch").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record with a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        let mut record = Self::empty();
        record.insert(name, RecordValue::Scalar(value));
        record
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Returns the set of keys, which is the schema of a report row.
    pub fn key_set(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        keys.extend(self.0.keys().cloned());
        keys
    }

    /// Inserts a value, replacing the one with the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns the value of `k`.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has `k`.
    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    /// Moves the values of `record` into this one.
    ///
    /// Values of `record` take precedence on the same key.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Returns the scalar value of `k`.
    pub fn get_scalar(&self, k: &str) -> Result<f32, TrainerError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(TrainerError::RecordValueTypeError("Scalar".to_string())),
            None => Err(TrainerError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the text value of `k`.
    pub fn get_string(&self, k: &str) -> Result<&str, TrainerError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s),
            Some(_) => Err(TrainerError::RecordValueTypeError("String".to_string())),
            None => Err(TrainerError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record has no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
