use crate::record::{Record, RecordValue};

/// Statistics computed by an [`Algorithm`](crate::Algorithm) for the next evaluation.
///
/// The trainer marks the statistics stale after each evaluation. Evaluation
/// is skipped until the algorithm refreshes them.
#[derive(Debug, Clone)]
pub struct EvalStatistics {
    record: Record,
    needs_refresh: bool,
}

impl Default for EvalStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalStatistics {
    /// Creates empty statistics which need to be refreshed.
    pub fn new() -> Self {
        Self {
            record: Record::empty(),
            needs_refresh: true,
        }
    }

    /// Returns `true` if the statistics have not been refreshed since the last evaluation.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Replaces the statistics and marks them fresh.
    pub fn refresh(&mut self, record: Record) {
        self.record = record;
        self.needs_refresh = false;
    }

    /// Inserts a value and marks the statistics fresh.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.record.insert(k, v);
        self.needs_refresh = false;
    }

    /// Marks the statistics stale.
    pub fn mark_stale(&mut self) {
        self.needs_refresh = true;
    }

    /// Returns the statistics.
    pub fn get(&self) -> &Record {
        &self.record
    }
}
