use super::{Record, Recorder};

/// Keeps report rows in memory in the order they were written.
#[derive(Default)]
pub struct BufferedRecorder {
    rows: Vec<Record>,
}

impl BufferedRecorder {
    /// Constructs an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.rows.iter()
    }

    /// Returns the last row.
    pub fn last(&self) -> Option<&Record> {
        self.rows.last()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no row has been written.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Takes the rows out of the recorder.
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.rows)
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.rows.push(record);
    }
}
