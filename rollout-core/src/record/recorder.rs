use super::Record;

/// Receives the report rows of a training run.
///
/// Formatting and the output medium are up to implementations.
pub trait Recorder {
    /// Writes a report row.
    fn write(&mut self, record: Record);
}
