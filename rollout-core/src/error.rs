//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TrainerError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The collection mode is neither `online` nor `batch`.
    #[error("Invalid collection_mode: {0}")]
    InvalidCollectionMode(String),

    /// `batch` collection mode was selected without `num_updates_per_epoch`.
    #[error("collection_mode `batch` requires num_updates_per_epoch")]
    MissingUpdatesPerEpoch,

    /// An interval or size that is used as a divisor was set to zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    /// Parameters would be saved in an epoch that is never evaluated.
    #[error(
        "num_epochs_per_param_save ({per_param_save}) must be a multiple of \
         num_epochs_per_eval ({per_eval})"
    )]
    ParamSaveNotMultipleOfEval {
        /// `num_epochs_per_eval`.
        per_eval: usize,

        /// `num_epochs_per_param_save`.
        per_param_save: usize,
    },

    /// The set of reported keys changed between evaluations.
    ///
    /// Rewriting the table header is not supported, so the run is stopped.
    #[error("Table keys cannot change from iteration to iteration: added {added:?}, removed {removed:?}")]
    TableKeysChanged {
        /// Keys present in the current row only.
        added: Vec<String>,

        /// Keys present in the previous row only.
        removed: Vec<String>,
    },
}
