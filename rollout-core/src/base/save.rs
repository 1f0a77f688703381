use anyhow::Result;
use std::path::Path;

/// An object whose state can be written into a snapshot.
pub trait SaveParams {
    /// Saves the state of the object in the given directory.
    ///
    /// This method commonly creates a number of files in the directory.
    fn save_params(&self, path: &Path) -> Result<()>;
}
