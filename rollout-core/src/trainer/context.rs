use serde::{Deserialize, Serialize};

/// Position of this process in a multi-process run.
///
/// Every process runs its own training loop. The process with rank 0 is the
/// authority: it is the only one that persists snapshots.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub struct RunContext {
    /// Rank of this process.
    pub rank: usize,

    /// The number of processes.
    ///
    /// Informational. The training loop only depends on `rank`.
    pub world_size: usize,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::single()
    }
}

impl RunContext {
    /// A context of a single-process run.
    pub fn single() -> Self {
        Self {
            rank: 0,
            world_size: 1,
        }
    }

    /// Constructs a context.
    pub fn new(rank: usize, world_size: usize) -> Self {
        Self { rank, world_size }
    }

    /// Returns `true` if this process persists shared artifacts.
    pub fn is_authority(&self) -> bool {
        self.rank == 0
    }
}

#[cfg(test)]
mod tests {
    use super::RunContext;

    #[test]
    fn test_authority() {
        assert!(RunContext::single().is_authority());
        assert!(RunContext::new(0, 4).is_authority());
        assert!(!RunContext::new(3, 4).is_authority());
    }
}
