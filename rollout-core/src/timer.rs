//! Named duration stamps over iterations of a loop.
//!
//! A [`Stopwatch`] attributes the time elapsed since the previous stamp to the
//! name given in [`Stopwatch::stamp`]. Stamps with the same name within an
//! iteration accumulate. [`Stopwatch::end_itr`] closes the iteration; only
//! closed iterations are visible through [`Stopwatch::last`].
//! [`Stopwatch::names`] also lists the names of the current iteration.
//!
//! ```rust
//! use rollout_core::Stopwatch;
//!
//! let mut sw = Stopwatch::new();
//! for _ in 0..2 {
//!     // collect samples ...
//!     sw.stamp("sample");
//!     // update parameters ...
//!     sw.stamp("train");
//!     sw.end_itr();
//! }
//! assert!(sw.last("sample").is_some());
//! assert!(sw.last("eval").is_none());
//! ```
use std::{
    collections::{BTreeMap, BTreeSet},
    time::{Duration, Instant},
};

/// Accumulates named durations per iteration.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start: Instant,
    last_stamp: Instant,
    current: BTreeMap<String, Duration>,
    itrs: BTreeMap<String, Vec<Duration>>,
    n_itrs: usize,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Creates a stopwatch started now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_stamp: now,
            current: BTreeMap::new(),
            itrs: BTreeMap::new(),
            n_itrs: 0,
        }
    }

    /// Discards all stamps and restarts the stopwatch.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Attributes the time since the previous stamp to `name`.
    pub fn stamp(&mut self, name: &str) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_stamp);
        *self.current.entry(name.to_string()).or_default() += dt;
        self.last_stamp = now;
    }

    /// Closes the current iteration.
    pub fn end_itr(&mut self) {
        for (name, dt) in std::mem::take(&mut self.current).into_iter() {
            self.itrs.entry(name).or_default().push(dt);
        }
        self.n_itrs += 1;
        self.last_stamp = Instant::now();
    }

    /// Returns the value of `name` in the latest closed iteration that stamped it.
    pub fn last(&self, name: &str) -> Option<Duration> {
        self.itrs.get(name).and_then(|v| v.last().copied())
    }

    /// Returns the names stamped so far, including the current iteration, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let names = self
            .itrs
            .keys()
            .chain(self.current.keys())
            .map(|k| k.as_str())
            .collect::<BTreeSet<_>>();
        names.into_iter().collect()
    }

    /// Returns the number of closed iterations.
    pub fn n_itrs(&self) -> usize {
        self.n_itrs
    }

    /// Returns the time elapsed since the stopwatch was (re)started.
    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }
}
