use serde::Deserialize;

/// Options controlling how a resample is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    /// Number of contiguous output chunks. `None` uses one chunk per worker
    /// thread of the rayon pool (or a single chunk without the `parallel`
    /// feature).
    pub workers: Option<usize>,
}

impl ResampleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub(crate) fn resolve_workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers).max(1)
    }
}

#[cfg(feature = "parallel")]
fn default_workers() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn default_workers() -> usize {
    1
}
