//! Configuration for bootstrap runs.

/// Configuration options for [`HierarchicalBootstrap`](crate::HierarchicalBootstrap).
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of bootstrap replicates per group (default: 100).
    pub nboots: usize,

    /// Optional deterministic seed.
    ///
    /// When set, repeated runs with identical inputs produce bit-identical
    /// distributions, in both serial and parallel builds. When `None`, a
    /// fresh seed is drawn from the thread RNG per run.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nboots: 100,
            seed: None,
        }
    }
}
