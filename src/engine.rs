//! Main `HierarchicalBootstrap` entry point and builder.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sampler::SliceTree;
use crate::summary::{BootstrapSummary, GroupDistribution};
use crate::table::{partition_by, Table};
use crate::thread_pool;

/// Counter-based RNG seed derivation using SplitMix64.
///
/// A stateless PRF mapping (base seed, counter) to a well-distributed 64-bit
/// seed. Each replicate gets its own generator seeded this way, which keeps
/// replicates independent, makes parallel and serial runs bit-identical, and
/// avoids the sequential correlation a plain `base + counter` scheme would
/// introduce.
#[inline]
pub(crate) fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Hierarchical bootstrap runner.
///
/// Use the builder pattern to configure replicate count, determinism and
/// top-level grouping, then [`run`](HierarchicalBootstrap::run) against a
/// [`Table`].
///
/// # Example
///
/// ```
/// use hier_bootstrap::{HierarchicalBootstrap, Table};
///
/// let table = Table::new()
///     .with_label("subject", vec!["a".into(), "a".into(), "b".into(), "b".into()])
///     .unwrap()
///     .with_label("trial", vec!["1".into(), "2".into(), "1".into(), "2".into()])
///     .unwrap()
///     .with_metric("response", vec![1.0, 2.0, 3.0, 4.0])
///     .unwrap();
///
/// let summary = HierarchicalBootstrap::new()
///     .nboots(200)
///     .seed(42)
///     .run(&table, "response", &["subject", "trial"])
///     .unwrap();
///
/// assert_eq!(summary.group("response").unwrap().replicates.len(), 200);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HierarchicalBootstrap {
    config: Config,
    top_level: Option<String>,
}

impl HierarchicalBootstrap {
    /// Create with default configuration (100 replicates, entropy seed, no
    /// top-level grouping).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of replicates per group.
    pub fn nboots(mut self, n: usize) -> Self {
        self.config.nboots = n;
        self
    }

    /// Set a deterministic base seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Partition the dataset by this categorical column and bootstrap each
    /// partition independently.
    ///
    /// The top-level column is not itself resampled; its distinct values (in
    /// first-seen order) become the summary's group identifiers.
    pub fn top_level(mut self, column: impl Into<String>) -> Self {
        self.top_level = Some(column.into());
        self
    }

    /// Access the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the bootstrap: `nboots` independent hierarchical resamples per
    /// group of `metric`, nested according to `levels` (coarsest to finest).
    ///
    /// Without a top-level column the whole table is one group named after
    /// the metric column. Errors: [`Error::InvalidArgument`] for unknown
    /// columns, an empty hierarchy or `nboots == 0`;
    /// [`Error::DegenerateInput`] for an empty table or partition.
    pub fn run(&self, table: &Table, metric: &str, levels: &[&str]) -> Result<BootstrapSummary> {
        if self.config.nboots == 0 {
            return Err(Error::invalid("nboots must be positive"));
        }
        if levels.is_empty() {
            return Err(Error::invalid("hierarchy levels must not be empty"));
        }
        if table.is_empty() {
            return Err(Error::degenerate("dataset has no records"));
        }

        let all_rows: Vec<usize> = (0..table.len()).collect();
        let partitions: Vec<(String, Vec<usize>)> = match &self.top_level {
            None => vec![(metric.to_string(), all_rows)],
            Some(column) => partition_by(table.label(column)?, &all_rows),
        };

        let base_seed = match self.config.seed {
            Some(seed) => seed,
            None => rand::rng().random(),
        };

        let mut groups = Vec::with_capacity(partitions.len());
        for (group_index, (name, rows)) in partitions.into_iter().enumerate() {
            let tree = SliceTree::build(table, metric, levels, &rows)?;
            let group_seed = counter_rng_seed(base_seed, group_index as u64);
            let replicates = run_replicates(&tree, self.config.nboots, group_seed);
            groups.push(GroupDistribution::from_replicates(name, replicates));
        }

        Ok(BootstrapSummary::from_parts(self.config.nboots, groups))
    }
}

/// Convenience wrapper with default configuration and no top-level grouping.
///
/// # Example
///
/// ```no_run
/// # fn demo(table: &hier_bootstrap::Table) -> hier_bootstrap::Result<()> {
/// let summary = hier_bootstrap::bootstrap(table, "response", &["level_1", "level_2"])?;
/// println!("SEM: {:?}", summary.sem("response"));
/// # Ok(())
/// # }
/// ```
pub fn bootstrap(table: &Table, metric: &str, levels: &[&str]) -> Result<BootstrapSummary> {
    HierarchicalBootstrap::new().run(table, metric, levels)
}

/// One replicate: a fresh counter-seeded generator, one full resample of the
/// tree, the resample's mean.
fn replicate(tree: &SliceTree, group_seed: u64, index: usize) -> f64 {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(group_seed, index as u64));
    let (sum, count) = tree.sample(&mut rng);
    // count > 0 is guaranteed by SliceTree::build rejecting empty slices.
    sum / count as f64
}

#[cfg(feature = "parallel")]
fn run_replicates(tree: &SliceTree, nboots: usize, group_seed: u64) -> Vec<f64> {
    thread_pool::install(|| {
        (0..nboots)
            .into_par_iter()
            .map(|i| replicate(tree, group_seed, i))
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn run_replicates(tree: &SliceTree, nboots: usize, group_seed: u64) -> Vec<f64> {
    thread_pool::install(|| (0..nboots).map(|i| replicate(tree, group_seed, i)).collect())
}
