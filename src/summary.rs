//! Bootstrap result types.

use serde::{Deserialize, Serialize};

/// One group's bootstrap distribution and its spread.
///
/// `sem` is derived state: on deserialization it is recomputed from
/// `replicates` rather than trusted, so a summary read back from external
/// data cannot carry an inconsistent standard error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawGroupDistribution")]
pub struct GroupDistribution {
    /// Group identifier: a distinct top-level value, or the metric column
    /// name when the dataset was bootstrapped as a single group.
    pub name: String,

    /// Replicate means in insertion order; length equals the requested
    /// replicate count.
    pub replicates: Vec<f64>,

    /// Hierarchical standard-error estimate: the population standard
    /// deviation (divide by N, not N−1) of `replicates`.
    pub sem: f64,
}

impl GroupDistribution {
    pub(crate) fn from_replicates(name: String, replicates: Vec<f64>) -> Self {
        let sem = population_std(&replicates);
        Self {
            name,
            replicates,
            sem,
        }
    }
}

/// Wire form of [`GroupDistribution`]; accepts a `sem` field for round-trip
/// compatibility but discards it in favor of the recomputed value.
#[derive(Deserialize)]
struct RawGroupDistribution {
    name: String,
    replicates: Vec<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    sem: f64,
}

impl From<RawGroupDistribution> for GroupDistribution {
    fn from(raw: RawGroupDistribution) -> Self {
        GroupDistribution::from_replicates(raw.name, raw.replicates)
    }
}

/// Finished artifact of one bootstrap run: per-group distributions in
/// first-seen group order, plus derived standard errors.
///
/// Immutable once returned; the significance estimators consume it without
/// re-accessing the raw dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSummary {
    nboots: usize,
    groups: Vec<GroupDistribution>,
}

impl BootstrapSummary {
    pub(crate) fn from_parts(nboots: usize, groups: Vec<GroupDistribution>) -> Self {
        Self { nboots, groups }
    }

    /// Requested replicate count (every group's distribution has this
    /// length).
    pub fn nboots(&self) -> usize {
        self.nboots
    }

    /// Number of groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Group identifiers in first-seen order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// All group distributions in first-seen order.
    pub fn groups(&self) -> &[GroupDistribution] {
        &self.groups
    }

    /// Look up one group's distribution by name.
    pub fn group(&self, name: &str) -> Option<&GroupDistribution> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Look up one group's standard error by name.
    pub fn sem(&self, name: &str) -> Option<f64> {
        self.group(name).map(|g| g.sem)
    }
}

/// Population standard deviation (N in the denominator).
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}
