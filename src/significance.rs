//! Non-parametric significance estimation from bootstrap distributions.
//!
//! The estimator never re-accesses the raw dataset: it works purely on the
//! paired replicate values of two groups. For each replicate index `i`, the
//! difference `d_i = a[i] - b[i]` records which group's mean came out larger
//! in that resample. The p-value is the fraction of non-negative differences,
//! folded to ≤ 0.5 as a symmetric two-sided estimate: a small p means the
//! ordering was consistent across nearly all resamples.
//!
//! The fold is applied literally, with no continuity correction for the
//! discreteness of the replicate count.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::summary::BootstrapSummary;

/// Significance of one unordered group pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceRecord {
    /// Pair name, `"<group1>_<group2>"`.
    pub name: String,
    /// First group of the pair (earlier in group order).
    pub group1: String,
    /// Second group of the pair.
    pub group2: String,
    /// Folded two-sided p-value in `[0, 0.5]`.
    pub p: f64,
    /// Replicate count both distributions were built from.
    pub nboots: usize,
}

/// Estimate the significance of the metric difference between two groups.
///
/// Returns the folded sign-test p-value in `[0, 0.5]`. Fails with
/// [`Error::InvalidArgument`] if either group is absent from the summary or
/// the two distributions have different lengths, and with
/// [`Error::DegenerateInput`] if the distributions are empty (possible for
/// summaries deserialized from external data; the engine never produces
/// them).
///
/// Note one structural edge case: comparing a group against its *own stored
/// distribution* yields p = 0, not 0.5. Every `d_i` is exactly zero, so all
/// differences count as non-negative and the fold maps 1.0 to 0.0. A p ≈ 0.5
/// self-comparison requires two independently bootstrapped copies of the
/// group.
pub fn significance(summary: &BootstrapSummary, group1: &str, group2: &str) -> Result<f64> {
    let a = summary
        .group(group1)
        .ok_or_else(|| Error::invalid(format!("no such group '{group1}'")))?;
    let b = summary
        .group(group2)
        .ok_or_else(|| Error::invalid(format!("no such group '{group2}'")))?;

    if a.replicates.len() != b.replicates.len() {
        return Err(Error::invalid(format!(
            "replicate count mismatch: '{}' has {}, '{}' has {}",
            group1,
            a.replicates.len(),
            group2,
            b.replicates.len()
        )));
    }

    let nboots = a.replicates.len();
    if nboots == 0 {
        return Err(Error::degenerate(format!(
            "empty bootstrap distributions for '{group1}' and '{group2}'"
        )));
    }

    let non_negative = a
        .replicates
        .iter()
        .zip(&b.replicates)
        .filter(|(x, y)| *x - *y >= 0.0)
        .count();

    let p = non_negative as f64 / nboots as f64;
    Ok(if p > 0.5 { 1.0 - p } else { p })
}

/// Significance for every unordered pair of groups, in group order.
///
/// Fails with [`Error::Unsupported`] when the summary holds fewer than two
/// groups, since a two-sample statistic is undefined there.
pub fn pairwise_significance(summary: &BootstrapSummary) -> Result<Vec<SignificanceRecord>> {
    let groups: Vec<&str> = summary.group_names().collect();
    if groups.len() < 2 {
        return Err(Error::unsupported(
            "significance requires at least two groups",
        ));
    }

    let mut records = Vec::with_capacity(groups.len() * (groups.len() - 1) / 2);
    for (i, &group1) in groups.iter().enumerate() {
        for &group2 in &groups[i + 1..] {
            records.push(SignificanceRecord {
                name: format!("{group1}_{group2}"),
                group1: group1.to_string(),
                group2: group2.to_string(),
                p: significance(summary, group1, group2)?,
                nboots: summary.nboots(),
            });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{BootstrapSummary, GroupDistribution};

    fn summary_of(groups: Vec<(&str, Vec<f64>)>) -> BootstrapSummary {
        let nboots = groups.first().map_or(0, |(_, r)| r.len());
        BootstrapSummary::from_parts(
            nboots,
            groups
                .into_iter()
                .map(|(name, replicates)| {
                    GroupDistribution::from_replicates(name.to_string(), replicates)
                })
                .collect(),
        )
    }

    #[test]
    fn perfect_separation_gives_zero() {
        let summary = summary_of(vec![
            ("low", vec![0.0; 20]),
            ("high", vec![10.0; 20]),
        ]);
        assert_eq!(significance(&summary, "low", "high").unwrap(), 0.0);
        // Symmetric in argument order because of the fold.
        assert_eq!(significance(&summary, "high", "low").unwrap(), 0.0);
    }

    #[test]
    fn fold_keeps_p_at_most_half() {
        // 7 of 10 differences non-negative: p = 0.7 folds to 0.3.
        let a = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0];
        let b = vec![0.0; 10];
        let summary = summary_of(vec![("a", a), ("b", b)]);
        let p = significance(&summary, "a", "b").unwrap();
        assert!((p - 0.3).abs() < 1e-12);
    }

    #[test]
    fn self_comparison_is_trivially_zero() {
        // All d_i are exactly 0, which counts as non-negative: p = 1.0,
        // folded to 0. Documented edge case, not a bug.
        let summary = summary_of(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![4.0, 3.0, 2.0, 1.0]),
        ]);
        assert_eq!(significance(&summary, "a", "a").unwrap(), 0.0);
    }

    #[test]
    fn missing_group_is_invalid() {
        let summary = summary_of(vec![("a", vec![1.0]), ("b", vec![2.0])]);
        assert!(matches!(
            significance(&summary, "a", "zzz"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_distributions_are_degenerate_not_nan() {
        // The engine cannot produce empty distributions, but a deserialized
        // summary can carry them. The 0/0 division must be rejected up
        // front, never returned as NaN.
        let summary = summary_of(vec![("a", vec![]), ("b", vec![])]);
        assert!(matches!(
            significance(&summary, "a", "b"),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn length_mismatch_is_invalid() {
        let summary = summary_of(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(matches!(
            significance(&summary, "a", "b"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn pairwise_covers_all_unordered_pairs() {
        let summary = summary_of(vec![
            ("a", vec![0.0; 10]),
            ("b", vec![5.0; 10]),
            ("c", vec![10.0; 10]),
        ]);
        let records = pairwise_significance(&summary).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a_b", "a_c", "b_c"]);
        for record in &records {
            assert_eq!(record.p, 0.0);
            assert_eq!(record.nboots, 10);
        }
    }

    #[test]
    fn pairwise_single_group_is_unsupported() {
        let summary = summary_of(vec![("only", vec![1.0, 2.0])]);
        assert!(matches!(
            pairwise_significance(&summary),
            Err(Error::Unsupported(_))
        ));
    }
}
