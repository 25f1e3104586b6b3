//! Naive two-sample t-test baseline.
//!
//! Classic pooled-variance Student t-test on the raw per-observation metric
//! values, ignoring the hierarchy entirely. Nested observations are not
//! independent, so this test is usually anti-conservative on hierarchical
//! data; it exists as the comparison baseline the bootstrap is meant to
//! replace, not as part of the core estimator.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{Error, Result};
use crate::summary::BootstrapSummary;
use crate::table::Table;

/// Two-sided p-value of a pooled-variance two-sample t-test between the raw
/// metric values of two groups.
///
/// Errors: [`Error::InvalidArgument`] for unknown columns or a group value
/// absent from the column; [`Error::Unsupported`] when a group has fewer
/// than two observations.
pub fn naive_ttest(
    table: &Table,
    metric: &str,
    group_column: &str,
    group1: &str,
    group2: &str,
) -> Result<f64> {
    let values = table.metric(metric)?;
    let labels = table.label(group_column)?;

    let collect = |group: &str| -> Result<Vec<f64>> {
        let selected: Vec<f64> = labels
            .iter()
            .zip(values)
            .filter(|(label, _)| label.as_str() == group)
            .map(|(_, &v)| v)
            .collect();
        if selected.is_empty() {
            return Err(Error::invalid(format!(
                "no such group '{group}' in column '{group_column}'"
            )));
        }
        if selected.len() < 2 {
            return Err(Error::unsupported(format!(
                "group '{group}' has fewer than two observations"
            )));
        }
        Ok(selected)
    };

    let a = collect(group1)?;
    let b = collect(group2)?;

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let m1 = a.iter().sum::<f64>() / n1;
    let m2 = b.iter().sum::<f64>() / n2;
    let ss1: f64 = a.iter().map(|v| (v - m1).powi(2)).sum();
    let ss2: f64 = b.iter().map(|v| (v - m2).powi(2)).sum();

    let df = n1 + n2 - 2.0;
    let pooled_var = (ss1 + ss2) / df;
    if pooled_var == 0.0 {
        // Both samples constant: identical means are indistinguishable,
        // different means are perfectly separated.
        return Ok(if m1 == m2 { 1.0 } else { 0.0 });
    }

    let t = (m1 - m2) / (pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df).expect("positive degrees of freedom");
    Ok(2.0 * (1.0 - dist.cdf(t.abs())))
}

/// Naive p-value for every unordered group pair of `summary`, in the same
/// pair order as
/// [`pairwise_significance`](crate::significance::pairwise_significance), as
/// `(pair_name, p)` tuples.
///
/// Fails with [`Error::Unsupported`] when the summary holds fewer than two
/// groups.
pub fn naive_pairwise(
    table: &Table,
    metric: &str,
    group_column: &str,
    summary: &BootstrapSummary,
) -> Result<Vec<(String, f64)>> {
    let groups: Vec<&str> = summary.group_names().collect();
    if groups.len() < 2 {
        return Err(Error::unsupported(
            "naive t-test requires at least two groups",
        ));
    }

    let mut pairs = Vec::with_capacity(groups.len() * (groups.len() - 1) / 2);
    for (i, &group1) in groups.iter().enumerate() {
        for &group2 in &groups[i + 1..] {
            let p = naive_ttest(table, metric, group_column, group1, group2)?;
            pairs.push((format!("{group1}_{group2}"), p));
        }
    }
    Ok(pairs)
}
