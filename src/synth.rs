//! Synthetic nested Gaussian datasets.
//!
//! Three-level random-effects data for demonstrations and tests: each
//! experiment draws a mean, each subject draws a mean around its experiment,
//! each trial draws a response around its subject. All three noise terms are
//! standard normal, so between-level and within-level variance contribute
//! equally. This is the regime where a naive SEM is most misleading.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::table::Table;

/// Generate one nested dataset.
///
/// `n` gives the fan-out per level: `n[0]` experiments, `n[1]` subjects per
/// experiment, `n[2]` trials per subject. `shift` is added to every
/// response. Columns: `level_1`, `level_2`, `level_3` (labels) and
/// `response` (metric).
pub fn nested_gaussian<R: Rng + ?Sized>(rng: &mut R, n: [usize; 3], shift: f64) -> Table {
    let (level_1, level_2, level_3, response) = nested_columns(rng, n, shift);
    Table::new()
        .with_label("level_1", level_1)
        .expect("fresh table")
        .with_label("level_2", level_2)
        .expect("columns have equal length")
        .with_label("level_3", level_3)
        .expect("columns have equal length")
        .with_metric("response", response)
        .expect("columns have equal length")
}

/// Generate two stacked nested datasets, `group_1` and `group_2`, with the
/// second group's responses shifted by `group_diff`.
///
/// Same columns as [`nested_gaussian`] plus a `group` label column, ready
/// for a `top_level("group")` bootstrap.
pub fn two_group<R: Rng + ?Sized>(rng: &mut R, n: [usize; 3], group_diff: f64) -> Table {
    let mut group = Vec::new();
    let mut level_1 = Vec::new();
    let mut level_2 = Vec::new();
    let mut level_3 = Vec::new();
    let mut response = Vec::new();

    for (name, shift) in [("group_1", 0.0), ("group_2", group_diff)] {
        let (l1, l2, l3, resp) = nested_columns(rng, n, shift);
        group.extend(std::iter::repeat(name.to_string()).take(resp.len()));
        level_1.extend(l1);
        level_2.extend(l2);
        level_3.extend(l3);
        response.extend(resp);
    }

    Table::new()
        .with_label("group", group)
        .expect("fresh table")
        .with_label("level_1", level_1)
        .expect("columns have equal length")
        .with_label("level_2", level_2)
        .expect("columns have equal length")
        .with_label("level_3", level_3)
        .expect("columns have equal length")
        .with_metric("response", response)
        .expect("columns have equal length")
}

type Columns = (Vec<String>, Vec<String>, Vec<String>, Vec<f64>);

fn nested_columns<R: Rng + ?Sized>(rng: &mut R, n: [usize; 3], shift: f64) -> Columns {
    let rows = n[0] * n[1] * n[2];
    let mut level_1 = Vec::with_capacity(rows);
    let mut level_2 = Vec::with_capacity(rows);
    let mut level_3 = Vec::with_capacity(rows);
    let mut response = Vec::with_capacity(rows);

    for i in 0..n[0] {
        let experiment_mean: f64 = rng.sample(StandardNormal);
        for j in 0..n[1] {
            let noise: f64 = rng.sample(StandardNormal);
            let subject_mean = experiment_mean + noise;
            for k in 0..n[2] {
                let noise: f64 = rng.sample(StandardNormal);
                level_1.push(i.to_string());
                level_2.push(j.to_string());
                level_3.push(k.to_string());
                response.push(subject_mean + noise + shift);
            }
        }
    }

    (level_1, level_2, level_3, response)
}
