//! In-memory tabular dataset with columns addressed by name.
//!
//! A [`Table`] holds the nested dataset the bootstrap operates on: one or
//! more categorical label columns (hierarchy levels, optional top-level
//! group) and at least one numeric metric column. Rows are implicit; all
//! columns have the same length and row `i` across columns is one record.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A single named column.
#[derive(Debug, Clone)]
pub enum Column {
    /// Categorical column: hierarchy level or top-level group membership.
    Label(Vec<String>),
    /// Numeric column: the metric being bootstrapped.
    Metric(Vec<f64>),
}

impl Column {
    fn len(&self) -> usize {
        match self {
            Column::Label(v) => v.len(),
            Column::Metric(v) => v.len(),
        }
    }
}

/// An ordered collection of records with named columns.
///
/// Built incrementally with [`Table::with_label`] and [`Table::with_metric`];
/// column lengths must agree and names must be unique.
///
/// # Example
///
/// ```
/// use hier_bootstrap::Table;
///
/// let table = Table::new()
///     .with_label("subject", vec!["a".into(), "a".into(), "b".into(), "b".into()])
///     .unwrap()
///     .with_metric("response", vec![1.0, 2.0, 3.0, 4.0])
///     .unwrap();
///
/// assert_eq!(table.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<(String, Column)>,
}

impl Table {
    /// Create an empty table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a categorical column.
    ///
    /// Fails if the name is already taken or the length disagrees with
    /// existing columns.
    pub fn with_label(self, name: impl Into<String>, values: Vec<String>) -> Result<Self> {
        self.push_column(name.into(), Column::Label(values))
    }

    /// Add a numeric column.
    ///
    /// Fails if the name is already taken or the length disagrees with
    /// existing columns.
    pub fn with_metric(self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.push_column(name.into(), Column::Metric(values))
    }

    fn push_column(mut self, name: String, column: Column) -> Result<Self> {
        if self.columns.iter().any(|(n, _)| *n == name) {
            return Err(Error::invalid(format!("duplicate column '{name}'")));
        }
        if let Some((first_name, first)) = self.columns.first() {
            if first.len() != column.len() {
                return Err(Error::invalid(format!(
                    "column '{}' has {} rows but '{}' has {}",
                    name,
                    column.len(),
                    first_name,
                    first.len()
                )));
            }
        }
        self.columns.push((name, column));
        Ok(self)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all columns in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Fetch a categorical column by name.
    pub fn label(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column::Label(v)) => Ok(v),
            Some(Column::Metric(_)) => Err(Error::invalid(format!(
                "column '{name}' is numeric, expected a label column"
            ))),
            None => Err(Error::invalid(format!("no such column '{name}'"))),
        }
    }

    /// Fetch a numeric column by name.
    pub fn metric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column::Metric(v)) => Ok(v),
            Some(Column::Label(_)) => Err(Error::invalid(format!(
                "column '{name}' is categorical, expected a metric column"
            ))),
            None => Err(Error::invalid(format!("no such column '{name}'"))),
        }
    }
}

/// Partition row indices by the distinct values of a label column, in
/// first-seen order.
///
/// First-seen order is the canonical group order downstream. Summary groups
/// and significance pairs both follow it.
pub(crate) fn partition_by(values: &[String], rows: &[usize]) -> Vec<(String, Vec<usize>)> {
    let mut order: Vec<(String, Vec<usize>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for &row in rows {
        let value = values[row].as_str();
        match index.get(value) {
            Some(&slot) => order[slot].1.push(row),
            None => {
                index.insert(value, order.len());
                order.push((value.to_string(), vec![row]));
            }
        }
    }
    order
}
