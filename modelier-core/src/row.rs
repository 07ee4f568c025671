use crate::{FieldMap, Value};
use std::sync::Arc;

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A raw row as returned by a [`crate::Connection`], with its column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

impl From<RowLabeled> for FieldMap {
    fn from(value: RowLabeled) -> Self {
        value
            .labels
            .iter()
            .cloned()
            .zip(value.values.into_vec())
            .collect()
    }
}

impl From<FieldMap> for RowLabeled {
    fn from(value: FieldMap) -> Self {
        let (labels, values): (Vec<_>, Vec<_>) = value.into_iter().unzip();
        RowLabeled::new(labels.into(), values.into())
    }
}

impl From<&FieldMap> for RowLabeled {
    fn from(value: &FieldMap) -> Self {
        value.clone().into()
    }
}

/// Outcome of an update or delete.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
}

impl RowsAffected {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}
