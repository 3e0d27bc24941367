//! Reference dataset: the historical table the pipeline was trained on.
//!
//! At serving time it is only used to enumerate valid categorical values.

use crate::error::PricerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Column-major header plus row-major values, as persisted on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ReferenceDataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<serde_json::Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Every row must have one value per column.
    pub fn check(&self) -> Result<(), PricerError> {
        if let Some((i, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
        {
            return Err(PricerError::dataset(format!(
                "row {i} has {} values, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        Ok(())
    }

    /// Sorted distinct values of `column`, rendered as strings. Nulls are skipped.
    pub fn distinct_sorted(&self, column: &str) -> Result<Vec<String>, PricerError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| PricerError::dataset(format!("column '{column}' not found")))?;

        let values: BTreeSet<String> = self
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter_map(render)
            .collect();
        Ok(values.into_iter().collect())
    }
}

fn render(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
