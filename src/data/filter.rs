use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{CellValue, Table};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Filter predicate: which values of one column are selected
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Keep rows whose value is selected.
    #[default]
    Include,
    /// Keep rows whose value is not selected.
    Exclude,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Include => "Include selected values",
            FilterMode::Exclude => "Exclude selected values",
        }
    }
}

/// Row filter on one column. An empty `values` set means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    pub mode: FilterMode,
    pub values: BTreeSet<CellValue>,
}

impl FilterSpec {
    pub fn new(column: impl Into<String>, mode: FilterMode) -> Self {
        FilterSpec {
            column: column.into(),
            mode,
            values: BTreeSet::new(),
        }
    }

    /// Filter on `column` with its first distinct value pre-selected.
    pub fn with_default_selection(table: &Table, column: &str) -> Result<Self> {
        let mut spec = FilterSpec::new(column, FilterMode::Include);
        if let Some(first) = distinct_values(table, column)?.into_iter().next() {
            spec.values.insert(first);
        }
        Ok(spec)
    }

    pub fn select(mut self, value: CellValue) -> Self {
        self.values.insert(value);
        self
    }

    /// Toggle one value in or out of the selection.
    pub fn toggle(&mut self, value: &CellValue) {
        if !self.values.remove(value) {
            self.values.insert(value.clone());
        }
    }

    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }

    /// The column must exist and every selected value must be one of its
    /// non-null values.
    pub fn validate(&self, table: &Table) -> Result<()> {
        let present: BTreeSet<&CellValue> = table
            .column(&self.column)?
            .cells()
            .iter()
            .filter(|v| !v.is_null())
            .collect();
        for value in &self.values {
            if !present.contains(value) {
                return Err(DashboardError::InvalidFilterValue {
                    column: self.column.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The distinct non-null values of a column, in first-appearance order.
pub fn distinct_values(table: &Table, column: &str) -> Result<Vec<CellValue>> {
    let mut seen = BTreeSet::new();
    Ok(table
        .column(column)?
        .cells()
        .iter()
        .filter(|v| !v.is_null() && seen.insert((*v).clone()))
        .cloned()
        .collect())
}

/// Return indices of rows that pass the filter.
///
/// A row passes when:
/// * nothing is selected → passes (no constraint)
/// * `Include` and its value is selected → passes
/// * `Exclude` and its value is not selected → passes
///
/// Null cells are never selected.
pub fn filtered_indices(table: &Table, spec: &FilterSpec) -> Result<Vec<usize>> {
    spec.validate(table)?;
    let cells = table.column(&spec.column)?.cells();
    if !spec.is_active() {
        return Ok((0..table.len()).collect());
    }
    Ok(cells
        .iter()
        .enumerate()
        .filter(|(_, v)| {
            let selected = !v.is_null() && spec.values.contains(*v);
            match spec.mode {
                FilterMode::Include => selected,
                FilterMode::Exclude => !selected,
            }
        })
        .map(|(i, _)| i)
        .collect())
}

/// Apply the filter, producing a new table.
pub fn filter_table(table: &Table, spec: &FilterSpec) -> Result<Table> {
    let indices = filtered_indices(table, spec)?;
    log::debug!(
        "Filter on {} ({:?}, {} values) kept {}/{} rows",
        spec.column,
        spec.mode,
        spec.values.len(),
        indices.len(),
        table.len()
    );
    Ok(table.take_rows(&indices))
}
