use super::filter::{filter_table, FilterSpec};
use super::model::Table;
use super::sort::{sort_table, SortSpec};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// WorkingSet – the sorted, then filtered, view of the loaded table
// ---------------------------------------------------------------------------

/// The table every display and export works from, plus the non-fatal
/// problems met while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    pub table: Table,
    /// Rows in the sorted table before filtering.
    pub unfiltered_rows: usize,
    pub warnings: Vec<String>,
}

impl WorkingSet {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Sort, then filter. The source table is never modified.
///
/// A [`DashboardError::Sort`] is recorded as a warning and the rows keep their
/// load order; unknown columns and invalid filter values are returned as
/// errors.
pub fn apply(table: &Table, sort: &SortSpec, filter: Option<&FilterSpec>) -> Result<WorkingSet> {
    let mut warnings = Vec::new();

    let sorted = match sort_table(table, sort) {
        Ok(sorted) => sorted,
        Err(e @ DashboardError::Sort { .. }) => {
            log::warn!("{e}");
            warnings.push(e.to_string());
            table.clone()
        }
        Err(e) => return Err(e),
    };
    let unfiltered_rows = sorted.len();

    let table = match filter {
        Some(spec) => filter_table(&sorted, spec)?,
        None => sorted,
    };

    Ok(WorkingSet {
        table,
        unfiltered_rows,
        warnings,
    })
}
