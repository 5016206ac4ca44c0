use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::model::{CellValue, Table};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Sort specification
// ---------------------------------------------------------------------------

/// Which column to order the table by. `column: None` keeps load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Option<String>,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            column: None,
            ascending: true,
        }
    }
}

impl SortSpec {
    pub fn by(column: impl Into<String>, ascending: bool) -> Self {
        SortSpec {
            column: Some(column.into()),
            ascending,
        }
    }
}

/// Values that can be ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortClass {
    Numeric,
    Bool,
    Text,
}

fn sort_class(v: &CellValue) -> Option<SortClass> {
    match v {
        CellValue::Null => None,
        CellValue::Integer(_) | CellValue::Float(_) => Some(SortClass::Numeric),
        CellValue::Bool(_) => Some(SortClass::Bool),
        CellValue::Text(_) => Some(SortClass::Text),
    }
}

fn compare_present(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Integer(x), CellValue::Integer(y)) => x.cmp(y),
        (CellValue::Bool(x), CellValue::Bool(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.cmp(b),
        },
    }
}

// ---------------------------------------------------------------------------
// Sort stage
// ---------------------------------------------------------------------------

/// Stable-sort every row of `table` by one column.
///
/// Nulls go last in either direction. A column whose non-null values cannot
/// all be compared (e.g. numbers next to text) is not sorted at all and yields
/// [`DashboardError::Sort`].
pub fn sort_table(table: &Table, spec: &SortSpec) -> Result<Table> {
    let Some(name) = spec.column.as_deref() else {
        return Ok(table.clone());
    };
    let column = table.column(name)?;
    let cells = column.cells();

    let mut class: Option<SortClass> = None;
    for (row, cell) in cells.iter().enumerate() {
        let Some(c) = sort_class(cell) else {
            continue;
        };
        match class {
            None => class = Some(c),
            Some(first) if first != c => {
                return Err(DashboardError::Sort {
                    column: name.to_string(),
                    message: format!(
                        "'<' not supported between {first:?} and {c:?} values (row {row})"
                    ),
                });
            }
            Some(_) => {}
        }
    }

    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by(|&i, &j| match (&cells[i], &cells[j]) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Greater,
        (_, CellValue::Null) => Ordering::Less,
        (a, b) if spec.ascending => compare_present(a, b),
        (a, b) => compare_present(b, a),
    });

    log::debug!(
        "Sorted {} rows by {name} ({})",
        order.len(),
        if spec.ascending { "ascending" } else { "descending" }
    );
    Ok(table.take_rows(&order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn sales_table() -> Table {
        Table::from_pairs(vec![
            ("id", vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)]),
            (
                "city",
                vec![
                    CellValue::Text("NY".into()),
                    CellValue::Text("LA".into()),
                    CellValue::Text("NY".into()),
                ],
            ),
            (
                "sales",
                vec![CellValue::Float(100.0), CellValue::Float(200.0), CellValue::Float(150.0)],
            ),
        ])
        .unwrap()
    }

    fn ids(table: &Table) -> Vec<CellValue> {
        table.column("id").unwrap().cells().to_vec()
    }

    #[test]
    fn no_column_keeps_load_order() {
        let table = sales_table();
        assert_eq!(sort_table(&table, &SortSpec::default()).unwrap(), table);
    }

    #[test]
    fn sorts_descending_by_sales() {
        let sorted = sort_table(&sales_table(), &SortSpec::by("sales", false)).unwrap();
        assert_eq!(
            ids(&sorted),
            vec![CellValue::Integer(2), CellValue::Integer(3), CellValue::Integer(1)]
        );
    }

    #[test]
    fn equal_keys_keep_their_relative_order() {
        let table = sales_table();
        for ascending in [true, false] {
            let sorted = sort_table(&table, &SortSpec::by("city", ascending)).unwrap();
            let ny: Vec<_> = ids(&sorted)
                .into_iter()
                .zip(sorted.column("city").unwrap().cells())
                .filter(|(_, c)| **c == CellValue::Text("NY".into()))
                .map(|(id, _)| id)
                .collect();
            assert_eq!(ny, vec![CellValue::Integer(1), CellValue::Integer(3)]);
        }
    }

    #[test]
    fn nulls_sort_last_both_ways() {
        let table = Table::new(vec![Column::new(
            "v",
            vec![CellValue::Integer(2), CellValue::Null, CellValue::Integer(1)],
        )])
        .unwrap();
        for ascending in [true, false] {
            let sorted = sort_table(&table, &SortSpec::by("v", ascending)).unwrap();
            assert_eq!(sorted.column("v").unwrap().cells()[2], CellValue::Null);
        }
    }

    #[test]
    fn mixed_column_is_a_sort_error() {
        let table = Table::new(vec![Column::new(
            "v",
            vec![CellValue::Integer(2), CellValue::Text("a".into())],
        )])
        .unwrap();
        let err = sort_table(&table, &SortSpec::by("v", true)).unwrap_err();
        assert!(matches!(err, DashboardError::Sort { .. }));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = sort_table(&sales_table(), &SortSpec::by("nope", true)).unwrap_err();
        assert!(matches!(err, DashboardError::ColumnNotFound(_)));
    }
}
