use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Filter selections keep values in a `BTreeSet`, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` (numeric cells only).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Shortest round-trippable text for a float, keeping a `.0` on whole numbers
/// so the value reads back as a float rather than an integer.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// ColumnType – inferred from the non-null cells of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    /// Heterogeneous cells, only reachable through programmatic construction.
    Mixed,
    /// Every cell is null (or the column has no rows).
    Empty,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    fn infer(cells: &[CellValue]) -> ColumnType {
        let mut kind: Option<ColumnType> = None;
        for cell in cells {
            let k = match cell {
                CellValue::Null => continue,
                CellValue::Bool(_) => ColumnType::Bool,
                CellValue::Integer(_) => ColumnType::Integer,
                CellValue::Float(_) => ColumnType::Float,
                CellValue::Text(_) => ColumnType::Text,
            };
            kind = Some(match (kind, k) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnType::Integer), ColumnType::Float)
                | (Some(ColumnType::Float), ColumnType::Integer) => ColumnType::Float,
                _ => ColumnType::Mixed,
            });
        }
        kind.unwrap_or(ColumnType::Empty)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::Text | ColumnType::Mixed | ColumnType::Empty => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    cells: Vec<CellValue>,
}

impl Column {
    /// Build a column and infer its type. Integer cells in a float column are
    /// widened so the column stays homogeneous.
    pub fn new(name: impl Into<String>, mut cells: Vec<CellValue>) -> Self {
        let dtype = ColumnType::infer(&cells);
        if dtype == ColumnType::Float {
            for cell in &mut cells {
                if let CellValue::Integer(i) = cell {
                    *cell = CellValue::Float(*i as f64);
                }
            }
        }
        Column {
            name: name.into(),
            dtype,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Non-null numeric values, in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(CellValue::as_f64).collect()
    }

    fn take(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            dtype: self.dtype,
            cells: indices.iter().map(|&i| self.cells[i].clone()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset
// ---------------------------------------------------------------------------

/// An immutable table of named, equally long columns with a name → index
/// map validated at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if col.len() != row_count {
                return Err(DashboardError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {row_count}",
                    col.name,
                    col.len()
                )));
            }
            if index.insert(col.name.clone(), i).is_some() {
                return Err(DashboardError::InvalidTable(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }
        Ok(Table {
            columns,
            index,
            row_count,
        })
    }

    /// Convenience constructor from `(name, cells)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: Vec<(S, Vec<CellValue>)>) -> Result<Self> {
        Table::new(
            pairs
                .into_iter()
                .map(|(name, cells)| Column::new(name, cells))
                .collect(),
        )
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DashboardError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        Ok(&self.columns[self.column_index(name)?])
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The cells of row `row`, in column order.
    pub fn row(&self, row: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.cells[row]).collect()
    }

    /// A new table holding the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
            index: self.index.clone(),
            row_count: indices.len(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let n = n.min(self.row_count);
        self.take_rows(&(0..n).collect::<Vec<_>>())
    }

    /// Columns whose type is numeric (integers and floats, not booleans).
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.dtype.is_numeric()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_cells_are_widened_in_float_columns() {
        let col = Column::new(
            "v",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(2.5)],
        );
        assert_eq!(col.dtype(), ColumnType::Float);
        assert_eq!(col.cells()[0], CellValue::Float(1.0));
        assert_eq!(col.null_count(), 1);
    }

    #[test]
    fn text_and_numbers_make_a_mixed_column() {
        let col = Column::new("v", vec![CellValue::Integer(1), CellValue::Text("a".into())]);
        assert_eq!(col.dtype(), ColumnType::Mixed);
        assert_eq!(Column::new("e", vec![CellValue::Null]).dtype(), ColumnType::Empty);
    }

    #[test]
    fn rejects_ragged_and_duplicate_columns() {
        let ragged = Table::from_pairs(vec![
            ("a", vec![CellValue::Integer(1)]),
            ("b", vec![]),
        ]);
        assert!(matches!(ragged, Err(DashboardError::InvalidTable(_))));

        let dup = Table::from_pairs(vec![
            ("a", vec![CellValue::Integer(1)]),
            ("a", vec![CellValue::Integer(2)]),
        ]);
        assert!(matches!(dup, Err(DashboardError::InvalidTable(_))));
    }

    #[test]
    fn unknown_column_is_reported_by_name() {
        let table = Table::from_pairs(vec![("a", vec![CellValue::Integer(1)])]).unwrap();
        match table.column("b") {
            Err(DashboardError::ColumnNotFound(name)) => assert_eq!(name, "b"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn take_rows_reorders_every_column() {
        let table = Table::from_pairs(vec![
            ("a", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            ("b", vec![CellValue::Text("x".into()), CellValue::Text("y".into())]),
        ])
        .unwrap();
        let t = table.take_rows(&[1, 0]);
        assert_eq!(t.row(0), vec![&CellValue::Integer(2), &CellValue::Text("y".into())]);
        assert_eq!(t.head(1).len(), 1);
        assert_eq!(t.head(10).len(), 2);
    }

    #[test]
    fn whole_floats_keep_their_decimal_point() {
        assert_eq!(format_float(100.0), "100.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-3.0), "-3.0");
    }
}
