use std::collections::HashMap;

use crate::data::model::{CellValue, Column, ColumnType, Table};

/// Row labels of the summary grid, in display order.
pub const STAT_LABELS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

// ---------------------------------------------------------------------------
// Per-column descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics for one column. Numeric statistics are `NaN` when
/// they do not apply or there is nothing to measure; categorical ones are
/// `None` for numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: ColumnType,
    /// Non-null cells.
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
    pub unique: Option<usize>,
    pub top: Option<CellValue>,
    pub freq: Option<usize>,
}

impl ColumnSummary {
    fn numeric(column: &Column) -> Self {
        let mut values = column.numeric_values();
        values.sort_by(f64::total_cmp);
        let n = values.len();

        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        ColumnSummary {
            name: column.name().to_string(),
            dtype: column.dtype(),
            count: n,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&values, 0.25),
            q50: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
            unique: None,
            top: None,
            freq: None,
        }
    }

    fn categorical(column: &Column) -> Self {
        // value → (count, first row seen)
        let mut counts: HashMap<&CellValue, (usize, usize)> = HashMap::new();
        let mut count = 0;
        for (row, cell) in column.cells().iter().enumerate() {
            if cell.is_null() {
                continue;
            }
            count += 1;
            counts.entry(cell).or_insert((0, row)).0 += 1;
        }

        // Most frequent wins; ties go to the value seen first.
        let top = counts
            .iter()
            .min_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)))
            .map(|(v, (n, _))| ((*v).clone(), *n));

        ColumnSummary {
            name: column.name().to_string(),
            dtype: column.dtype(),
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
            unique: Some(counts.len()),
            freq: top.as_ref().map(|(_, n)| *n),
            top: top.map(|(v, _)| v),
        }
    }

    /// The statistic named by one of [`STAT_LABELS`], formatted for display.
    /// Empty when the statistic does not apply to this column.
    pub fn display_stat(&self, label: &str) -> String {
        let num = |v: f64| if v.is_nan() { String::new() } else { format!("{v:.4}") };
        match label {
            "count" => self.count.to_string(),
            "unique" => self.unique.map(|u| u.to_string()).unwrap_or_default(),
            "top" => self.top.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            "freq" => self.freq.map(|f| f.to_string()).unwrap_or_default(),
            "mean" => num(self.mean),
            "std" => num(self.std),
            "min" => num(self.min),
            "25%" => num(self.q25),
            "50%" => num(self.q50),
            "75%" => num(self.q75),
            "max" => num(self.max),
            _ => String::new(),
        }
    }
}

/// Linear interpolation between the closest ranks of sorted `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Table summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Describe the numeric columns, or every column when `detailed` is set.
///
/// Without numeric columns the non-detailed summary describes the remaining
/// columns instead. A table with no columns gives an empty summary.
pub fn describe(table: &Table, detailed: bool) -> Summary {
    let has_numeric = table.columns().iter().any(|c| c.dtype().is_numeric());
    let columns = table
        .columns()
        .iter()
        .filter(|c| detailed || !has_numeric || c.dtype().is_numeric())
        .map(|c| {
            if c.dtype().is_numeric() {
                ColumnSummary::numeric(c)
            } else {
                ColumnSummary::categorical(c)
            }
        })
        .collect();
    Summary { columns }
}
