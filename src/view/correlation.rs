use crate::data::model::{CellValue, Table};
use crate::error::{DashboardError, Result};

/// Pairwise Pearson correlations between the numeric columns of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` × `columns.len()`.
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.data[i][j])
    }
}

/// Pearson correlation over rows where both cells are present. `NaN` when
/// fewer than two such rows exist or either side has no variance.
fn pearson(a: &[CellValue], b: &[CellValue]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// Correlate every pair of numeric columns.
///
/// Fails with [`DashboardError::EmptyNumericSubset`] when there are no numeric
/// columns to correlate.
pub fn correlate(table: &Table) -> Result<CorrelationMatrix> {
    let numeric = table.numeric_columns();
    if numeric.is_empty() {
        return Err(DashboardError::EmptyNumericSubset);
    }

    let data = numeric
        .iter()
        .map(|a| {
            numeric
                .iter()
                .map(|b| pearson(a.cells(), b.cells()))
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        data,
    })
}
