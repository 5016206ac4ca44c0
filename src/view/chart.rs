use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::model::{CellValue, ColumnType, Table};
use crate::error::{DashboardError, Result};

/// Histograms always use this many equal-width bins.
pub const HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Chart request (what the user picked)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Line,
    Scatter,
    Bar,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Bar,
        ChartKind::Histogram,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Bar => "Bar Chart",
            ChartKind::Histogram => "Histogram",
        }
    }

    /// Whether the kind plots one column against another.
    pub fn needs_x(self) -> bool {
        self != ChartKind::Histogram
    }
}

/// Plot height in points: 300 to 800 in steps of 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotHeight(u32);

impl PlotHeight {
    pub const MIN: u32 = 300;
    pub const MAX: u32 = 800;
    pub const STEP: u32 = 50;

    pub fn new(h: u32) -> Self {
        let h = h.clamp(Self::MIN, Self::MAX);
        PlotHeight(h - h % Self::STEP)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PlotHeight {
    fn default() -> Self {
        PlotHeight(400)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    /// Ignored for histograms.
    pub x_column: Option<String>,
    pub y_column: String,
    pub height: PlotHeight,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, x_column: Option<&str>, y_column: &str) -> Self {
        ChartRequest {
            kind,
            x_column: x_column.map(str::to_string),
            y_column: y_column.to_string(),
            height: PlotHeight::default(),
        }
    }

    pub fn histogram(column: &str) -> Self {
        ChartRequest::new(ChartKind::Histogram, None, column)
    }
}

// ---------------------------------------------------------------------------
// Resolved chart (what the renderer draws)
// ---------------------------------------------------------------------------

/// Horizontal coordinates of a series. Categorical values are placed at
/// 0, 1, 2… in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub enum XAxis {
    Numeric(Vec<f64>),
    Categorical {
        categories: Vec<String>,
        positions: Vec<f64>,
    },
}

impl XAxis {
    pub fn positions(&self) -> &[f64] {
        match self {
            XAxis::Numeric(v) => v,
            XAxis::Categorical { positions, .. } => positions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Series { x: XAxis, y: Vec<f64> },
    Histogram(Vec<HistogramBin>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub height: PlotHeight,
    pub data: ChartData,
}

/// Turn a chart request into plottable data drawn from `table`.
///
/// The value axis must be numeric. Rows where either selected cell is null
/// are left out.
pub fn resolve(table: &Table, request: &ChartRequest) -> Result<ChartSpec> {
    let y_col = table.column(&request.y_column)?;

    if request.kind == ChartKind::Histogram {
        if !(y_col.dtype().is_numeric() || y_col.dtype() == ColumnType::Empty) {
            return Err(DashboardError::Plot(format!(
                "cannot bin non-numeric column '{}' ({})",
                y_col.name(),
                y_col.dtype()
            )));
        }
        let values = y_col.numeric_values();
        return Ok(ChartSpec {
            kind: request.kind,
            title: format!("{}: {}", request.kind.label(), y_col.name()),
            x_label: y_col.name().to_string(),
            y_label: "count".to_string(),
            height: request.height,
            data: ChartData::Histogram(histogram(&values, HISTOGRAM_BINS)?),
        });
    }

    let x_name = request.x_column.as_deref().ok_or_else(|| {
        DashboardError::Plot(format!("{} needs an x-axis column", request.kind.label()))
    })?;
    let x_col = table.column(x_name)?;
    if !y_col.dtype().is_numeric() {
        return Err(DashboardError::Plot(format!(
            "y-axis column '{}' is not numeric ({})",
            y_col.name(),
            y_col.dtype()
        )));
    }

    let rows: Vec<(&CellValue, f64)> = x_col
        .cells()
        .iter()
        .zip(y_col.cells())
        .filter(|(x, _)| !x.is_null())
        .filter_map(|(x, y)| y.as_f64().map(|y| (x, y)))
        .collect();

    let x = if x_col.dtype().is_numeric() || x_col.dtype() == ColumnType::Empty {
        XAxis::Numeric(rows.iter().filter_map(|(x, _)| x.as_f64()).collect())
    } else {
        let mut categories: Vec<String> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        let positions = rows
            .iter()
            .map(|(x, _)| {
                let label = x.to_string();
                let next = categories.len();
                let pos = *slot.entry(label.clone()).or_insert(next);
                if pos == next {
                    categories.push(label);
                }
                pos as f64
            })
            .collect();
        XAxis::Categorical {
            categories,
            positions,
        }
    };

    Ok(ChartSpec {
        kind: request.kind,
        title: format!("{}: {} vs {}", request.kind.label(), y_col.name(), x_col.name()),
        x_label: x_col.name().to_string(),
        y_label: y_col.name().to_string(),
        height: request.height,
        data: ChartData::Series {
            x,
            y: rows.into_iter().map(|(_, y)| y).collect(),
        },
    })
}

/// Count `values` into `bins` equal-width bins spanning their range; the last
/// bin includes its right edge. A single repeated value spans `v ± 0.5` and no
/// values at all span `[0, 1]`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(DashboardError::Plot("bin count must be positive".into()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(DashboardError::Plot(
            "histogram range is not finite".into(),
        ));
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if values.is_empty() {
        (lo, hi) = (0.0, 1.0);
    } else if lo == hi {
        (lo, hi) = (lo - 0.5, hi + 0.5);
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_pairs(vec![
            (
                "v",
                vec![
                    CellValue::Integer(1),
                    CellValue::Integer(2),
                    CellValue::Null,
                    CellValue::Integer(2),
                    CellValue::Integer(3),
                ],
            ),
            (
                "city",
                vec![
                    CellValue::Text("NY".into()),
                    CellValue::Text("LA".into()),
                    CellValue::Text("SF".into()),
                    CellValue::Text("NY".into()),
                    CellValue::Null,
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn histogram_drops_nulls() {
        let spec = resolve(&table(), &ChartRequest::histogram("v")).unwrap();
        let ChartData::Histogram(bins) = spec.data else {
            panic!("expected histogram");
        };
        assert_eq!(bins.len(), HISTOGRAM_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[HISTOGRAM_BINS - 1].end, 3.0);
        // The maximum lands in the last bin.
        assert_eq!(bins[HISTOGRAM_BINS - 1].count, 1);
        assert_eq!(spec.title, "Histogram: v");
    }

    #[test]
    fn degenerate_histogram_ranges() {
        let bins = histogram(&[2.0, 2.0], 20).unwrap();
        assert_eq!((bins[0].start, bins[19].end), (1.5, 2.5));
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);

        let bins = histogram(&[], 20).unwrap();
        assert_eq!((bins[0].start, bins[19].end), (0.0, 1.0));
        assert!(bins.iter().all(|b| b.count == 0));

        assert!(histogram(&[1.0, f64::INFINITY], 20).is_err());
    }

    #[test]
    fn histogram_of_text_is_a_plot_error() {
        let err = resolve(&table(), &ChartRequest::histogram("city")).unwrap_err();
        assert!(matches!(err, DashboardError::Plot(_)));
    }

    #[test]
    fn categorical_x_gets_positions_by_first_appearance() {
        let request = ChartRequest::new(ChartKind::Bar, Some("city"), "v");
        let spec = resolve(&table(), &request).unwrap();
        assert_eq!(spec.title, "Bar Chart: v vs city");
        let ChartData::Series { x, y } = spec.data else {
            panic!("expected series");
        };
        // Row 2 has a null y and row 4 a null x.
        assert_eq!(y, vec![1.0, 2.0, 2.0]);
        match x {
            XAxis::Categorical {
                categories,
                positions,
            } => {
                assert_eq!(categories, vec!["NY", "LA"]);
                assert_eq!(positions, vec![0.0, 1.0, 0.0]);
            }
            other => panic!("unexpected axis {other:?}"),
        }
    }

    #[test]
    fn numeric_pairs_for_line_and_scatter() {
        for kind in [ChartKind::Line, ChartKind::Scatter] {
            let spec = resolve(&table(), &ChartRequest::new(kind, Some("v"), "v")).unwrap();
            let ChartData::Series { x, y } = spec.data else {
                panic!("expected series");
            };
            assert_eq!(x.positions(), y.as_slice());
            assert_eq!(y.len(), 4);
        }
    }

    #[test]
    fn text_y_axis_and_missing_x_are_rejected() {
        let text_y = ChartRequest::new(ChartKind::Line, Some("v"), "city");
        assert!(matches!(resolve(&table(), &text_y), Err(DashboardError::Plot(_))));

        let no_x = ChartRequest::new(ChartKind::Scatter, None, "v");
        assert!(matches!(resolve(&table(), &no_x), Err(DashboardError::Plot(_))));

        let unknown = ChartRequest::new(ChartKind::Line, Some("nope"), "v");
        assert!(matches!(
            resolve(&table(), &unknown),
            Err(DashboardError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn plot_height_is_bounded() {
        assert_eq!(PlotHeight::new(10).get(), 300);
        assert_eq!(PlotHeight::new(475).get(), 450);
        assert_eq!(PlotHeight::new(5000).get(), 800);
    }
}
