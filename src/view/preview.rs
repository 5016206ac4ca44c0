use serde::{Deserialize, Serialize};

use crate::data::model::Table;

/// How many rows the preview shows: 5 to 50 in steps of 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRows(usize);

impl PreviewRows {
    pub const MIN: usize = 5;
    pub const MAX: usize = 50;
    pub const STEP: usize = 5;

    /// Clamp into range and round down to a multiple of the step.
    pub fn new(n: usize) -> Self {
        let n = n.clamp(Self::MIN, Self::MAX);
        PreviewRows(n - n % Self::STEP)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PreviewRows {
    fn default() -> Self {
        PreviewRows(10)
    }
}

/// The first rows of the working set.
pub fn preview(table: &Table, rows: PreviewRows) -> Table {
    table.head(rows.get())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn row_count_is_bounded() {
        assert_eq!(PreviewRows::new(0).get(), 5);
        assert_eq!(PreviewRows::new(17).get(), 15);
        assert_eq!(PreviewRows::new(500).get(), 50);
        assert_eq!(PreviewRows::default().get(), 10);
    }

    #[test]
    fn preview_takes_leading_rows() {
        let cells = (0..12).map(CellValue::Integer).collect();
        let table = Table::from_pairs(vec![("n", cells)]).unwrap();
        let head = preview(&table, PreviewRows::new(5));
        assert_eq!(head.len(), 5);
        assert_eq!(head.column("n").unwrap().cells()[4], CellValue::Integer(4));
        assert_eq!(preview(&table, PreviewRows::new(50)).len(), 12);
    }
}
