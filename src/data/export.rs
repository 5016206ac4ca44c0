use std::path::Path;

use super::model::{CellValue, Table};
use crate::error::Result;

/// File name offered when the working set is downloaded.
pub const DOWNLOAD_FILE_NAME: &str = "filtered_data.csv";

fn cell_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_table<W: std::io::Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.column_names())
        .map_err(std::io::Error::from)?;
    for row in 0..table.len() {
        writer
            .write_record(table.row(row).into_iter().map(cell_text))
            .map_err(std::io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialise a table as CSV: header row, no index column, nulls empty.
pub fn to_csv_string(table: &Table) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    // csv only ever writes the UTF-8 text it was given.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write a table as CSV to `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_table(table, std::io::BufWriter::new(file))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_rows_and_empty_nulls() {
        let table = Table::from_pairs(vec![
            ("id", vec![CellValue::Integer(1), CellValue::Integer(2)]),
            ("city", vec![CellValue::Text("New York, NY".into()), CellValue::Null]),
            ("sales", vec![CellValue::Float(100.0), CellValue::Float(2.5)]),
            ("ok", vec![CellValue::Bool(true), CellValue::Bool(false)]),
        ])
        .unwrap();
        let csv = to_csv_string(&table).unwrap();
        assert_eq!(
            csv,
            "id,city,sales,ok\n1,\"New York, NY\",100.0,True\n2,,2.5,False\n"
        );
    }

    #[test]
    fn numeric_looking_text_reloads_as_numbers() {
        use crate::data::loader::parse_delimited;
        use crate::data::model::ColumnType;

        let table = Table::from_pairs(vec![("code", vec![CellValue::Text("1".into())])]).unwrap();
        let csv = to_csv_string(&table).unwrap();
        assert_eq!(csv, "code\n1\n");
        // CSV carries no types: the column is inferred again from its text.
        let reloaded = parse_delimited("filtered_data.csv", csv.as_bytes(), b',').unwrap();
        let code = reloaded.column("code").unwrap();
        assert_eq!(code.dtype(), ColumnType::Integer);
        assert_eq!(code.cells(), &[CellValue::Integer(1)]);
    }

    #[test]
    fn empty_table_is_just_a_header() {
        let table = Table::from_pairs(vec![("a", vec![]), ("b", vec![])]).unwrap();
        assert_eq!(to_csv_string(&table).unwrap(), "a,b\n");
    }
}
