use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

use super::model::{CellValue, Column, Table};
use crate::error::{DashboardError, Result};

/// Cell text treated as missing when reading delimited files.
pub const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#NA", "1.#IND", "1.#QNAN",
];

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Cache key for a loaded source: its file name plus a SHA-256 digest of the
/// content, so a re-upload of the same bytes is never parsed twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub name: String,
    pub digest: String,
}

impl SourceKey {
    pub fn new(name: &str, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        SourceKey {
            name: name.to_string(),
            digest: format!("{:x}", hasher.finalize()),
        }
    }
}

/// How the bytes of a source are laid out, chosen from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(u8),
    /// `[{ "col": value, ... }, ...]`
    JsonRecords,
}

impl SourceFormat {
    /// Names without an extension are read as delimited text.
    pub fn from_name(name: &str, default_delimiter: u8) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "" | "csv" | "txt" => Ok(SourceFormat::Delimited(default_delimiter)),
            "tsv" | "tab" => Ok(SourceFormat::Delimited(b'\t')),
            "json" => Ok(SourceFormat::JsonRecords),
            other => Err(DashboardError::parse(
                name,
                format!("unsupported file extension: .{other}"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Memoizing loader
// ---------------------------------------------------------------------------

/// Parses uploaded files into [`Table`]s and keeps every table it built for
/// the lifetime of the loader.
#[derive(Debug)]
pub struct TableLoader {
    delimiter: u8,
    cache: HashMap<SourceKey, Arc<Table>>,
}

impl Default for TableLoader {
    fn default() -> Self {
        TableLoader::new(b',')
    }
}

impl TableLoader {
    pub fn new(delimiter: u8) -> Self {
        TableLoader {
            delimiter,
            cache: HashMap::new(),
        }
    }

    /// Load a table from raw bytes, returning the cached table when the same
    /// name and content were loaded before.
    pub fn load(&mut self, name: &str, bytes: &[u8]) -> Result<Arc<Table>> {
        let key = SourceKey::new(name, bytes);
        if let Some(table) = self.cache.get(&key) {
            log::debug!("Cache hit for {name} ({})", &key.digest[..12]);
            return Ok(Arc::clone(table));
        }

        let table = match SourceFormat::from_name(name, self.delimiter)? {
            SourceFormat::Delimited(delimiter) => parse_delimited(name, bytes, delimiter)?,
            SourceFormat::JsonRecords => parse_json_records(name, bytes)?,
        };
        log::info!(
            "Loaded {name}: {} rows, columns {:?}",
            table.len(),
            table.column_names()
        );

        let table = Arc::new(table);
        self.cache.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Read a file from disk and load it under its file name.
    pub fn load_path(&mut self, path: &Path) -> Result<Arc<Table>> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv");
        self.load(name, &bytes)
    }

    pub fn contains(&self, key: &SourceKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Parse delimited text with a header row. Every data row must have as many
/// fields as the header.
pub fn parse_delimited(source_name: &str, bytes: &[u8], delimiter: u8) -> Result<Table> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DashboardError::parse(source_name, format!("not valid UTF-8 text: {e}")))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(DashboardError::parse(source_name, "no columns to parse"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashboardError::parse(source_name, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let names = unique_headers(&headers);

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| DashboardError::parse(source_name, format!("row {}: {e}", row_no + 1)))?;
        for (col_idx, value) in record.iter().enumerate() {
            raw[col_idx].push(value.to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, &cells))
        .collect();
    Table::new(columns)
}

/// Blank header cells become `Unnamed: {i}`; repeated names get `.1`, `.2`…
fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                h.clone()
            };
            let mut name = base.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{base}.{n}");
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Pick one type for the whole column: integers, then floats, then booleans,
/// otherwise text holding every non-null cell verbatim.
fn infer_column(name: String, raw: &[String]) -> Column {
    let trimmed: Vec<Option<&str>> = raw
        .iter()
        .map(|s| {
            let t = s.trim();
            (!is_null_token(t)).then_some(t)
        })
        .collect();
    let present = || trimmed.iter().flatten();

    let cells: Vec<CellValue> = if present().all(|s| s.parse::<i64>().is_ok()) {
        trimmed
            .iter()
            .map(|t| match t.and_then(|s| s.parse::<i64>().ok()) {
                Some(i) => CellValue::Integer(i),
                None => CellValue::Null,
            })
            .collect()
    } else if present().all(|s| s.parse::<f64>().is_ok()) {
        trimmed
            .iter()
            .map(|t| match t.and_then(|s| s.parse::<f64>().ok()) {
                Some(f) => CellValue::Float(f),
                None => CellValue::Null,
            })
            .collect()
    } else if present().all(|s| parse_bool(s).is_some()) {
        trimmed
            .iter()
            .map(|t| match t.and_then(parse_bool) {
                Some(b) => CellValue::Bool(b),
                None => CellValue::Null,
            })
            .collect()
    } else {
        raw.iter()
            .zip(&trimmed)
            .map(|(s, t)| match t {
                Some(_) => CellValue::Text(s.clone()),
                None => CellValue::Null,
            })
            .collect()
    };

    Column::new(name, cells)
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Expected JSON layout (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 1, "city": "NY", "sales": 100.0 },
///   { "id": 2, "city": "LA", "sales": null }
/// ]
/// ```
///
/// Columns appear in first-seen order; a key missing from a record is null.
fn parse_json_records(source_name: &str, bytes: &[u8]) -> Result<Table> {
    let root: JsonValue = serde_json::from_slice(bytes)
        .map_err(|e| DashboardError::parse(source_name, format!("parsing JSON: {e}")))?;
    let records = root
        .as_array()
        .ok_or_else(|| DashboardError::parse(source_name, "expected top-level JSON array"))?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            DashboardError::parse(source_name, format!("row {i} is not a JSON object"))
        })?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = records
                .iter()
                .map(|rec| rec.get(&name).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            Column::new(name, cells)
        })
        .collect();
    Table::new(columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
