use std::collections::BTreeSet;

use anyhow::Result;
use rusty_dashboard::data::export::{to_csv_string, write_csv, DOWNLOAD_FILE_NAME};
use rusty_dashboard::data::filter::{distinct_values, FilterMode, FilterSpec};
use rusty_dashboard::data::loader::TableLoader;
use rusty_dashboard::data::model::{CellValue, Table};
use rusty_dashboard::data::pipeline::apply;
use rusty_dashboard::data::sort::SortSpec;
use rusty_dashboard::session::DashboardSession;
use rusty_dashboard::view::chart::{resolve, ChartData, ChartRequest};
use rusty_dashboard::view::correlation::correlate;
use rusty_dashboard::DashboardError;

const SALES: &str = "id,city,sales\n1,NY,100.0\n2,LA,200.0\n3,NY,150.0\n";

const MIXED: &str = "\
name,age,score,team,joined
ann,34,7.5,red,true
bob,,3.25,blue,false
cy,29,,red,
dee,41,9.0,,true
eve,34,1.0,green,false
";

fn load(name: &str, text: &str) -> Result<Table> {
    let mut loader = TableLoader::default();
    Ok((*loader.load(name, text.as_bytes())?).clone())
}

fn column(table: &Table, name: &str) -> Result<Vec<CellValue>> {
    Ok(table.column(name)?.cells().to_vec())
}

fn ints(values: &[i64]) -> Vec<CellValue> {
    values.iter().copied().map(CellValue::Integer).collect()
}

#[test]
fn sort_then_filter_scenario() -> Result<()> {
    let table = load("sales.csv", SALES)?;

    let sorted = apply(&table, &SortSpec::by("sales", false), None)?;
    assert_eq!(column(&sorted.table, "id")?, ints(&[2, 3, 1]));

    let ny = FilterSpec::new("city", FilterMode::Include).select(CellValue::Text("NY".into()));
    let ws = apply(&table, &SortSpec::by("sales", false), Some(&ny))?;
    assert_eq!(column(&ws.table, "id")?, ints(&[3, 1]));
    assert_eq!(ws.unfiltered_rows, 3);
    assert!(ws.warnings.is_empty());
    Ok(())
}

#[test]
fn sorting_never_drops_rows_and_is_idempotent() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    for name in table.column_names() {
        for ascending in [true, false] {
            let spec = SortSpec::by(name.clone(), ascending);
            let once = apply(&table, &spec, None)?;
            assert_eq!(once.len(), table.len(), "sorting by {name} lost rows");
            let twice = apply(&once.table, &spec, None)?;
            assert_eq!(twice.table, once.table, "sorting by {name} is not idempotent");
        }
    }
    Ok(())
}

#[test]
fn include_and_exclude_respect_membership() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    let selected: BTreeSet<CellValue> = [CellValue::Text("red".into()), CellValue::Text("green".into())]
        .into_iter()
        .collect();

    for mode in [FilterMode::Include, FilterMode::Exclude] {
        let spec = FilterSpec {
            column: "team".into(),
            mode,
            values: selected.clone(),
        };
        let ws = apply(&table, &SortSpec::by("age", true), Some(&spec))?;
        for cell in ws.table.column("team")?.cells() {
            let member = selected.contains(cell);
            match mode {
                FilterMode::Include => assert!(member, "{cell} kept by include"),
                FilterMode::Exclude => assert!(!member, "{cell} kept by exclude"),
            }
        }
    }

    // The null team is only kept when excluding.
    let exclude = FilterSpec {
        column: "team".into(),
        mode: FilterMode::Exclude,
        values: selected,
    };
    let ws = apply(&table, &SortSpec::default(), Some(&exclude))?;
    assert_eq!(ws.len(), 2);
    assert!(ws.table.column("team")?.cells().contains(&CellValue::Null));
    Ok(())
}

#[test]
fn empty_selection_equals_sorted_table() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    let sort = SortSpec::by("score", false);
    let sorted = apply(&table, &sort, None)?;
    for mode in [FilterMode::Include, FilterMode::Exclude] {
        let ws = apply(&table, &sort, Some(&FilterSpec::new("name", mode)))?;
        assert_eq!(ws.table, sorted.table);
    }
    Ok(())
}

#[test]
fn nulls_sort_last_and_mixed_columns_fail_soft() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    let ws = apply(&table, &SortSpec::by("age", false), None)?;
    let ages = column(&ws.table, "age")?;
    assert_eq!(ages.last(), Some(&CellValue::Null));
    assert_eq!(column(&ws.table, "name")?[0], CellValue::Text("dee".into()));

    let mixed = Table::from_pairs(vec![(
        "v",
        vec![CellValue::Float(1.5), CellValue::Text("x".into())],
    )])?;
    let ws = apply(&mixed, &SortSpec::by("v", true), None)?;
    assert_eq!(ws.table, mixed);
    assert_eq!(ws.warnings.len(), 1);
    Ok(())
}

#[test]
fn export_round_trips_through_the_loader() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    let keep = FilterSpec::new("team", FilterMode::Exclude).select(CellValue::Text("blue".into()));
    let ws = apply(&table, &SortSpec::by("score", true), Some(&keep))?;

    let csv = to_csv_string(&ws.table)?;
    assert!(csv.starts_with("name,age,score,team,joined\n"));
    let reloaded = load(DOWNLOAD_FILE_NAME, &csv)?;
    assert_eq!(reloaded, ws.table);
    Ok(())
}

#[test]
fn export_writes_a_file() -> Result<()> {
    let table = load("sales.csv", SALES)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(DOWNLOAD_FILE_NAME);
    write_csv(&table, &path)?;
    assert_eq!(std::fs::read_to_string(&path)?, SALES);
    Ok(())
}

#[test]
fn histogram_scenario() -> Result<()> {
    let table = load("h.csv", "v\n1\n2\nNA\n2\n3\n")?;
    assert_eq!(table.len(), 5);

    let spec = resolve(&table, &ChartRequest::histogram("v"))?;
    let ChartData::Histogram(bins) = spec.data else {
        panic!("expected a histogram");
    };
    assert!(bins.len() <= 20);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
    Ok(())
}

#[test]
fn correlation_without_numeric_columns_warns() -> Result<()> {
    let table = load("t.csv", "a,b\nx,true\ny,false\n")?;
    assert!(matches!(correlate(&table), Err(DashboardError::EmptyNumericSubset)));

    let mut session = DashboardSession::default();
    session.load("t.csv", b"a,b\nx,true\ny,false\n")?;
    session.settings.show_correlation = true;
    let dash = session.refresh().expect("table loaded");
    assert!(dash.correlation.is_none());
    assert!(dash
        .notices
        .iter()
        .any(|n| n.message.contains("no numeric columns")));
    Ok(())
}

#[test]
fn distinct_values_feed_the_filter() -> Result<()> {
    let table = load("mixed.csv", MIXED)?;
    let teams = distinct_values(&table, "team")?;
    assert_eq!(teams.len(), 3);
    assert!(!teams.contains(&CellValue::Null));
    Ok(())
}

#[test]
fn unknown_columns_are_rejected_everywhere() -> Result<()> {
    let table = load("sales.csv", SALES)?;
    assert!(matches!(
        apply(&table, &SortSpec::by("region", true), None),
        Err(DashboardError::ColumnNotFound(_))
    ));
    let filter = FilterSpec::new("region", FilterMode::Include);
    assert!(matches!(
        apply(&table, &SortSpec::default(), Some(&filter)),
        Err(DashboardError::ColumnNotFound(_))
    ));
    assert!(matches!(
        resolve(&table, &ChartRequest::histogram("region")),
        Err(DashboardError::ColumnNotFound(_))
    ));
    Ok(())
}
