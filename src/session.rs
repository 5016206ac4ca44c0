use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::data::export::{to_csv_string, write_csv};
use crate::data::filter::{distinct_values, FilterMode, FilterSpec};
use crate::data::loader::TableLoader;
use crate::data::model::{CellValue, Table};
use crate::data::pipeline::{apply, WorkingSet};
use crate::data::sort::{sort_table, SortSpec};
use crate::error::{DashboardError, Result};
use crate::view::chart::{resolve, ChartRequest, ChartSpec, PlotHeight};
use crate::view::correlation::{correlate, CorrelationMatrix};
use crate::view::preview::{preview, PreviewRows};
use crate::view::summary::{describe, Summary};

// ---------------------------------------------------------------------------
// User choices
// ---------------------------------------------------------------------------

/// Everything the control surface lets the user choose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub preview_rows: PreviewRows,
    pub sort: SortSpec,
    pub filter: Option<FilterSpec>,
    pub detailed_stats: bool,
    pub show_correlation: bool,
    /// The last chart the user asked for, if any.
    pub chart: Option<ChartRequest>,
    pub plot_height: PlotHeight,
}

impl ViewSettings {
    pub fn from_config(config: &DashboardConfig) -> Self {
        ViewSettings {
            preview_rows: PreviewRows::new(config.preview_rows),
            sort: SortSpec::default(),
            filter: None,
            detailed_stats: config.detailed_stats,
            show_correlation: config.show_correlation,
            chart: None,
            plot_height: PlotHeight::new(config.plot_height),
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings::from_config(&DashboardConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Output of one interaction cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A recovered problem shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    fn error(err: &DashboardError) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: err.to_string(),
        }
    }
}

/// Every view of the current working set.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub working_set: WorkingSet,
    pub preview: Table,
    pub summary: Summary,
    pub chart: Option<ChartSpec>,
    pub correlation: Option<CorrelationMatrix>,
    /// Values offered for the current filter column.
    pub filter_choices: Vec<CellValue>,
    pub notices: Vec<Notice>,
}

impl Dashboard {
    /// The working set as `filtered_data.csv` text.
    pub fn export_csv(&self) -> Result<String> {
        to_csv_string(&self.working_set.table)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        write_csv(&self.working_set.table, path)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The state of one user's dashboard, owned by the caller and recomputed from
/// scratch on every interaction.
#[derive(Debug)]
pub struct DashboardSession {
    loader: TableLoader,
    source_name: Option<String>,
    table: Option<Arc<Table>>,
    pub settings: ViewSettings,
}

impl Default for DashboardSession {
    fn default() -> Self {
        DashboardSession::new(&DashboardConfig::default(), b',')
    }
}

impl DashboardSession {
    pub fn new(config: &DashboardConfig, delimiter: u8) -> Self {
        DashboardSession {
            loader: TableLoader::new(delimiter),
            source_name: None,
            table: None,
            settings: ViewSettings::from_config(config),
        }
    }

    /// Load an uploaded file. On failure the previous table stays in place.
    pub fn load(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let table = self.loader.load(name, bytes)?;
        self.set_table(name, table);
        Ok(())
    }

    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let table = self.loader.load_path(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.set_table(&name, table);
        Ok(())
    }

    fn set_table(&mut self, name: &str, table: Arc<Table>) {
        // Choices made for another file no longer apply.
        self.settings.sort = SortSpec::default();
        self.settings.chart = None;
        self.source_name = Some(name.to_string());
        self.table = Some(table);
        // Nothing selected yet, so every view starts from the whole table.
        self.settings.filter = self
            .table
            .as_deref()
            .and_then(|t| t.column_names().into_iter().next())
            .map(|first| FilterSpec::new(first, FilterMode::Include));
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Tables parsed so far this session.
    pub fn cached_tables(&self) -> usize {
        self.loader.len()
    }

    /// The loaded table in the current sort order. An unsortable column
    /// leaves the order unchanged.
    fn in_sort_order<'a>(&self, table: &'a Table) -> Result<Cow<'a, Table>> {
        match sort_table(table, &self.settings.sort) {
            Ok(sorted) => Ok(Cow::Owned(sorted)),
            Err(DashboardError::Sort { .. }) => Ok(Cow::Borrowed(table)),
            Err(e) => Err(e),
        }
    }

    /// Values offered for the filter column: distinct non-null values in the
    /// order they appear once the table is sorted.
    pub fn filter_choices(&self, column: &str) -> Result<Vec<CellValue>> {
        let Some(table) = self.table() else {
            return Ok(Vec::new());
        };
        distinct_values(&*self.in_sort_order(table)?, column)
    }

    /// Switch the filter to another column with its first value selected.
    pub fn set_filter_column(&mut self, column: &str) {
        let mode = self.settings.filter.as_ref().map(|f| f.mode).unwrap_or_default();
        let selection = match self.table() {
            Some(table) => self
                .in_sort_order(table)
                .and_then(|sorted| FilterSpec::with_default_selection(&sorted, column)),
            None => Ok(FilterSpec::new(column, mode)),
        };
        let spec = selection.unwrap_or_else(|e| {
            log::warn!("No filter values for {column}: {e}");
            FilterSpec::new(column, mode)
        });
        self.settings.filter = Some(FilterSpec { mode, ..spec });
    }

    /// Run the whole pipeline and derive every view. `None` until a table is
    /// loaded.
    pub fn refresh(&self) -> Option<Dashboard> {
        let table = self.table()?;
        let settings = &self.settings;
        let mut notices = Vec::new();

        let working_set = match apply(table, &settings.sort, settings.filter.as_ref()) {
            Ok(ws) => ws,
            Err(e) => {
                log::warn!("Pipeline rejected the current settings: {e}");
                notices.push(Notice::error(&e));
                WorkingSet {
                    table: table.clone(),
                    unfiltered_rows: table.len(),
                    warnings: Vec::new(),
                }
            }
        };
        notices.extend(working_set.warnings.iter().map(Notice::warning));

        let preview = preview(&working_set.table, settings.preview_rows);
        let summary = describe(&working_set.table, settings.detailed_stats);

        let chart = settings.chart.as_ref().and_then(|request| {
            let request = ChartRequest {
                height: settings.plot_height,
                ..request.clone()
            };
            match resolve(&working_set.table, &request) {
                Ok(spec) => Some(spec),
                Err(e) => {
                    log::warn!("{e}");
                    notices.push(Notice::error(&e));
                    None
                }
            }
        });

        let filter_choices = match &settings.filter {
            Some(filter) => self.filter_choices(&filter.column).unwrap_or_else(|e| {
                log::warn!("No filter values for {}: {e}", filter.column);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let correlation = if settings.show_correlation {
            match correlate(&working_set.table) {
                Ok(matrix) => Some(matrix),
                Err(e) => {
                    log::warn!("{e}");
                    notices.push(Notice::warning(e.to_string()));
                    None
                }
            }
        } else {
            None
        };

        Some(Dashboard {
            working_set,
            preview,
            summary,
            chart,
            correlation,
            filter_choices,
            notices,
        })
    }
}
