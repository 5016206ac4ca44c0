use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the load → transform → present pipeline
// ---------------------------------------------------------------------------

/// Every failure the dashboard core can report.
///
/// Only [`DashboardError::Parse`] and [`DashboardError::Io`] abort the
/// operation that raised them (a load or an export). The others are caught by
/// [`crate::session::DashboardSession::refresh`] and surfaced as notices while
/// the rest of the dashboard is still produced.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The input is not valid delimited tabular text.
    #[error("could not parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Columns of unequal length or with clashing names.
    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),

    #[error("value '{value}' is not a non-null value of column '{column}'")]
    InvalidFilterValue { column: String, value: String },

    /// The sort column holds values that cannot be ordered against each other.
    #[error("could not sort by {column}: {message}")]
    Sort { column: String, message: String },

    #[error("error generating plot: {0}")]
    Plot(String),

    #[error("no numeric columns available for correlation heatmap")]
    EmptyNumericSubset,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub(crate) fn parse(source_name: &str, message: impl Into<String>) -> Self {
        DashboardError::Parse {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
