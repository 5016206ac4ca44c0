//! Read-only views derived from a working set: row preview, descriptive
//! statistics, chart data and the correlation matrix.

pub mod chart;
pub mod correlation;
pub mod preview;
pub mod summary;
