//! Core of the rusty-dashboard data explorer.
//!
//! A tabular file is loaded once into an immutable [`data::model::Table`],
//! run through the sort → filter pipeline on every interaction, and the
//! resulting working set feeds the preview, summary, chart and correlation
//! views. [`session::DashboardSession`] ties the stages together.

pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod view;

pub use error::{DashboardError, Result};
