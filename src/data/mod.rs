//! Data layer: core types, loading, the sort → filter pipeline and export.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse bytes → Table (cached by name + digest)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │   sort   │  stable sort by one column, soft-fails on mixed types
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  include / exclude selected values → WorkingSet
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export  │  WorkingSet → filtered_data.csv
//!   └──────────┘
//! ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod sort;
