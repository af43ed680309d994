/// Data layer: core types, loading, selections and derived tables.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → MovieTable, coerce year / rating
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store   │  Arc<MovieTable>, reload on path / mtime change
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐   ┌──────────┐   ┌───────────┐
///   │  filter  │   │  stats   │   │ aggregate │
///   └──────────┘   └──────────┘   └───────────┘
///   row indices     describe()     chart series
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
pub mod store;
