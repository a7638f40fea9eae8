/// Data layer: core types, loading, filtering and the chart views.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, year/continent index (read-only, Arc)
///   └──────────┘
///        │   + FilterState {year, continent, size, log_x}
///        ▼
///   ┌──────────┐
///   │  views    │  compute() → scatter / bar / line / pie + height, titles
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
pub mod views;
