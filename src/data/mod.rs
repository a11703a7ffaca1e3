/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CreditDataset (+ derived buckets)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CreditDataset │  immutable Vec<Record>, observed domains
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → FilteredView (indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  SummaryStats, ChartTable, histograms, box stats
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::DataLoadError;
