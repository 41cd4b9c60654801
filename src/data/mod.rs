/// Data layer: table model, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, lenient date column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  drop excluded block, derive State / City_State
///   └──────────┘
///        │            (kept in `cache` per source file)
///        ▼
///   ┌──────────┐
///   │  filter   │  city / state / year selections → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────────────┐
///   │  aggregate / stats        │  grouped sums, rankings, summaries
///   └───────────────────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod options;
pub mod report;
pub mod stats;
