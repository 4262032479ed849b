/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file, range-check rows → CarDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CarDataset │  Vec<CarRecord>, unique values per column
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  apply column predicates → filtered indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
