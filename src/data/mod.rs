/// Data layer: indicator tables, loading, filtering and reshaping.
///
/// Architecture:
/// ```text
///   API_*.csv (4-line preamble, one column per year)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  skip preamble, keep columns, filter → FilteredTable
///   └──────────┘      (allow-list from `filter`)
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  melt → TidyRecord, to_country_series → CountrySeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pair     │  two metrics per country → SeriesPair
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod pair;
pub mod reshape;
