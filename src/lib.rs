//! Country-level World Bank indicators prepared for charting.
//!
//! Four indicator exports are filtered to ten large economies, reshaped, and
//! turned into a fixed list of five chart descriptors:
//!
//! ```no_run
//! use worldbank_dashboard::{DashboardConfig, FigureAssembler};
//!
//! let config = DashboardConfig::for_data_dir("data".as_ref()).unwrap();
//! let charts = FigureAssembler::new(config).assemble().unwrap();
//! assert_eq!(charts.len(), 5);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod figures;

pub use config::{DashboardConfig, DatasetFiles};
pub use data::filter::{CountryAllowList, DEFAULT_COUNTRIES};
pub use data::loader::DatasetLoader;
pub use data::model::{CountryRow, CountrySeries, FilteredTable, SeriesPair, TidyRecord};
pub use error::{DataError, Result};
pub use figures::{ChartDescriptor, FigureAssembler, Layout, TraceSpec, FIGURE_COUNT};
