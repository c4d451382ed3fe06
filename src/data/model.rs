use std::collections::BTreeSet;

use serde::Serialize;

use super::filter::CountryAllowList;
use crate::error::{DataError, Result};

/// Header of the key column in every World Bank indicator file.
pub const COUNTRY_NAME_COLUMN: &str = "Country Name";

// ---------------------------------------------------------------------------
// CountryRow – one surviving row of an indicator file
// ---------------------------------------------------------------------------

/// A single country's values, index-aligned with
/// [`FilteredTable::value_columns`]. `None` marks an empty source cell.
///
/// `labels` holds the kept descriptive cells (e.g. "Country Code"),
/// index-aligned with [`FilteredTable::label_columns`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub values: Vec<Option<f64>>,
    pub labels: Vec<String>,
}

impl CountryRow {
    pub fn new(country: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        CountryRow {
            country: country.into(),
            values,
            labels: Vec::new(),
        }
    }

    /// Value at `idx`; a row shorter than its table reads as missing.
    pub fn value(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// FilteredTable – indicator file restricted to kept columns / countries
// ---------------------------------------------------------------------------

/// A raw indicator table after column selection and country filtering.
///
/// Rows keep the order they had in the source file, not allow-list order.
/// The loader keeps one row per country. Tables built by hand may repeat a
/// country or carry short rows: lookups then use the first row, and cells
/// past the end of a row read as missing.
#[derive(Debug, Clone)]
pub struct FilteredTable {
    /// Human-readable dataset name (usually the file name), used in errors.
    pub dataset: String,
    /// Kept year columns, in requested order.
    pub value_columns: Vec<String>,
    /// Kept non-year columns, read as text.
    pub label_columns: Vec<String>,
    pub rows: Vec<CountryRow>,
    /// The allow-list the rows were filtered with.
    pub allowed: CountryAllowList,
}

impl FilteredTable {
    pub fn new(
        dataset: impl Into<String>,
        value_columns: Vec<String>,
        rows: Vec<CountryRow>,
        allowed: CountryAllowList,
    ) -> Self {
        FilteredTable {
            dataset: dataset.into(),
            value_columns,
            label_columns: Vec::new(),
            rows,
            allowed,
        }
    }

    /// Attach the names of the descriptive columns carried in `CountryRow::labels`.
    pub fn with_label_columns(mut self, label_columns: Vec<String>) -> Self {
        self.label_columns = label_columns;
        self
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row survived filtering.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unique country names in the order they first appear.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .map(|r| r.country.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// First row for `country`, if any.
    pub fn row(&self, country: &str) -> Option<&CountryRow> {
        self.rows.iter().find(|r| r.country == country)
    }

    /// Position of a value column.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.value_columns.iter().position(|c| c == column)
    }

    /// Resolve value-column names to positions, failing on the first unknown one.
    pub fn column_indices<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<usize>> {
        columns
            .iter()
            .map(|c| {
                self.column_index(c.as_ref()).ok_or_else(|| DataError::Schema {
                    column: c.as_ref().to_string(),
                    dataset: self.dataset.clone(),
                })
            })
            .collect()
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|r| r.value(idx)).collect())
    }

    /// Value of `column` in the first row for `country`. Missing rows,
    /// columns and empty cells all come back as `None`.
    pub fn value(&self, country: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(country)?.value(idx)
    }

    /// Text of a descriptive column for `country`.
    pub fn label(&self, country: &str, column: &str) -> Option<&str> {
        let idx = self.label_columns.iter().position(|c| c == column)?;
        self.row(country)?.labels.get(idx).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Reshaped forms
// ---------------------------------------------------------------------------

/// Long-form record: one (country, year label) cell of a wide table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TidyRecord {
    pub country: String,
    /// The source column name, i.e. a year label such as `"1990"`.
    pub variable: String,
    pub value: Option<f64>,
}

/// One country's measurements over a list of years.
///
/// `years` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySeries {
    pub country: String,
    pub years: Vec<i32>,
    pub values: Vec<Option<f64>>,
}

impl CountrySeries {
    /// Number of (year, value) points.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Two metrics measured for the same country over the same years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPair {
    pub first: Vec<Option<f64>>,
    pub second: Vec<Option<f64>>,
}
